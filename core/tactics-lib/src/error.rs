// 對局指令錯誤型別，攜帶 function name，支援來源錯誤巢狀
//
// 任何錯誤都代表指令被拒絕，呼叫端手上的 MatchState 維持原狀。
use crate::*;
use thiserror::Error;

/// 非法指令
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("`{func}`: 對局已結束")]
    GameOver { func: &'static str },

    #[error("`{func}`: 目前階段 {phase} 不接受此指令")]
    WrongPhase { func: &'static str, phase: Phase },

    #[error("`{func}`: 現在不是 {side} 的回合")]
    NotYourTurn { func: &'static str, side: Side },

    #[error("`{func}`: 單位 {instance_id} 不存在")]
    NoSuchUnit {
        func: &'static str,
        instance_id: InstanceId,
    },

    #[error("`{func}`: 單位 {instance_id} 本回合已結束行動")]
    UnitDone {
        func: &'static str,
        instance_id: InstanceId,
    },

    #[error("`{func}`: 單位 {instance_id} 本回合已移動過")]
    AlreadyMoved {
        func: &'static str,
        instance_id: InstanceId,
    },

    #[error("`{func}`: 單位 {instance_id} 本回合已攻擊過")]
    AlreadyAttacked {
        func: &'static str,
        instance_id: InstanceId,
    },

    #[error("`{func}`: 單位 {instance_id} 暈眩中")]
    Stunned {
        func: &'static str,
        instance_id: InstanceId,
    },

    #[error("`{func}`: {pos} 不是合法的移動目的地")]
    IllegalDestination { func: &'static str, pos: Position },

    #[error("`{func}`: {pos} 不是合法的目標")]
    IllegalTarget { func: &'static str, pos: Position },

    #[error("`{func}`: 技能 {skill_id} 不存在")]
    SkillNotFound {
        func: &'static str,
        skill_id: SkillId,
    },

    #[error("`{func}`: 單位 {instance_id} 沒有技能 {skill_id}")]
    SkillNotOwned {
        func: &'static str,
        skill_id: SkillId,
        instance_id: InstanceId,
    },

    #[error("`{func}`: 技能 {skill_id} 需要 {form} 形態")]
    FormRequired {
        func: &'static str,
        skill_id: SkillId,
        form: Form,
    },

    #[error("`{func}`: 單位 {instance_id} 已使用過技能 {skill_id}")]
    SkillAlreadyUsed {
        func: &'static str,
        skill_id: SkillId,
        instance_id: InstanceId,
    },

    #[error("`{func}`: 技能 {skill_id} 需要指定目標格")]
    MissingTarget {
        func: &'static str,
        skill_id: SkillId,
    },

    #[error("`{func}`: {side} 的手牌中沒有 {unit_id}")]
    NotInHand {
        func: &'static str,
        unit_id: UnitId,
        side: Side,
    },

    #[error("`{func}`: {pos} 不在己方底線")]
    NotHomeRow { func: &'static str, pos: Position },

    #[error("`{func}`: 位置 {pos} 已被佔用")]
    CellOccupied { func: &'static str, pos: Position },

    #[error("`{func}`: {side} 本回合已增援過")]
    ReinforceUsed { func: &'static str, side: Side },

    #[error("`{func}`: {side} 已達部署上限")]
    QuotaReached { func: &'static str, side: Side },

    #[error("`{func}`: 包裝: {source}")]
    Wrap {
        func: &'static str,
        #[source]
        source: Box<Error>,
    },
}

pub fn root_error(err: &Error) -> &Error {
    let mut err = err;
    while let Error::Wrap { source, .. } = err {
        err = source.as_ref();
    }
    err
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_error_unwraps_nested() {
        let inner = Error::Stunned {
            func: "inner",
            instance_id: "S1".to_string(),
        };
        let err = Error::Wrap {
            func: "outer",
            source: Box::new(Error::Wrap {
                func: "middle",
                source: Box::new(inner.clone()),
            }),
        };
        assert_eq!(root_error(&err), &inner);
        assert!(err.to_string().contains("S1"));
        assert_eq!(root_error(&inner), &inner);
    }
}
