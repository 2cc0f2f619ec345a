use crate::skill::SkillDefinition;
use board::alias::{Coord, UnitId};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

/// 進化後 ATK 加成
pub const EVOLVED_ATK_BONUS: i32 = 1;
/// 進化後最大 HP 加成
pub const EVOLVED_MAX_HP_BONUS: i32 = 1;

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Form {
    #[default]
    Base,
    Evolved,
}

impl Form {
    pub fn atk_bonus(self) -> i32 {
        match self {
            Form::Base => 0,
            Form::Evolved => EVOLVED_ATK_BONUS,
        }
    }

    pub fn max_hp_bonus(self) -> i32 {
        match self {
            Form::Base => 0,
            Form::Evolved => EVOLVED_MAX_HP_BONUS,
        }
    }
}

/// 相對位移，`dy` 以「前方為負」表示，實際方向由陣營決定
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Offset {
    pub dx: Coord,
    pub dy: Coord,
}

impl Offset {
    pub const fn new(dx: Coord, dy: Coord) -> Self {
        Self { dx, dy }
    }

    pub fn is_zero(self) -> bool {
        self.dx == 0 && self.dy == 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MovementPattern {
    /// 上下左右各走最多 `range` 格，遇到單位即停
    Orthogonal { range: Coord },
    /// 每個位移各自獨立判斷
    Custom { offsets: Vec<Offset> },
    /// 跳躍到固定的相對位置
    TeleportFixed { offsets: Vec<Offset> },
}

impl MovementPattern {
    /// `custom`／`teleport_fixed` 的位移清單
    pub fn offsets(&self) -> Option<&[Offset]> {
        match self {
            MovementPattern::Orthogonal { .. } => None,
            MovementPattern::Custom { offsets } | MovementPattern::TeleportFixed { offsets } => {
                Some(offsets)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangedAttack {
    pub range: Coord,
    #[serde(default)]
    pub line_of_sight_blocked_by_units: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitDefinition {
    pub id: UnitId,
    pub name: String,
    pub atk: i32,
    pub hp: i32,
    pub movement: MovementPattern,
    #[serde(default)]
    pub ranged: Option<RangedAttack>,
    #[serde(default)]
    pub skills: Vec<SkillDefinition>,
}

impl UnitDefinition {
    pub fn effective_atk(&self, form: Form) -> i32 {
        self.atk + form.atk_bonus()
    }

    pub fn effective_max_hp(&self, form: Form) -> i32 {
        self.hp + form.max_hp_bonus()
    }

    pub fn skill(&self, skill_id: &str) -> Option<&SkillDefinition> {
        self.skills.iter().find(|s| s.id == skill_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_stats() {
        let def = UnitDefinition {
            id: "YABUKO".to_string(),
            name: "Yabuko".to_string(),
            atk: 1,
            hp: 2,
            movement: MovementPattern::Orthogonal { range: 2 },
            ranged: None,
            skills: vec![],
        };
        assert_eq!(def.effective_atk(Form::Base), 1);
        assert_eq!(def.effective_atk(Form::Evolved), 2);
        assert_eq!(def.effective_max_hp(Form::Base), 2);
        assert_eq!(def.effective_max_hp(Form::Evolved), 3);
    }

    #[test]
    fn test_movement_offsets() {
        let custom = MovementPattern::Custom {
            offsets: vec![Offset::new(0, -1), Offset::new(1, -1)],
        };
        assert_eq!(custom.offsets().map(<[Offset]>::len), Some(2));
        assert!(MovementPattern::Orthogonal { range: 1 }.offsets().is_none());
    }

    #[test]
    fn test_form_from_str() {
        assert_eq!("evolved".parse::<Form>().unwrap(), Form::Evolved);
        assert_eq!(Form::default().to_string(), "base");
    }
}
