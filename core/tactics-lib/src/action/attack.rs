//! attack.rs：
//! - 普通攻擊的範圍標記、可攻擊目標與傷害套用。
use crate::*;
use serde::{Deserialize, Serialize};
use strum_macros::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum MarkKind {
    /// 射程內的空格
    Range,
    /// 敵方單位
    Target,
    /// 友方單位
    Blocker,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AttackMark {
    pub pos: Position,
    pub kind: MarkKind,
}

fn classify(attacker: &UnitInstance, occupant: Option<&UnitInstance>) -> MarkKind {
    match occupant {
        None => MarkKind::Range,
        Some(other) if other.is_enemy_of(attacker) => MarkKind::Target,
        Some(_) => MarkKind::Blocker,
    }
}

/// 普通攻擊的標記格
///
/// - 近戰：上下左右相鄰四格
/// - 遠程：八方向各掃到 `range`；視線會被單位阻擋時，碰到第一個單位即停（含該格）
pub fn attack_marks(
    board: &Board,
    units: &Units,
    defs: &impl UnitDefinitionGetter,
    attacker: &UnitInstance,
) -> Vec<AttackMark> {
    let mut marks = Vec::new();
    match attacker.definition(defs).ranged {
        None => {
            for step in Step::ORTHOGONAL {
                if let Some(pos) = board.step_in_direction(attacker.pos, step) {
                    let kind = classify(attacker, units.at(pos));
                    marks.push(AttackMark { pos, kind });
                }
            }
        }
        Some(ranged) => {
            for step in Step::ALL {
                for pos in board.ray(attacker.pos, step, ranged.range) {
                    let occupant = units.at(pos);
                    marks.push(AttackMark {
                        pos,
                        kind: classify(attacker, occupant),
                    });
                    if occupant.is_some() && ranged.line_of_sight_blocked_by_units {
                        break;
                    }
                }
            }
        }
    }
    marks
}

/// 可攻擊的敵方單位（依標記順序）
pub fn attackable_targets<'a>(
    board: &Board,
    units: &'a Units,
    defs: &impl UnitDefinitionGetter,
    attacker: &UnitInstance,
) -> Vec<&'a UnitInstance> {
    attack_marks(board, units, defs, attacker)
        .into_iter()
        .filter(|mark| mark.kind == MarkKind::Target)
        .filter_map(|mark| units.at(mark.pos))
        .collect()
}

/// 以攻擊者的有效 ATK（含形態加成）打擊防守方
pub fn resolve_attack(
    units: &Units,
    defs: &impl UnitDefinitionGetter,
    attacker: &UnitInstance,
    defender_id: &str,
) -> Units {
    units.with_damage(defender_id, attacker.atk(defs))
}
