//! movement.rs：
//! - 依單位的移動方式計算合法目的地，以及移動後的自動進化。
//! - 不檢查回合與行動旗標。
use crate::*;

/// 計算合法移動目的地（依產生順序，不含重複）
///
/// - `orthogonal`：四方向逐格前進，遇到單位或邊界即停，被佔的格不算
/// - `custom`／`teleport_fixed`：每個位移各自獨立判斷，不受路徑阻擋
///
/// 暈眩中的單位沒有任何合法移動。
pub fn legal_moves(
    board: &Board,
    units: &Units,
    defs: &impl UnitDefinitionGetter,
    unit: &UnitInstance,
) -> Vec<Position> {
    if unit.is_stunned() {
        return vec![];
    }

    let mut moves = Vec::new();
    match &unit.definition(defs).movement {
        MovementPattern::Orthogonal { range } => {
            for step in Step::ORTHOGONAL {
                for pos in board.ray(unit.pos, step, *range) {
                    if units.is_occupied(pos) {
                        break;
                    }
                    moves.push(pos);
                }
            }
        }
        MovementPattern::Custom { offsets } | MovementPattern::TeleportFixed { offsets } => {
            for offset in offsets {
                // dy 以前方為負，依陣營轉成實際方向
                let pos = Position::new(
                    unit.pos.row + unit.side.apply_facing(offset.dy),
                    unit.pos.col + offset.dx,
                );
                if board.in_bounds(pos) && !units.is_occupied(pos) && !moves.contains(&pos) {
                    moves.push(pos);
                }
            }
        }
    }
    moves
}

/// 移動單位；若抵達進化列且尚未進化，轉為進化形態並回復 1 HP（不超過進化後上限）
///
/// 回傳新集合與是否發生進化。
pub fn move_and_evolve(
    board: &Board,
    units: &Units,
    defs: &impl UnitDefinitionGetter,
    instance_id: &str,
    to: Position,
) -> (Units, bool) {
    let moved = units.with_moved(instance_id, to);
    let evolves = board.is_evolution_cell(to)
        && moved
            .get(instance_id)
            .is_some_and(|unit| unit.form == Form::Base);
    if !evolves {
        return (moved, false);
    }

    let evolved = moved.with_updated(instance_id, |unit| {
        let max_hp = unit.definition(defs).effective_max_hp(Form::Evolved);
        unit.form = Form::Evolved;
        unit.hp = (unit.hp + 1).min(max_hp);
    });
    (evolved, true)
}
