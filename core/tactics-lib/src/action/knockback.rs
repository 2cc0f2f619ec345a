use crate::*;

/// 擊退結果
#[derive(Debug, Clone, PartialEq)]
pub struct Knockback {
    /// 至少移動了一格
    pub ok: bool,
    pub units: Units,
    pub cells_moved: Coord,
}

/// 沿方向逐格推動單位，遇到邊界或其他單位前停下
///
/// 方向會先正規化成單位步長。第一步就走不了時回傳 `ok = false`、集合不變；
/// 否則回傳部分位移。目標不在場上也視為走不了。
pub fn knockback(
    board: &Board,
    units: &Units,
    target_id: &str,
    direction: Step,
    distance: Coord,
) -> Knockback {
    let step = Step::normalized(direction.dr, direction.dc);
    let unmoved = || Knockback {
        ok: false,
        units: units.clone(),
        cells_moved: 0,
    };
    let Some(target) = units.get(target_id) else {
        return unmoved();
    };
    if step.is_zero() {
        return unmoved();
    }

    let mut dest = target.pos;
    let mut cells_moved = 0;
    for next in board.ray(target.pos, step, distance) {
        if units.at(next).is_some_and(|u| u.instance_id != target_id) {
            break;
        }
        dest = next;
        cells_moved += 1;
    }

    if cells_moved == 0 {
        return unmoved();
    }
    Knockback {
        ok: true,
        units: units.with_moved(target_id, dest),
        cells_moved,
    }
}
