//! status.rs：
//! - 暈眩／燃燒的施加與回合結束時的遞減。
use crate::*;

/// 施加暈眩，保留較大值（不累加）
pub fn apply_stun(unit: &mut UnitInstance, turns: u32) {
    unit.stun = unit.stun.max(turns);
}

/// 施加燃燒，保留較大值（不累加）
pub fn apply_burn(unit: &mut UnitInstance, ticks: u32) {
    unit.burn = unit.burn.max(ticks);
}

/// 對 `side` 的單位結算狀態：燃燒扣血並遞減、暈眩遞減，死亡單位移除
///
/// 每個邏輯回合只能呼叫一次，重複呼叫會重複扣血。
pub fn tick_side(units: &Units, side: Side, burn_damage: i32) -> Units {
    units.with_side_updated(side, |unit| {
        if unit.burn > 0 {
            unit.hp -= burn_damage;
            unit.burn -= 1;
        }
        if unit.stun > 0 {
            unit.stun -= 1;
        }
    })
}
