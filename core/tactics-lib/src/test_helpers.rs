//! 測試輔助：用 ASCII 棋盤擺放單位，直接建立戰鬥中的對局
use crate::*;
use board::loader::load_from_ascii;
use std::sync::Arc;

/// 標記即實例 ID，開頭 `S`／`N` 決定陣營；`legend` 對應到單位定義 ID
pub fn units_from_ascii(ascii: &str, legend: &[(&str, &str)]) -> (Board, Units) {
    let catalog = Catalog::builtin().unwrap();
    let (board, markers) = load_from_ascii(ascii).unwrap();
    let mut list = Vec::new();
    for (marker, unit_id) in legend {
        let side = if marker.starts_with('S') {
            Side::South
        } else {
            Side::North
        };
        let def = catalog.get(unit_id).unwrap();
        for pos in markers.get(*marker).into_iter().flatten() {
            list.push(UnitInstance::new(*marker, def, side, *pos));
        }
    }
    (board, Units::new(list))
}

pub fn catalog() -> Arc<Catalog> {
    Arc::new(Catalog::builtin().unwrap())
}

/// 直接進入戰鬥階段、South 先手的對局
pub fn battle_state(ascii: &str, legend: &[(&str, &str)]) -> MatchState {
    let (board, units) = units_from_ascii(ascii, legend);
    let rules = Rules {
        board,
        ..Rules::default()
    };
    MatchState::from_units(catalog(), rules, units)
}
