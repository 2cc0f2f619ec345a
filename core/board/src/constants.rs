//! 棋盤常數定義

use crate::alias::Coord;

/// 標準棋盤列數
pub const DEFAULT_ROWS: Coord = 7;

/// 標準棋盤行數
pub const DEFAULT_COLS: Coord = 7;

/// 雙方底線上的城門欄位
pub const DEFAULT_GATE_COLS: [Coord; 3] = [1, 3, 5];

/// 標準進化列（正中間）
pub const DEFAULT_EVOLUTION_ROW: Coord = 3;

/// 單位目錄中攻擊力、血量、傷害與回合數的上限
pub const MAX_STAT: i32 = 999;

/// 單位目錄中移動、射程、範圍與擊退距離的上限
pub const MAX_REACH: Coord = 64;
