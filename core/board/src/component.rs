//! 棋盤基本型別：座標、陣營、方向

use crate::alias::Coord;
use serde::{Deserialize, Serialize};
use std::fmt;
use strum_macros::{Display, EnumIter, EnumString};

/// 棋盤位置（列, 行），row 0 是北方底線
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Position {
    pub row: Coord,
    pub col: Coord,
}

impl Position {
    pub const fn new(row: Coord, col: Coord) -> Self {
        Self { row, col }
    }

    /// 沿方向前進 `times` 步（不檢查邊界）
    pub fn offset(self, step: Step, times: Coord) -> Self {
        Self {
            row: self.row + step.dr * times,
            col: self.col + step.dc * times,
        }
    }

    /// 切比雪夫距離（八方向步數）
    pub fn chebyshev(self, other: Position) -> Coord {
        (self.row - other.row)
            .abs()
            .max((self.col - other.col).abs())
    }

    /// 曼哈頓距離
    pub fn manhattan(self, other: Position) -> Coord {
        (self.row - other.row).abs() + (self.col - other.col).abs()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// 陣營
///
/// - `South`：先手，底線在最後一列，前方是 row 遞減
/// - `North`：後手，底線在 row 0，前方是 row 遞增
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Side {
    South,
    North,
}

impl Side {
    pub fn opponent(self) -> Side {
        match self {
            Side::South => Side::North,
            Side::North => Side::South,
        }
    }

    /// 前進方向的 row 增量
    pub fn forward(self) -> Coord {
        match self {
            Side::South => -1,
            Side::North => 1,
        }
    }

    /// 將「前方為負」的相對 dy 轉成實際 row 增量
    pub fn apply_facing(self, dy: Coord) -> Coord {
        match self {
            Side::South => dy,
            Side::North => -dy,
        }
    }

    /// 單位實例 ID 前綴
    pub fn instance_prefix(self) -> char {
        match self {
            Side::South => 'S',
            Side::North => 'N',
        }
    }
}

/// 單位方向（每個分量只會是 -1、0、1）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Step {
    pub dr: Coord,
    pub dc: Coord,
}

impl Step {
    pub const UP: Step = Step { dr: -1, dc: 0 };
    pub const DOWN: Step = Step { dr: 1, dc: 0 };
    pub const LEFT: Step = Step { dr: 0, dc: -1 };
    pub const RIGHT: Step = Step { dr: 0, dc: 1 };
    pub const UP_LEFT: Step = Step { dr: -1, dc: -1 };
    pub const UP_RIGHT: Step = Step { dr: -1, dc: 1 };
    pub const DOWN_LEFT: Step = Step { dr: 1, dc: -1 };
    pub const DOWN_RIGHT: Step = Step { dr: 1, dc: 1 };

    /// 上下左右
    pub const ORTHOGONAL: [Step; 4] = [Step::UP, Step::DOWN, Step::LEFT, Step::RIGHT];

    /// 八方向，前四個與 `ORTHOGONAL` 同序
    pub const ALL: [Step; 8] = [
        Step::UP,
        Step::DOWN,
        Step::LEFT,
        Step::RIGHT,
        Step::UP_LEFT,
        Step::UP_RIGHT,
        Step::DOWN_LEFT,
        Step::DOWN_RIGHT,
    ];

    /// 取各軸正負號，正規化成單位方向
    pub fn normalized(dr: Coord, dc: Coord) -> Step {
        Step {
            dr: dr.signum(),
            dc: dc.signum(),
        }
    }

    /// `from` 指向 `to` 的單位方向
    pub fn between(from: Position, to: Position) -> Step {
        Step::normalized(to.row - from.row, to.col - from.col)
    }

    pub fn is_zero(self) -> bool {
        self.dr == 0 && self.dc == 0
    }
}
