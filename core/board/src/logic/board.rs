//! 棋盤邏輯

use crate::alias::Coord;
use crate::component::{Position, Side, Step};
use crate::constants::{DEFAULT_COLS, DEFAULT_EVOLUTION_ROW, DEFAULT_GATE_COLS, DEFAULT_ROWS};
use crate::error::{BoardError, Result};
use serde::{Deserialize, Serialize};

/// 棋盤尺寸與固定格（城門、進化列）
///
/// 城門與進化列是整張棋盤的常數，不屬於任何單位。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Board {
    pub rows: Coord,
    pub cols: Coord,
    /// 雙方底線上的城門欄位（兩邊共用同一組）
    pub gate_cols: Vec<Coord>,
    pub evolution_row: Coord,
}

impl Default for Board {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            cols: DEFAULT_COLS,
            gate_cols: DEFAULT_GATE_COLS.to_vec(),
            evolution_row: DEFAULT_EVOLUTION_ROW,
        }
    }
}

impl Board {
    /// 指定尺寸，城門沿用標準欄位（超出寬度者略過），進化列取正中間
    pub fn with_size(rows: Coord, cols: Coord) -> Self {
        Self {
            rows,
            cols,
            gate_cols: DEFAULT_GATE_COLS
                .iter()
                .copied()
                .filter(|c| *c < cols)
                .collect(),
            evolution_row: rows / 2,
        }
    }

    /// 載入時驗證一次
    pub fn validate(&self) -> Result<()> {
        if self.rows < 3 || self.cols < 1 {
            return Err(BoardError::InvalidDimensions {
                rows: self.rows,
                cols: self.cols,
            }
            .into());
        }
        if let Some(&col) = self.gate_cols.iter().find(|c| **c < 0 || **c >= self.cols) {
            return Err(BoardError::GateOutOfRange {
                col,
                cols: self.cols,
            }
            .into());
        }
        if self.evolution_row <= 0 || self.evolution_row >= self.rows - 1 {
            return Err(BoardError::EvolutionRowOutOfRange {
                row: self.evolution_row,
                rows: self.rows,
            }
            .into());
        }
        Ok(())
    }

    /// 驗證位置是否在棋盤邊界內
    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.row >= 0 && pos.row < self.rows && pos.col >= 0 && pos.col < self.cols
    }

    pub fn home_row(&self, side: Side) -> Coord {
        match side {
            Side::South => self.rows - 1,
            Side::North => 0,
        }
    }

    pub fn is_home_row(&self, side: Side, pos: Position) -> bool {
        self.in_bounds(pos) && pos.row == self.home_row(side)
    }

    /// `side` 底線上的城門格（被敵方佔領即敗）
    pub fn is_gate(&self, side: Side, pos: Position) -> bool {
        self.is_home_row(side, pos) && self.gate_cols.contains(&pos.col)
    }

    pub fn is_evolution_cell(&self, pos: Position) -> bool {
        self.in_bounds(pos) && pos.row == self.evolution_row
    }

    /// `side` 底線的所有格，由左至右
    pub fn home_cells(&self, side: Side) -> impl Iterator<Item = Position> + '_ {
        let row = self.home_row(side);
        (0..self.cols).map(move |col| Position::new(row, col))
    }

    /// 全部格子，逐列掃描
    pub fn cells(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.rows).flat_map(move |row| (0..self.cols).map(move |col| Position::new(row, col)))
    }

    /// 往指定方向走一格，超出邊界回傳 `None`
    pub fn step_in_direction(&self, pos: Position, step: Step) -> Option<Position> {
        let next = pos.offset(step, 1);
        self.in_bounds(next).then_some(next)
    }

    /// 從 `from`（不含）沿 `step` 最多走 `max_steps` 格，碰到邊界即停
    pub fn ray(
        &self,
        from: Position,
        step: Step,
        max_steps: Coord,
    ) -> impl Iterator<Item = Position> + '_ {
        (1..=max_steps)
            .map(move |i| from.offset(step, i))
            .take_while(move |pos| self.in_bounds(*pos))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_default_board_is_valid() {
        let board = Board::default();
        assert!(board.validate().is_ok());
        assert_eq!(board.home_row(Side::South), 6);
        assert_eq!(board.home_row(Side::North), 0);
        assert!(board.is_gate(Side::North, Position::new(0, 3)));
        assert!(!board.is_gate(Side::North, Position::new(0, 2)));
        assert!(board.is_gate(Side::South, Position::new(6, 5)));
        assert!(!board.is_gate(Side::South, Position::new(0, 5)));
        assert!(board.is_evolution_cell(Position::new(3, 0)));
    }

    #[test]
    fn test_validate_rejects_bad_config() {
        let test_data = [
            Board {
                rows: 2,
                ..Board::default()
            },
            Board {
                gate_cols: vec![7],
                ..Board::default()
            },
            Board {
                evolution_row: 0,
                ..Board::default()
            },
            Board {
                evolution_row: 6,
                ..Board::default()
            },
        ];
        for (idx, board) in test_data.into_iter().enumerate() {
            let err = board.validate().unwrap_err();
            assert!(matches!(err.kind(), ErrorKind::Board(_)), "case {idx}: {err}");
        }
    }

    #[test]
    fn test_ray_stops_at_edge() {
        let board = Board::default();
        let cells: Vec<_> = board.ray(Position::new(1, 1), Step::UP_LEFT, 5).collect();
        assert_eq!(cells, vec![Position::new(0, 0)]);

        let cells: Vec<_> = board.ray(Position::new(3, 3), Step::RIGHT, 2).collect();
        assert_eq!(cells, vec![Position::new(3, 4), Position::new(3, 5)]);

        assert_eq!(board.ray(Position::new(0, 0), Step::UP, 3).count(), 0);
    }

    #[test]
    fn test_step_in_direction() {
        let board = Board::default();
        assert_eq!(
            board.step_in_direction(Position::new(0, 0), Step::DOWN),
            Some(Position::new(1, 0))
        );
        assert_eq!(board.step_in_direction(Position::new(0, 0), Step::LEFT), None);
        assert_eq!(board.step_in_direction(Position::new(6, 6), Step::DOWN_RIGHT), None);
    }

    #[test]
    fn test_with_size_filters_gates() {
        let board = Board::with_size(5, 3);
        assert_eq!(board.gate_cols, vec![1]);
        assert_eq!(board.evolution_row, 2);
        assert!(board.validate().is_ok());
    }
}
