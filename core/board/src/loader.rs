//! 棋盤載入器

use crate::alias::Coord;
use crate::component::Position;
use crate::error::{LoadError, Result};
use crate::logic::board::Board;
use std::collections::HashMap;

/// 從 ASCII 格式載入棋盤
///
/// ASCII 格式：每行用空格分隔的符號
/// - `.` = 空格
/// - 其他字符串（`S1`、`N`、`E` 等）= 標記位置
/// - 相同的標記會全部收集成 Vec（由上而下、由左而右）
///
/// 返回：(棋盤, 標記映射)。城門沿用標準欄位，進化列取正中間。
///
/// 例如：
/// ```text
/// . N .
/// . . .
/// . S .
/// ```
pub fn load_from_ascii(ascii: &str) -> Result<(Board, HashMap<String, Vec<Position>>)> {
    let lines: Vec<&str> = ascii
        .lines()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .collect();

    if lines.is_empty() {
        return Err(LoadError::ParseError("棋盤為空".to_string()).into());
    }

    // 推導寬度（第一行的符號數）
    let width = lines[0].split_whitespace().count();
    if let Some((idx, _)) = lines
        .iter()
        .enumerate()
        .find(|(_, l)| l.split_whitespace().count() != width)
    {
        return Err(LoadError::ParseError(format!("第 {idx} 行寬度與第一行不同")).into());
    }

    let cols: Coord = width
        .try_into()
        .map_err(|_| LoadError::ParseError("棋盤寬度過大".to_string()))?;
    let rows: Coord = lines
        .len()
        .try_into()
        .map_err(|_| LoadError::ParseError("棋盤高度過大".to_string()))?;

    let board = Board::with_size(rows, cols);

    let mut markers: HashMap<String, Vec<Position>> = HashMap::new();
    for (row, line) in (0..).zip(lines.iter()) {
        for (col, cell) in (0..).zip(line.split_whitespace()) {
            // 非 `.` 的符號記為標記
            if cell != "." {
                markers
                    .entry(cell.to_string())
                    .or_default()
                    .push(Position::new(row, col));
            }
        }
    }

    Ok((board, markers))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_from_ascii() {
        let (board, markers) = load_from_ascii(
            r#"
            . N .
            . . .
            S . S
            "#,
        )
        .unwrap();
        assert_eq!(board.rows, 3);
        assert_eq!(board.cols, 3);
        assert_eq!(markers["N"], vec![Position::new(0, 1)]);
        assert_eq!(markers["S"], vec![Position::new(2, 0), Position::new(2, 2)]);
    }

    #[test]
    fn test_load_from_ascii_errors() {
        assert!(load_from_ascii("   \n  ").is_err());
        assert!(load_from_ascii(". .\n. . .").is_err());
    }
}
