use crate::*;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum VictoryReason {
    /// 對方全滅
    Elimination,
    /// 佔領對方底線的城門
    GateCapture,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Victory {
    pub winner: Side,
    pub reason: VictoryReason,
}

/// 勝負判定：先看全滅，再看城門
pub fn check_victory(board: &Board, units: &Units) -> Option<Victory> {
    for side in Side::iter() {
        if units.count(side) == 0 {
            return Some(Victory {
                winner: side.opponent(),
                reason: VictoryReason::Elimination,
            });
        }
    }
    for side in Side::iter() {
        let captured = units
            .of_side(side)
            .any(|unit| board.is_gate(side.opponent(), unit.pos));
        if captured {
            return Some(Victory {
                winner: side,
                reason: VictoryReason::GateCapture,
            });
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;

    #[test]
    fn test_check_victory() {
        let test_data = [
            (
                // 沒有勝負
                r#"
                . . . N1 . . .
                . . . . . . .
                . . . . . . .
                . . . . . . .
                . . . . . . .
                . . . . . . .
                . . . S1 . . .
                "#,
                None,
            ),
            (
                // South 佔領北方城門
                r#"
                . S1 . . . . .
                . . . . . . .
                . . . . . . .
                . . . . . . .
                . . . . . . .
                . . . . . . .
                . . . N1 . . .
                "#,
                Some((Side::South, VictoryReason::GateCapture)),
            ),
            (
                // 站在底線但不是城門
                r#"
                S1 . . . . . .
                . . . . . . .
                . . . . . . .
                . . . . . . .
                . . . . . . .
                . . . . . . .
                . . N1 . . . .
                "#,
                None,
            ),
            (
                // 全滅優先於城門
                r#"
                . . . . . . .
                . . . . . . .
                . . . . . . .
                . . . . . . .
                . . . . . . .
                . . . . . . .
                . . . . . N1 .
                "#,
                Some((Side::North, VictoryReason::Elimination)),
            ),
        ];
        for (idx, (ascii, expect)) in test_data.into_iter().enumerate() {
            let (board, units) = units_from_ascii(ascii, &[("S1", "MYOUOU"), ("N1", "MYOUOU")]);
            let got = check_victory(&board, &units).map(|v| (v.winner, v.reason));
            assert_eq!(got, expect, "case {idx}");
        }
    }

    #[test]
    fn test_victory_serializes_snake_case() {
        let victory = Victory {
            winner: Side::North,
            reason: VictoryReason::GateCapture,
        };
        let json = serde_json::to_string(&victory).unwrap();
        assert_eq!(json, r#"{"winner":"north","reason":"gate_capture"}"#);
    }
}
