use serde::Serialize;
use tactics_lib::{MatchId, MatchState, Side, TurnSequence, VictoryReason};

/// 單場結果摘要
#[derive(Debug, Clone, Serialize)]
pub struct MatchReport {
    pub match_id: MatchId,
    pub seed: u64,
    pub winner: Option<Side>,
    pub reason: Option<VictoryReason>,
    pub turns: TurnSequence,
    pub actions: usize,
    pub south_units: usize,
    pub north_units: usize,
}

impl MatchReport {
    pub fn new(match_id: MatchId, seed: u64, state: &MatchState, actions: usize) -> Self {
        Self {
            match_id,
            seed,
            winner: state.victory.map(|v| v.winner),
            reason: state.victory.map(|v| v.reason),
            turns: state.turn_sequence,
            actions,
            south_units: state.units.count(Side::South),
            north_units: state.units.count(Side::North),
        }
    }
}

pub fn print_summary(reports: &[MatchReport]) {
    let wins = |side: Side| reports.iter().filter(|r| r.winner == Some(side)).count();
    let draws = reports.iter().filter(|r| r.winner.is_none()).count();
    println!(
        "共 {} 場：South 勝 {}，North 勝 {}，和局 {}",
        reports.len(),
        wins(Side::South),
        wins(Side::North),
        draws
    );
}
