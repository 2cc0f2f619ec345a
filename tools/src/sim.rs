//! 一場電腦對戰：起手、部署、戰鬥迴圈
use crate::report::MatchReport;
use anyhow::Result;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use std::sync::Arc;
use tactics_lib::{
    AiAction, Catalog, Deck, MatchId, MatchState, Phase, PerSide, Position, Rules, Side,
    TurnSequence, UnitId,
};
use tracing::{debug, info};

pub struct SimOptions {
    pub max_turns: TurnSequence,
    pub demo: bool,
    /// 印出回合紀錄
    pub verbose: bool,
}

pub fn play_match(
    catalog: Arc<Catalog>,
    rules: &Rules,
    deck: &[UnitId],
    match_id: MatchId,
    seed: u64,
    options: &SimOptions,
) -> Result<MatchReport> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut state = if options.demo {
        MatchState::demo(catalog)?
    } else {
        let decks = PerSide::new(
            Deck::shuffled(deck.to_vec(), &mut rng),
            Deck::shuffled(deck.to_vec(), &mut rng),
        );
        let state = MatchState::create_match(catalog, rules.clone(), decks, match_id)?;
        deploy(state, &mut rng)?
    };
    info!(match_id, seed, "開始對戰");

    let mut actions = 0;
    while !state.is_over() && state.turn_sequence <= options.max_turns {
        let side = state.turn;
        let sequence = state.turn_sequence;
        state = reinforce(state, &mut rng)?;

        let turn = tactics_lib::run_ai_turn(&state)?;
        if options.verbose {
            println!("[{match_id}] 第 {sequence} 回合 {side}");
            for action in &turn.actions {
                if !matches!(action, AiAction::Skip { .. }) {
                    println!("  {action}");
                }
            }
        }
        actions += turn.actions.len();
        state = turn.state;
    }

    if options.verbose {
        match state.victory {
            Some(victory) => println!(
                "[{match_id}] {} 獲勝（{}）",
                victory.winner, victory.reason
            ),
            None => println!("[{match_id}] 超過 {} 回合，和局", options.max_turns),
        }
    }
    Ok(MatchReport::new(match_id, seed, &state, actions))
}

/// 起手後雙方輪流把手牌部署到隨機的底線空格
fn deploy(state: MatchState, rng: &mut StdRng) -> Result<MatchState> {
    let mut state = state.apply_draw_opening()?.state;
    while state.phase == Phase::SetupDeploy {
        let side = state.turn;
        let Some(card) = state.hand(side).cards().next().cloned() else {
            break;
        };
        let Some(pos) = free_home_cell(&state, side, rng) else {
            break;
        };
        debug!(%side, %card, %pos, "部署");
        state = state.apply_deploy(&card, pos)?.state;
    }
    Ok(state)
}

/// 有手牌就增援一張
fn reinforce(state: MatchState, rng: &mut StdRng) -> Result<MatchState> {
    let side = state.turn;
    let card = state.hand(side).cards().next().cloned();
    let pos = free_home_cell(&state, side, rng);
    match (card, pos) {
        (Some(card), Some(pos)) => {
            debug!(%side, %card, %pos, "增援");
            Ok(state.apply_reinforce(&card, pos)?.state)
        }
        _ => Ok(state),
    }
}

fn free_home_cell(state: &MatchState, side: Side, rng: &mut StdRng) -> Option<Position> {
    let cells: Vec<_> = state
        .board()
        .home_cells(side)
        .filter(|pos| !state.units.is_occupied(*pos))
        .collect();
    cells.choose(rng).copied()
}
