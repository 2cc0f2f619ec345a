//! ai.rs：
//! - 單步啟發式 AI：一次只處理一個單位，列出候選動作、評分、取最高分。
//! - 候選順序：先攻擊、後移動；同分取先列出的。
//! - 評分本身不修改狀態，選定後透過一般指令套用。
use crate::*;
use serde::Serialize;
use std::collections::HashSet;
use tracing::{debug, trace};

/// 立即獲勝
pub const SCORE_WIN: AiScore = 1_000_000;
pub const SCORE_ATTACK_BASE: AiScore = 150;
/// 低血量加成：`SCORE_LOW_HP_BASE - 目標 HP * SCORE_LOW_HP_PER_HP`
pub const SCORE_LOW_HP_BASE: AiScore = 120;
pub const SCORE_LOW_HP_PER_HP: AiScore = 10;
pub const SCORE_MOVE_BASE: AiScore = 10;
pub const SCORE_EVOLVE: AiScore = 5_000;
pub const SCORE_DANGER: AiScore = -120;
pub const SCORE_FORWARD_PER_ROW: AiScore = 10;
pub const SCORE_APPROACH_PER_CELL: AiScore = 15;
pub const SCORE_SKIP: AiScore = -5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AiAction {
    Attack {
        actor_id: InstanceId,
        target_id: InstanceId,
    },
    Move {
        actor_id: InstanceId,
        to: Position,
        evolved: bool,
    },
    Skip {
        actor_id: InstanceId,
        reason: String,
    },
}

impl AiAction {
    pub fn actor_id(&self) -> &str {
        match self {
            AiAction::Attack { actor_id, .. }
            | AiAction::Move { actor_id, .. }
            | AiAction::Skip { actor_id, .. } => actor_id,
        }
    }
}

impl std::fmt::Display for AiAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AiAction::Attack {
                actor_id,
                target_id,
            } => write!(f, "{actor_id} 攻擊 {target_id}"),
            AiAction::Move {
                actor_id,
                to,
                evolved: true,
            } => write!(f, "{actor_id} 移動到 {to} 並進化"),
            AiAction::Move { actor_id, to, .. } => write!(f, "{actor_id} 移動到 {to}"),
            AiAction::Skip { actor_id, reason } => write!(f, "{actor_id} 略過（{reason}）"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoredAction {
    pub action: AiAction,
    pub score: AiScore,
}

/// 單一單位的 AI 步驟結果
#[derive(Debug, Clone, PartialEq)]
pub struct AiStep {
    pub state: MatchState,
    pub action: AiAction,
    pub victory: Option<Victory>,
}

/// 整個回合的 AI 結果
#[derive(Debug, Clone, PartialEq)]
pub struct AiTurn {
    pub state: MatchState,
    pub actions: Vec<AiAction>,
    pub victory: Option<Victory>,
}

/// `side` 的對手下回合可攻擊到的格子（暈眩中的敵人不算）
pub fn danger_cells(
    board: &Board,
    defs: &impl UnitDefinitionGetter,
    units: &Units,
    side: Side,
) -> HashSet<Position> {
    units
        .of_side(side.opponent())
        .filter(|enemy| !enemy.is_stunned())
        .flat_map(|enemy| attack_marks(board, units, defs, enemy))
        .filter(|mark| matches!(mark.kind, MarkKind::Range | MarkKind::Target))
        .map(|mark| mark.pos)
        .collect()
}

fn wins(board: &Board, units: &Units, side: Side) -> bool {
    check_victory(board, units).is_some_and(|v| v.winner == side)
}

fn min_enemy_distance(units: &Units, side: Side, from: Position) -> Option<Coord> {
    units
        .of_side(side.opponent())
        .map(|enemy| enemy.pos.manhattan(from))
        .min()
}

fn score_attack(state: &MatchState, actor: &UnitInstance, target: &UnitInstance) -> AiScore {
    let units = resolve_attack(&state.units, state.catalog(), actor, &target.instance_id);
    if wins(state.board(), &units, actor.side) {
        return SCORE_WIN;
    }
    SCORE_ATTACK_BASE + SCORE_LOW_HP_BASE - AiScore::from(target.hp) * SCORE_LOW_HP_PER_HP
}

/// 移動後的局面評分，回傳 (分數, 是否進化)
fn score_move(state: &MatchState, actor: &UnitInstance, to: Position) -> (AiScore, bool) {
    let board = state.board();
    let (units, evolved) =
        move_and_evolve(board, &state.units, state.catalog(), &actor.instance_id, to);
    if wins(board, &units, actor.side) {
        return (SCORE_WIN, evolved);
    }

    let mut score = SCORE_MOVE_BASE;
    if evolved {
        score += SCORE_EVOLVE;
    }
    if danger_cells(board, state.catalog(), &units, actor.side).contains(&to) {
        score += SCORE_DANGER;
    }
    let progress = (to.row - actor.pos.row) * actor.side.forward();
    score += AiScore::from(progress) * SCORE_FORWARD_PER_ROW;
    let before = min_enemy_distance(&state.units, actor.side, actor.pos);
    let after = min_enemy_distance(&state.units, actor.side, to);
    if let (Some(before), Some(after)) = (before, after) {
        score += AiScore::from(before - after) * SCORE_APPROACH_PER_CELL;
    }
    (score, evolved)
}

/// 暈眩或本回合已結束的單位不能行動
fn idle_reason(state: &MatchState, actor: &UnitInstance) -> Option<&'static str> {
    if actor.is_stunned() {
        Some("暈眩中")
    } else if state.flags(&actor.instance_id).done {
        Some("本回合已結束")
    } else {
        None
    }
}

/// 列出單位的所有候選動作並評分（依列舉順序）
pub fn candidate_actions(state: &MatchState, actor: &UnitInstance) -> Vec<ScoredAction> {
    if idle_reason(state, actor).is_some() {
        return vec![];
    }
    let flags = state.flags(&actor.instance_id);
    let mut candidates = Vec::new();

    if !flags.attacked {
        for target in state.attackable_targets(&actor.instance_id) {
            candidates.push(ScoredAction {
                score: score_attack(state, actor, target),
                action: AiAction::Attack {
                    actor_id: actor.instance_id.clone(),
                    target_id: target.instance_id.clone(),
                },
            });
        }
    }
    if !flags.moved {
        for to in state.legal_moves(&actor.instance_id) {
            let (score, evolved) = score_move(state, actor, to);
            candidates.push(ScoredAction {
                score,
                action: AiAction::Move {
                    actor_id: actor.instance_id.clone(),
                    to,
                    evolved,
                },
            });
        }
    }
    candidates
}

/// 決定單位要做的動作，沒有候選時略過
pub fn decide_action(state: &MatchState, actor: &UnitInstance) -> ScoredAction {
    let mut best: Option<ScoredAction> = None;
    for candidate in candidate_actions(state, actor) {
        trace!(action = %candidate.action, score = candidate.score, "AI 候選");
        if best.as_ref().is_none_or(|b| candidate.score > b.score) {
            best = Some(candidate);
        }
    }
    best.unwrap_or_else(|| ScoredAction {
        action: AiAction::Skip {
            actor_id: actor.instance_id.clone(),
            reason: idle_reason(state, actor)
                .unwrap_or("沒有可行動作")
                .to_string(),
        },
        score: SCORE_SKIP,
    })
}

/// 讓 `side` 的一個單位行動，行動後該單位本回合結束
pub fn step_ai(state: &MatchState, side: Side, actor_id: &str) -> Result<AiStep, Error> {
    let func = "step_ai";

    if state.is_over() {
        return Err(Error::GameOver { func });
    }
    let actor = state.units.get(actor_id).ok_or_else(|| Error::NoSuchUnit {
        func,
        instance_id: actor_id.to_string(),
    })?;
    if actor.side != side || state.turn != side {
        return Err(Error::NotYourTurn {
            func,
            side: actor.side,
        });
    }

    let chosen = decide_action(state, actor);
    debug!(action = %chosen.action, score = chosen.score, "AI 選擇");
    if idle_reason(state, actor).is_some() {
        return Ok(AiStep {
            state: state.clone(),
            action: chosen.action,
            victory: None,
        });
    }

    let wrap = |e| Error::Wrap {
        func,
        source: Box::new(e),
    };
    let result = match &chosen.action {
        AiAction::Attack {
            actor_id,
            target_id,
        } => state.apply_attack(actor_id, target_id).map_err(wrap)?,
        AiAction::Move { actor_id, to, .. } => {
            let moved = state.apply_move(actor_id, *to).map_err(wrap)?;
            if moved.victory.is_some() {
                moved
            } else {
                moved.state.apply_wait(actor_id).map_err(wrap)?
            }
        }
        AiAction::Skip { actor_id, .. } => state.apply_wait(actor_id).map_err(wrap)?,
    };
    Ok(AiStep {
        state: result.state,
        action: chosen.action,
        victory: result.victory,
    })
}

/// `side` 尚未結束的單位（依列舉順序）
pub fn ai_actors(state: &MatchState, side: Side) -> Vec<InstanceId> {
    if state.is_over() || state.phase != Phase::Battle || state.turn != side {
        return vec![];
    }
    state
        .units
        .of_side(side)
        .filter(|unit| !state.flags(&unit.instance_id).done)
        .map(|unit| unit.instance_id.clone())
        .collect()
}

/// 讓行動方所有單位依序行動後結束回合；分出勝負即停止
pub fn run_ai_turn(state: &MatchState) -> Result<AiTurn, Error> {
    let side = state.turn;
    let mut state = state.clone();
    let mut actions = Vec::new();

    for actor_id in ai_actors(&state, side) {
        // 前面的單位可能已經擊倒或推開後面的單位
        if !state.units.contains(&actor_id) || state.flags(&actor_id).done {
            continue;
        }
        let step = step_ai(&state, side, &actor_id)?;
        actions.push(step.action);
        state = step.state;
        if step.victory.is_some() {
            return Ok(AiTurn {
                state,
                actions,
                victory: step.victory,
            });
        }
    }

    let result = state.apply_end_turn()?;
    Ok(AiTurn {
        state: result.state,
        actions,
        victory: result.victory,
    })
}
