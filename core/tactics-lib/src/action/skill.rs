//! skill.rs：
//! - 技能的目標格計算、目標合法性檢查與效果結算。
//! - 只處理技能本身；回合、形態需求與一場一次的限制由 match_state 檢查。
use crate::*;

/// 施放者正前方的三格（超出棋盤的略過）
pub fn front_cells(board: &Board, caster: &UnitInstance) -> Vec<Position> {
    let row = caster.pos.row + caster.side.forward();
    (-1..=1)
        .map(|dc| Position::new(row, caster.pos.col + dc))
        .filter(|pos| board.in_bounds(*pos))
        .collect()
}

/// 直線技能的候選格：八方向各延伸到 `range`，遇到第一個單位即停（含該格）
fn line_cells(board: &Board, units: &Units, from: Position, range: Coord) -> Vec<Position> {
    let mut cells = Vec::new();
    for step in Step::ALL {
        for pos in board.ray(from, step, range) {
            cells.push(pos);
            if units.is_occupied(pos) {
                break;
            }
        }
    }
    cells
}

/// 技能可指定（或會波及）的格子，給介面高亮用
pub fn skill_targets(
    board: &Board,
    units: &Units,
    caster: &UnitInstance,
    targeting: &Targeting,
) -> Vec<Position> {
    match targeting {
        Targeting::ChooseEnemyAdjacent { .. } => Step::ALL
            .into_iter()
            .filter_map(|step| board.step_in_direction(caster.pos, step))
            .filter(|pos| units.at(*pos).is_some_and(|u| u.is_enemy_of(caster)))
            .collect(),
        Targeting::ChooseLineDirection { range, .. } => {
            line_cells(board, units, caster.pos, *range)
        }
        Targeting::Instant { aoe_radius, .. } => board
            .cells()
            .filter(|pos| *pos != caster.pos && pos.chebyshev(caster.pos) <= *aoe_radius)
            .collect(),
        Targeting::ChooseFront3Cells { .. } => front_cells(board, caster),
    }
}

/// 檢查目標格是否符合指定方式
pub fn check_skill_target(
    board: &Board,
    units: &Units,
    caster: &UnitInstance,
    skill: &SkillDefinition,
    target: Option<Position>,
) -> Result<(), Error> {
    let func = "check_skill_target";

    if !skill.targeting.needs_target_cell() {
        return Ok(());
    }
    let pos = target.ok_or_else(|| Error::MissingTarget {
        func,
        skill_id: skill.id.clone(),
    })?;
    if skill_targets(board, units, caster, &skill.targeting).contains(&pos) {
        Ok(())
    } else {
        Err(Error::IllegalTarget { func, pos })
    }
}

/// 結算技能效果
///
/// 呼叫前必須先通過 `check_skill_target`；需要目標格的指定方式缺少目標時不做任何事。
pub fn resolve_skill(
    board: &Board,
    units: &Units,
    caster: &UnitInstance,
    targeting: &Targeting,
    target: Option<Position>,
) -> Units {
    match (targeting, target) {
        (Targeting::ChooseEnemyAdjacent { damage }, Some(pos)) => match units.at(pos) {
            Some(enemy) if enemy.is_enemy_of(caster) => units.with_damage(&enemy.instance_id, *damage),
            _ => units.clone(),
        },
        (
            Targeting::ChooseLineDirection {
                range,
                damage,
                knockback,
            },
            Some(pos),
        ) => resolve_line(board, units, caster, pos, *range, *damage, *knockback),
        (
            Targeting::Instant {
                aoe_radius,
                damage,
                knockback,
                stun_turns,
            },
            _,
        ) => resolve_instant(
            board,
            units,
            caster,
            *aoe_radius,
            *damage,
            *knockback,
            *stun_turns,
        ),
        (
            Targeting::ChooseFront3Cells {
                damage,
                burn_ticks,
                stun_turns,
            },
            Some(_),
        ) => {
            let mut next = units.clone();
            for pos in front_cells(board, caster) {
                let Some(enemy_id) = next
                    .at(pos)
                    .filter(|u| u.is_enemy_of(caster))
                    .map(|u| u.instance_id.clone())
                else {
                    continue;
                };
                next = next.with_damage(&enemy_id, *damage);
                if next.contains(&enemy_id) {
                    next = next.with_updated(&enemy_id, |u| {
                        apply_stun(u, *stun_turns);
                        apply_burn(u, *burn_ticks);
                    });
                }
            }
            next
        }
        (_, None) => units.clone(),
    }
}

/// 貫穿：直線上所有敵人受傷（友軍略過），存活者由遠到近擊退
fn resolve_line(
    board: &Board,
    units: &Units,
    caster: &UnitInstance,
    target: Position,
    range: Coord,
    damage: i32,
    knockback_distance: Coord,
) -> Units {
    let step = Step::between(caster.pos, target);
    if step.is_zero() {
        return units.clone();
    }

    let hit: Vec<InstanceId> = board
        .ray(caster.pos, step, range)
        .filter_map(|pos| units.at(pos))
        .filter(|u| u.is_enemy_of(caster))
        .map(|u| u.instance_id.clone())
        .collect();

    let mut next = units.clone();
    for id in &hit {
        next = next.with_damage(id, damage);
    }
    // hit 依距離由近到遠排列
    for id in hit.iter().rev() {
        if next.contains(id) {
            next = knockback(board, &next, id, step, knockback_distance).units;
        }
    }
    next
}

/// 範圍：由遠到近，每個敵人依序受傷、暈眩、被推離施放者
fn resolve_instant(
    board: &Board,
    units: &Units,
    caster: &UnitInstance,
    radius: Coord,
    damage: i32,
    knockback_distance: Coord,
    stun_turns: u32,
) -> Units {
    let mut affected: Vec<(Coord, InstanceId)> = units
        .iter()
        .filter(|u| u.is_enemy_of(caster) && u.pos.chebyshev(caster.pos) <= radius)
        .map(|u| (u.pos.chebyshev(caster.pos), u.instance_id.clone()))
        .collect();
    // 穩定排序，同距離維持集合順序
    affected.sort_by(|a, b| b.0.cmp(&a.0));

    let mut next = units.clone();
    for (_, id) in &affected {
        next = next.with_damage(id, damage);
        if !next.contains(id) {
            continue;
        }
        next = next.with_updated(id, |u| apply_stun(u, stun_turns));
        let Some(pos) = next.get(id).map(|u| u.pos) else {
            continue;
        };
        let away = Step::between(caster.pos, pos);
        if knockback_distance > 0 && !away.is_zero() {
            next = knockback(board, &next, id, away, knockback_distance).units;
        }
    }
    next
}
