//! battle.rs：
//! - 對局階段、每回合的單位行動旗標，以及回合開始的冪等鍵。
//! - 不負責任何單位集合的轉換。
use crate::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ops::{Index, IndexMut};
use strum_macros::{Display, EnumIter};

/// 對局階段，只會往前走（重置除外）
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Phase {
    SetupDraw,
    SetupDeploy,
    Battle,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionFlags {
    pub moved: bool,
    pub attacked: bool,
    pub done: bool,
}

/// 本回合行動方每個單位的行動旗標，每回合開始時重建
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TurnTable {
    flags: BTreeMap<InstanceId, ActionFlags>,
}

impl TurnTable {
    /// 暈眩中的單位一開始就是 done
    pub fn build(units: &Units, side: Side) -> Self {
        let flags = units
            .of_side(side)
            .map(|unit| {
                let flags = ActionFlags {
                    done: unit.is_stunned(),
                    ..Default::default()
                };
                (unit.instance_id.clone(), flags)
            })
            .collect();
        Self { flags }
    }

    /// 不在表中的單位（例如對方單位）視為已結束
    pub fn get(&self, instance_id: &str) -> ActionFlags {
        self.flags.get(instance_id).copied().unwrap_or(ActionFlags {
            done: true,
            ..Default::default()
        })
    }

    pub fn insert(&mut self, instance_id: InstanceId, flags: ActionFlags) {
        self.flags.insert(instance_id, flags);
    }

    pub fn mark_moved(&mut self, instance_id: &str) {
        self.flags.entry(instance_id.to_string()).or_default().moved = true;
    }

    /// 攻擊或技能會結束該單位的回合
    pub fn mark_attacked(&mut self, instance_id: &str) {
        let flags = self.flags.entry(instance_id.to_string()).or_default();
        flags.attacked = true;
        flags.done = true;
    }

    pub fn mark_done(&mut self, instance_id: &str) {
        self.flags.entry(instance_id.to_string()).or_default().done = true;
    }

    /// `side` 所有存活單位都已結束
    pub fn all_done(&self, units: &Units, side: Side) -> bool {
        units
            .of_side(side)
            .all(|unit| self.get(&unit.instance_id).done)
    }
}

/// 回合開始的冪等鍵
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TurnKey {
    pub match_id: MatchId,
    pub turn_sequence: TurnSequence,
    pub side: Side,
}

/// 雙方各一份
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerSide<T> {
    pub south: T,
    pub north: T,
}

impl<T> PerSide<T> {
    pub fn new(south: T, north: T) -> Self {
        Self { south, north }
    }
}

impl<T> Index<Side> for PerSide<T> {
    type Output = T;

    fn index(&self, side: Side) -> &T {
        match side {
            Side::South => &self.south,
            Side::North => &self.north,
        }
    }
}

impl<T> IndexMut<Side> for PerSide<T> {
    fn index_mut(&mut self, side: Side) -> &mut T {
        match side {
            Side::South => &mut self.south,
            Side::North => &mut self.north,
        }
    }
}
