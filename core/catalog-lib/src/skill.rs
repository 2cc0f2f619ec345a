use crate::unit::Form;
use board::alias::{Coord, SkillId};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

/// 技能資料結構
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillDefinition {
    pub id: SkillId,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub once_per_match: bool,
    /// 目前只接受 `evolved`
    #[serde(default)]
    pub requires_form: Option<Form>,
    pub targeting: Targeting,
}

impl SkillDefinition {
    /// 顯示名稱，未設定時退回 ID
    pub fn display_name(&self) -> &str {
        if self.label.is_empty() {
            &self.id
        } else {
            &self.label
        }
    }
}

/// 指定方式，每種只帶自己需要的參數
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Targeting {
    /// 選擇相鄰（八方向）的敵人
    ChooseEnemyAdjacent { damage: i32 },
    /// 選擇八方向其中一條直線
    ChooseLineDirection {
        range: Coord,
        damage: i32,
        #[serde(default)]
        knockback: Coord,
    },
    /// 以施放者為中心的範圍，不需選格
    Instant {
        aoe_radius: Coord,
        damage: i32,
        #[serde(default)]
        knockback: Coord,
        #[serde(default)]
        stun_turns: u32,
    },
    /// 正前方三格
    ChooseFront3Cells {
        damage: i32,
        #[serde(default)]
        burn_ticks: u32,
        #[serde(default)]
        stun_turns: u32,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum TargetMode {
    ChooseEnemyAdjacent,
    ChooseLineDirection,
    Instant,
    ChooseFront3Cells,
}

impl Targeting {
    pub fn mode(&self) -> TargetMode {
        match self {
            Targeting::ChooseEnemyAdjacent { .. } => TargetMode::ChooseEnemyAdjacent,
            Targeting::ChooseLineDirection { .. } => TargetMode::ChooseLineDirection,
            Targeting::Instant { .. } => TargetMode::Instant,
            Targeting::ChooseFront3Cells { .. } => TargetMode::ChooseFront3Cells,
        }
    }

    pub fn damage(&self) -> i32 {
        match self {
            Targeting::ChooseEnemyAdjacent { damage }
            | Targeting::ChooseLineDirection { damage, .. }
            | Targeting::Instant { damage, .. }
            | Targeting::ChooseFront3Cells { damage, .. } => *damage,
        }
    }

    /// 施放時是否需要指定目標格
    pub fn needs_target_cell(&self) -> bool {
        !matches!(self, Targeting::Instant { .. })
    }
}
