mod action;
mod ai;
mod battle;
mod deck;
mod error;
mod match_state;
mod rules;
mod status;
mod unit;
mod units;
mod victory;

// 測試輔助，僅供 dev-dependencies 啟用
#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;

pub use action::*;
pub use ai::*;
pub use battle::*;
pub use deck::*;
pub use error::*;
pub use match_state::*;
pub use rules::*;
pub use status::*;
pub use unit::*;
pub use units::*;
pub use victory::*;

pub use board::alias::{Coord, SkillId, UnitId};
pub use board::component::{Position, Side, Step};
pub use board::logic::board::Board;
pub use catalog_lib::{
    Catalog, Form, MovementPattern, Offset, RangedAttack, SkillDefinition, TargetMode, Targeting,
    UnitDefinition, UnitDefinitionGetter,
};

pub type InstanceId = String;
pub type MatchId = u64;
pub type TurnSequence = u64;
pub type AiScore = i64;
