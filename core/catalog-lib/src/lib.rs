//! 單位／技能目錄
//!
//! 對局引擎只讀取這份宣告式資料，不會修改它。

mod catalog;
mod skill;
mod unit;

pub use catalog::{Catalog, UnitDefinitionGetter};
pub use skill::{SkillDefinition, TargetMode, Targeting};
pub use unit::{Form, MovementPattern, Offset, RangedAttack, UnitDefinition};
