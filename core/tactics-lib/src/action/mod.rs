//! action/mod.rs：
//! - action 子模組入口，統一 re-export 移動、攻擊、擊退、技能。
//! - 這一層只計算單位集合的轉換，回合與行動旗標由 match_state 負責。
mod attack;
mod knockback;
mod movement;
mod skill;

pub use attack::*;
pub use knockback::*;
pub use movement::*;
pub use skill::*;
