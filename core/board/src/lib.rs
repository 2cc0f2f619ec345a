//! 棋盤幾何：座標、陣營、方向、邊界與射線
//!
//! 不含任何單位狀態，只回答「這格在哪、能不能走到、往哪個方向」。

pub mod alias;
pub mod component;
pub mod constants;
pub mod error;
pub mod loader;
pub mod logic;
