//! 核心幾何邏輯

pub mod board;
