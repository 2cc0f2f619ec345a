//! 型別別名

/// 棋盤座標分量（有號，方便做位移與方向運算）
pub type Coord = i32;

/// 卡牌／單位定義 ID
pub type UnitId = String;

/// 技能 ID
pub type SkillId = String;
