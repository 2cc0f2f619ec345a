//! 錯誤處理系統
//!
//! 用於設定載入（棋盤、單位目錄、規則）：強型別錯誤種類加上呼叫位置的 context 鏈。
//! 對局中的非法指令不走這裡，見 tactics-lib 的 `Error`。

use crate::alias::{Coord, SkillId, UnitId};
use thiserror::Error as ThisError;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// 頂層錯誤，包含原始錯誤和 context 鏈
#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    contexts: Vec<String>,
}

/// 錯誤種類
#[derive(Debug, ThisError)]
pub enum ErrorKind {
    #[error(transparent)]
    Board(#[from] BoardError),
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// 棋盤設定錯誤
#[derive(Debug, ThisError)]
pub enum BoardError {
    #[error("棋盤尺寸不合法: {rows} x {cols}")]
    InvalidDimensions { rows: Coord, cols: Coord },
    #[error("城門欄位 {col} 超出棋盤寬度 {cols}")]
    GateOutOfRange { col: Coord, cols: Coord },
    #[error("進化列 {row} 必須位於雙方底線之間（棋盤高度 {rows}）")]
    EvolutionRowOutOfRange { row: Coord, rows: Coord },
    #[error("規則設定錯誤: {reason}")]
    InvalidRules { reason: String },
}

/// 格式載入錯誤
#[derive(Debug, ThisError)]
pub enum LoadError {
    #[error("解析失敗: {0}")]
    ParseError(String),
    #[error("{format} 反序列化失敗: {reason}")]
    DeserializeError { format: String, reason: String },
}

/// 單位目錄錯誤（任何一筆出錯即整份目錄無效）
#[derive(Debug, ThisError)]
pub enum CatalogError {
    #[error("單位目錄為空")]
    Empty,
    #[error("{what} 的 ID 不可為空")]
    EmptyId { what: &'static str },
    #[error("單位 ID 重複: {unit_id}")]
    DuplicateUnit { unit_id: UnitId },
    #[error("技能 ID 重複: {skill_id}")]
    DuplicateSkill { skill_id: SkillId },
    #[error("單位 {unit_id} 的 {field} 不合法: {value}")]
    InvalidStat {
        unit_id: UnitId,
        field: &'static str,
        value: i32,
    },
    #[error("單位 {unit_id} 的移動方式不合法: {reason}")]
    InvalidMovement { unit_id: UnitId, reason: String },
    #[error("單位 {unit_id} 的遠程攻擊設定不合法: {reason}")]
    InvalidRanged { unit_id: UnitId, reason: String },
    #[error("單位 {unit_id} 的技能 {skill_id} 設定不合法: {reason}")]
    InvalidSkill {
        unit_id: UnitId,
        skill_id: SkillId,
        reason: String,
    },
    #[error("牌組引用了不存在的單位: {unit_id}")]
    UnknownUnit { unit_id: UnitId },
}

impl Error {
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// 添加錯誤上下文，自動記錄呼叫位置
    #[track_caller]
    pub fn context<C: Into<String>>(mut self, context: C) -> Self {
        let loc = std::panic::Location::caller();
        let msg = format!("{} [{}:{}]", context.into(), loc.file(), loc.line());
        self.contexts.push(msg);
        self
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.kind)?;
        for ctx in &self.contexts {
            write!(f, "\n  {}", ctx)?;
        }
        Ok(())
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.kind)
    }
}

impl<E: Into<ErrorKind>> From<E> for Error {
    fn from(error: E) -> Self {
        Self {
            kind: error.into(),
            contexts: Vec::new(),
        }
    }
}

/// Result 擴展 trait，用於添加錯誤上下文
pub trait Context<T> {
    fn context<C: Into<String>>(self, context: C) -> Result<T>;
}

impl<T> Context<T> for Result<T> {
    #[track_caller]
    fn context<C: Into<String>>(self, context: C) -> Result<T> {
        match self {
            Ok(value) => Ok(value),
            Err(e) => Err(e.context(context)),
        }
    }
}
