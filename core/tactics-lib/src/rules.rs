use crate::*;
use board::error::{BoardError, Context, LoadError};
use serde::{Deserialize, Serialize};

/// 對局規則，預設為標準 7×7
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rules {
    pub board: Board,
    /// 每方部署數量
    pub deploy_quota: usize,
    /// 起手抽牌數
    pub opening_hand: usize,
    /// 每次燃燒扣的 HP
    pub burn_damage: i32,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            board: Board::default(),
            deploy_quota: 3,
            opening_hand: 5,
            burn_damage: 1,
        }
    }
}

impl Rules {
    pub fn from_toml_str(src: &str) -> board::error::Result<Self> {
        let rules: Rules = toml::from_str(src).map_err(|e| LoadError::DeserializeError {
            format: "toml".to_string(),
            reason: e.to_string(),
        })?;
        rules.validate()?;
        Ok(rules)
    }

    pub fn validate(&self) -> board::error::Result<()> {
        self.board.validate().context("驗證規則中的棋盤設定")?;
        let invalid = |reason: String| -> board::error::Result<()> {
            Err(BoardError::InvalidRules { reason }.into())
        };
        if self.deploy_quota == 0 {
            return invalid("deploy_quota 至少為 1".to_string());
        }
        if self.deploy_quota > self.board.cols as usize {
            return invalid(format!(
                "deploy_quota {} 超過底線格數 {}",
                self.deploy_quota, self.board.cols
            ));
        }
        if self.opening_hand < self.deploy_quota {
            return invalid(format!(
                "opening_hand {} 少於 deploy_quota {}",
                self.opening_hand, self.deploy_quota
            ));
        }
        if self.burn_damage < 0 {
            return invalid(format!("burn_damage 不可為負: {}", self.burn_damage));
        }
        Ok(())
    }
}
