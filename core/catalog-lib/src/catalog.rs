use crate::skill::{SkillDefinition, Targeting};
use crate::unit::{Form, MovementPattern, UnitDefinition};
use board::alias::{Coord, UnitId};
use board::constants::{MAX_REACH, MAX_STAT};
use board::error::{CatalogError, Context, LoadError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

const BUILTIN_CATALOG: &str = include_str!("../data/units.toml");

/// 依 ID 查詢單位定義
pub trait UnitDefinitionGetter {
    fn get(&self, unit_id: &str) -> Option<&UnitDefinition>;
}

/// 驗證過的單位目錄
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Catalog {
    units: BTreeMap<UnitId, UnitDefinition>,
}

#[derive(Deserialize)]
struct CatalogFile {
    #[serde(default)]
    units: Vec<UnitDefinition>,
}

impl UnitDefinitionGetter for Catalog {
    fn get(&self, unit_id: &str) -> Option<&UnitDefinition> {
        self.units.get(unit_id)
    }
}

impl Catalog {
    /// 內建目錄
    pub fn builtin() -> Result<Self> {
        Self::from_toml_str(BUILTIN_CATALOG).context("載入內建單位目錄")
    }

    pub fn from_toml_str(src: &str) -> Result<Self> {
        let file: CatalogFile = toml::from_str(src).map_err(|e| LoadError::DeserializeError {
            format: "toml".to_string(),
            reason: e.to_string(),
        })?;
        Self::from_units(file.units)
    }

    /// 整份驗證，任何一筆錯誤都拒絕整份目錄
    pub fn from_units(units: Vec<UnitDefinition>) -> Result<Self> {
        if units.is_empty() {
            return Err(CatalogError::Empty.into());
        }
        let mut map = BTreeMap::new();
        let mut skill_ids = HashSet::new();
        for def in units {
            validate_unit(&def)?;
            for skill in &def.skills {
                validate_skill(&def.id, skill)?;
                if !skill_ids.insert(skill.id.clone()) {
                    return Err(CatalogError::DuplicateSkill {
                        skill_id: skill.id.clone(),
                    }
                    .into());
                }
            }
            if map.contains_key(&def.id) {
                return Err(CatalogError::DuplicateUnit { unit_id: def.id }.into());
            }
            map.insert(def.id.clone(), def);
        }
        Ok(Self { units: map })
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// 依 ID 排序
    pub fn units(&self) -> impl Iterator<Item = &UnitDefinition> {
        self.units.values()
    }

    pub fn unit_ids(&self) -> impl Iterator<Item = &UnitId> {
        self.units.keys()
    }

    /// 技能 ID 全域唯一，回傳技能與擁有者
    pub fn skill(&self, skill_id: &str) -> Option<(&UnitDefinition, &SkillDefinition)> {
        self.units
            .values()
            .find_map(|def| def.skill(skill_id).map(|skill| (def, skill)))
    }

    /// 牌組中的每張卡都必須存在於目錄
    pub fn validate_deck<'a>(&self, deck: impl IntoIterator<Item = &'a UnitId>) -> Result<()> {
        for unit_id in deck {
            if !self.units.contains_key(unit_id) {
                return Err(CatalogError::UnknownUnit {
                    unit_id: unit_id.clone(),
                }
                .into());
            }
        }
        Ok(())
    }
}

fn validate_unit(def: &UnitDefinition) -> Result<()> {
    if def.id.is_empty() {
        return Err(CatalogError::EmptyId { what: "單位" }.into());
    }
    if !(0..=MAX_STAT).contains(&def.atk) {
        return Err(invalid_stat(def, "atk", def.atk));
    }
    if !(1..=MAX_STAT).contains(&def.hp) {
        return Err(invalid_stat(def, "hp", def.hp));
    }

    let movement_error = |reason: &str| CatalogError::InvalidMovement {
        unit_id: def.id.clone(),
        reason: reason.to_string(),
    };
    match &def.movement {
        MovementPattern::Orthogonal { range } if *range < 1 => {
            return Err(movement_error("orthogonal 的 range 至少為 1").into());
        }
        MovementPattern::Orthogonal { range } if *range > MAX_REACH => {
            let reason = format!("orthogonal 的 range 不可超過 {MAX_REACH}");
            return Err(movement_error(&reason).into());
        }
        MovementPattern::Orthogonal { .. } => {}
        MovementPattern::Custom { offsets } | MovementPattern::TeleportFixed { offsets } => {
            if offsets.is_empty() {
                return Err(movement_error("位移清單為空").into());
            }
            if offsets.iter().any(|o| o.is_zero()) {
                return Err(movement_error("位移不可為 (0, 0)").into());
            }
            if offsets.iter().any(|o| !within_reach(o.dx) || !within_reach(o.dy)) {
                return Err(movement_error(&format!("位移不可超過 ±{MAX_REACH}")).into());
            }
        }
    }

    if let Some(ranged) = &def.ranged {
        if !(1..=MAX_REACH).contains(&ranged.range) {
            return Err(CatalogError::InvalidRanged {
                unit_id: def.id.clone(),
                reason: format!("range 須介於 1 與 {MAX_REACH}，實際為 {}", ranged.range),
            }
            .into());
        }
    }
    Ok(())
}

fn within_reach(value: Coord) -> bool {
    (-MAX_REACH..=MAX_REACH).contains(&value)
}

fn invalid_stat(def: &UnitDefinition, field: &'static str, value: i32) -> board::error::Error {
    CatalogError::InvalidStat {
        unit_id: def.id.clone(),
        field,
        value,
    }
    .into()
}

fn validate_skill(unit_id: &str, skill: &SkillDefinition) -> Result<()> {
    if skill.id.is_empty() {
        return Err(CatalogError::EmptyId { what: "技能" }.into());
    }
    let reason = skill_problem(skill);
    match reason {
        None => Ok(()),
        Some(reason) => Err(CatalogError::InvalidSkill {
            unit_id: unit_id.to_string(),
            skill_id: skill.id.clone(),
            reason,
        }
        .into()),
    }
}

fn skill_problem(skill: &SkillDefinition) -> Option<String> {
    if skill.requires_form == Some(Form::Base) {
        return Some("requires_form 只能是 evolved".to_string());
    }
    let damage = skill.targeting.damage();
    if !(0..=MAX_STAT).contains(&damage) {
        return Some(format!("damage 須介於 0 與 {MAX_STAT}，實際為 {damage}"));
    }
    let knockback_problem = |knockback: Coord| {
        (!(0..=MAX_REACH).contains(&knockback))
            .then(|| format!("knockback 須介於 0 與 {MAX_REACH}，實際為 {knockback}"))
    };
    let turns_problem = |field: &str, turns: u32| {
        (turns > MAX_STAT.unsigned_abs())
            .then(|| format!("{field} 不可超過 {MAX_STAT}，實際為 {turns}"))
    };
    match &skill.targeting {
        Targeting::ChooseEnemyAdjacent { .. } => None,
        Targeting::ChooseFront3Cells {
            burn_ticks,
            stun_turns,
            ..
        } => turns_problem("burn_ticks", *burn_ticks)
            .or_else(|| turns_problem("stun_turns", *stun_turns)),
        Targeting::ChooseLineDirection {
            range, knockback, ..
        } => {
            if !(1..=MAX_REACH).contains(range) {
                Some(format!("range 須介於 1 與 {MAX_REACH}，實際為 {range}"))
            } else {
                knockback_problem(*knockback)
            }
        }
        Targeting::Instant {
            aoe_radius,
            knockback,
            stun_turns,
            ..
        } => {
            if !(1..=MAX_REACH).contains(aoe_radius) {
                Some(format!("aoe_radius 須介於 1 與 {MAX_REACH}，實際為 {aoe_radius}"))
            } else {
                knockback_problem(*knockback).or_else(|| turns_problem("stun_turns", *stun_turns))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use board::error::ErrorKind;

    #[test]
    fn test_builtin_catalog() {
        let catalog = Catalog::builtin().unwrap();
        for id in ["MYOUOU", "SOCHO", "TSUTSU", "USHIMARU", "YABUKO"] {
            assert!(catalog.get(id).is_some(), "missing {id}");
        }
        let (owner, skill) = catalog.skill("socho_iaijutsu").unwrap();
        assert_eq!(owner.id, "SOCHO");
        assert!(skill.once_per_match);
        assert!(catalog.skill("nothing").is_none());
    }

    #[test]
    fn test_rejects_whole_catalog() {
        let test_data = [
            (
                "[[units]]\nid = \"A\"\nname = \"a\"\natk = 1\nhp = 0\nmovement = { type = \"orthogonal\", range = 1 }\n",
                "hp",
            ),
            (
                "[[units]]\nid = \"A\"\nname = \"a\"\natk = 1\nhp = 1\nmovement = { type = \"custom\", offsets = [] }\n",
                "位移清單為空",
            ),
            (
                "[[units]]\nid = \"A\"\nname = \"a\"\natk = 1\nhp = 1\nmovement = { type = \"orthogonal\", range = 1 }\nranged = { range = 0 }\n",
                "range",
            ),
            (
                "[[units]]\nid = \"A\"\nname = \"a\"\natk = 2147483647\nhp = 1\nmovement = { type = \"orthogonal\", range = 1 }\n",
                "atk",
            ),
            (
                "[[units]]\nid = \"A\"\nname = \"a\"\natk = 1\nhp = 1\nmovement = { type = \"custom\", offsets = [{ dx = 2147483647, dy = 0 }] }\n",
                "位移不可超過",
            ),
            (
                "[[units]]\nid = \"A\"\nname = \"a\"\natk = 1\nhp = 1\nmovement = { type = \"orthogonal\", range = 1 }\n\n[[units.skills]]\nid = \"s\"\nlabel = \"s\"\ntargeting = { mode = \"instant\", aoe_radius = 1, damage = 1000, knockback = 0, stun_turns = 0 }\n",
                "damage",
            ),
        ];
        for (src, needle) in test_data {
            let err = Catalog::from_toml_str(src).unwrap_err();
            assert!(matches!(err.kind(), ErrorKind::Catalog(_)), "{err}");
            assert!(err.to_string().contains(needle), "{err}");
        }
    }

    #[test]
    fn test_empty_catalog() {
        let err = Catalog::from_toml_str("").unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::Catalog(CatalogError::Empty)));
    }

    #[test]
    fn test_validate_deck() {
        let catalog = Catalog::builtin().unwrap();
        let deck = vec!["SOCHO".to_string(), "NOBODY".to_string()];
        let err = catalog.validate_deck(&deck).unwrap_err();
        assert!(matches!(
            err.kind(),
            ErrorKind::Catalog(CatalogError::UnknownUnit { .. })
        ));
        assert!(catalog.validate_deck(&deck[..1]).is_ok());
    }
}
