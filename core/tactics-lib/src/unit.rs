use crate::*;
use serde::{Deserialize, Serialize};

/// 棋盤上的單位實例
///
/// 實例本身不可變：任何變化都透過 `Units` 產生新的集合。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitInstance {
    pub instance_id: InstanceId,
    pub unit_id: UnitId,
    pub side: Side,
    pub pos: Position,
    pub hp: i32,
    #[serde(default)]
    pub form: Form,
    /// > 0 時本方回合無法行動
    #[serde(default)]
    pub stun: u32,
    /// > 0 時本方回合結束受到燃燒傷害
    #[serde(default)]
    pub burn: u32,
}

impl UnitInstance {
    pub fn new(
        instance_id: impl Into<InstanceId>,
        def: &UnitDefinition,
        side: Side,
        pos: Position,
    ) -> Self {
        Self {
            instance_id: instance_id.into(),
            unit_id: def.id.clone(),
            side,
            pos,
            hp: def.hp,
            form: Form::Base,
            stun: 0,
            burn: 0,
        }
    }

    pub fn is_stunned(&self) -> bool {
        self.stun > 0
    }

    pub fn is_evolved(&self) -> bool {
        self.form == Form::Evolved
    }

    pub fn is_enemy_of(&self, other: &UnitInstance) -> bool {
        self.side != other.side
    }

    /// 查詢單位定義，目錄中找不到代表狀態已損壞
    pub fn definition<'a>(&self, defs: &'a impl UnitDefinitionGetter) -> &'a UnitDefinition {
        match defs.get(&self.unit_id) {
            Some(def) => def,
            None => panic!(
                "單位 {} 引用了目錄中不存在的定義 {}",
                self.instance_id, self.unit_id
            ),
        }
    }

    /// 含形態加成的攻擊力
    pub fn atk(&self, defs: &impl UnitDefinitionGetter) -> i32 {
        self.definition(defs).effective_atk(self.form)
    }

    pub fn max_hp(&self, defs: &impl UnitDefinitionGetter) -> i32 {
        self.definition(defs).effective_max_hp(self.form)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_instance_uses_base_stats() {
        let catalog = Catalog::builtin().unwrap();
        let def = catalog.get("SOCHO").unwrap();
        let unit = UnitInstance::new("S1", def, Side::South, Position::new(6, 2));
        assert_eq!(unit.hp, def.hp);
        assert_eq!(unit.form, Form::Base);
        assert!(!unit.is_stunned());
        assert_eq!(unit.atk(&catalog), def.atk);

        let evolved = UnitInstance {
            form: Form::Evolved,
            ..unit
        };
        assert_eq!(evolved.atk(&catalog), def.atk + 1);
        assert_eq!(evolved.max_hp(&catalog), def.hp + 1);
    }

    #[test]
    #[should_panic(expected = "GHOST")]
    fn test_unknown_definition_panics() {
        let catalog = Catalog::builtin().unwrap();
        let unit = UnitInstance {
            instance_id: "S9".to_string(),
            unit_id: "GHOST".to_string(),
            side: Side::South,
            pos: Position::new(0, 0),
            hp: 1,
            form: Form::Base,
            stun: 0,
            burn: 0,
        };
        unit.atk(&catalog);
    }
}
