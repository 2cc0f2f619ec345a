//! units.rs：
//! - 場上單位集合（copy-on-write），附帶位置索引。
//! - 所有轉換都回傳新的集合，HP 歸零的單位在同一次轉換中移除。
//! - 重複的實例 ID、同格兩個單位屬於狀態損壞，直接 panic。
use crate::*;
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Units {
    // 列舉順序即加入順序
    list: Vec<UnitInstance>,
    pos_to_index: HashMap<Position, usize>,
}

impl Units {
    /// 建立集合並檢查不變量
    pub fn new(list: Vec<UnitInstance>) -> Self {
        let mut ids = HashSet::new();
        let mut pos_to_index = HashMap::new();
        for (index, unit) in list.iter().enumerate() {
            if unit.hp <= 0 {
                panic!("單位 {} 的 HP 為 {}，不應留在場上", unit.instance_id, unit.hp);
            }
            if !ids.insert(unit.instance_id.as_str()) {
                panic!("實例 ID 重複: {}", unit.instance_id);
            }
            if let Some(other) = pos_to_index.insert(unit.pos, index) {
                panic!(
                    "位置 {} 同時有 {} 與 {}",
                    unit.pos, list[other].instance_id, unit.instance_id
                );
            }
        }
        Self { list, pos_to_index }
    }

    /// 移除死亡單位後重建
    fn settle(mut list: Vec<UnitInstance>) -> Self {
        list.retain(|u| u.hp > 0);
        Self::new(list)
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &UnitInstance> {
        self.list.iter()
    }

    pub fn of_side(&self, side: Side) -> impl Iterator<Item = &UnitInstance> {
        self.list.iter().filter(move |u| u.side == side)
    }

    pub fn count(&self, side: Side) -> usize {
        self.of_side(side).count()
    }

    pub fn get(&self, instance_id: &str) -> Option<&UnitInstance> {
        self.list.iter().find(|u| u.instance_id == instance_id)
    }

    pub fn contains(&self, instance_id: &str) -> bool {
        self.get(instance_id).is_some()
    }

    pub fn at(&self, pos: Position) -> Option<&UnitInstance> {
        self.pos_to_index.get(&pos).map(|&index| &self.list[index])
    }

    pub fn is_occupied(&self, pos: Position) -> bool {
        self.pos_to_index.contains_key(&pos)
    }

    /// 加入新單位
    pub fn with_added(&self, unit: UnitInstance) -> Units {
        let mut list = self.list.clone();
        list.push(unit);
        Self::new(list)
    }

    /// 修改單一單位，修改後 HP ≤ 0 即移除
    pub fn with_updated(&self, instance_id: &str, f: impl FnOnce(&mut UnitInstance)) -> Units {
        let mut list = self.list.clone();
        match list.iter_mut().find(|u| u.instance_id == instance_id) {
            Some(unit) => f(unit),
            None => panic!("單位 {instance_id} 不在場上"),
        }
        Self::settle(list)
    }

    /// 修改某一方的所有單位
    pub fn with_side_updated(&self, side: Side, mut f: impl FnMut(&mut UnitInstance)) -> Units {
        let mut list = self.list.clone();
        list.iter_mut().filter(|u| u.side == side).for_each(|u| f(u));
        Self::settle(list)
    }

    pub fn with_moved(&self, instance_id: &str, to: Position) -> Units {
        self.with_updated(instance_id, |u| u.pos = to)
    }

    /// 造成傷害並立即移除死亡單位
    pub fn with_damage(&self, instance_id: &str, damage: i32) -> Units {
        self.with_updated(instance_id, |u| u.hp -= damage)
    }
}

impl<'a> IntoIterator for &'a Units {
    type Item = &'a UnitInstance;
    type IntoIter = std::slice::Iter<'a, UnitInstance>;

    fn into_iter(self) -> Self::IntoIter {
        self.list.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;

    #[test]
    fn test_damage_removes_dead_in_same_transform() {
        let (_, units) = units_from_ascii(
            r#"
            N1 .
            S1 .
            "#,
            &[("S1", "MYOUOU"), ("N1", "YABUKO")],
        );
        let after = units.with_damage("N1", 1);
        assert_eq!(after.get("N1").unwrap().hp, 1);
        assert_eq!(units.get("N1").unwrap().hp, 2, "原集合不應被修改");

        let after = after.with_damage("N1", 5);
        assert!(!after.contains("N1"));
        assert!(!after.is_occupied(Position::new(0, 0)));
        assert_eq!(after.count(Side::North), 0);
    }

    #[test]
    fn test_moved_updates_index() {
        let (_, units) = units_from_ascii("S1 .", &[("S1", "MYOUOU")]);
        let after = units.with_moved("S1", Position::new(0, 1));
        assert!(after.at(Position::new(0, 0)).is_none());
        assert_eq!(after.at(Position::new(0, 1)).unwrap().instance_id, "S1");
    }

    #[test]
    #[should_panic(expected = "同時有")]
    fn test_collision_panics() {
        let (_, units) = units_from_ascii("S1 S2", &[("S1", "MYOUOU"), ("S2", "SOCHO")]);
        units.with_moved("S1", Position::new(0, 1));
    }

    #[test]
    #[should_panic(expected = "實例 ID 重複")]
    fn test_duplicate_id_panics() {
        let (_, units) = units_from_ascii("S1 .", &[("S1", "MYOUOU")]);
        let mut copy = units.get("S1").unwrap().clone();
        copy.pos = Position::new(0, 1);
        units.with_added(copy);
    }
}
