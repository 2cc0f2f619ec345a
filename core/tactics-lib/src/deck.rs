//! deck.rs：
//! - 牌庫與手牌。規則引擎只需要「看頂牌／抽頂牌／放回」三個操作。
//! - 洗牌只在建立牌庫時做一次，引擎本身不使用亂數。
use crate::*;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// 牌庫介面
pub trait CardSupply {
    fn peek_top(&self) -> Option<&UnitId>;
    fn take_top(&mut self) -> Option<UnitId>;
    /// 放回牌庫底部，保持給定順序
    fn return_cards(&mut self, cards: Vec<UnitId>);
}

/// 牌庫，前端是頂牌
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deck {
    cards: VecDeque<UnitId>,
}

impl Deck {
    pub fn new(cards: Vec<UnitId>) -> Self {
        Self {
            cards: cards.into(),
        }
    }

    pub fn shuffled<R: Rng + ?Sized>(mut cards: Vec<UnitId>, rng: &mut R) -> Self {
        cards.shuffle(rng);
        Self::new(cards)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn cards(&self) -> impl Iterator<Item = &UnitId> {
        self.cards.iter()
    }
}

impl CardSupply for Deck {
    fn peek_top(&self) -> Option<&UnitId> {
        self.cards.front()
    }

    fn take_top(&mut self) -> Option<UnitId> {
        self.cards.pop_front()
    }

    fn return_cards(&mut self, cards: Vec<UnitId>) {
        self.cards.extend(cards);
    }
}

/// 手牌（可重複）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hand {
    cards: Vec<UnitId>,
}

impl Hand {
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn contains(&self, unit_id: &str) -> bool {
        self.cards.iter().any(|c| c == unit_id)
    }

    pub fn cards(&self) -> impl Iterator<Item = &UnitId> {
        self.cards.iter()
    }

    pub fn add(&mut self, unit_id: UnitId) {
        self.cards.push(unit_id);
    }

    /// 移除一張，沒有則回傳 false
    pub fn remove_one(&mut self, unit_id: &str) -> bool {
        match self.cards.iter().position(|c| c == unit_id) {
            Some(index) => {
                self.cards.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn take_all(&mut self) -> Vec<UnitId> {
        std::mem::take(&mut self.cards)
    }
}

/// 一方的牌庫與手牌
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SideSupply {
    pub deck: Deck,
    pub hand: Hand,
}

impl SideSupply {
    pub fn new(deck: Deck) -> Self {
        Self {
            deck,
            hand: Hand::default(),
        }
    }

    /// 從牌庫抽一張到手牌，牌庫空了回傳 `None`
    pub fn draw(&mut self) -> Option<&UnitId> {
        let card = self.deck.take_top()?;
        self.hand.add(card);
        self.hand.cards.last()
    }

    /// 手牌全部放回牌庫底
    pub fn return_hand(&mut self) {
        let cards = self.hand.take_all();
        self.deck.return_cards(cards);
    }
}
