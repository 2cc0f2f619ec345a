//! match_state.rs：
//! - 對局狀態與所有會改變狀態的指令（部署、移動、攻擊、技能、待機、增援、結束回合）。
//! - 指令一律接收 `&MatchState` 並回傳新狀態；被拒絕時呼叫端手上的狀態不變。
//! - 回合開始以 (match_id, turn_sequence, side) 為鍵，同一個鍵只會生效一次。
use crate::*;
use board::error::{CatalogError, Context};
use std::collections::BTreeSet;
use std::sync::Arc;
use strum::IntoEnumIterator;
use tracing::{debug, info};

/// 示範布陣：(單位, 欄)，雙方底線相同欄位
const DEMO_LAYOUT: [(&str, Coord); 3] = [("MYOUOU", 3), ("SOCHO", 2), ("TSUTSU", 4)];
const DEMO_DECK: [&str; 4] = ["USHIMARU", "YABUKO", "SOCHO", "YABUKO"];

/// 重置時用來重建對局
#[derive(Debug, Clone, PartialEq)]
enum Origin {
    Setup(PerSide<Deck>),
    Layout { units: Units, decks: PerSide<Deck> },
}

#[derive(Debug, Clone, PartialEq)]
pub struct MatchState {
    catalog: Arc<Catalog>,
    pub rules: Rules,
    pub match_id: MatchId,
    pub phase: Phase,
    /// 目前行動方（部署階段為正在部署的一方）
    pub turn: Side,
    pub turn_sequence: TurnSequence,
    pub units: Units,
    pub turn_table: TurnTable,
    /// 一場一次的技能使用紀錄
    pub used_skills: BTreeSet<(Side, InstanceId, SkillId)>,
    pub supplies: PerSide<SideSupply>,
    pub deployed: PerSide<usize>,
    /// 本回合行動方已增援
    pub reinforced: bool,
    pub last_turn_start: Option<TurnKey>,
    pub victory: Option<Victory>,
    origin: Origin,
    next_serial: PerSide<u32>,
}

/// 指令結果
#[derive(Debug, Clone, PartialEq)]
pub struct CommandResult {
    pub state: MatchState,
    pub victory: Option<Victory>,
}

/// 技能是否可施放
#[derive(Debug, Clone, PartialEq)]
pub struct SkillAvailability {
    pub skill_id: SkillId,
    pub label: String,
    /// 無法施放的原因
    pub blocked: Option<Error>,
}

impl MatchState {
    /// 建立新對局，從抽起手牌開始
    pub fn create_match(
        catalog: Arc<Catalog>,
        rules: Rules,
        decks: PerSide<Deck>,
        match_id: MatchId,
    ) -> board::error::Result<Self> {
        rules.validate().context("建立對局")?;
        for side in Side::iter() {
            catalog
                .validate_deck(decks[side].cards())
                .context(format!("{side} 的牌組"))?;
        }
        info!(match_id, "建立對局");
        Ok(Self::fresh(catalog, rules, decks, match_id))
    }

    /// 直接以指定布陣進入戰鬥，South 先手
    pub fn from_units(catalog: Arc<Catalog>, rules: Rules, units: Units) -> Self {
        Self::from_layout(catalog, rules, units, PerSide::default(), 0)
    }

    /// 標準示範開局：雙方各三隻單位在底線
    pub fn demo(catalog: Arc<Catalog>) -> board::error::Result<Self> {
        let rules = Rules::default();
        let deck: Vec<UnitId> = DEMO_DECK.iter().map(|id| id.to_string()).collect();
        catalog.validate_deck(&deck).context("示範牌組")?;

        let mut list = Vec::new();
        for side in Side::iter() {
            let row = rules.board.home_row(side);
            for (n, (unit_id, col)) in (1..).zip(DEMO_LAYOUT) {
                let def = catalog
                    .get(unit_id)
                    .ok_or_else(|| CatalogError::UnknownUnit {
                        unit_id: unit_id.to_string(),
                    })
                    .map_err(board::error::Error::from)
                    .context("示範布陣")?;
                let instance_id = format!("{}{n}", side.instance_prefix());
                list.push(UnitInstance::new(instance_id, def, side, Position::new(row, col)));
            }
        }
        let decks = PerSide::new(Deck::new(deck.clone()), Deck::new(deck));
        Ok(Self::from_layout(catalog, rules, Units::new(list), decks, 0))
    }

    fn fresh(catalog: Arc<Catalog>, rules: Rules, decks: PerSide<Deck>, match_id: MatchId) -> Self {
        Self {
            catalog,
            rules,
            match_id,
            phase: Phase::SetupDraw,
            turn: Side::South,
            turn_sequence: 0,
            units: Units::default(),
            turn_table: TurnTable::default(),
            used_skills: BTreeSet::new(),
            supplies: PerSide::new(
                SideSupply::new(decks.south.clone()),
                SideSupply::new(decks.north.clone()),
            ),
            deployed: PerSide::default(),
            reinforced: false,
            last_turn_start: None,
            victory: None,
            origin: Origin::Setup(decks),
            next_serial: PerSide::default(),
        }
    }

    fn from_layout(
        catalog: Arc<Catalog>,
        rules: Rules,
        units: Units,
        decks: PerSide<Deck>,
        match_id: MatchId,
    ) -> Self {
        // 引用不存在的定義直接 panic
        for unit in &units {
            unit.definition(catalog.as_ref());
        }
        let mut state = Self::fresh(catalog, rules, decks.clone(), match_id);
        state.origin = Origin::Layout {
            units: units.clone(),
            decks,
        };
        state.units = units;
        state.enter_battle();
        state.victory = check_victory(&state.rules.board, &state.units);
        state
    }

    /// 以相同的牌組或布陣重新開始，match_id 遞增
    pub fn reset(&self) -> MatchState {
        let match_id = self.match_id + 1;
        info!(match_id, "重置對局");
        let catalog = Arc::clone(&self.catalog);
        match &self.origin {
            Origin::Setup(decks) => Self::fresh(catalog, self.rules.clone(), decks.clone(), match_id),
            Origin::Layout { units, decks } => Self::from_layout(
                catalog,
                self.rules.clone(),
                units.clone(),
                decks.clone(),
                match_id,
            ),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn board(&self) -> &Board {
        &self.rules.board
    }

    pub fn turn_key(&self) -> TurnKey {
        TurnKey {
            match_id: self.match_id,
            turn_sequence: self.turn_sequence,
            side: self.turn,
        }
    }

    pub fn is_over(&self) -> bool {
        self.victory.is_some()
    }

    pub fn hand(&self, side: Side) -> &Hand {
        &self.supplies[side].hand
    }

    pub fn flags(&self, instance_id: &str) -> ActionFlags {
        self.turn_table.get(instance_id)
    }

    /// 行動方的單位是否都已結束
    pub fn all_done(&self) -> bool {
        self.turn_table.all_done(&self.units, self.turn)
    }

    pub fn legal_moves(&self, instance_id: &str) -> Vec<Position> {
        match self.units.get(instance_id) {
            Some(unit) => legal_moves(self.board(), &self.units, self.catalog(), unit),
            None => vec![],
        }
    }

    pub fn attack_marks(&self, instance_id: &str) -> Vec<AttackMark> {
        match self.units.get(instance_id) {
            Some(unit) => attack_marks(self.board(), &self.units, self.catalog(), unit),
            None => vec![],
        }
    }

    pub fn attackable_targets(&self, instance_id: &str) -> Vec<&UnitInstance> {
        match self.units.get(instance_id) {
            Some(unit) => attackable_targets(self.board(), &self.units, self.catalog(), unit),
            None => vec![],
        }
    }

    pub fn skill_targets(&self, instance_id: &str, skill_id: &str) -> Vec<Position> {
        let Some(unit) = self.units.get(instance_id) else {
            return vec![];
        };
        match unit.definition(self.catalog()).skill(skill_id) {
            Some(skill) => skill_targets(self.board(), &self.units, unit, &skill.targeting),
            None => vec![],
        }
    }

    /// 行動方底線上可增援的空格
    pub fn reinforce_cells(&self) -> Vec<Position> {
        self.board()
            .home_cells(self.turn)
            .filter(|pos| !self.units.is_occupied(*pos))
            .collect()
    }

    /// 單位的所有技能與目前能否施放
    pub fn available_skills(&self, instance_id: &str) -> Result<Vec<SkillAvailability>, Error> {
        let func = "MatchState::available_skills";

        let unit = self.units.get(instance_id).ok_or_else(|| Error::NoSuchUnit {
            func,
            instance_id: instance_id.to_string(),
        })?;
        let skills = unit
            .definition(self.catalog())
            .skills
            .iter()
            .map(|skill| SkillAvailability {
                skill_id: skill.id.clone(),
                label: skill.display_name().to_string(),
                blocked: self
                    .check_skill(instance_id, &skill.id)
                    .err()
                    .map(|e| root_error(&e).clone()),
            })
            .collect();
        Ok(skills)
    }

    /// 雙方各抽起手牌，進入部署
    pub fn apply_draw_opening(&self) -> Result<CommandResult, Error> {
        let func = "MatchState::apply_draw_opening";
        self.check_phase(func, Phase::SetupDraw)?;

        let mut next = self.clone();
        for side in Side::iter() {
            for _ in 0..self.rules.opening_hand {
                if next.supplies[side].draw().is_none() {
                    break;
                }
            }
        }
        next.phase = Phase::SetupDeploy;
        next.turn = Side::South;
        info!(match_id = next.match_id, "起手完成，進入部署");
        next.advance_deploy();
        Ok(next.into_result())
    }

    /// 部署一張手牌到己方底線
    pub fn apply_deploy(&self, unit_id: &str, pos: Position) -> Result<CommandResult, Error> {
        let func = "MatchState::apply_deploy";
        self.check_phase(func, Phase::SetupDeploy)?;

        let side = self.turn;
        if self.deployed[side] >= self.rules.deploy_quota {
            return Err(Error::QuotaReached { func, side });
        }
        self.check_placement(func, side, unit_id, pos)?;

        let mut next = self.clone();
        next.supplies[side].hand.remove_one(unit_id);
        let instance_id = next.spawn(side, unit_id, pos);
        next.deployed[side] += 1;
        debug!(%side, %instance_id, %pos, "部署");
        next.advance_deploy();
        Ok(next.into_result())
    }

    /// 回合開始（抽牌、重建行動旗標、清除增援紀錄），同一回合重複呼叫不會有任何效果
    pub fn begin_turn(&self) -> Result<CommandResult, Error> {
        let func = "MatchState::begin_turn";
        self.check_phase(func, Phase::Battle)?;

        let mut next = self.clone();
        next.start_turn();
        Ok(next.into_result())
    }

    pub fn apply_move(&self, instance_id: &str, to: Position) -> Result<CommandResult, Error> {
        let func = "MatchState::apply_move";

        let actor = self
            .check_actor(instance_id)
            .map_err(|e| Error::Wrap {
                func,
                source: Box::new(e),
            })?;
        if self.flags(instance_id).moved {
            return Err(Error::AlreadyMoved {
                func,
                instance_id: instance_id.to_string(),
            });
        }
        if !legal_moves(self.board(), &self.units, self.catalog(), actor).contains(&to) {
            return Err(Error::IllegalDestination { func, pos: to });
        }

        let (units, evolved) =
            move_and_evolve(self.board(), &self.units, self.catalog(), instance_id, to);
        let mut next = self.clone();
        next.units = units;
        next.turn_table.mark_moved(instance_id);
        debug!(instance_id, %to, evolved, "移動");
        Ok(next.into_result())
    }

    pub fn apply_attack(&self, attacker_id: &str, target_id: &str) -> Result<CommandResult, Error> {
        let func = "MatchState::apply_attack";

        let attacker = self
            .check_actor(attacker_id)
            .map_err(|e| Error::Wrap {
                func,
                source: Box::new(e),
            })?;
        let target = self.units.get(target_id).ok_or_else(|| Error::NoSuchUnit {
            func,
            instance_id: target_id.to_string(),
        })?;
        let legal = attackable_targets(self.board(), &self.units, self.catalog(), attacker)
            .iter()
            .any(|u| u.instance_id == target_id);
        if !legal {
            return Err(Error::IllegalTarget {
                func,
                pos: target.pos,
            });
        }

        let mut next = self.clone();
        next.units = resolve_attack(&self.units, self.catalog(), attacker, target_id);
        next.turn_table.mark_attacked(attacker_id);
        debug!(attacker_id, target_id, "攻擊");
        Ok(next.into_result())
    }

    pub fn apply_skill(
        &self,
        caster_id: &str,
        skill_id: &str,
        target: Option<Position>,
    ) -> Result<CommandResult, Error> {
        let func = "MatchState::apply_skill";

        let (caster, skill) = self.check_skill(caster_id, skill_id).map_err(|e| Error::Wrap {
            func,
            source: Box::new(e),
        })?;
        check_skill_target(self.board(), &self.units, caster, skill, target).map_err(|e| {
            Error::Wrap {
                func,
                source: Box::new(e),
            }
        })?;

        let mut next = self.clone();
        next.units = resolve_skill(self.board(), &self.units, caster, &skill.targeting, target);
        next.turn_table.mark_attacked(caster_id);
        if skill.once_per_match {
            next.used_skills
                .insert((caster.side, caster_id.to_string(), skill_id.to_string()));
        }
        debug!(caster_id, skill_id, ?target, "施放技能");
        Ok(next.into_result())
    }

    /// 不行動，直接結束該單位
    pub fn apply_wait(&self, instance_id: &str) -> Result<CommandResult, Error> {
        let func = "MatchState::apply_wait";

        self.check_actor(instance_id).map_err(|e| Error::Wrap {
            func,
            source: Box::new(e),
        })?;
        let mut next = self.clone();
        next.turn_table.mark_done(instance_id);
        debug!(instance_id, "待機");
        Ok(next.into_result())
    }

    /// 從手牌增援一隻到己方底線空格，每回合一次，增援的單位本回合不能行動
    pub fn apply_reinforce(&self, unit_id: &str, pos: Position) -> Result<CommandResult, Error> {
        let func = "MatchState::apply_reinforce";
        self.check_phase(func, Phase::Battle)?;

        let side = self.turn;
        if self.reinforced {
            return Err(Error::ReinforceUsed { func, side });
        }
        self.check_placement(func, side, unit_id, pos)?;

        let mut next = self.clone();
        next.supplies[side].hand.remove_one(unit_id);
        let instance_id = next.spawn(side, unit_id, pos);
        next.turn_table.insert(
            instance_id.clone(),
            ActionFlags {
                done: true,
                ..Default::default()
            },
        );
        next.reinforced = true;
        info!(%side, %instance_id, %pos, "增援");
        Ok(next.into_result())
    }

    /// 結束回合：結算行動方的狀態，沒分出勝負就換邊並開始下一回合
    pub fn apply_end_turn(&self) -> Result<CommandResult, Error> {
        let func = "MatchState::apply_end_turn";
        self.check_phase(func, Phase::Battle)?;

        let ending = self.turn;
        let mut next = self.clone();
        next.units = tick_side(&self.units, ending, self.rules.burn_damage);
        debug!(side = %ending, turn_sequence = self.turn_sequence, "回合結束");

        let mut result = next.into_result();
        if result.victory.is_none() {
            let state = &mut result.state;
            state.turn = ending.opponent();
            state.turn_sequence += 1;
            state.start_turn();
        }
        Ok(result)
    }
}

// 內部輔助
impl MatchState {
    fn check_phase(&self, func: &'static str, expected: Phase) -> Result<(), Error> {
        if self.is_over() {
            return Err(Error::GameOver { func });
        }
        if self.phase != expected {
            return Err(Error::WrongPhase {
                func,
                phase: self.phase,
            });
        }
        Ok(())
    }

    /// 行動方、存活、未暈眩、本回合尚未結束（攻擊過的單位回報 `AlreadyAttacked`）
    fn check_actor(&self, instance_id: &str) -> Result<&UnitInstance, Error> {
        let func = "MatchState::check_actor";
        self.check_phase(func, Phase::Battle)?;

        let unit = self.units.get(instance_id).ok_or_else(|| Error::NoSuchUnit {
            func,
            instance_id: instance_id.to_string(),
        })?;
        if unit.side != self.turn {
            return Err(Error::NotYourTurn {
                func,
                side: unit.side,
            });
        }
        if unit.is_stunned() {
            return Err(Error::Stunned {
                func,
                instance_id: instance_id.to_string(),
            });
        }
        let flags = self.flags(instance_id);
        if flags.attacked {
            return Err(Error::AlreadyAttacked {
                func,
                instance_id: instance_id.to_string(),
            });
        }
        if flags.done {
            return Err(Error::UnitDone {
                func,
                instance_id: instance_id.to_string(),
            });
        }
        Ok(unit)
    }

    fn check_skill(
        &self,
        caster_id: &str,
        skill_id: &str,
    ) -> Result<(&UnitInstance, &SkillDefinition), Error> {
        let func = "MatchState::check_skill";

        let caster = self.check_actor(caster_id).map_err(|e| Error::Wrap {
            func,
            source: Box::new(e),
        })?;
        let (owner, skill) = self
            .catalog()
            .skill(skill_id)
            .ok_or_else(|| Error::SkillNotFound {
                func,
                skill_id: skill_id.to_string(),
            })?;
        if owner.id != caster.unit_id {
            return Err(Error::SkillNotOwned {
                func,
                skill_id: skill_id.to_string(),
                instance_id: caster_id.to_string(),
            });
        }
        if let Some(form) = skill.requires_form {
            if caster.form != form {
                return Err(Error::FormRequired {
                    func,
                    skill_id: skill_id.to_string(),
                    form,
                });
            }
        }
        let key = (caster.side, caster_id.to_string(), skill_id.to_string());
        if skill.once_per_match && self.used_skills.contains(&key) {
            return Err(Error::SkillAlreadyUsed {
                func,
                skill_id: skill_id.to_string(),
                instance_id: caster_id.to_string(),
            });
        }
        Ok((caster, skill))
    }

    /// 部署與增援共用：手牌、底線、空格
    fn check_placement(
        &self,
        func: &'static str,
        side: Side,
        unit_id: &str,
        pos: Position,
    ) -> Result<(), Error> {
        if !self.hand(side).contains(unit_id) {
            return Err(Error::NotInHand {
                func,
                unit_id: unit_id.to_string(),
                side,
            });
        }
        if !self.board().is_home_row(side, pos) {
            return Err(Error::NotHomeRow { func, pos });
        }
        if self.units.is_occupied(pos) {
            return Err(Error::CellOccupied { func, pos });
        }
        Ok(())
    }

    /// 產生實例 ID（S1、S2…／N1、N2…）並放上棋盤
    fn spawn(&mut self, side: Side, unit_id: &str, pos: Position) -> InstanceId {
        let instance_id = loop {
            self.next_serial[side] += 1;
            let id = format!("{}{}", side.instance_prefix(), self.next_serial[side]);
            if !self.units.contains(&id) {
                break id;
            }
        };
        let catalog = Arc::clone(&self.catalog);
        let def = match catalog.get(unit_id) {
            Some(def) => def,
            None => panic!("手牌 {unit_id} 不在單位目錄中"),
        };
        self.units = self
            .units
            .with_added(UnitInstance::new(instance_id.clone(), def, side, pos));
        instance_id
    }

    /// 目前部署方完成後換邊，North 完成後進入戰鬥
    fn advance_deploy(&mut self) {
        while self.phase == Phase::SetupDeploy {
            let side = self.turn;
            let finished = self.deployed[side] >= self.rules.deploy_quota
                || self.supplies[side].hand.is_empty();
            if !finished {
                return;
            }
            self.supplies[side].return_hand();
            info!(%side, deployed = self.deployed[side], "部署完成");
            match side {
                Side::South => self.turn = Side::North,
                Side::North => self.enter_battle(),
            }
        }
    }

    fn enter_battle(&mut self) {
        self.phase = Phase::Battle;
        self.turn = Side::South;
        self.turn_sequence = 1;
        info!(match_id = self.match_id, "進入戰鬥");
        self.start_turn();
    }

    fn start_turn(&mut self) {
        let key = self.turn_key();
        if self.last_turn_start == Some(key) {
            debug!(?key, "回合已開始，略過");
            return;
        }
        let side = self.turn;
        // 進入戰鬥的第一回合不抽牌
        if self.turn_sequence > 1 {
            if let Some(card) = self.supplies[side].draw() {
                debug!(%side, %card, "抽牌");
            }
        }
        self.turn_table = TurnTable::build(&self.units, side);
        self.reinforced = false;
        self.last_turn_start = Some(key);
        info!(
            match_id = self.match_id,
            turn_sequence = self.turn_sequence,
            %side,
            "回合開始"
        );
    }

    fn into_result(mut self) -> CommandResult {
        if self.phase == Phase::Battle && self.victory.is_none() {
            self.victory = check_victory(self.board(), &self.units);
            if let Some(victory) = self.victory {
                info!(winner = %victory.winner, reason = %victory.reason, "分出勝負");
            }
        }
        CommandResult {
            victory: self.victory,
            state: self,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;

    fn deck(cards: &[&str]) -> Deck {
        Deck::new(cards.iter().map(|c| c.to_string()).collect())
    }

    fn new_match() -> MatchState {
        let decks = PerSide::new(
            deck(&["SOCHO", "MYOUOU", "TSUTSU", "YABUKO", "YABUKO", "USHIMARU", "SOCHO"]),
            deck(&["MYOUOU", "SOCHO", "YABUKO", "TSUTSU", "USHIMARU", "YABUKO"]),
        );
        MatchState::create_match(catalog(), Rules::default(), decks, 7).unwrap()
    }

    #[test]
    fn test_create_match_rejects_unknown_card() {
        let decks = PerSide::new(deck(&["SOCHO"]), deck(&["NOBODY"]));
        let err = MatchState::create_match(catalog(), Rules::default(), decks, 1).unwrap_err();
        assert!(err.to_string().contains("NOBODY"));
    }

    #[test]
    fn test_setup_flow() {
        let state = new_match();
        assert_eq!(state.phase, Phase::SetupDraw);
        let err = state.apply_deploy("SOCHO", Position::new(6, 0)).unwrap_err();
        assert!(matches!(err, Error::WrongPhase { .. }));

        let state = state.apply_draw_opening().unwrap().state;
        assert_eq!(state.phase, Phase::SetupDeploy);
        assert_eq!(state.hand(Side::South).len(), 5);
        assert_eq!(state.hand(Side::North).len(), 5);
        assert_eq!(state.supplies[Side::South].deck.len(), 2);

        // 部署限制
        let test_data = [
            ("USHIMARU", Position::new(6, 0), "NotInHand"),
            ("SOCHO", Position::new(5, 0), "NotHomeRow"),
            ("SOCHO", Position::new(0, 0), "NotHomeRow"),
        ];
        for (unit_id, pos, expect) in test_data {
            let err = state.apply_deploy(unit_id, pos).unwrap_err();
            assert!(format!("{err:?}").starts_with(expect), "{unit_id} {pos}: {err:?}");
        }

        let state = state.apply_deploy("SOCHO", Position::new(6, 1)).unwrap().state;
        let err = state.apply_deploy("MYOUOU", Position::new(6, 1)).unwrap_err();
        assert!(matches!(err, Error::CellOccupied { .. }));
        let state = state.apply_deploy("MYOUOU", Position::new(6, 2)).unwrap().state;
        let state = state.apply_deploy("TSUTSU", Position::new(6, 3)).unwrap().state;

        // South 完成，剩下的手牌回到牌庫底
        assert_eq!(state.turn, Side::North);
        assert!(state.hand(Side::South).is_empty());
        let south_deck: Vec<_> = state.supplies[Side::South].deck.cards().cloned().collect();
        assert_eq!(south_deck, ["USHIMARU", "SOCHO", "YABUKO", "YABUKO"]);

        let state = state.apply_deploy("MYOUOU", Position::new(0, 1)).unwrap().state;
        let state = state.apply_deploy("SOCHO", Position::new(0, 2)).unwrap().state;
        let result = state.apply_deploy("YABUKO", Position::new(0, 3)).unwrap();
        let state = result.state;
        assert!(result.victory.is_none());

        assert_eq!(state.phase, Phase::Battle);
        assert_eq!(state.turn, Side::South);
        assert_eq!(state.turn_sequence, 1);
        let ids: Vec<_> = state.units.iter().map(|u| u.instance_id.as_str()).collect();
        assert_eq!(ids, ["S1", "S2", "S3", "N1", "N2", "N3"]);
        // 進入戰鬥的回合不抽牌
        assert!(state.hand(Side::South).is_empty());
        assert!(!state.flags("S1").done);
        assert!(state.flags("N1").done);
    }

    #[test]
    fn test_begin_turn_is_idempotent() {
        let mut state = battle_state(
            r#"
            . . . N1 . . .
            . . . . . . .
            . . . . . . .
            . . . . . . .
            . . . . . . .
            . . . . . . .
            . . . S1 . . .
            "#,
            &[("S1", "YABUKO"), ("N1", "YABUKO")],
        );
        state.supplies[Side::North].deck = deck(&["SOCHO", "MYOUOU"]);

        let state = state.apply_end_turn().unwrap().state;
        assert_eq!(state.turn, Side::North);
        assert_eq!(state.turn_sequence, 2);
        assert_eq!(state.hand(Side::North).len(), 1);

        let moved = state.apply_move("N1", Position::new(1, 3)).unwrap().state;
        // 同一回合再次開始：不抽牌、不重設行動旗標
        let again = moved.begin_turn().unwrap().state;
        assert_eq!(again, moved);
        assert_eq!(again.hand(Side::North).len(), 1);
        assert!(again.flags("N1").moved);
    }

    #[test]
    fn test_rejected_command_leaves_state() {
        let state = MatchState::demo(catalog()).unwrap();
        let before = state.clone();

        let err = state.apply_move("N1", Position::new(1, 3)).unwrap_err();
        assert!(matches!(root_error(&err), Error::NotYourTurn { .. }));
        let err = state.apply_move("S1", Position::new(3, 3)).unwrap_err();
        assert!(matches!(err, Error::IllegalDestination { .. }));
        let err = state.apply_attack("S1", "N1").unwrap_err();
        assert!(matches!(err, Error::IllegalTarget { .. }));
        assert_eq!(state, before);
    }

    #[test]
    fn test_move_then_attack_ends_unit() {
        let state = battle_state(
            r#"
            . . . N2 . . .
            . . . . . . .
            . . . . . . .
            . . . . . . .
            . . . N1 . . .
            . . . . . . .
            . . . S1 . . .
            "#,
            &[("S1", "MYOUOU"), ("N1", "YABUKO"), ("N2", "YABUKO")],
        );
        let state = state.apply_move("S1", Position::new(5, 3)).unwrap().state;
        let err = state.apply_move("S1", Position::new(5, 2)).unwrap_err();
        assert!(matches!(err, Error::AlreadyMoved { .. }));

        let result = state.apply_attack("S1", "N1").unwrap();
        assert!(result.victory.is_none());
        let state = result.state;
        assert!(!state.units.contains("N1"));
        assert!(state.flags("S1").done);
        assert!(state.all_done());

        let err = state.apply_wait("S1").unwrap_err();
        assert!(matches!(root_error(&err), Error::AlreadyAttacked { .. }));
        let err = state.apply_attack("S1", "N2").unwrap_err();
        assert!(matches!(root_error(&err), Error::AlreadyAttacked { .. }));
    }

    #[test]
    fn test_skill_gating() {
        let state = battle_state(
            r#"
            . . . . . . .
            . . . . . . .
            . . . . . . .
            . . . . . . .
            . . . . . . .
            . . . N1 . . .
            . . . S1 S2 . .
            "#,
            &[("S1", "MYOUOU"), ("S2", "SOCHO"), ("N1", "USHIMARU")],
        );

        // 需要進化形態
        let err = state
            .apply_skill("S1", "myouou_karyura", Some(Position::new(5, 3)))
            .unwrap_err();
        assert!(matches!(root_error(&err), Error::FormRequired { .. }));
        // 不是自己的技能
        let err = state
            .apply_skill("S1", "socho_iaijutsu", Some(Position::new(5, 3)))
            .unwrap_err();
        assert!(matches!(root_error(&err), Error::SkillNotOwned { .. }));
        let err = state.apply_skill("S1", "nothing", None).unwrap_err();
        assert!(matches!(root_error(&err), Error::SkillNotFound { .. }));

        let skills = state.available_skills("S1").unwrap();
        assert_eq!(skills.len(), 2);
        assert!(skills[0].blocked.is_none());
        assert!(matches!(skills[1].blocked, Some(Error::FormRequired { .. })));

        // 居合：USHIMARU 5 HP 剩 1
        let state = state
            .apply_skill("S2", "socho_iaijutsu", Some(Position::new(5, 3)))
            .unwrap()
            .state;
        assert_eq!(state.units.get("N1").unwrap().hp, 1);
        assert!(state.flags("S2").done);
        assert!(state.used_skills.contains(&(
            Side::South,
            "S2".to_string(),
            "socho_iaijutsu".to_string()
        )));

        // 下一個 South 回合不能再用
        let state = state.apply_end_turn().unwrap().state;
        let state = state.apply_end_turn().unwrap().state;
        assert_eq!(state.turn, Side::South);
        let err = state
            .apply_skill("S2", "socho_iaijutsu", Some(Position::new(5, 3)))
            .unwrap_err();
        assert!(matches!(root_error(&err), Error::SkillAlreadyUsed { .. }));
    }

    #[test]
    fn test_reinforce_once_per_turn() {
        let mut state = battle_state(
            r#"
            . . . N1 . . .
            . . . . . . .
            . . . . . . .
            . . . . . . .
            . . . . . . .
            . . . . . . .
            . . . S1 . . .
            "#,
            &[("S1", "YABUKO"), ("N1", "YABUKO")],
        );
        state.supplies[Side::South].hand.add("SOCHO".to_string());
        state.supplies[Side::South].hand.add("TSUTSU".to_string());
        assert_eq!(state.reinforce_cells().len(), 6);

        let err = state.apply_reinforce("SOCHO", Position::new(6, 3)).unwrap_err();
        assert!(matches!(err, Error::CellOccupied { .. }));

        let state = state.apply_reinforce("SOCHO", Position::new(6, 0)).unwrap().state;
        let reinforced = state.units.at(Position::new(6, 0)).unwrap();
        assert_eq!(reinforced.instance_id, "S2");
        assert!(state.flags("S2").done, "增援單位本回合不能行動");

        let err = state.apply_reinforce("TSUTSU", Position::new(6, 1)).unwrap_err();
        assert!(matches!(err, Error::ReinforceUsed { .. }));

        // 下一個 South 回合可以再增援
        let state = state.apply_end_turn().unwrap().state;
        let state = state.apply_end_turn().unwrap().state;
        assert!(state.apply_reinforce("TSUTSU", Position::new(6, 1)).is_ok());
    }

    #[test]
    fn test_game_over_rejects_everything() {
        let state = battle_state(
            r#"
            . . .
            . N1 .
            . S1 .
            "#,
            &[("S1", "MYOUOU"), ("N1", "YABUKO")],
        );
        let result = state.apply_attack("S1", "N1").unwrap();
        assert_eq!(
            result.victory,
            Some(Victory {
                winner: Side::South,
                reason: VictoryReason::Elimination
            })
        );
        let state = result.state;
        assert!(matches!(state.apply_end_turn(), Err(Error::GameOver { .. })));
        let err = state.apply_wait("S1").unwrap_err();
        assert!(matches!(root_error(&err), Error::GameOver { .. }));
    }

    #[test]
    fn test_reset() {
        let state = new_match().apply_draw_opening().unwrap().state;
        let reset = state.reset();
        assert_eq!(reset.phase, Phase::SetupDraw);
        assert_eq!(reset.match_id, 8);
        assert!(reset.hand(Side::South).is_empty());
        assert_eq!(reset.supplies[Side::South].deck.len(), 7);

        let demo = MatchState::demo(catalog()).unwrap();
        let moved = demo.apply_move("S2", Position::new(5, 2)).unwrap().state;
        let reset = moved.reset();
        assert_eq!(reset.units, demo.units);
        assert_eq!(reset.match_id, demo.match_id + 1);
        assert_eq!(reset.phase, Phase::Battle);
    }
}
