//! Session state and the turn loop.
use std::hash::Hash;

use rand::seq::SliceRandom;
use strum::IntoEnumIterator;
use util::{srng, GameRng, RngExt};
use world::DungeonMap;

use crate::{
    conflict::{self, Proposal, Verdict},
    prelude::*,
    AstarPathfinder, Cause, Chest, ComboTracker, GameOverReason, Monster,
    Pathfinder, Player, Projectile, Registry, Scores, Spawner, Trap,
    TurnOutcome, TurnReport, WalkGrid,
};

/// Main data container for a game session.
pub struct Runtime {
    pub(crate) map: DungeonMap,
    mode: GameMode,
    pub(crate) settings: Settings,
    pub(crate) reg: Registry,
    pub(crate) grid: WalkGrid,
    pub(crate) pathfinder: Box<dyn Pathfinder>,
    pub(crate) rng: GameRng,
    pub(crate) turn: u32,
    kills: u32,
    chests_opened: u32,
    pub(crate) combo: ComboTracker,
    game_over: Option<GameOverReason>,

    // Per-turn buffers.
    pub(crate) events: Vec<Event>,
    /// Monster attacks as (monster, player).
    pub(crate) monster_hits: Vec<(Entity, Entity)>,
    /// Player attacks as (attacker, target).
    player_hits: Vec<(Entity, Entity)>,
    outcomes: IndexMap<Entity, ActionOutcome>,
}

impl Runtime {
    /// Start a session on a map with the engine RNG seeded from `seed`.
    pub fn new(
        map: &DungeonMap,
        mode: GameMode,
        settings: Settings,
        seed: &(impl Hash + ?Sized),
    ) -> Result<Self> {
        if map.player_spawns().is_empty() {
            return Err(Error::NoPlayerSpawn);
        }

        let mut reg = Registry::default();
        let cycle = settings.trap_cycle.max(1);
        for group in map.traps() {
            for &pos in &group.locations {
                reg.add_trap(Trap::new(pos, group.loop_start % cycle));
            }
        }
        for &pos in map.chests() {
            reg.add_chest(Chest::new(pos));
        }
        for &pos in map.monster_spawns() {
            reg.add_spawner(Spawner::new(pos));
        }
        for &pos in map.monsters() {
            reg.add_monster(Monster::new(pos, settings.monster_hp));
        }

        let mut ret = Runtime {
            map: map.clone(),
            mode,
            settings,
            reg,
            grid: Default::default(),
            pathfinder: Box::new(AstarPathfinder),
            rng: srng(seed),
            turn: 0,
            kills: 0,
            chests_opened: 0,
            combo: Default::default(),
            game_over: None,
            events: Default::default(),
            monster_hits: Default::default(),
            player_hits: Default::default(),
            outcomes: Default::default(),
        };
        ret.rebuild_grid()?;

        log::info!("new {mode:?} session on map {:?}", map.name());
        Ok(ret)
    }

    /// Replace the engine random number generator.
    pub fn with_rng(mut self, rng: GameRng) -> Self {
        self.rng = rng;
        self
    }

    /// Replace the pathfinding service and rebuild the walk grid with it.
    pub fn with_pathfinder(
        mut self,
        pathfinder: impl Pathfinder + 'static,
    ) -> Result<Self> {
        self.pathfinder = Box::new(pathfinder);
        self.rebuild_grid()?;
        Ok(self)
    }

    pub fn map(&self) -> &DungeonMap {
        &self.map
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn registry(&self) -> &Registry {
        &self.reg
    }

    pub fn walk_grid(&self) -> &WalkGrid {
        &self.grid
    }

    /// Number of turns resolved so far.
    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn game_over(&self) -> Option<GameOverReason> {
        self.game_over
    }

    pub fn is_over(&self) -> bool {
        self.game_over.is_some()
    }

    pub fn player(&self, e: Entity) -> Option<&Player> {
        self.reg.players.get(&e)
    }

    pub fn living_players(&self) -> impl Iterator<Item = Entity> + '_ {
        self.reg.living_players().map(|(e, _)| e)
    }

    pub fn combo(&self) -> ComboTracker {
        self.combo
    }

    pub fn scores(&self) -> Scores {
        Scores {
            killed_monsters: self.kills,
            opened_chests: self.chests_opened,
            combo_score: self.combo.bonus,
            max_combo: self.combo.max_combo,
            turns: self.turn,
        }
    }

    /// Add a player on the next free player spawn.
    pub fn add_player(
        &mut self,
        name: impl Into<String>,
        team: u32,
    ) -> Result<Entity> {
        let spawns = self.map.player_spawns();
        let pos = match self.mode {
            GameMode::Solo if !self.reg.players.is_empty() => {
                return Err(Error::NoFreeSpawn)
            }
            GameMode::Solo => spawns.first(),
            GameMode::Coop | GameMode::Versus => {
                spawns.get(self.reg.players.len())
            }
        };
        let Some(&pos) = pos else {
            return Err(Error::NoFreeSpawn);
        };

        let name = name.into();
        let e = self.reg.add_player(Player::new(
            name.clone(),
            team,
            pos,
            self.settings.starting_inventory,
        ));
        log::info!("player {e} {name:?} of team {team} joined at {pos}");
        Ok(e)
    }

    /// Put a monster on the map outside the regular spawning cycle.
    pub fn place_monster(&mut self, pos: IVec2) -> Entity {
        let e = self
            .reg
            .add_monster(Monster::new(pos, self.settings.monster_hp));
        self.refresh_walk_cell(pos);
        e
    }

    /// Put an item in play as if someone had just used it.
    pub fn place_projectile(
        &mut self,
        kind: ItemKind,
        pos: IVec2,
        heading: Heading,
        owner: Option<Entity>,
    ) -> Entity {
        let e = self.reg.add_item(Projectile::new(
            kind,
            pos,
            heading,
            owner,
            self.settings.bomb_fuse,
        ));
        self.refresh_walk_cell(pos);
        e
    }

    /// Record a player's decision for the coming turn.
    ///
    /// Illegal actions are not errors, they are recorded as holding position
    /// and reported as `BadMovement` or `ItemMissing`. Accepted actions
    /// report `Moved` or `UsedItem`.
    pub fn submit(
        &mut self,
        player: Entity,
        action: Action,
    ) -> Result<ActionOutcome> {
        if self.is_over() {
            return Err(Error::SessionOver);
        }
        let p = self
            .reg
            .players
            .get(&player)
            .ok_or(Error::UnknownPlayer(player))?;
        if !p.alive {
            return Err(Error::DeadPlayer(player));
        }
        if p.has_decided() {
            return Err(Error::DuplicateDecision(player));
        }

        let check = self.check_action(p, action);
        let p = &mut self.reg.players[&player];
        match check {
            Ok(()) => {
                p.pending_move = Some(action.offset());
                p.selected_item = action.item();
                Ok(match action.item() {
                    Some(kind) => ActionOutcome::UsedItem(kind),
                    None => ActionOutcome::Moved,
                })
            }
            Err(outcome) => {
                log::debug!(
                    "player {player}: {action:?} rejected, {outcome:?}"
                );
                p.pending_move = Some(IVec2::ZERO);
                p.selected_item = None;
                self.outcomes.insert(player, outcome);
                Ok(outcome)
            }
        }
    }

    fn check_action(
        &self,
        p: &Player,
        action: Action,
    ) -> std::result::Result<(), ActionOutcome> {
        let offset = action.offset();
        if !self.settings.move_rule.allows(offset) {
            return Err(ActionOutcome::BadMovement);
        }

        let dest = p.pos + offset;
        if !self.map.is_walkable(dest)
            || self.reg.live_explosive_at(dest).is_some()
        {
            return Err(ActionOutcome::BadMovement);
        }

        if let Some(kind) = action.item() {
            if p.inventory.count(kind) == 0 {
                return Err(ActionOutcome::ItemMissing);
            }

            let heading = Heading::from_offset(offset).unwrap_or(p.heading);
            let aim = p.pos + heading.vec();
            if self.reg.player_at(aim).is_some()
                || self.reg.monster_at(aim).is_some()
                || self.reg.closed_chest_at(aim).is_some()
            {
                return Err(ActionOutcome::BadMovement);
            }
        }

        Ok(())
    }

    /// Every living player has a decision for the coming turn.
    pub fn all_decisions_present(&self) -> bool {
        self.reg.living_players().all(|(_, p)| p.has_decided())
    }

    /// Submit a set of decisions and resolve the turn.
    pub fn advance_turn_with(
        &mut self,
        moves: impl IntoIterator<Item = (Entity, Action)>,
    ) -> Result<TurnReport> {
        for (player, action) in moves {
            self.submit(player, action)?;
        }
        self.advance_turn()
    }

    /// Submit one player's action and resolve the turn if it was the last
    /// decision missing.
    ///
    /// Returns the final outcome of the action when the turn resolved, the
    /// submission result otherwise.
    pub fn execute(
        &mut self,
        player: Entity,
        action: Action,
    ) -> Result<ActionOutcome> {
        let submitted = self.submit(player, action)?;
        if !self.all_decisions_present() {
            return Ok(submitted);
        }
        let report = self.advance_turn()?;
        Ok(report.outcome_of(player).unwrap_or(submitted))
    }

    /// Resolve one turn from the submitted decisions.
    pub fn advance_turn(&mut self) -> Result<TurnReport> {
        if self.is_over() {
            return Err(Error::SessionOver);
        }
        if let Some((e, _)) =
            self.reg.living_players().find(|(_, p)| !p.has_decided())
        {
            return Err(Error::MissingDecision(e));
        }

        self.turn += 1;
        self.events.clear();
        self.monster_hits.clear();
        self.player_hits.clear();

        let proposals = self.propose();
        let verdicts = conflict::resolve(&proposals);
        self.commit_moves(&proposals, &verdicts);

        self.move_monsters()?;

        self.advance_bombs();
        self.advance_arrows();
        self.advance_traps();
        self.advance_chests();
        self.advance_spawners();
        self.trigger_spawners();

        self.apply_attacks();
        self.reg.remove_dead();

        let outcome = match self.check_game_over() {
            Some(reason) => {
                log::info!("game over on turn {}: {reason:?}", self.turn);
                self.game_over = Some(reason);
                TurnOutcome::GameOver(reason)
            }
            None => {
                self.rebuild_grid()?;
                if let Some((combo, bonus)) = self.combo.end_turn() {
                    log::debug!("combo of {combo} closed for {bonus} points");
                    self.events.push(Event::ComboClosed { combo, bonus });
                }
                TurnOutcome::Continuing
            }
        };

        let mut outcomes = std::mem::take(&mut self.outcomes);
        if outcome.is_over() {
            for o in outcomes.values_mut() {
                *o = ActionOutcome::GameOver;
            }
        }

        Ok(TurnReport {
            turn: self.turn,
            outcome,
            events: std::mem::take(&mut self.events),
            outcomes,
        })
    }

    /// Turn headings, put used items in play and bump into objects.
    fn propose(&mut self) -> Vec<Proposal> {
        let living: Vec<Entity> = self.living_players().collect();

        for &e in &living {
            let p = &mut self.reg.players[&e];
            if let Some(h) =
                Heading::from_offset(p.pending_move.unwrap_or_default())
            {
                p.heading = h;
            }
        }

        for &e in &living {
            let p = &self.reg.players[&e];
            let Some(kind) = p.selected_item else {
                continue;
            };
            // Arrows start flying from the user's own tile, explosives are
            // dropped in front.
            let pos = if kind.is_explosive() {
                p.pos + p.heading.vec()
            } else {
                p.pos
            };
            let heading = p.heading;

            let item = self.place_projectile(kind, pos, heading, Some(e));
            self.combo.mark_action();
            log::debug!("player {e} used {kind:?} at {pos}");
            self.events.push(Event::ItemUsed {
                player: e,
                item,
                kind,
                pos,
            });
            self.outcomes
                .entry(e)
                .or_insert(ActionOutcome::UsedItem(kind));
        }

        let mut ret = Vec::with_capacity(living.len());
        for e in living {
            let p = &self.reg.players[&e];
            let from = p.pos;
            let offset = p.pending_move.unwrap_or_default();
            // Items claim the tile they were aimed at.
            let dest = match p.selected_item {
                Some(_) => from + p.heading.vec(),
                None => from + offset,
            };
            let anchored = p.selected_item.is_some()
                || (offset != IVec2::ZERO && self.bump_object(e, dest));
            ret.push(Proposal {
                who: e,
                from,
                dest,
                anchored,
            });
        }
        ret
    }

    /// Interact with a chest or monster in the way, return whether there
    /// was something.
    fn bump_object(&mut self, player: Entity, dest: IVec2) -> bool {
        if let Some(chest) = self.reg.closed_chest_at(dest) {
            self.open_chest(player, chest);
            true
        } else if let Some(monster) = self.reg.monster_at(dest) {
            self.hit_monster(player, monster);
            true
        } else {
            false
        }
    }

    fn open_chest(&mut self, player: Entity, chest: Entity) {
        let c = &mut self.reg.chests[&chest];
        c.open(self.settings.chest_respawn);
        let pos = c.pos;

        self.chests_opened += 1;
        self.combo.add();
        self.refresh_walk_cell(pos);

        let loot = self.roll_loot();
        if let Some(kind) = loot {
            *self.reg.players[&player].inventory.count_mut(kind) += 1;
        }

        log::debug!("player {player} opened chest at {pos}, found {loot:?}");
        self.events.push(Event::ChestOpened {
            player,
            chest,
            loot,
        });
        self.outcomes.insert(player, ActionOutcome::OpenedChest);
    }

    fn roll_loot(&mut self) -> Option<ItemKind> {
        if self.rng.one_chance_in(self.settings.loot_nothing_one_in) {
            return None;
        }
        let kinds: Vec<ItemKind> = ItemKind::iter().collect();
        kinds.choose(&mut self.rng).copied()
    }

    fn hit_monster(&mut self, player: Entity, monster: Entity) {
        self.combo.mark_action();
        self.events.push(Event::MonsterHit { player, monster });

        let m = &mut self.reg.monsters[&monster];
        if !m.hit() {
            self.outcomes.insert(player, ActionOutcome::Blocked);
            return;
        }
        let pos = m.pos;

        self.kills += 1;
        self.combo.add();
        self.refresh_walk_cell(pos);
        log::debug!("player {player} slew monster {monster} at {pos}");
        self.events.push(Event::Killed {
            victim: monster,
            kind: EntityKind::Monster,
            cause: Cause::Melee,
            credit: Some(player),
        });
        self.outcomes
            .insert(player, ActionOutcome::Killed(EntityKind::Monster));
    }

    /// Write resolved positions and spend used items.
    fn commit_moves(&mut self, proposals: &[Proposal], verdicts: &[Verdict]) {
        for (prop, verdict) in proposals.iter().zip(verdicts) {
            let p = &mut self.reg.players[&prop.who];
            if verdict.moves() {
                p.pos = prop.dest;
            }
            if let Some(kind) = p.selected_item.take() {
                let n = p.inventory.count_mut(kind);
                *n = n.saturating_sub(1);
            }
            p.pending_move = None;

            let outcome = if let Some(target) = verdict.attack {
                self.player_hits.push((prop.who, target));
                ActionOutcome::Killed(EntityKind::Player)
            } else if verdict.moves() {
                ActionOutcome::Moved
            } else {
                ActionOutcome::Blocked
            };
            self.outcomes.entry(prop.who).or_insert(outcome);
        }
    }

    /// Land queued attacks whose attackers are still alive.
    fn apply_attacks(&mut self) {
        let monster_hits: Vec<(Entity, Entity)> =
            std::mem::take(&mut self.monster_hits)
                .into_iter()
                .filter(|(m, _)| {
                    self.reg.monsters.get(m).is_some_and(|m| m.alive)
                })
                .collect();
        for (monster, victim) in monster_hits {
            log::debug!("monster {monster} attacks player {victim}");
            self.kill(victim, EntityKind::Player, Cause::MonsterAttack, None);
        }

        // Attackers are checked before any player attack lands, so mutual
        // attacks both go through.
        let (player_hits, voided): (Vec<_>, Vec<_>) =
            std::mem::take(&mut self.player_hits)
                .into_iter()
                .partition(|(a, _)| {
                    self.reg.players.get(a).is_some_and(|p| p.alive)
                });
        for (attacker, _) in voided {
            self.outcomes.insert(attacker, ActionOutcome::Blocked);
        }
        for (attacker, target) in player_hits {
            self.combo.mark_action();
            self.events.push(Event::PlayerAttack { attacker, target });
            self.kill(target, EntityKind::Player, Cause::Melee, Some(attacker));
        }
    }

    /// Kill a living creature, return whether it was alive.
    ///
    /// Monster kills by players' weapons count towards the score and extend
    /// the combo when a player gets the credit.
    pub(crate) fn kill(
        &mut self,
        e: Entity,
        kind: EntityKind,
        cause: Cause,
        credit: Option<Entity>,
    ) -> bool {
        match kind {
            EntityKind::Player => {
                let Some(p) = self.reg.players.get_mut(&e) else {
                    return false;
                };
                if !p.alive {
                    return false;
                }
                p.alive = false;
                log::debug!("player {e} killed by {cause:?}");
            }
            EntityKind::Monster => {
                let Some(m) = self.reg.monsters.get_mut(&e) else {
                    return false;
                };
                if !m.alive {
                    return false;
                }
                m.alive = false;
                if cause.counts_as_kill() {
                    self.kills += 1;
                    if credit.is_some() {
                        self.combo.add();
                    }
                }
                log::debug!("monster {e} killed by {cause:?}");
            }
            EntityKind::Trap
            | EntityKind::Chest
            | EntityKind::Spawner
            | EntityKind::Item(_) => return false,
        }

        self.events.push(Event::Killed {
            victim: e,
            kind,
            cause,
            credit,
        });
        true
    }

    pub(crate) fn kill_creatures_at(
        &mut self,
        pos: IVec2,
        cause: Cause,
        credit: Option<Entity>,
    ) {
        let victims: Vec<(Entity, EntityKind)> =
            self.reg.creatures_at(pos).collect();
        for (e, kind) in victims {
            self.kill(e, kind, cause, credit);
        }
    }

    fn check_game_over(&self) -> Option<GameOverReason> {
        match self.mode {
            GameMode::Solo | GameMode::Coop => self
                .reg
                .players
                .iter()
                .find(|(_, p)| !p.alive)
                .map(|(&e, _)| GameOverReason::PlayerDied(e)),
            GameMode::Versus => {
                let teams: IndexSet<u32> =
                    self.reg.living_players().map(|(_, p)| p.team).collect();
                match teams.len() {
                    0 => Some(GameOverReason::Draw),
                    1 => teams.first().map(|&t| GameOverReason::TeamWon(t)),
                    _ => None,
                }
            }
        }
    }

    /// Monsters can path through the tile.
    fn is_open_for_monsters(&self, pos: IVec2) -> bool {
        self.map.is_walkable(pos)
            && self.reg.monster_at(pos).is_none()
            && self.reg.closed_chest_at(pos).is_none()
            && self.reg.live_explosive_at(pos).is_none()
    }

    pub(crate) fn refresh_walk_cell(&mut self, pos: IVec2) {
        let open = self.is_open_for_monsters(pos);
        self.grid.set(pos, open);
    }

    fn rebuild_grid(&mut self) -> Result<()> {
        let grid = self
            .pathfinder
            .rebuild(self.map.size(), &|p| self.is_open_for_monsters(p))
            .map_err(Error::Pathfinding)?;
        self.grid = grid;
        Ok(())
    }
}
