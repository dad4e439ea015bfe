//! Timed stationary dangers: traps, respawning chests and monster spawners.
use glam::IVec2;
use rand::{seq::SliceRandom, Rng};
use serde::{Deserialize, Serialize};

use crate::{prelude::*, Cause, Monster};

/// Floor trap that cycles through its phases and fires on the last one.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Trap {
    pub pos: IVec2,
    pub phase: u8,
}

impl Trap {
    pub fn new(pos: IVec2, phase: u8) -> Self {
        Trap { pos, phase }
    }

    /// Step the cycle, return whether the trap is armed afterwards.
    pub fn advance(&mut self, cycle: u8) -> bool {
        let cycle = cycle.max(1);
        self.phase = (self.phase + 1) % cycle;
        self.is_armed(cycle)
    }

    pub fn is_armed(&self, cycle: u8) -> bool {
        self.phase == cycle.max(1) - 1
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Chest {
    pub pos: IVec2,
    pub opened: bool,
    pub turns_until_respawn: u32,
    /// Opened during the current turn, the countdown starts next turn.
    #[serde(default)]
    pub just_opened: bool,
}

impl Chest {
    pub fn new(pos: IVec2) -> Self {
        Chest {
            pos,
            opened: false,
            turns_until_respawn: 0,
            just_opened: false,
        }
    }

    pub fn open(&mut self, respawn_delay: u32) {
        self.opened = true;
        self.just_opened = true;
        self.turns_until_respawn = respawn_delay;
    }

    /// Count down an open chest, return whether it closed on this step.
    pub fn advance(&mut self) -> bool {
        if !self.opened {
            return false;
        }
        if self.just_opened {
            self.just_opened = false;
            return false;
        }
        self.turns_until_respawn = self.turns_until_respawn.saturating_sub(1);
        if self.turns_until_respawn == 0 {
            self.opened = false;
            return true;
        }
        false
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Spawner {
    pub pos: IVec2,
    pub spawning: bool,
    pub turns_until_spawn: u32,
    /// Id reserved for the monster that will come out.
    pub held: Option<Entity>,
}

impl Spawner {
    pub fn new(pos: IVec2) -> Self {
        Spawner {
            pos,
            spawning: false,
            turns_until_spawn: 0,
            held: None,
        }
    }

    /// Count down, return the monster id when it's time to materialize.
    pub fn advance(&mut self) -> Option<Entity> {
        if !self.spawning {
            return None;
        }
        self.turns_until_spawn = self.turns_until_spawn.saturating_sub(1);
        if self.turns_until_spawn == 0 {
            self.spawning = false;
            return self.held.take();
        }
        None
    }
}

impl Runtime {
    pub(crate) fn advance_traps(&mut self) {
        let cycle = self.settings.trap_cycle;
        let fired: Vec<IVec2> = self
            .reg
            .traps
            .values_mut()
            .filter_map(|t| t.advance(cycle).then_some(t.pos))
            .collect();

        for pos in fired {
            self.kill_creatures_at(pos, Cause::Trap, None);
        }
    }

    pub(crate) fn advance_chests(&mut self) {
        let closed: Vec<IVec2> = self
            .reg
            .chests
            .values_mut()
            .filter_map(|c| c.advance().then_some(c.pos))
            .collect();

        for pos in closed {
            log::debug!("chest at {pos} respawned");
            self.kill_creatures_at(pos, Cause::Chest, None);
        }
    }

    pub(crate) fn advance_spawners(&mut self) {
        let ready: Vec<(Entity, IVec2, Entity)> = self
            .reg
            .spawners
            .iter_mut()
            .filter_map(|(&e, s)| s.advance().map(|m| (e, s.pos, m)))
            .collect();

        for (spawner, pos, monster) in ready {
            self.kill_creatures_at(pos, Cause::Spawn, None);
            self.reg
                .monsters
                .insert(monster, Monster::new(pos, self.settings.monster_hp));
            log::debug!("monster {monster} spawned at {pos}");
            self.events.push(Event::MonsterSpawned { spawner, monster });
        }
    }

    /// Start spawning monsters at a random subset of free spawners.
    pub(crate) fn trigger_spawners(&mut self) {
        if self.turn <= self.settings.spawn_warmup {
            return;
        }

        let mut free: Vec<Entity> = self
            .reg
            .spawners
            .iter()
            .filter(|(_, s)| !s.spawning && !self.reg.is_occupied(s.pos))
            .map(|(&e, _)| e)
            .collect();
        if free.is_empty() {
            return;
        }

        let most = self.turn.div_ceil(self.settings.spawn_period.max(1));
        let n = self.rng.gen_range(0..=most) as usize;
        free.shuffle(&mut self.rng);

        for spawner in free.into_iter().take(n) {
            let monster = self.reg.alloc();
            let delay = self.settings.spawn_delay;
            let s = &mut self.reg.spawners[&spawner];
            s.spawning = true;
            s.turns_until_spawn = delay;
            s.held = Some(monster);
            log::debug!("spawner {spawner} at {} is waking up", s.pos);
            self.events.push(Event::SpawnStarted { spawner, monster });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trap_fires_on_last_phase() {
        let mut t = Trap::new(IVec2::ZERO, 0);
        assert!(!t.advance(3));
        assert_eq!(t.phase, 1);
        assert!(t.advance(3));
        assert_eq!(t.phase, 2);
        assert!(!t.advance(3));
        assert_eq!(t.phase, 0);
    }

    #[test]
    fn chest_countdown() {
        let mut c = Chest::new(IVec2::ZERO);
        assert!(!c.advance());
        c.open(2);
        // Turn of opening.
        assert!(!c.advance());
        assert_eq!(c.turns_until_respawn, 2);
        assert!(!c.advance());
        assert!(c.opened);
        assert!(c.advance());
        assert!(!c.opened);
    }

    #[test]
    fn spawner_releases_held_monster_once() {
        let mut s = Spawner::new(IVec2::ZERO);
        s.spawning = true;
        s.turns_until_spawn = 2;
        s.held = Some(Entity(7));
        assert_eq!(s.advance(), None);
        assert_eq!(s.advance(), Some(Entity(7)));
        assert_eq!(s.advance(), None);
        assert!(!s.spawning);
    }
}
