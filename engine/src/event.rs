//! What happened during a turn.
use glam::IVec2;
use serde::{Deserialize, Serialize};
use util::IndexMap;

use crate::{ActionOutcome, Entity, EntityKind, ItemKind};

#[derive(Copy, Clone, Eq, PartialEq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Cause {
    Melee,
    Arrow,
    Explosion,
    Trap,
    Chest,
    Spawn,
    MonsterAttack,
}

impl Cause {
    /// Monster kills by this cause count towards the kill counter.
    pub fn counts_as_kill(self) -> bool {
        matches!(self, Cause::Melee | Cause::Arrow | Cause::Explosion)
    }
}

#[derive(Clone, Eq, PartialEq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Event {
    ItemUsed {
        player: Entity,
        item: Entity,
        kind: ItemKind,
        pos: IVec2,
    },
    ChestOpened {
        player: Entity,
        chest: Entity,
        loot: Option<ItemKind>,
    },
    MonsterHit {
        player: Entity,
        monster: Entity,
    },
    Killed {
        victim: Entity,
        kind: EntityKind,
        cause: Cause,
        /// Player credited for the kill.
        credit: Option<Entity>,
    },
    Exploded {
        item: Entity,
        kind: ItemKind,
        tiles: Vec<IVec2>,
    },
    SpawnStarted {
        spawner: Entity,
        monster: Entity,
    },
    MonsterSpawned {
        spawner: Entity,
        monster: Entity,
    },
    PlayerAttack {
        attacker: Entity,
        target: Entity,
    },
    ComboClosed {
        combo: u32,
        bonus: u32,
    },
}

#[derive(Copy, Clone, Eq, PartialEq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GameOverReason {
    /// A player died in a solo or coop game.
    PlayerDied(Entity),
    /// Only this team has living players left.
    TeamWon(u32),
    /// Every team was wiped out.
    Draw,
}

#[derive(Copy, Clone, Eq, PartialEq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TurnOutcome {
    Continuing,
    GameOver(GameOverReason),
}

impl TurnOutcome {
    pub fn is_over(&self) -> bool {
        matches!(self, TurnOutcome::GameOver(_))
    }
}

/// Everything an observer needs to know about a resolved turn.
#[derive(Clone, Eq, PartialEq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct TurnReport {
    pub turn: u32,
    pub outcome: TurnOutcome,
    pub events: Vec<Event>,
    /// Result of each player's action this turn.
    pub outcomes: IndexMap<Entity, ActionOutcome>,
}

impl TurnReport {
    pub fn outcome_of(&self, player: Entity) -> Option<ActionOutcome> {
        self.outcomes.get(&player).copied()
    }

    /// Entities killed this turn, in the order they died.
    pub fn deaths(&self) -> impl Iterator<Item = (Entity, EntityKind)> + '_ {
        self.events.iter().filter_map(|e| match *e {
            Event::Killed { victim, kind, .. } => Some((victim, kind)),
            _ => None,
        })
    }
}
