//! Plain read-only view of a session.
use serde::{Deserialize, Serialize};
use util::IndexMap;
use world::DungeonMap;

use crate::{
    Chest, ComboTracker, Entity, GameMode, GameOverReason, Monster, Player,
    Projectile, Runtime, Scores, Spawner, Trap,
};

/// Session state at the end of a turn, for renderers, feature encoders and
/// statistics.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Snapshot {
    pub map: DungeonMap,
    pub mode: GameMode,
    pub turn: u32,
    pub players: IndexMap<Entity, Player>,
    pub monsters: IndexMap<Entity, Monster>,
    pub traps: IndexMap<Entity, Trap>,
    pub chests: IndexMap<Entity, Chest>,
    pub monster_spawns: IndexMap<Entity, Spawner>,
    pub items: IndexMap<Entity, Projectile>,
    pub combo: ComboTracker,
    pub score: Scores,
    pub game_over: Option<GameOverReason>,
}

impl Runtime {
    pub fn snapshot(&self) -> Snapshot {
        let reg = self.registry();
        Snapshot {
            map: self.map().clone(),
            mode: self.mode(),
            turn: self.turn(),
            players: reg.players.clone(),
            monsters: reg.monsters.clone(),
            traps: reg.traps.clone(),
            chests: reg.chests.clone(),
            monster_spawns: reg.spawners.clone(),
            items: reg.items.clone(),
            combo: self.combo(),
            score: self.scores(),
            game_over: self.game_over(),
        }
    }
}
