//! Typed containers for everything that lives on the map.
use glam::IVec2;
use serde::{Deserialize, Serialize};
use util::IndexMap;

use crate::{
    Chest, Entity, EntityKind, Monster, Player, Projectile, Spawner, Trap,
};

/// Arena of session entities addressed by stable ids.
///
/// Every table preserves insertion order, and that order is the order
/// entities are processed in during a turn.
#[derive(Clone, Default, Debug, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Registry {
    next_id: u32,
    pub players: IndexMap<Entity, Player>,
    pub monsters: IndexMap<Entity, Monster>,
    pub traps: IndexMap<Entity, Trap>,
    pub chests: IndexMap<Entity, Chest>,
    pub spawners: IndexMap<Entity, Spawner>,
    pub items: IndexMap<Entity, Projectile>,
}

impl Registry {
    /// Reserve a fresh entity id.
    pub fn alloc(&mut self) -> Entity {
        let ret = Entity(self.next_id);
        self.next_id += 1;
        ret
    }

    pub fn add_player(&mut self, player: Player) -> Entity {
        let e = self.alloc();
        self.players.insert(e, player);
        e
    }

    pub fn add_monster(&mut self, monster: Monster) -> Entity {
        let e = self.alloc();
        self.monsters.insert(e, monster);
        e
    }

    pub fn add_trap(&mut self, trap: Trap) -> Entity {
        let e = self.alloc();
        self.traps.insert(e, trap);
        e
    }

    pub fn add_chest(&mut self, chest: Chest) -> Entity {
        let e = self.alloc();
        self.chests.insert(e, chest);
        e
    }

    pub fn add_spawner(&mut self, spawner: Spawner) -> Entity {
        let e = self.alloc();
        self.spawners.insert(e, spawner);
        e
    }

    pub fn add_item(&mut self, item: Projectile) -> Entity {
        let e = self.alloc();
        self.items.insert(e, item);
        e
    }

    /// Kind of a registered entity.
    pub fn kind(&self, e: Entity) -> Option<EntityKind> {
        if self.players.contains_key(&e) {
            Some(EntityKind::Player)
        } else if self.monsters.contains_key(&e) {
            Some(EntityKind::Monster)
        } else if self.traps.contains_key(&e) {
            Some(EntityKind::Trap)
        } else if self.chests.contains_key(&e) {
            Some(EntityKind::Chest)
        } else if self.spawners.contains_key(&e) {
            Some(EntityKind::Spawner)
        } else {
            self.items.get(&e).map(|i| EntityKind::Item(i.kind))
        }
    }

    pub fn living_players(&self) -> impl Iterator<Item = (Entity, &Player)> {
        self.players.iter().filter(|(_, p)| p.alive).map(|(&e, p)| (e, p))
    }

    pub fn player_at(&self, pos: IVec2) -> Option<Entity> {
        self.living_players().find(|(_, p)| p.pos == pos).map(|(e, _)| e)
    }

    pub fn monster_at(&self, pos: IVec2) -> Option<Entity> {
        self.monsters
            .iter()
            .find(|(_, m)| m.alive && m.pos == pos)
            .map(|(&e, _)| e)
    }

    pub fn closed_chest_at(&self, pos: IVec2) -> Option<Entity> {
        self.chests
            .iter()
            .find(|(_, c)| !c.opened && c.pos == pos)
            .map(|(&e, _)| e)
    }

    /// Bomb or dynamite that hasn't gone off yet.
    pub fn live_explosive_at(&self, pos: IVec2) -> Option<Entity> {
        self.items
            .iter()
            .find(|(_, i)| i.is_live_explosive() && i.pos == pos)
            .map(|(&e, _)| e)
    }

    /// Living players and monsters standing on a tile, players first.
    pub fn creatures_at(
        &self,
        pos: IVec2,
    ) -> impl Iterator<Item = (Entity, EntityKind)> + '_ {
        let players = self
            .players
            .iter()
            .filter(move |(_, p)| p.alive && p.pos == pos)
            .map(|(&e, _)| (e, EntityKind::Player));
        let monsters = self
            .monsters
            .iter()
            .filter(move |(_, m)| m.alive && m.pos == pos)
            .map(|(&e, _)| (e, EntityKind::Monster));
        players.chain(monsters)
    }

    /// Whether any creature with a body stands on the tile.
    pub fn is_occupied(&self, pos: IVec2) -> bool {
        self.creatures_at(pos).next().is_some()
    }

    /// Drop dead monsters and spent items from the active tables.
    ///
    /// Players are never removed, dead ones stay on the roster.
    pub fn remove_dead(&mut self) {
        self.monsters.retain(|_, m| m.alive);
        self.items.retain(|_, i| i.alive);
    }
}

#[cfg(test)]
mod tests {
    use glam::ivec2;

    use super::*;
    use crate::{Heading, Inventory, ItemKind};

    #[test]
    fn ids_are_unique_and_ordered() {
        let mut reg = Registry::default();
        let a = reg.add_player(Player::new(
            "a",
            1,
            ivec2(1, 1),
            Inventory::default(),
        ));
        let m = reg.add_monster(Monster::new(ivec2(2, 1), 1));
        let c = reg.add_chest(Chest::new(ivec2(3, 1)));
        assert!(a < m && m < c);
        assert_eq!(reg.kind(a), Some(EntityKind::Player));
        assert_eq!(reg.kind(m), Some(EntityKind::Monster));
        assert_eq!(reg.kind(c), Some(EntityKind::Chest));
        assert_eq!(reg.kind(Entity(99)), None);
    }

    #[test]
    fn dead_entities_are_not_on_tiles() {
        let mut reg = Registry::default();
        let m = reg.add_monster(Monster::new(ivec2(2, 1), 1));
        let b = reg.add_item(Projectile::new(
            ItemKind::Bomb,
            ivec2(4, 4),
            Heading::Up,
            None,
            4,
        ));
        assert_eq!(reg.monster_at(ivec2(2, 1)), Some(m));
        assert_eq!(reg.live_explosive_at(ivec2(4, 4)), Some(b));

        reg.monsters[&m].alive = false;
        reg.items[&b].alive = false;
        assert_eq!(reg.monster_at(ivec2(2, 1)), None);
        assert!(!reg.is_occupied(ivec2(2, 1)));
        assert_eq!(reg.live_explosive_at(ivec2(4, 4)), None);

        reg.remove_dead();
        assert!(reg.monsters.is_empty());
        assert!(reg.items.is_empty());
    }
}
