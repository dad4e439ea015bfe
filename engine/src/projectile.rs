//! Flight and detonation of used items.
use std::collections::VecDeque;

use crate::{prelude::*, Cause};

impl Runtime {
    /// Burn bomb fuses and detonate the ones that run out.
    pub(crate) fn advance_bombs(&mut self) {
        let bombs: Vec<Entity> = self
            .reg
            .items
            .iter()
            .filter(|(_, i)| i.kind.is_explosive())
            .map(|(&e, _)| e)
            .collect();

        for e in bombs {
            let bomb = &mut self.reg.items[&e];
            // Might have been set off by an earlier bomb this turn.
            if !bomb.alive {
                continue;
            }
            bomb.fuse = bomb.fuse.saturating_sub(1);
            if bomb.fuse == 0 {
                self.detonate(e);
            }
        }
    }

    /// Blow up an explosive and everything its blast reaches.
    ///
    /// Other explosives in the blast go off in the same turn. Uses a work
    /// queue so arbitrarily long chains don't recurse.
    pub(crate) fn detonate(&mut self, item: Entity) {
        let mut queue = VecDeque::from([item]);

        while let Some(e) = queue.pop_front() {
            let Some(bomb) = self.reg.items.get_mut(&e) else {
                continue;
            };
            if !bomb.is_live_explosive() {
                continue;
            }
            bomb.alive = false;

            let (kind, owner, center) = (bomb.kind, bomb.owner, bomb.pos);
            let tiles: Vec<IVec2> = bomb
                .blast_tiles()
                .filter(|&p| self.map.contains(p))
                .collect();
            log::debug!("{kind:?} {e} exploded at {center}");
            self.events.push(Event::Exploded {
                item: e,
                kind,
                tiles: tiles.clone(),
            });

            for pos in tiles {
                self.kill_creatures_at(pos, Cause::Explosion, owner);

                let caught: Vec<Entity> = self
                    .reg
                    .items
                    .iter()
                    .filter(|(_, i)| i.alive && i.pos == pos)
                    .map(|(&e, _)| e)
                    .collect();
                for other in caught {
                    if self.reg.items[&other].kind.is_explosive() {
                        queue.push_back(other);
                    } else {
                        self.reg.items[&other].alive = false;
                    }
                }
            }
        }
    }

    /// Move arrows one tile and resolve what they hit.
    pub(crate) fn advance_arrows(&mut self) {
        let arrows: Vec<Entity> = self
            .reg
            .items
            .iter()
            .filter(|(_, i)| i.kind == ItemKind::Arrow)
            .map(|(&e, _)| e)
            .collect();

        for e in arrows {
            let arrow = &self.reg.items[&e];
            if !arrow.alive {
                continue;
            }
            let (pos, heading, owner) = (arrow.pos, arrow.heading, arrow.owner);

            // Something walking right into the arrow on its own tile.
            let facing = self.reg.creatures_at(pos).find(|&(c, kind)| {
                self.creature_heading(c, kind) == Some(heading.opposite())
            });
            if let Some((victim, kind)) = facing {
                self.reg.items[&e].alive = false;
                self.kill(victim, kind, Cause::Arrow, owner);
                continue;
            }

            let pos = pos + heading.vec();
            self.reg.items[&e].pos = pos;

            if !self.map.is_flyable(pos) {
                self.reg.items[&e].alive = false;
                continue;
            }

            let hit = self.reg.creatures_at(pos).next();
            if let Some((victim, kind)) = hit {
                self.reg.items[&e].alive = false;
                self.kill(victim, kind, Cause::Arrow, owner);
                continue;
            }

            let hit_item = self
                .reg
                .items
                .iter()
                .find(|&(&i, p)| i != e && p.alive && p.pos == pos)
                .map(|(&i, p)| (i, p.kind));
            if let Some((other, kind)) = hit_item {
                self.reg.items[&e].alive = false;
                if kind.is_explosive() {
                    self.detonate(other);
                } else {
                    self.reg.items[&other].alive = false;
                }
            }
        }
    }

    fn creature_heading(&self, e: Entity, kind: EntityKind) -> Option<Heading> {
        match kind {
            EntityKind::Player => self.reg.players.get(&e).map(|p| p.heading),
            EntityKind::Monster => self.reg.monsters.get(&e).map(|m| m.heading),
            _ => None,
        }
    }
}
