//! Monsters hunting players.
use crate::{prelude::*, Error};

impl Runtime {
    /// Nearest living player, earlier players win ties.
    pub(crate) fn nearest_player(&self, pos: IVec2) -> Option<(Entity, IVec2)> {
        let mut ret: Option<(Entity, IVec2)> = None;
        for (e, p) in self.reg.living_players() {
            let closer = ret
                .map_or(true, |(_, q)| pos.dist_sq(&p.pos) < pos.dist_sq(&q));
            if closer {
                ret = Some((e, p.pos));
            }
        }
        ret
    }

    /// Move every living monster a step towards its target.
    ///
    /// Monsters that would step on a player queue an attack instead. The
    /// walk grid is updated after each move so monsters planning later see
    /// where earlier ones went.
    pub(crate) fn move_monsters(&mut self) -> Result<()> {
        let monsters: Vec<Entity> = self.reg.monsters.keys().copied().collect();

        for m in monsters {
            let pos = match self.reg.monsters.get(&m) {
                Some(monster) if monster.alive => monster.pos,
                _ => continue,
            };
            let Some((_, target)) = self.nearest_player(pos) else {
                break;
            };

            let Some(step) = self
                .pathfinder
                .next_step(&self.grid, pos, target)
                .map_err(Error::Pathfinding)?
            else {
                continue;
            };
            if !step.is_adjacent() {
                return Err(Error::Pathfinding(anyhow::anyhow!(
                    "non-adjacent step {step} from {pos}"
                )));
            }

            let dest = pos + step;
            let victim = self.reg.player_at(dest);
            let monster = &mut self.reg.monsters[&m];
            if let Some(h) = Heading::from_offset(step) {
                monster.heading = h;
            }

            if let Some(victim) = victim {
                self.monster_hits.push((m, victim));
            } else {
                monster.pos = dest;
                self.refresh_walk_cell(pos);
                self.refresh_walk_cell(dest);
            }
        }

        Ok(())
    }
}
