use std::path::Path;

use anyhow::{bail, Context};
use glam::{ivec2, IVec2};
use serde::{Deserialize, Serialize};
use util::{dijkstra_map, AsciiMap, HashSet, DIR_4};

use crate::{Floor, MapSpec};

/// Group of traps sharing a starting phase.
#[derive(Clone, Default, Eq, PartialEq, Debug, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct TrapSpec {
    pub loop_start: u8,
    pub locations: Vec<IVec2>,
}

/// Validated, read-only dungeon level.
#[derive(Clone, Default, Eq, PartialEq, Debug, Serialize, Deserialize)]
#[serde(try_from = "MapSpec", into = "MapSpec")]
pub struct DungeonMap {
    name: String,
    size: IVec2,
    floor: Vec<Floor>,
    player_spawns: Vec<IVec2>,
    monster_spawns: Vec<IVec2>,
    traps: Vec<TrapSpec>,
    chests: Vec<IVec2>,
    monsters: Vec<IVec2>,
}

impl DungeonMap {
    /// Load a map from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading map {}", path.display()))?;
        Self::from_json(&text)
            .with_context(|| format!("loading map {}", path.display()))
    }

    pub fn from_json(text: &str) -> anyhow::Result<Self> {
        let spec: MapSpec = serde_json::from_str(text)?;
        DungeonMap::try_from(spec)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn size(&self) -> IVec2 {
        self.size
    }

    pub fn contains(&self, pos: IVec2) -> bool {
        pos.cmpge(IVec2::ZERO).all() && pos.cmplt(self.size).all()
    }

    /// Floor at position, `None` when out of bounds.
    pub fn floor(&self, pos: IVec2) -> Option<Floor> {
        if !self.contains(pos) {
            return None;
        }
        self.floor
            .get((pos.y * self.size.x + pos.x) as usize)
            .copied()
    }

    /// Creatures can stand here.
    pub fn is_walkable(&self, pos: IVec2) -> bool {
        self.floor(pos).is_some_and(Floor::is_walkable)
    }

    /// Projectiles can pass through here.
    pub fn is_flyable(&self, pos: IVec2) -> bool {
        self.floor(pos).is_some_and(Floor::is_flyable)
    }

    pub fn player_spawns(&self) -> &[IVec2] {
        &self.player_spawns
    }

    pub fn monster_spawns(&self) -> &[IVec2] {
        &self.monster_spawns
    }

    pub fn traps(&self) -> &[TrapSpec] {
        &self.traps
    }

    pub fn chests(&self) -> &[IVec2] {
        &self.chests
    }

    /// Monsters that are already awake when a session starts.
    pub fn monsters(&self) -> &[IVec2] {
        &self.monsters
    }

    /// Log warnings about entities players can never walk to.
    fn check_reachability(&self) {
        let reachable: HashSet<IVec2> = dijkstra_map(
            |&p: &IVec2| {
                DIR_4
                    .into_iter()
                    .map(move |d| p + d)
                    .filter(move |&q| self.is_walkable(q))
            },
            self.player_spawns.iter().copied(),
        )
        .map(|(p, _)| p)
        .collect();

        for &p in &self.monster_spawns {
            if !reachable.contains(&p) {
                log::warn!(
                    "{}: monster spawner at {p} is unreachable",
                    self.name
                );
            }
        }
        for &p in &self.chests {
            if !reachable.contains(&p) {
                log::warn!("{}: chest at {p} is unreachable", self.name);
            }
        }
    }
}

fn add_unique(list: &mut Vec<IVec2>, pos: IVec2) {
    if !list.contains(&pos) {
        list.push(pos);
    }
}

impl TryFrom<MapSpec> for DungeonMap {
    type Error = anyhow::Error;

    fn try_from(spec: MapSpec) -> Result<Self, Self::Error> {
        let ascii = AsciiMap::from_rows(&spec.floor);
        let size = ascii.size();

        let mut ret = DungeonMap {
            name: spec.name,
            size,
            floor: vec![Floor::Void; (size.x * size.y) as usize],
            ..Default::default()
        };

        // Glyph traps, indexed by starting phase.
        let mut glyph_traps: [Vec<IVec2>; 3] = Default::default();

        for (pos, c) in ascii.iter() {
            let floor = match c {
                '@' => {
                    ret.player_spawns.push(pos);
                    Floor::Ground
                }
                'm' => {
                    ret.monster_spawns.push(pos);
                    Floor::Ground
                }
                '0' | '1' | '2' => {
                    glyph_traps[(c as u8 - b'0') as usize].push(pos);
                    Floor::Ground
                }
                'c' => {
                    ret.chests.push(pos);
                    Floor::Ground
                }
                'M' => {
                    ret.monsters.push(pos);
                    Floor::Ground
                }
                c => Floor::try_from(c)
                    .with_context(|| format!("{}: at {pos}", ret.name))?,
            };
            ret.floor[(pos.y * size.x + pos.x) as usize] = floor;
        }

        let on_ground = |ret: &DungeonMap, what: &str, pos: IVec2| {
            if ret.is_walkable(pos) {
                Ok(pos)
            } else {
                bail!("{}: {what} at {pos} is not on ground", ret.name)
            }
        };

        for p in spec.player_spawns {
            let p = on_ground(&ret, "player spawn", p)?;
            add_unique(&mut ret.player_spawns, p);
        }
        for p in spec.monster_spawns {
            let p = on_ground(&ret, "monster spawner", p)?;
            add_unique(&mut ret.monster_spawns, p);
        }
        for p in spec.chests {
            let p = on_ground(&ret, "chest", p)?;
            add_unique(&mut ret.chests, p);
        }
        for p in spec.monsters {
            let p = on_ground(&ret, "monster", p)?;
            add_unique(&mut ret.monsters, p);
        }

        let mut seen_traps = HashSet::default();
        for trap in spec.traps {
            let mut locations = Vec::new();
            for p in trap.locations {
                let p = on_ground(&ret, "trap", p)?;
                if seen_traps.insert(p) {
                    locations.push(p);
                }
            }
            if !locations.is_empty() {
                ret.traps.push(TrapSpec {
                    loop_start: trap.loop_start,
                    locations,
                });
            }
        }
        for (phase, glyphs) in glyph_traps.into_iter().enumerate() {
            let locations: Vec<IVec2> =
                glyphs.into_iter().filter(|&p| seen_traps.insert(p)).collect();
            if !locations.is_empty() {
                ret.traps.push(TrapSpec {
                    loop_start: phase as u8,
                    locations,
                });
            }
        }

        if ret.player_spawns.is_empty() {
            bail!("{}: map has no player spawn", ret.name);
        }

        ret.check_reachability();
        Ok(ret)
    }
}

impl From<DungeonMap> for MapSpec {
    fn from(map: DungeonMap) -> Self {
        let floor = (0..map.size.y)
            .map(|y| {
                (0..map.size.x)
                    .map(|x| {
                        char::from(map.floor(ivec2(x, y)).unwrap_or_default())
                    })
                    .collect()
            })
            .collect();

        MapSpec {
            name: map.name,
            floor,
            player_spawns: map.player_spawns,
            monster_spawns: map.monster_spawns,
            traps: map.traps,
            chests: map.chests,
            monsters: map.monsters,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn crypt() -> MapSpec {
        MapSpec::from_rows(
            "crypt",
            [
                "#######",
                "#@...c#",
                "#.#2#.#",
                "#..m..#",
                "#######",
            ],
        )
    }

    #[test]
    fn glyphs_become_entities() {
        let map = DungeonMap::try_from(crypt()).unwrap();
        assert_eq!(map.size(), ivec2(7, 5));
        assert_eq!(map.player_spawns(), &[ivec2(1, 1)]);
        assert_eq!(map.chests(), &[ivec2(5, 1)]);
        assert_eq!(map.monster_spawns(), &[ivec2(3, 3)]);
        assert_eq!(
            map.traps(),
            &[TrapSpec {
                loop_start: 2,
                locations: vec![ivec2(3, 2)]
            }]
        );
        // Entity glyphs stand on ground.
        assert!(map.is_walkable(ivec2(1, 1)));
        assert!(map.is_walkable(ivec2(3, 2)));
    }

    #[test]
    fn passability_queries() {
        let map = DungeonMap::try_from(MapSpec::from_rows(
            "gap",
            ["#####", "#@ .#", "#####"],
        ))
        .unwrap();

        assert!(map.is_walkable(ivec2(1, 1)));
        assert!(!map.is_walkable(ivec2(2, 1)));
        assert!(map.is_flyable(ivec2(2, 1)));
        assert!(!map.is_flyable(ivec2(0, 0)));
        assert!(!map.is_walkable(ivec2(-1, 1)));
        assert!(!map.is_flyable(ivec2(5, 1)));
        assert_eq!(map.floor(ivec2(9, 9)), None);
    }

    #[test]
    fn explicit_lists_merge_with_glyphs() {
        let mut spec = crypt();
        spec.player_spawns = vec![ivec2(1, 1), ivec2(1, 3)];
        spec.traps = vec![TrapSpec {
            loop_start: 0,
            locations: vec![ivec2(4, 3)],
        }];
        let map = DungeonMap::try_from(spec).unwrap();

        assert_eq!(map.player_spawns(), &[ivec2(1, 1), ivec2(1, 3)]);
        assert_eq!(map.traps().len(), 2);
        assert_eq!(map.traps()[0].loop_start, 0);
        assert_eq!(map.traps()[1].loop_start, 2);
    }

    #[test]
    fn bad_input_is_rejected() {
        let unknown = MapSpec::from_rows("x", ["#@?#"]);
        assert!(DungeonMap::try_from(unknown).is_err());

        let no_spawn = MapSpec::from_rows("x", ["#..#"]);
        assert!(DungeonMap::try_from(no_spawn).is_err());

        let mut in_wall = crypt();
        in_wall.chests.push(ivec2(0, 0));
        assert!(DungeonMap::try_from(in_wall).is_err());
    }

    #[test]
    fn json_round_trip() {
        let map = DungeonMap::try_from(crypt()).unwrap();
        let json = serde_json::to_string(&map).unwrap();
        let map2 = DungeonMap::from_json(&json).unwrap();
        assert_eq!(map, map2);
    }

    #[test]
    fn parses_authored_json() {
        let map = DungeonMap::from_json(
            r######"{
                "name": "hall",
                "floor": ["#####", "#...#", "#####"],
                "player-spawns": [[1, 1]],
                "chests": [[3, 1]],
                "traps": [{ "loop-start": 1, "locations": [[2, 1]] }]
            }"######,
        )
        .unwrap();
        assert_eq!(map.name(), "hall");
        assert_eq!(map.chests(), &[ivec2(3, 1)]);
        assert_eq!(map.traps()[0].loop_start, 1);
    }
}
