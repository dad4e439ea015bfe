use glam::IVec2;
use serde::{Deserialize, Serialize};

use crate::TrapSpec;

/// Loadable authoring form of a dungeon map.
///
/// Entities can be given either as explicit coordinate lists or as glyphs
/// drawn into the floor rows:
///
/// | glyph | meaning |
/// |-------|---------|
/// | `' '` | void |
/// | `.` | ground |
/// | `#` | wall |
/// | `@` | player spawn |
/// | `m` | monster spawner |
/// | `0`, `1`, `2` | trap starting at that phase |
/// | `c` | chest |
/// | `M` | monster present at start |
///
/// Convert into a validated [`DungeonMap`](crate::DungeonMap) with
/// `TryFrom`.
#[derive(Clone, Default, Eq, PartialEq, Debug, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct MapSpec {
    pub name: String,
    pub floor: Vec<String>,
    pub player_spawns: Vec<IVec2>,
    pub monster_spawns: Vec<IVec2>,
    pub traps: Vec<TrapSpec>,
    pub chests: Vec<IVec2>,
    pub monsters: Vec<IVec2>,
}

impl MapSpec {
    /// Map with floor rows and everything else coming from glyphs.
    pub fn from_rows<S: AsRef<str>>(
        name: impl Into<String>,
        rows: impl IntoIterator<Item = S>,
    ) -> Self {
        MapSpec {
            name: name.into(),
            floor: rows.into_iter().map(|s| s.as_ref().to_owned()).collect(),
            ..Default::default()
        }
    }
}
