//! Static dungeon geometry and map loading.

mod floor;
pub use floor::Floor;

mod dungeon;
pub use dungeon::{DungeonMap, TrapSpec};

mod map_spec;
pub use map_spec::MapSpec;
