pub use crate::{
    Action, ActionOutcome, Entity, EntityKind, Error, Event, GameMode,
    Heading, ItemKind, Result, Runtime, Settings,
};
pub use glam::{ivec2, IVec2};
pub use util::{HashMap, HashSet, IndexMap, IndexSet, VecExt, DIR_4};
