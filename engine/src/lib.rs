//! Turn resolution engine for a multiplayer dungeon crawl.

mod action;
pub use action::{Action, ActionOutcome};

mod ai;

pub mod conflict;

mod entity;
pub use entity::{Entity, EntityKind};

mod error;
pub use error::{Error, Result};

mod event;
pub use event::{Cause, Event, GameOverReason, TurnOutcome, TurnReport};

mod hazard;
pub use hazard::{Chest, Spawner, Trap};

mod item;
pub use item::{ItemKind, Projectile};

mod mob;
pub use mob::{Heading, Inventory, Monster, Player};

mod pathing;
pub use pathing::{AstarPathfinder, Pathfinder, WalkGrid};

pub mod prelude;

mod projectile;

mod registry;
pub use registry::Registry;

mod runtime;
pub use runtime::Runtime;

mod score;
pub use score::{combo_bonus, ComboTracker, Scores};

mod settings;
pub use settings::{GameMode, MoveRule, Settings};

mod snapshot;
pub use snapshot::Snapshot;
