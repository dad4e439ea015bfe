//! Player decisions and how they turned out.
use glam::IVec2;
use serde::{Deserialize, Serialize};

use crate::{EntityKind, ItemKind};

#[derive(Copy, Clone, Eq, PartialEq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Action {
    /// Step by an offset, bumping into whatever is there.
    Move(IVec2),
    /// Use an item aimed along an offset.
    UseItem(ItemKind, IVec2),
}

impl Action {
    pub fn offset(&self) -> IVec2 {
        match *self {
            Action::Move(d) | Action::UseItem(_, d) => d,
        }
    }

    pub fn item(&self) -> Option<ItemKind> {
        match *self {
            Action::Move(_) => None,
            Action::UseItem(kind, _) => Some(kind),
        }
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActionOutcome {
    /// Action was valid and resolved as a step, or for a pending decision,
    /// the step was accepted.
    Moved,
    /// Valid move that another player's move got in the way of.
    Blocked,
    /// The action killed something.
    Killed(EntityKind),
    /// Illegal action, the player held position instead.
    BadMovement,
    /// The game ended on this turn.
    GameOver,
    /// Tried to use an item the player doesn't have.
    ItemMissing,
    OpenedChest,
    UsedItem(ItemKind),
}
