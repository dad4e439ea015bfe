use thiserror::Error;

use crate::Entity;

/// Contract violations that stop a turn from being resolved.
///
/// Gameplay results like illegal moves are not errors, they're reported as
/// [`ActionOutcome`](crate::ActionOutcome) values.
#[derive(Error, Debug)]
pub enum Error {
    #[error("unknown player {0}")]
    UnknownPlayer(Entity),

    #[error("player {0} is dead")]
    DeadPlayer(Entity),

    #[error("session is already over")]
    SessionOver,

    #[error("living player {0} has not submitted an action")]
    MissingDecision(Entity),

    #[error("player {0} already submitted an action this turn")]
    DuplicateDecision(Entity),

    #[error("map has no player spawn")]
    NoPlayerSpawn,

    #[error("no free player spawn left")]
    NoFreeSpawn,

    #[error("pathfinding failed: {0:#}")]
    Pathfinding(anyhow::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
