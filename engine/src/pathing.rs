//! Grid pathfinding used for monster movement.
use glam::IVec2;
use pathfinding::prelude::astar;
use serde::{Deserialize, Serialize};
use util::{VecExt, DIR_4};

/// Which tiles monsters may currently walk through.
#[derive(Clone, Default, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct WalkGrid {
    size: IVec2,
    cells: Vec<bool>,
}

impl WalkGrid {
    pub fn new(size: IVec2, walkable: &dyn Fn(IVec2) -> bool) -> Self {
        let mut cells = Vec::with_capacity((size.x * size.y).max(0) as usize);
        for y in 0..size.y {
            for x in 0..size.x {
                cells.push(walkable(IVec2::new(x, y)));
            }
        }
        WalkGrid { size, cells }
    }

    pub fn size(&self) -> IVec2 {
        self.size
    }

    fn idx(&self, pos: IVec2) -> Option<usize> {
        (pos.cmpge(IVec2::ZERO).all() && pos.cmplt(self.size).all())
            .then(|| (pos.y * self.size.x + pos.x) as usize)
    }

    pub fn is_walkable(&self, pos: IVec2) -> bool {
        self.idx(pos).is_some_and(|i| self.cells[i])
    }

    /// Update a single cell. Out of bounds positions are ignored.
    pub fn set(&mut self, pos: IVec2, walkable: bool) {
        if let Some(i) = self.idx(pos) {
            self.cells[i] = walkable;
        }
    }
}

/// Shortest path service the engine consults for monster moves.
///
/// Implementations must not keep state between calls beyond the grid they
/// hand out.
pub trait Pathfinder {
    /// Build a fresh grid from a walkability predicate.
    fn rebuild(
        &self,
        size: IVec2,
        walkable: &dyn Fn(IVec2) -> bool,
    ) -> anyhow::Result<WalkGrid>;

    /// Offset of the first step on a shortest path from `from` to `to`.
    ///
    /// The goal tile is always enterable, the start tile never needs to be
    /// walkable. Returns `None` when there's no path.
    fn next_step(
        &self,
        grid: &WalkGrid,
        from: IVec2,
        to: IVec2,
    ) -> anyhow::Result<Option<IVec2>>;
}

/// A* on 4-neighbourhoods with a taxicab heuristic.
#[derive(Copy, Clone, Default, Debug)]
pub struct AstarPathfinder;

impl Pathfinder for AstarPathfinder {
    fn rebuild(
        &self,
        size: IVec2,
        walkable: &dyn Fn(IVec2) -> bool,
    ) -> anyhow::Result<WalkGrid> {
        if size.min_element() < 0 {
            anyhow::bail!("bad grid size {size}");
        }
        Ok(WalkGrid::new(size, walkable))
    }

    fn next_step(
        &self,
        grid: &WalkGrid,
        from: IVec2,
        to: IVec2,
    ) -> anyhow::Result<Option<IVec2>> {
        if from == to {
            return Ok(None);
        }

        let path = astar(
            &from,
            |&a| {
                DIR_4
                    .into_iter()
                    .map(move |d| a + d)
                    .filter(move |&b| b == to || grid.is_walkable(b))
                    .map(|b| (b, 1))
            },
            |&a| (to - a).taxi_len(),
            |&a| a == to,
        );

        Ok(path.and_then(|(path, _)| path.get(1).map(|&step| step - from)))
    }
}
