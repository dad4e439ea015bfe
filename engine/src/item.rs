//! Items players can use and the projectiles they turn into.
use glam::{ivec2, IVec2};
use serde::{Deserialize, Serialize};
use strum::EnumIter;

use crate::{Entity, Heading};

#[derive(
    Copy,
    Clone,
    Eq,
    PartialEq,
    Ord,
    PartialOrd,
    Hash,
    Debug,
    Serialize,
    Deserialize,
    EnumIter,
)]
#[serde(rename_all = "kebab-case")]
pub enum ItemKind {
    Arrow,
    Bomb,
    Dynamite,
}

const BOMB_BLAST: [IVec2; 5] = [
    ivec2(0, 0),
    ivec2(0, -1),
    ivec2(1, 0),
    ivec2(0, 1),
    ivec2(-1, 0),
];

const DYNAMITE_BLAST: [IVec2; 9] = [
    ivec2(0, 0),
    ivec2(0, -1),
    ivec2(0, -2),
    ivec2(1, 0),
    ivec2(2, 0),
    ivec2(0, 1),
    ivec2(0, 2),
    ivec2(-1, 0),
    ivec2(-2, 0),
];

impl ItemKind {
    /// Item explodes on a fuse instead of flying.
    pub fn is_explosive(self) -> bool {
        matches!(self, ItemKind::Bomb | ItemKind::Dynamite)
    }

    /// Blast offsets relative to the explosion center.
    pub fn blast_pattern(self) -> &'static [IVec2] {
        match self {
            ItemKind::Arrow => &[],
            ItemKind::Bomb => &BOMB_BLAST,
            ItemKind::Dynamite => &DYNAMITE_BLAST,
        }
    }
}

/// An item in play on the map.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Projectile {
    pub kind: ItemKind,
    pub pos: IVec2,
    pub heading: Heading,
    /// Player credited for whatever the item kills.
    pub owner: Option<Entity>,
    /// Turns until detonation, unused by arrows.
    pub fuse: u32,
    pub alive: bool,
}

impl Projectile {
    pub fn new(
        kind: ItemKind,
        pos: IVec2,
        heading: Heading,
        owner: Option<Entity>,
        fuse: u32,
    ) -> Self {
        Projectile {
            kind,
            pos,
            heading,
            owner,
            fuse: if kind.is_explosive() { fuse } else { 0 },
            alive: true,
        }
    }

    pub fn is_live_explosive(&self) -> bool {
        self.alive && self.kind.is_explosive()
    }

    /// Tiles covered by the explosion of this item.
    pub fn blast_tiles(&self) -> impl Iterator<Item = IVec2> + '_ {
        self.kind.blast_pattern().iter().map(move |&d| self.pos + d)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use util::VecExt;

    #[test]
    fn blast_shapes() {
        // Plus shapes centered on the bomb.
        assert!(BOMB_BLAST.iter().all(|d| d.taxi_len() <= 1));
        assert!(DYNAMITE_BLAST.iter().all(|d| d.x == 0 || d.y == 0));
        assert!(DYNAMITE_BLAST.iter().all(|d| d.taxi_len() <= 2));
        assert!(ItemKind::Arrow.blast_pattern().is_empty());
    }

    #[test]
    fn arrows_have_no_fuse() {
        let a =
            Projectile::new(ItemKind::Arrow, IVec2::ZERO, Heading::Up, None, 4);
        assert_eq!(a.fuse, 0);
        assert!(!a.is_live_explosive());

        let b =
            Projectile::new(ItemKind::Bomb, ivec2(2, 2), Heading::Up, None, 4);
        assert_eq!(b.fuse, 4);
        assert!(b.is_live_explosive());
        assert_eq!(b.blast_tiles().count(), 5);
        assert!(b.blast_tiles().any(|p| p == ivec2(2, 1)));
    }
}
