//! Players and monsters.
use glam::{ivec2, IVec2};
use serde::{Deserialize, Serialize};

use crate::ItemKind;

/// Facing of a creature or flight direction of an arrow.
#[derive(
    Copy, Clone, Default, Eq, PartialEq, Hash, Debug, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum Heading {
    Up,
    Down,
    Left,
    #[default]
    Right,
}

impl Heading {
    /// Heading for a step offset.
    ///
    /// The horizontal component is looked at first and a vertical component
    /// overrides it, so a diagonal step faces up or down. Returns `None` for
    /// the zero offset.
    pub fn from_offset(offset: IVec2) -> Option<Heading> {
        let mut ret = None;
        if offset.x > 0 {
            ret = Some(Heading::Right);
        }
        if offset.x < 0 {
            ret = Some(Heading::Left);
        }
        if offset.y > 0 {
            ret = Some(Heading::Down);
        }
        if offset.y < 0 {
            ret = Some(Heading::Up);
        }
        ret
    }

    pub fn vec(self) -> IVec2 {
        match self {
            Heading::Up => ivec2(0, -1),
            Heading::Down => ivec2(0, 1),
            Heading::Left => ivec2(-1, 0),
            Heading::Right => ivec2(1, 0),
        }
    }

    pub fn opposite(self) -> Heading {
        match self {
            Heading::Up => Heading::Down,
            Heading::Down => Heading::Up,
            Heading::Left => Heading::Right,
            Heading::Right => Heading::Left,
        }
    }
}

#[derive(
    Copy, Clone, Default, Eq, PartialEq, Hash, Debug, Serialize, Deserialize,
)]
#[serde(default)]
pub struct Inventory {
    pub arrow: u32,
    pub bomb: u32,
    pub dynamite: u32,
}

impl Inventory {
    pub fn new(arrow: u32, bomb: u32, dynamite: u32) -> Self {
        Inventory {
            arrow,
            bomb,
            dynamite,
        }
    }

    pub fn count(&self, kind: ItemKind) -> u32 {
        match kind {
            ItemKind::Arrow => self.arrow,
            ItemKind::Bomb => self.bomb,
            ItemKind::Dynamite => self.dynamite,
        }
    }

    pub fn count_mut(&mut self, kind: ItemKind) -> &mut u32 {
        match kind {
            ItemKind::Arrow => &mut self.arrow,
            ItemKind::Bomb => &mut self.bomb,
            ItemKind::Dynamite => &mut self.dynamite,
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Player {
    pub name: String,
    pub team: u32,
    pub pos: IVec2,
    pub alive: bool,
    pub heading: Heading,
    pub inventory: Inventory,
    /// Item being used this turn.
    pub selected_item: Option<ItemKind>,
    /// Offset submitted for this turn, cleared once the turn resolves.
    pub pending_move: Option<IVec2>,
}

impl Player {
    pub fn new(
        name: impl Into<String>,
        team: u32,
        pos: IVec2,
        inventory: Inventory,
    ) -> Self {
        Player {
            name: name.into(),
            team,
            pos,
            alive: true,
            heading: Default::default(),
            inventory,
            selected_item: None,
            pending_move: None,
        }
    }

    pub fn has_decided(&self) -> bool {
        self.pending_move.is_some()
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Monster {
    pub pos: IVec2,
    pub heading: Heading,
    pub hp: i32,
    pub alive: bool,
}

impl Monster {
    pub fn new(pos: IVec2, hp: i32) -> Self {
        Monster {
            pos,
            heading: Default::default(),
            hp,
            alive: true,
        }
    }

    /// Take one hit, return whether the monster died from it.
    pub fn hit(&mut self) -> bool {
        self.hp -= 1;
        if self.hp <= 0 {
            self.alive = false;
        }
        !self.alive
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck_macros::quickcheck;

    #[test]
    fn vertical_overrides_horizontal() {
        assert_eq!(Heading::from_offset(ivec2(1, 0)), Some(Heading::Right));
        assert_eq!(Heading::from_offset(ivec2(-1, 0)), Some(Heading::Left));
        assert_eq!(Heading::from_offset(ivec2(1, -1)), Some(Heading::Up));
        assert_eq!(Heading::from_offset(ivec2(-1, 1)), Some(Heading::Down));
        assert_eq!(Heading::from_offset(IVec2::ZERO), None);
    }

    #[quickcheck]
    fn heading_vec_round_trip(x: i8, y: i8) -> bool {
        let v = ivec2(x.signum() as i32, y.signum() as i32);
        match Heading::from_offset(v) {
            None => v == IVec2::ZERO,
            Some(h) => {
                Heading::from_offset(h.vec()) == Some(h)
                    && h.opposite().vec() == -h.vec()
            }
        }
    }

    #[test]
    fn monster_dies_at_zero_hp() {
        let mut m = Monster::new(IVec2::ZERO, 2);
        assert!(!m.hit());
        assert!(m.alive);
        assert!(m.hit());
        assert!(!m.alive);
    }
}
