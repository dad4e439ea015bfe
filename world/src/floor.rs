use serde::{Deserialize, Serialize};

/// Cell kinds of the static dungeon floor.
#[derive(
    Copy, Clone, Default, Eq, PartialEq, Hash, Debug, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum Floor {
    /// Nothing there, creatures can't walk but projectiles fly over it.
    #[default]
    Void,
    Ground,
    Wall,
}

use Floor::*;

impl Floor {
    pub fn is_walkable(self) -> bool {
        self == Ground
    }

    pub fn is_flyable(self) -> bool {
        self != Wall
    }
}

impl TryFrom<char> for Floor {
    type Error = anyhow::Error;

    fn try_from(value: char) -> Result<Self, Self::Error> {
        match value {
            ' ' => Ok(Void),
            '.' => Ok(Ground),
            '#' => Ok(Wall),
            _ => Err(anyhow::anyhow!("invalid floor glyph {value:?}")),
        }
    }
}

impl From<Floor> for char {
    fn from(value: Floor) -> Self {
        match value {
            Void => ' ',
            Ground => '.',
            Wall => '#',
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn glyphs() {
        for f in [Void, Ground, Wall] {
            assert_eq!(Floor::try_from(char::from(f)).ok(), Some(f));
        }
        assert!(Floor::try_from('x').is_err());
    }

    #[test]
    fn passability() {
        assert!(Ground.is_walkable() && Ground.is_flyable());
        assert!(!Void.is_walkable() && Void.is_flyable());
        assert!(!Wall.is_walkable() && !Wall.is_flyable());
    }
}
