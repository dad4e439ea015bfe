//! Entity identifiers.
use std::{fmt, str::FromStr};

use anyhow::bail;
use derive_more::Deref;
use serde::{Deserialize, Serialize};
use serde_with::{DeserializeFromStr, SerializeDisplay};

use crate::ItemKind;

/// Stable identifier of a registry entity.
///
/// Identifiers are handed out in increasing order and never reused within a
/// session.
#[derive(
    Copy,
    Clone,
    Hash,
    Eq,
    Ord,
    PartialEq,
    PartialOrd,
    Debug,
    Deref,
    SerializeDisplay,
    DeserializeFromStr,
)]
pub struct Entity(pub(crate) u32);

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl FromStr for Entity {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some(id) = s.strip_prefix('#') else {
            bail!("entity {s:?} does not start with '#'");
        };
        Ok(Entity(id.parse()?))
    }
}

/// The closed set of things that can be on a tile.
#[derive(
    Copy, Clone, Eq, PartialEq, Hash, Debug, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum EntityKind {
    Player,
    Monster,
    Trap,
    Chest,
    Spawner,
    Item(ItemKind),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_text_form() {
        let e = Entity(12);
        assert_eq!(e.to_string(), "#12");
        assert_eq!("#12".parse::<Entity>().unwrap(), e);
        assert!("12".parse::<Entity>().is_err());
        assert!("#x".parse::<Entity>().is_err());
    }

    #[test]
    fn entity_as_json_key() {
        let mut map = util::IndexMap::default();
        map.insert(Entity(3), 1);
        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, r##"{"#3":1}"##);
    }
}
