//! Rule constants and session modes.
use glam::IVec2;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::Inventory;

/// Which step offsets count as legal player moves.
#[derive(
    Copy, Clone, Default, Eq, PartialEq, Hash, Debug, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum MoveRule {
    /// Exactly one step up, down, left or right.
    #[default]
    Cardinal,
    /// Any offset within one step except where `dx == dy`.
    ///
    /// This allows the `(1, -1)` and `(-1, 1)` diagonals but not the other
    /// two, and doesn't allow standing still.
    Legacy,
}

impl MoveRule {
    pub fn allows(self, offset: IVec2) -> bool {
        match self {
            MoveRule::Cardinal => offset.x.abs() + offset.y.abs() == 1,
            MoveRule::Legacy => {
                offset.x.abs() <= 1
                    && offset.y.abs() <= 1
                    && offset.x != offset.y
            }
        }
    }
}

#[derive(
    Copy,
    Clone,
    Default,
    Eq,
    PartialEq,
    Hash,
    Debug,
    Serialize,
    Deserialize,
    Display,
    EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum GameMode {
    /// Single player, always starts from the first spawn.
    #[default]
    Solo,
    /// Players cooperate, the game ends when anyone dies.
    Coop,
    /// Teams fight until at most one team is left standing.
    Versus,
}

#[derive(Clone, Eq, PartialEq, Debug, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Settings {
    pub move_rule: MoveRule,
    /// Turns until a dropped bomb goes off.
    pub bomb_fuse: u32,
    /// Turns an opened chest stays open.
    pub chest_respawn: u32,
    /// Turns between a spawner waking up and the monster appearing.
    pub spawn_delay: u32,
    /// Number of trap phases, the last one is armed.
    pub trap_cycle: u8,
    /// No spawners wake up during this many first turns.
    pub spawn_warmup: u32,
    /// Every this many turns one more spawner may wake up at once.
    pub spawn_period: u32,
    pub starting_inventory: Inventory,
    /// Chest loot is nothing with a chance of one in this.
    pub loot_nothing_one_in: usize,
    pub monster_hp: i32,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            move_rule: Default::default(),
            bomb_fuse: 4,
            chest_respawn: 6,
            spawn_delay: 3,
            trap_cycle: 3,
            spawn_warmup: 2,
            spawn_period: 20,
            starting_inventory: Inventory::new(1, 1, 1),
            loot_nothing_one_in: 2,
            monster_hp: 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::ivec2;

    use super::*;

    #[test]
    fn cardinal_rule() {
        let rule = MoveRule::Cardinal;
        assert!(rule.allows(ivec2(1, 0)));
        assert!(rule.allows(ivec2(0, -1)));
        assert!(!rule.allows(IVec2::ZERO));
        assert!(!rule.allows(ivec2(1, -1)));
        assert!(!rule.allows(ivec2(2, 0)));
    }

    #[test]
    fn legacy_rule_is_lopsided() {
        let rule = MoveRule::Legacy;
        assert!(rule.allows(ivec2(1, 0)));
        assert!(rule.allows(ivec2(1, -1)));
        assert!(rule.allows(ivec2(-1, 1)));
        assert!(!rule.allows(ivec2(1, 1)));
        assert!(!rule.allows(ivec2(-1, -1)));
        assert!(!rule.allows(IVec2::ZERO));
    }

    #[test]
    fn partial_settings_file() {
        let s: Settings =
            serde_json::from_str(r#"{ "move-rule": "legacy", "bomb-fuse": 2 }"#)
                .unwrap();
        assert_eq!(s.move_rule, MoveRule::Legacy);
        assert_eq!(s.bomb_fuse, 2);
        assert_eq!(s.chest_respawn, 6);
    }

    #[test]
    fn mode_names() {
        assert_eq!("coop".parse::<GameMode>().unwrap(), GameMode::Coop);
        assert_eq!(GameMode::Versus.to_string(), "versus");
        assert!("deathmatch".parse::<GameMode>().is_err());
    }
}
