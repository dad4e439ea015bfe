//! Kill, chest and combo bookkeeping.
use serde::{Deserialize, Serialize};

/// Bonus banked when a combo of length `combo` closes.
///
/// Every step past the second is worth one less than its position in the
/// streak.
pub fn combo_bonus(combo: u32) -> u32 {
    (3..=combo).map(|i| i - 1).sum()
}

#[derive(
    Copy, Clone, Default, Eq, PartialEq, Hash, Debug, Serialize, Deserialize,
)]
#[serde(default, rename_all = "kebab-case")]
pub struct ComboTracker {
    pub combo: u32,
    pub max_combo: u32,
    /// Total bonus banked from closed combos.
    pub bonus: u32,
    /// Something that keeps the combo going happened this turn.
    pub kept_alive: bool,
}

impl ComboTracker {
    /// Scoring event, extends the combo.
    pub fn add(&mut self) {
        self.combo += 1;
        self.max_combo = self.max_combo.max(self.combo);
        self.kept_alive = true;
    }

    /// Action that doesn't score but still keeps the combo open.
    pub fn mark_action(&mut self) {
        self.kept_alive = true;
    }

    /// End of turn bookkeeping.
    ///
    /// Returns the closed combo length and bonus if the combo closed this
    /// turn.
    pub fn end_turn(&mut self) -> Option<(u32, u32)> {
        let mut ret = None;
        if !self.kept_alive {
            let bonus = combo_bonus(self.combo);
            if self.combo > 0 {
                ret = Some((self.combo, bonus));
            }
            self.bonus += bonus;
            self.combo = 0;
        }
        self.kept_alive = false;
        ret
    }
}

/// Score counters exported to statistics.
#[derive(
    Copy, Clone, Default, Eq, PartialEq, Hash, Debug, Serialize, Deserialize,
)]
#[serde(default, rename_all = "kebab-case")]
pub struct Scores {
    pub killed_monsters: u32,
    pub opened_chests: u32,
    pub combo_score: u32,
    pub max_combo: u32,
    pub turns: u32,
}

impl Scores {
    pub fn total(&self) -> u32 {
        self.turns
            + self.killed_monsters
            + self.opened_chests
            + self.combo_score
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck_macros::quickcheck;

    #[test]
    fn bonus_values() {
        assert_eq!(combo_bonus(0), 0);
        assert_eq!(combo_bonus(2), 0);
        assert_eq!(combo_bonus(3), 2);
        assert_eq!(combo_bonus(5), 9);
    }

    #[quickcheck]
    fn bonus_closed_form(c: u8) -> bool {
        let c = c as u32;
        let expected = if c < 3 { 0 } else { (c * (c - 1)) / 2 - 1 };
        combo_bonus(c) == expected
    }

    #[test]
    fn combo_banks_on_quiet_turn() {
        let mut t = ComboTracker::default();
        for _ in 0..5 {
            t.add();
            assert_eq!(t.end_turn(), None);
        }
        assert_eq!(t.combo, 5);
        assert_eq!(t.end_turn(), Some((5, 9)));
        assert_eq!(t.bonus, 9);
        assert_eq!(t.combo, 0);
        assert_eq!(t.max_combo, 5);
        assert_eq!(t.end_turn(), None);
    }

    #[test]
    fn item_use_keeps_combo_open() {
        let mut t = ComboTracker::default();
        t.add();
        t.add();
        t.add();
        t.end_turn();
        t.mark_action();
        assert_eq!(t.end_turn(), None);
        assert_eq!(t.combo, 3);
    }

    #[test]
    fn total_score() {
        let s = Scores {
            killed_monsters: 3,
            opened_chests: 2,
            combo_score: 9,
            max_combo: 5,
            turns: 40,
        };
        assert_eq!(s.total(), 54);
    }
}
