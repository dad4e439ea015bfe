//! Deciding which simultaneous player moves actually happen.
//!
//! Resolution only reads the pre-turn positions and proposed destinations,
//! nothing is committed here.
use glam::IVec2;
use serde::{Deserialize, Serialize};
use util::HashSet;

use crate::Entity;

/// One living player's intent for the turn.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct Proposal {
    pub who: Entity,
    pub from: IVec2,
    /// Tile the player moves into, or for an anchored player, the tile its
    /// action targets.
    pub dest: IVec2,
    /// Action was valid but keeps the player in place.
    pub anchored: bool,
}

impl Proposal {
    /// Player is not going anywhere this turn.
    pub fn is_stationary(&self) -> bool {
        self.anchored || self.dest == self.from
    }

    /// Player moves into or acts on the tile this turn.
    pub fn claims(&self, pos: IVec2) -> bool {
        self.dest == pos && (self.anchored || self.dest != self.from)
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Resolution {
    Moves,
    Blocked,
    /// Chain of players ran into itself, nobody in it moves.
    CycleDetected,
}

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct Verdict {
    pub resolution: Resolution,
    /// Player this mover attacks instead of moving.
    pub attack: Option<Entity>,
}

impl Verdict {
    pub fn moves(&self) -> bool {
        self.resolution == Resolution::Moves
    }

    const fn blocked() -> Self {
        Verdict {
            resolution: Resolution::Blocked,
            attack: None,
        }
    }
}

/// Resolve every proposal, verdicts come back in proposal order.
pub fn resolve(proposals: &[Proposal]) -> Vec<Verdict> {
    (0..proposals.len())
        .map(|i| resolve_one(proposals, i))
        .collect()
}

/// Some other player heads for or acts on the same tile.
fn tile_bump(proposals: &[Proposal], i: usize) -> bool {
    let dest = proposals[i].dest;
    proposals
        .iter()
        .enumerate()
        .any(|(j, q)| j != i && q.claims(dest))
}

fn occupant(proposals: &[Proposal], i: usize) -> Option<usize> {
    let dest = proposals[i].dest;
    proposals
        .iter()
        .enumerate()
        .find(|&(j, q)| j != i && q.from == dest)
        .map(|(j, _)| j)
}

/// Resolve one mover by walking the chain of players standing in each
/// other's way, then folding the result back to the start of the chain.
fn resolve_one(proposals: &[Proposal], start: usize) -> Verdict {
    if proposals[start].is_stationary() {
        return Verdict::blocked();
    }

    let mut chain = vec![start];
    let mut visited = HashSet::default();
    visited.insert(start);

    // Outcome for the last player in the chain.
    let mut end = loop {
        let Some(&cur) = chain.last() else {
            return Verdict::blocked();
        };
        let p = &proposals[cur];

        if p.is_stationary() {
            break Resolution::Blocked;
        }

        let Some(next) = occupant(proposals, cur) else {
            break if tile_bump(proposals, cur) {
                Resolution::Blocked
            } else {
                Resolution::Moves
            };
        };

        if proposals[next].dest == p.from {
            // Face bump, the two want to swap places.
            break Resolution::Blocked;
        }

        if !visited.insert(next) {
            break Resolution::CycleDetected;
        }
        chain.push(next);
    };

    // The last player's own attack never reaches the top-level mover, only
    // its movement status matters from here on.
    let mut attack = None;
    for k in (0..chain.len() - 1).rev() {
        let (cur, next) = (chain[k], chain[k + 1]);
        attack = None;
        end = match end {
            Resolution::Moves if tile_bump(proposals, cur) => {
                Resolution::Blocked
            }
            Resolution::Moves => Resolution::Moves,
            Resolution::Blocked => {
                attack = Some(proposals[next].who);
                Resolution::Blocked
            }
            Resolution::CycleDetected => Resolution::CycleDetected,
        };
    }

    Verdict {
        resolution: end,
        attack,
    }
}

#[cfg(test)]
mod tests {
    use glam::ivec2;
    use pretty_assertions::assert_eq;
    use quickcheck_macros::quickcheck;

    use super::*;

    fn mover(id: u32, from: IVec2, dir: IVec2) -> Proposal {
        Proposal {
            who: Entity(id),
            from,
            dest: from + dir,
            anchored: false,
        }
    }

    #[test]
    fn free_move() {
        let v = resolve(&[mover(0, ivec2(5, 5), ivec2(1, 0))]);
        assert!(v[0].moves());
        assert_eq!(v[0].attack, None);
    }

    #[test]
    fn face_bump_blocks_both() {
        let v = resolve(&[
            mover(0, ivec2(1, 1), ivec2(1, 0)),
            mover(1, ivec2(2, 1), ivec2(-1, 0)),
        ]);
        assert_eq!(v, vec![Verdict::blocked(), Verdict::blocked()]);
    }

    #[test]
    fn same_empty_tile_blocks_both() {
        let v = resolve(&[
            mover(0, ivec2(1, 1), ivec2(1, 0)),
            mover(1, ivec2(3, 1), ivec2(-1, 0)),
        ]);
        assert_eq!(v, vec![Verdict::blocked(), Verdict::blocked()]);
    }

    #[test]
    fn anchored_target_tile_blocks_movers() {
        let mut user = mover(0, ivec2(1, 1), ivec2(1, 0));
        user.anchored = true;
        let v = resolve(&[user, mover(1, ivec2(3, 1), ivec2(-1, 0))]);
        assert_eq!(v, vec![Verdict::blocked(), Verdict::blocked()]);
    }

    #[test]
    fn holding_still_claims_nothing() {
        let v = resolve(&[
            mover(0, ivec2(1, 1), IVec2::ZERO),
            mover(1, ivec2(2, 2), ivec2(0, -1)),
        ]);
        assert_eq!(v[0], Verdict::blocked());
        assert!(v[1].moves());
    }

    #[test]
    fn moving_into_a_standing_player_attacks() {
        let v = resolve(&[
            mover(0, ivec2(1, 1), ivec2(1, 0)),
            mover(1, ivec2(2, 1), IVec2::ZERO),
        ]);
        assert_eq!(v[0].resolution, Resolution::Blocked);
        assert_eq!(v[0].attack, Some(Entity(1)));
        assert_eq!(v[1], Verdict::blocked());
    }

    #[test]
    fn anchored_player_is_attacked() {
        let mut anchored = mover(1, ivec2(2, 1), ivec2(0, 1));
        anchored.anchored = true;
        let v = resolve(&[mover(0, ivec2(1, 1), ivec2(1, 0)), anchored]);
        assert_eq!(v[0].attack, Some(Entity(1)));
        assert_eq!(v[1], Verdict::blocked());
    }

    #[test]
    fn face_bump_down_the_chain_gets_attacked() {
        // 0 walks into 1, who is face bumping with 2.
        let v = resolve(&[
            mover(0, ivec2(0, 0), ivec2(1, 0)),
            mover(1, ivec2(1, 0), ivec2(1, 0)),
            mover(2, ivec2(2, 0), ivec2(-1, 0)),
        ]);
        assert_eq!(v[0].attack, Some(Entity(1)));
        assert_eq!(v[1], Verdict::blocked());
        assert_eq!(v[2], Verdict::blocked());
    }

    #[test]
    fn ring_is_detected() {
        // Four players rotating around a 2x2 square.
        let v = resolve(&[
            mover(0, ivec2(0, 0), ivec2(1, 0)),
            mover(1, ivec2(1, 0), ivec2(0, 1)),
            mover(2, ivec2(1, 1), ivec2(-1, 0)),
            mover(3, ivec2(0, 1), ivec2(0, -1)),
        ]);
        for v in v {
            assert_eq!(v.resolution, Resolution::CycleDetected);
            assert_eq!(v.attack, None);
        }
    }

    #[quickcheck]
    fn chain_moves_when_head_is_free(n: u8) -> bool {
        let n = (n % 16) as i32 + 1;
        let chain: Vec<Proposal> = (0..n)
            .map(|i| mover(i as u32, ivec2(i, 0), ivec2(1, 0)))
            .collect();
        let verdicts = resolve(&chain);
        verdicts.iter().all(|v| v.moves() && v.attack.is_none())
    }

    #[quickcheck]
    fn chain_blocked_at_head_is_blocked(n: u8) -> bool {
        let n = (n % 16) as i32 + 2;
        let mut chain: Vec<Proposal> = (0..n)
            .map(|i| mover(i as u32, ivec2(i, 0), ivec2(1, 0)))
            .collect();
        // Head of the chain stays put.
        let last = chain.len() - 1;
        chain[last].dest = chain[last].from;

        let verdicts = resolve(&chain);
        verdicts.iter().all(|v| !v.moves())
            // Everyone attacks the player ahead, the head gets hit from behind.
            && verdicts[last - 1].attack == Some(Entity(last as u32))
    }

    #[quickcheck]
    fn face_bump_anywhere(x: i16, y: i16, horizontal: bool) -> bool {
        let a = ivec2(x as i32, y as i32);
        let d = if horizontal { ivec2(1, 0) } else { ivec2(0, 1) };
        let v = resolve(&[mover(0, a, d), mover(1, a + d, -d)]);
        v.iter().all(|v| !v.moves() && v.attack.is_none())
    }
}
