use std::{collections::VecDeque, hash::Hash};

use crate::HashSet;

/// Generate a shortest paths map on a grid according to a neighbors function.
pub fn dijkstra_map<'a, T, I>(
    mut neighbors: impl FnMut(&T) -> I + 'a,
    starts: impl IntoIterator<Item = T>,
) -> impl Iterator<Item = (T, usize)> + 'a
where
    T: Clone + Eq + Hash + 'a,
    I: IntoIterator<Item = T>,
{
    let mut edge: VecDeque<(T, usize)> =
        starts.into_iter().map(|s| (s, 0)).collect();
    let mut seen = HashSet::default();

    std::iter::from_fn(move || {
        // Candidates are in a queue and consumed first-in, first-out. This
        // should guarantee that the first time a node is popped from the queue
        // it shows the shortest path length from start to that node.

        while let Some((node, len)) = edge.pop_front() {
            if !seen.contains(&node) {
                seen.insert(node.clone());
                for n in neighbors(&node) {
                    edge.push_back((n, len + 1));
                }
                return Some((node, len));
            }
        }
        None
    })
}

#[cfg(test)]
mod tests {
    use glam::{ivec2, IVec2};

    use super::*;
    use crate::DIR_4;

    #[test]
    fn fill_distances() {
        let open = |p: &IVec2| p.x.abs() <= 2 && p.y.abs() <= 2;
        let map: Vec<(IVec2, usize)> = dijkstra_map(
            |p: &IVec2| {
                let p = *p;
                DIR_4.into_iter().map(move |d| p + d).filter(open)
            },
            [ivec2(0, 0)],
        )
        .collect();

        assert_eq!(map.len(), 25);
        assert_eq!(map[0], (ivec2(0, 0), 0));
        assert!(map.contains(&(ivec2(2, 2), 4)));
    }
}
