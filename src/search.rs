//! Best-first search over generic states.
//!
//! The single-path variant keeps its parent links in an [IndexMap] keyed by
//! state, so the map doubles as the open-node index: a candidate is compared
//! against the best known cost for its state in O(1) instead of scanning the
//! frontier. The exhaustive variant trades that map for a plain node arena,
//! since enumerating every optimal path requires keeping one node per
//! distinct optimal parent edge.

use fxhash::{FxBuildHasher, FxHashMap};
use indexmap::map::Entry::{Occupied, Vacant};
use indexmap::IndexMap;
use log::{debug, warn};
use num_traits::Zero;
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::hash::Hash;

type FxIndexMap<K, V> = IndexMap<K, V, FxBuildHasher>;

/// Number of pops between progress log lines.
const PROGRESS_INTERVAL: usize = 500;

struct SmallestCostHolder<K> {
    estimated_cost: K,
    cost: K,
    index: usize,
}

impl<K: PartialEq> Eq for SmallestCostHolder<K> {}

impl<K: PartialEq> PartialEq for SmallestCostHolder<K> {
    fn eq(&self, other: &Self) -> bool {
        self.estimated_cost.eq(&other.estimated_cost) && self.cost.eq(&other.cost)
    }
}

impl<K: Ord> PartialOrd for SmallestCostHolder<K> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<K: Ord> Ord for SmallestCostHolder<K> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Orders by estimated cost, then prefers nodes further along their
        // path (larger g) among ties.
        match other.estimated_cost.cmp(&self.estimated_cost) {
            Ordering::Equal => self.cost.cmp(&other.cost),
            s => s,
        }
    }
}

fn reverse_path<N, V, F>(parents: &FxIndexMap<N, V>, mut parent: F, start: usize) -> Vec<N>
where
    N: Eq + Hash + Clone,
    F: FnMut(&V) -> usize,
{
    let mut path: Vec<N> = itertools::unfold(start, |i| {
        parents.get_index(*i).map(|(node, value)| {
            *i = parent(value);
            node.clone()
        })
    })
    .collect();
    path.reverse();
    path
}

/// Finds a cheapest path from `start` to a state satisfying `success`.
///
/// `heuristic` must never overestimate the remaining cost; with that, the
/// first success state popped is optimal. Returns the path (start and goal
/// included) and its cost, or [None] when the frontier empties first --
/// an unreachable goal is a result, not an error.
pub fn best_first_search<N, C, FN, IN, FH, FS>(
    start: &N,
    mut successors: FN,
    mut heuristic: FH,
    mut success: FS,
) -> Option<(Vec<N>, C)>
where
    N: Eq + Hash + Clone,
    C: Zero + Ord + Copy,
    FN: FnMut(&N) -> IN,
    IN: IntoIterator<Item = (N, C)>,
    FH: FnMut(&N) -> C,
    FS: FnMut(&N) -> bool,
{
    let mut to_see = BinaryHeap::new();
    to_see.push(SmallestCostHolder {
        estimated_cost: Zero::zero(),
        cost: Zero::zero(),
        index: 0,
    });
    let mut parents: FxIndexMap<N, (usize, C)> = FxIndexMap::default();
    parents.insert(start.clone(), (usize::MAX, Zero::zero()));
    let mut num_pops = 0;
    while let Some(SmallestCostHolder { cost, index, .. }) = to_see.pop() {
        num_pops += 1;
        if num_pops % PROGRESS_INTERVAL == 0 {
            debug!(
                "search progress: {} pops, {} frontier entries, {} states discovered",
                num_pops,
                to_see.len(),
                parents.len()
            );
        }
        let successors = {
            let (node, &(_, c)) = parents.get_index(index).unwrap();
            if success(node) {
                let path = reverse_path(&parents, |&(p, _)| p, index);
                return Some((path, cost));
            }
            // The same state may sit in the heap several times if cheaper
            // routes to it kept being discovered. Only the cheapest entry
            // matters; the rest are stale.
            if cost > c {
                continue;
            }
            successors(node)
        };
        for (successor, move_cost) in successors {
            let new_cost = cost + move_cost;
            let h; // heuristic(&successor)
            let n; // index for successor
            match parents.entry(successor) {
                Vacant(e) => {
                    h = heuristic(e.key());
                    n = e.index();
                    e.insert((index, new_cost));
                }
                Occupied(mut e) => {
                    if e.get().1 > new_cost {
                        h = heuristic(e.key());
                        n = e.index();
                        e.insert((index, new_cost));
                    } else {
                        continue;
                    }
                }
            }
            to_see.push(SmallestCostHolder {
                estimated_cost: new_cost + h,
                cost: new_cost,
                index: n,
            });
        }
    }
    warn!("frontier emptied after {} pops without reaching a goal", num_pops);
    None
}

struct ArenaNode<N, C> {
    state: N,
    cost: C,
    parent: usize,
}

fn arena_path<N: Clone, C>(arena: &[ArenaNode<N, C>], goal: usize) -> Vec<N> {
    let mut path: Vec<N> = itertools::unfold(goal, |i| {
        arena.get(*i).map(|node| {
            *i = node.parent;
            node.state.clone()
        })
    })
    .collect();
    path.reverse();
    path
}

/// Enumerates every path from `start` to a success state whose cost does not
/// exceed `bound`. Running it with the optimal cost from
/// [best_first_search] as the bound yields all tied-optimal paths.
///
/// Unlike the single-path search, equal-cost rediscoveries of a state are
/// admitted (each as its own arena node with its own parent), so paths that
/// merge and share a suffix are all recovered. A candidate is only discarded
/// when a strictly cheaper route to its state is known, which keeps each
/// state's finalized cost minimal while preserving ties.
pub fn best_first_search_exhaustive<N, C, FN, IN, FS>(
    start: &N,
    bound: C,
    mut successors: FN,
    mut success: FS,
) -> Vec<Vec<N>>
where
    N: Eq + Hash + Clone,
    C: Zero + Ord + Copy,
    FN: FnMut(&N) -> IN,
    IN: IntoIterator<Item = (N, C)>,
    FS: FnMut(&N) -> bool,
{
    let mut arena = vec![ArenaNode {
        state: start.clone(),
        cost: Zero::zero(),
        parent: usize::MAX,
    }];
    let mut best_cost: FxHashMap<N, C> = FxHashMap::default();
    best_cost.insert(start.clone(), Zero::zero());
    let mut to_see = BinaryHeap::new();
    to_see.push(SmallestCostHolder {
        estimated_cost: Zero::zero(),
        cost: Zero::zero(),
        index: 0,
    });
    let mut paths = Vec::new();
    while let Some(SmallestCostHolder { cost, index, .. }) = to_see.pop() {
        let state = {
            let node = &arena[index];
            // A strictly cheaper route to this state appeared after this
            // node was pushed; everything built on it would overshoot.
            if best_cost.get(&node.state).is_some_and(|&c| cost > c) {
                continue;
            }
            if success(&node.state) {
                paths.push(arena_path(&arena, index));
                continue;
            }
            node.state.clone()
        };
        for (successor, move_cost) in successors(&state) {
            let new_cost = cost + move_cost;
            if new_cost > bound {
                continue;
            }
            let known = best_cost.get(&successor).copied();
            if known.is_some_and(|c| c < new_cost) {
                continue;
            }
            best_cost.insert(successor.clone(), new_cost);
            arena.push(ArenaNode {
                state: successor,
                cost: new_cost,
                parent: index,
            });
            to_see.push(SmallestCostHolder {
                estimated_cost: new_cost,
                cost: new_cost,
                index: arena.len() - 1,
            });
        }
    }
    paths
}

#[cfg(test)]
mod tests {
    use super::*;

    // Line graph 0 - 1 - 2 - 3 with unit edges.
    fn line_successors(n: &u32) -> Vec<(u32, u32)> {
        let mut next = vec![];
        if *n > 0 {
            next.push((n - 1, 1));
        }
        if *n < 3 {
            next.push((n + 1, 1));
        }
        next
    }

    #[test]
    fn finds_shortest_line_path() {
        let (path, cost) =
            best_first_search(&0u32, line_successors, |n| 3 - n, |n| *n == 3).unwrap();
        assert_eq!(cost, 3);
        assert_eq!(path, vec![0, 1, 2, 3]);
    }

    #[test]
    fn start_satisfying_goal_is_trivial() {
        let (path, cost) =
            best_first_search(&3u32, line_successors, |n| 3 - n, |n| *n == 3).unwrap();
        assert_eq!(cost, 0);
        assert_eq!(path, vec![3]);
    }

    #[test]
    fn unreachable_goal_returns_none() {
        assert!(best_first_search(&0u32, line_successors, |_| 0, |n| *n == 10).is_none());
    }

    #[test]
    fn exhaustive_recovers_both_diamond_branches() {
        // 0 -> {1, 2} -> 3, all edges cost 1: two tied paths.
        let successors = |n: &u32| -> Vec<(u32, u32)> {
            match n {
                0 => vec![(1, 1), (2, 1)],
                1 | 2 => vec![(3, 1)],
                _ => vec![],
            }
        };
        let (_, best) = best_first_search(&0u32, successors, |_| 0, |n| *n == 3).unwrap();
        assert_eq!(best, 2);
        let mut paths = best_first_search_exhaustive(&0u32, best, successors, |n| *n == 3);
        paths.sort();
        assert_eq!(paths, vec![vec![0, 1, 3], vec![0, 2, 3]]);
    }

    #[test]
    fn exhaustive_prunes_over_bound() {
        // Same diamond, but one branch costs more: only the cheap path survives.
        let successors = |n: &u32| -> Vec<(u32, u32)> {
            match n {
                0 => vec![(1, 1), (2, 5)],
                1 | 2 => vec![(3, 1)],
                _ => vec![],
            }
        };
        let paths = best_first_search_exhaustive(&0u32, 2, successors, |n| *n == 3);
        assert_eq!(paths, vec![vec![0, 1, 3]]);
    }
}
