//! Breadth-first search.
//!
//! With unit-cost moves this finds shortest paths, which makes it the ground
//! truth A* gets checked against.

use std::collections::VecDeque;

use rustc_hash::FxHashMap;

use crate::space::Path;
use crate::space::Space;
use crate::space::State;

/// Returns a shortest path from `start` to `goal`, both included.
pub fn bfs<Sp, St>(space: &Sp, start: St, goal: St) -> Option<Path<St>>
where
    Sp: Space<St>,
    St: State,
{
    // Reached states and the state they were reached from.
    let mut parents = FxHashMap::<St, Option<St>>::default();
    let mut frontier = VecDeque::<St>::new();

    parents.insert(start, None);
    frontier.push_back(start);

    while let Some(s) = frontier.pop_front() {
        if s == goal {
            return Some(path(&parents, s));
        }
        for n in space.neighbours(&s) {
            if let std::collections::hash_map::Entry::Vacant(e) = parents.entry(n) {
                e.insert(Some(s));
                frontier.push_back(n);
            }
        }
    }

    None
}

fn path<St: State>(parents: &FxHashMap<St, Option<St>>, end: St) -> Path<St> {
    let mut s = end;
    let mut path = Path::<St>::new_from_start(s);

    while let Some(&Some(parent)) = parents.get(&s) {
        debug_assert!(s != parent);
        path.append(parent);
        s = parent;
    }

    path.reverse();
    path
}

/// Whether `goal` can be reached from `start`.
pub fn reachable<Sp, St>(space: &Sp, start: St, goal: St) -> bool
where
    Sp: Space<St>,
    St: State,
{
    bfs(space, start, goal).is_some()
}
