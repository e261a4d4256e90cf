use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::fmt::Debug;

use ordered_float::OrderedFloat;
use rustc_hash::FxHashMap;
use rustc_hash::FxHashSet;

use crate::problem::ObjectiveProblem;
use crate::search::SearchTree;
use crate::search::SearchTreeNode;
use crate::space::ObjectiveHeuristic;
use crate::space::Path;
use crate::space::Space;
use crate::space::State;

/// The ranking tuple for A*
///
/// We prefer better f-values, tie break for lower h, and then for older
/// nodes, which makes the search deterministic.
///
/// ```
/// use search_lab::algorithms::astar::AStarRank;
///
/// // Same f-value, lower h wins.
/// assert!(AStarRank::new(2, 0.0, 1) < AStarRank::new(0, 2.0, 0));
/// // Same f and h, older wins.
/// assert!(AStarRank::new(1, 1.0, 0) < AStarRank::new(1, 1.0, 1));
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct AStarRank {
    f: OrderedFloat<f64>,
    h: OrderedFloat<f64>,
    sequence: u64,
}

impl AStarRank {
    pub fn new(g: u32, h: f64, sequence: u64) -> Self {
        Self {
            f: OrderedFloat(g as f64 + h),
            h: OrderedFloat(h),
            sequence,
        }
    }
    pub fn f(&self) -> f64 {
        self.f.into_inner()
    }
}

#[derive(Debug)]
struct AStarHeapNode<'t, St>
where
    St: State,
{
    /// The rank of this node that defines how good it is.
    rank: AStarRank,
    node: &'t SearchTreeNode<'t, St>,
}

impl<St: State> PartialEq for AStarHeapNode<'_, St> {
    #[inline(always)]
    fn eq(&self, other: &Self) -> bool {
        self.rank.eq(&other.rank)
    }
}
impl<St: State> Eq for AStarHeapNode<'_, St> {}

impl<St: State> PartialOrd for AStarHeapNode<'_, St> {
    #[inline(always)]
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}
impl<St: State> Ord for AStarHeapNode<'_, St> {
    #[inline(always)]
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.rank.cmp(&other.rank)
    }
}

/// Counters describing a finished (or ongoing) A* search.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct AStarStats {
    /// Search nodes created, including re-pushes of improved states.
    pub generated: usize,
    /// Search nodes popped and expanded.
    pub expanded: usize,
    /// Entries still in the open list, stale ones included.
    pub open: usize,
    /// Distinct states reached.
    pub reached: usize,
}

impl AStarStats {
    pub fn write<W: std::io::Write>(&self, mut out: W, node_size: usize) -> std::io::Result<()> {
        use size::Size;
        use thousands::Separable;

        writeln!(out, "AStarSearch Stats:")?;
        writeln!(
            out,
            "  - |Nodes|:   {} ({})",
            self.generated.separate_with_commas(),
            Size::from_bytes(self.generated * node_size)
        )?;
        writeln!(out, "  - |Open|:    {}", self.open.separate_with_commas())?;
        writeln!(out, "  - |Reached|: {}", self.reached.separate_with_commas())?;
        writeln!(
            out,
            "  - Expanded nodes: {}",
            self.expanded.separate_with_commas()
        )?;
        Ok(())
    }
}

/// A* from a single start to a single goal.
///
/// Nodes live in a `SearchTree` borrowed for the lifetime of the search, so
/// the open list only holds references into it.
#[derive(Debug)]
pub struct AStarSearch<'s, 't, H, Sp, St>
where
    H: ObjectiveHeuristic<St>,
    Sp: Space<St>,
    St: State,
{
    /// All the Search Nodes. Naturally forms a Search Tree rooted at the start
    /// as each node may have a parent Node.
    search_tree: &'t SearchTree<'t, St>,

    /// Min-heap of nodes to expand.
    ///
    /// A state improved through a cheaper path gets pushed again, leaving the
    /// older entry behind. Those are dropped when popped as their state is
    /// closed by then.
    open: BinaryHeap<Reverse<AStarHeapNode<'t, St>>>,

    /// Best known g-value for every reached state.
    best_g: FxHashMap<St, u32>,

    /// States already expanded.
    closed: FxHashSet<St>,

    space: &'s Sp,
    heuristic: H,
    goal: St,

    pushes: u64,
    expanded: usize,
}

impl<'s, 't, H, Sp, St> AStarSearch<'s, 't, H, Sp, St>
where
    H: ObjectiveHeuristic<St>,
    Sp: Space<St>,
    St: State,
{
    #[must_use]
    pub fn new(
        search_tree: &'t SearchTree<'t, St>,
        space: &'s Sp,
        heuristic: H,
        start: St,
        goal: St,
    ) -> Self {
        debug_assert!(space.valid(&start), "Invalid start {start:?}");
        debug_assert!(space.valid(&goal), "Invalid goal {goal:?}");

        let mut search = Self {
            search_tree,
            open: BinaryHeap::with_capacity(space.size().unwrap_or(64)),
            best_g: FxHashMap::default(),
            closed: FxHashSet::default(),
            space,
            heuristic,
            goal,
            pushes: 0,
            expanded: 0,
        };
        search.push(start, None, 0);
        search
    }

    pub fn new_from_problem<P>(search_tree: &'t SearchTree<'t, St>, problem: &'s P, heuristic: H) -> Self
    where
        P: ObjectiveProblem<Sp, St>,
    {
        Self::new(
            search_tree,
            problem.space(),
            heuristic,
            problem.start(),
            problem.goal(),
        )
    }

    #[must_use]
    pub fn find_path(&mut self) -> Option<Path<St>> {
        while let Some(Reverse(heap_node)) = self.open.pop() {
            let node = heap_node.node;
            let state = *node.state();
            if self.closed.contains(&state) {
                // Stale entry, the state was expanded through a better path.
                continue;
            }

            if state == self.goal {
                return Some(node.path());
            }

            // Mark as closed
            self.closed.insert(state);
            self.expanded += 1;

            // Expand state
            let g = node.g() + 1;
            for s in self.space.neighbours(&state) {
                if self.closed.contains(&s) {
                    continue;
                }
                match self.best_g.get(&s) {
                    Some(&best) if best <= g => {}
                    _ => self.push(s, Some(node), g),
                }
            }

            self.verify();
        }

        None
    }

    #[inline(always)]
    fn push(&mut self, s: St, parent: Option<&'t SearchTreeNode<'t, St>>, g: u32) {
        let h = self.heuristic.h(&s, &self.goal);
        let node = self.search_tree.push(SearchTreeNode::new(s, parent, g, h));
        self.best_g.insert(s, g);
        self.open.push(Reverse(AStarHeapNode {
            rank: AStarRank::new(g, h, self.pushes),
            node,
        }));
        self.pushes += 1;
    }

    #[inline(always)]
    #[cfg(not(feature = "verify"))]
    fn verify(&self) {
        // All good... (hopefully)
    }
    #[inline(always)]
    #[cfg(feature = "verify")]
    fn verify(&self) {
        for s in &self.closed {
            debug_assert!(self.best_g.contains_key(s), "Closed {s:?} was never reached");
        }
        for Reverse(e) in self.open.iter() {
            let best = self.best_g[e.node.state()];
            debug_assert!(best <= e.node.g(), "Open node beats the best known g");
        }
    }

    pub fn stats(&self) -> AStarStats {
        AStarStats {
            generated: self.search_tree.len(),
            expanded: self.expanded,
            open: self.open.len(),
            reached: self.best_g.len(),
        }
    }

    pub fn write_stats<W: std::io::Write>(&self, out: W) -> std::io::Result<()> {
        self.stats()
            .write(out, std::mem::size_of::<SearchTreeNode<'t, St>>())
    }
}

/// Runs A* on `space` returning the path from `start` to `goal`, both
/// included, along with the search counters.
pub fn astar_with_stats<H, Sp, St>(
    space: &Sp,
    start: St,
    goal: St,
    heuristic: H,
) -> (Option<Path<St>>, AStarStats)
where
    H: ObjectiveHeuristic<St>,
    Sp: Space<St>,
    St: State,
{
    let search_tree = SearchTree::<St>::new();
    let mut search = AStarSearch::new(&search_tree, space, heuristic, start, goal);
    let path = search.find_path();
    let stats = search.stats();

    log::debug!(
        "A* {:?} {:?}→{:?}: {} after expanding {} nodes",
        search.heuristic,
        start,
        goal,
        path.as_ref()
            .map_or("no path".to_string(), |p| format!("{} steps", p.steps())),
        stats.expanded
    );
    (path, stats)
}

/// Runs A* on `space` returning the path from `start` to `goal`, both
/// included, or `None` when the goal can't be reached.
pub fn astar<H, Sp, St>(space: &Sp, start: St, goal: St, heuristic: H) -> Option<Path<St>>
where
    H: ObjectiveHeuristic<St>,
    Sp: Space<St>,
    St: State,
{
    astar_with_stats(space, start, goal, heuristic).0
}
