use typed_arena::Arena;

use crate::space::Path;
use crate::space::State;

/// A node of the search tree.
///
/// Nodes are allocated once in a `SearchTree` and never move, so children can
/// borrow their parent for as long as the tree lives.
#[derive(Debug)]
pub struct SearchTreeNode<'t, St>
where
    St: State,
{
    pub(crate) parent: Option<&'t SearchTreeNode<'t, St>>,
    pub(crate) state: St,
    pub(crate) g: u32,
    pub(crate) h: f64,
}

impl<'t, St> SearchTreeNode<'t, St>
where
    St: State,
{
    pub fn new(s: St, parent: Option<&'t SearchTreeNode<'t, St>>, g: u32, h: f64) -> Self {
        debug_assert!(h >= 0.0, "Heuristics must be non-negative");
        debug_assert_eq!(parent.map_or(0, |p| p.g + 1), g);
        Self {
            parent,
            state: s,
            g,
            h,
        }
    }

    pub fn state(&self) -> &St {
        &self.state
    }
    pub fn parent(&self) -> Option<&'t SearchTreeNode<'t, St>> {
        self.parent
    }
    pub fn g(&self) -> u32 {
        self.g
    }
    pub fn h(&self) -> f64 {
        self.h
    }
    pub fn f(&self) -> f64 {
        self.g as f64 + self.h
    }

    /// Walks the parent chain back to the root and returns the path from the
    /// root to this node.
    #[must_use]
    pub fn path(&self) -> Path<St> {
        let mut path = Path::<St>::new_from_start(self.state);
        let mut node = self;
        while let Some(parent) = node.parent() {
            path.append(parent.state);
            node = parent;
        }
        path.reverse();

        debug_assert_eq!(path.steps(), self.g as usize);
        path
    }
}

/// Owns every `SearchTreeNode` created during a search.
pub struct SearchTree<'t, St>
where
    St: State,
{
    nodes: Arena<SearchTreeNode<'t, St>>,
}

impl<'t, St> SearchTree<'t, St>
where
    St: State,
{
    #[inline(always)]
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: Arena::new(),
        }
    }

    #[inline(always)]
    pub fn push(&'t self, node: SearchTreeNode<'t, St>) -> &'t SearchTreeNode<'t, St> {
        self.nodes.alloc(node)
    }

    #[inline(always)]
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline(always)]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<St> Default for SearchTree<'_, St>
where
    St: State,
{
    #[inline(always)]
    fn default() -> Self {
        Self::new()
    }
}

impl<St> std::fmt::Debug for SearchTree<'_, St>
where
    St: State,
{
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "SearchTree{{({} nodes)}}", self.len())
    }
}
