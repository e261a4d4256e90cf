use std::fmt::Debug;
use std::hash::Hash;

use smallvec::SmallVec;

/// Maximum number of states shown when displaying a `Path`.
const MAX_ELEMENTS_DISPLAYED: usize = 20;

pub trait State: Copy + Clone + Debug + PartialEq + Eq + Hash {}

/// A sequence of states from a start to an end, both included.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Path<St>
where
    St: State,
{
    pub states: Vec<St>,
}

impl<St> Path<St>
where
    St: State,
{
    #[inline(always)]
    pub fn new_from_start(start: St) -> Self {
        Self {
            states: vec![start],
        }
    }

    /// Number of states in the path, including both ends.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.states.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Number of moves taken. One less than the number of states.
    #[inline(always)]
    pub fn steps(&self) -> usize {
        self.states.len().saturating_sub(1)
    }

    pub fn start(&self) -> Option<&St> {
        self.states.first()
    }
    pub fn end(&self) -> Option<&St> {
        self.states.last()
    }

    #[inline(always)]
    pub fn append(&mut self, s: St) {
        self.states.push(s);
    }

    /// Reverses the Path.
    ///
    /// Useful when naturally reconstructing paths in reverse.
    pub fn reverse(&mut self) {
        self.states.reverse();
    }
}

impl<St> std::fmt::Display for Path<St>
where
    St: State + std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match (self.start(), self.end()) {
            (Some(start), Some(end)) => {
                write!(f, "Path({} steps, {start}", self.steps())?;
                for s in self
                    .states
                    .iter()
                    .skip(1)
                    .take(self.len().saturating_sub(2).min(MAX_ELEMENTS_DISPLAYED))
                {
                    write!(f, "→{s}")?;
                }
                if self.len() > MAX_ELEMENTS_DISPLAYED + 2 {
                    write!(f, "→…")?;
                }
                if self.len() > 1 {
                    write!(f, "→{end}")?;
                }
                write!(f, ")")
            }
            _ => write!(f, "Path()"),
        }
    }
}

pub trait Space<St>: std::fmt::Debug
where
    St: State,
{
    /// Expands a State into the States reachable with a single unit move.
    fn neighbours(&self, s: &St) -> SmallVec<[St; 4]>;
    /// Verify is a State is valid.
    fn valid(&self, s: &St) -> bool;

    fn valid_path(&self, p: &Path<St>) -> bool {
        if p.is_empty() {
            // Empty paths are fine
            return true;
        }
        if !p.states.iter().all(|s| self.valid(s)) {
            return false;
        }
        p.states
            .windows(2)
            .all(|w| self.neighbours(&w[0]).contains(&w[1]))
    }

    fn size(&self) -> Option<usize> {
        None
    }
}

/// A heuristic estimating the remaining cost between two States.
pub trait ObjectiveHeuristic<St>: std::fmt::Debug
where
    St: State,
{
    fn h(&self, a: &St, b: &St) -> f64;
}
