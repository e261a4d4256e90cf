//! Distance estimates between grid cells.
//!
//! All of them are admissible for 4-connected unit-cost movement, where the
//! Manhattan distance is the exact cost on an obstacle-free grid.

use derive_more::Display;

use crate::problems::grid_2d::Cell;
use crate::space::ObjectiveHeuristic;

#[inline(always)]
fn deltas(a: &Cell, b: &Cell) -> (f64, f64) {
    (
        a.row.abs_diff(b.row) as f64,
        a.col.abs_diff(b.col) as f64,
    )
}

/// L1 distance.
///
/// ```
/// use search_lab::heuristics::manhattan;
/// use search_lab::problems::grid_2d::Cell;
/// assert_eq!(manhattan(&Cell::new(0, 0), &Cell::new(4, 4)), 8.0);
/// ```
#[inline(always)]
pub fn manhattan(a: &Cell, b: &Cell) -> f64 {
    let (dr, dc) = deltas(a, b);
    dr + dc
}

/// L2 distance.
///
/// ```
/// use search_lab::heuristics::euclidean;
/// use search_lab::problems::grid_2d::Cell;
/// assert_eq!(euclidean(&Cell::new(0, 0), &Cell::new(3, 4)), 5.0);
/// ```
#[inline(always)]
pub fn euclidean(a: &Cell, b: &Cell) -> f64 {
    let (dr, dc) = deltas(a, b);
    dr.hypot(dc)
}

/// L∞ (Chebyshev) distance.
#[inline(always)]
pub fn diagonal(a: &Cell, b: &Cell) -> f64 {
    let (dr, dc) = deltas(a, b);
    dr.max(dc)
}

#[derive(Copy, Clone, Debug, Display, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum Heuristic {
    #[display("Manhattan")]
    Manhattan,
    #[display("Euclidean")]
    Euclidean,
    #[display("Diagonal")]
    Diagonal,
}

impl Heuristic {
    pub const ALL: [Heuristic; 3] = [
        Heuristic::Manhattan,
        Heuristic::Euclidean,
        Heuristic::Diagonal,
    ];

    #[inline(always)]
    pub fn distance(&self, a: &Cell, b: &Cell) -> f64 {
        match self {
            Heuristic::Manhattan => manhattan(a, b),
            Heuristic::Euclidean => euclidean(a, b),
            Heuristic::Diagonal => diagonal(a, b),
        }
    }
}

impl ObjectiveHeuristic<Cell> for Heuristic {
    #[inline(always)]
    fn h(&self, a: &Cell, b: &Cell) -> f64 {
        self.distance(a, b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rand::Rng;
    use rand_chacha::ChaCha8Rng;
    use rand_chacha::rand_core::SeedableRng;

    #[test]
    fn zero_on_same_cell() {
        let c = Cell::new(7, 3);
        for h in Heuristic::ALL {
            assert_eq!(h.h(&c, &c), 0.0, "{h}");
        }
    }

    #[test]
    fn known_distances() {
        let a = Cell::new(1, 1);
        let b = Cell::new(4, 5);
        assert_eq!(manhattan(&a, &b), 7.0);
        assert_eq!(euclidean(&a, &b), 5.0);
        assert_eq!(diagonal(&a, &b), 4.0);
    }

    #[test]
    fn never_exceed_manhattan() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        for _ in 0..1_000 {
            let a = Cell::new(rng.random_range(0..50), rng.random_range(0..50));
            let b = Cell::new(rng.random_range(0..50), rng.random_range(0..50));
            let exact = manhattan(&a, &b);
            for h in Heuristic::ALL {
                let estimate = h.h(&a, &b);
                assert!(estimate >= 0.0);
                assert!(estimate <= exact, "{h} overestimates {a}→{b}");
                assert_eq!(estimate, h.h(&b, &a), "{h} is not symmetric");
            }
        }
    }

    #[test]
    fn names() {
        let names: Vec<String> = Heuristic::ALL.iter().map(|h| h.to_string()).collect();
        assert_eq!(names, ["Manhattan", "Euclidean", "Diagonal"]);
    }
}
