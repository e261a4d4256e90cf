//! Experiments comparing the search algorithms.
//!
//! - `heuristics`: A* on random grids with each heuristic.
//! - `timetable`: backtracking with and without forward checking.

pub mod heuristics;
pub mod timetable;
