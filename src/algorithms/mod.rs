//! Implementation of search algorithms.
//!
//! - `astar` and `bfs` do path-finding on generic search spaces.
//! - `backtracking` solves the timetabling constraint problem.

pub mod astar;
pub mod backtracking;
pub mod bfs;
