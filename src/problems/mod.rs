//! Implementation of search spaces and problems.
//!
//! - `grid_2d`: 4-connected grids with obstacles, searched with A*.
//! - `timetable`: a small teacher/room/time-slot constraint problem, solved
//!   with backtracking.

pub mod grid_2d;
pub mod timetable;
