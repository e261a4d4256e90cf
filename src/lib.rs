use shadow_rs::shadow;

shadow!(build);

// Search space and problems
// -------------------------
pub mod problem;
pub mod search;
pub mod space;

// Problems
// --------
pub mod heuristics;
pub mod problems;

// Algorithms
// ----------
pub mod algorithms;

// Experiments
// -----------
pub mod chart;
pub mod evaluation;
