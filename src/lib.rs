/*!
 * Regimen Optimizer - Library Interface
 *
 * Builds a minimal-cost, conflict-aware drug regimen for a set of
 * conditions against a read-only drug interaction store: condition
 * mapping, candidate fetching, conflict graph construction, and the ILP
 * and greedy solvers.
 *
 * The CLI entry point lives in `src/bin/solve.rs`.
 */

// Public module declarations
pub mod candidates;
pub mod conditions;
pub mod config;
pub mod conflicts;
pub mod db;
pub mod solver;
pub mod text;
pub mod utils;
