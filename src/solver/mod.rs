/*!
 * Regimen Solvers
 *
 * Assembles a minimal-cost, conflict-aware drug regimen from a candidate
 * set: an exact ILP formulation ([`ilp`]) and a greedy approximation
 * ([`greedy`]) that trades optimality for speed on large candidate sets.
 */

pub mod greedy;
pub mod ilp;

use serde::{Deserialize, Serialize};

use crate::db::{Drug, DrugId};

/// A drug selected into the final regimen, annotated with the conditions it
/// covers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegimenEntry {
    #[serde(flatten)]
    pub drug: Drug,
    pub covered_conditions: Vec<String>,
}

/// The outcome of a solve, from either solver.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolveResult {
    /// `"Success"` (ILP), `"Success (Greedy)"`, or `"No drugs found"` when
    /// the candidate set was empty.
    pub status: String,
    pub regimen: Vec<RegimenEntry>,
    pub total_cost: f64,
    pub conflict_count: f64,
    /// Conditions the store returned no candidates for at all — these can
    /// never be covered regardless of solver choice.
    pub warnings: Vec<String>,
}

/// Status string for an empty candidate set, shared by both solvers.
pub const STATUS_NO_DRUGS_FOUND: &str = "No drugs found";

fn covered_conditions(
    drug_id: &DrugId,
    conditions: &[String],
    coverage: &std::collections::HashMap<String, std::collections::HashSet<DrugId>>,
) -> Vec<String> {
    conditions
        .iter()
        .filter(|c| coverage.get(*c).map(|s| s.contains(drug_id)).unwrap_or(false))
        .cloned()
        .collect()
}
