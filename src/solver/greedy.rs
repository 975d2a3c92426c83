/*!
 * Greedy Approximate Solver
 *
 * Iteratively selects the candidate with the best marginal score — new
 * condition coverage rewarded, conflicts with already-selected drugs,
 * toxicity, and price penalized — until every coverable condition is
 * covered or no further candidate helps. Trades optimality for speed
 * relative to [`super::ilp`].
 */

use std::collections::{HashMap, HashSet};

use crate::candidates::CandidateSet;
use crate::config::SolverWeights;
use crate::conflicts::ConflictGraph;
use crate::db::DrugId;
use crate::utils::Result;

use super::{covered_conditions, RegimenEntry, SolveResult, STATUS_NO_DRUGS_FOUND};

/// Solve for an approximate minimum-cost conflict-aware regimen covering
/// `conditions`.
pub fn solve(
    conditions: &[String],
    candidate_set: &CandidateSet,
    conflicts: &ConflictGraph,
    weights: &SolverWeights,
) -> Result<SolveResult> {
    if candidate_set.candidates.is_empty() {
        return Ok(SolveResult {
            status: STATUS_NO_DRUGS_FOUND.to_string(),
            regimen: Vec::new(),
            total_cost: 0.0,
            conflict_count: 0.0,
            warnings: candidate_set.uncovered.clone(),
        });
    }

    let adjacency = conflicts.adjacency();

    let mut uncovered: HashSet<String> = conditions
        .iter()
        .filter(|c| {
            candidate_set
                .coverage
                .get(*c)
                .map(|s| !s.is_empty())
                .unwrap_or(false)
        })
        .cloned()
        .collect();

    let mut selected: Vec<DrugId> = Vec::new();
    let mut selected_set: HashSet<DrugId> = HashSet::new();
    let mut total_conflicts_found: f64 = 0.0;

    while !uncovered.is_empty() {
        let mut best_candidate: Option<&DrugId> = None;
        let mut best_score = f64::NEG_INFINITY;

        for drug_id in &candidate_set.candidates {
            if selected_set.contains(drug_id) {
                continue;
            }
            let new_coverage_count = uncovered
                .iter()
                .filter(|c| {
                    candidate_set
                        .coverage
                        .get(*c)
                        .map(|s| s.contains(drug_id))
                        .unwrap_or(false)
                })
                .count();
            if new_coverage_count == 0 {
                continue;
            }

            let current_conflicts = adjacency
                .get(drug_id)
                .map(|neighbors| neighbors.intersection(&selected_set).count())
                .unwrap_or(0);

            let drug = &candidate_set.drug_info[drug_id];
            let score = (new_coverage_count as f64 * weights.cover)
                - (current_conflicts as f64 * weights.conflict)
                - (drug.toxicity_score * weights.safety)
                - (drug.price_val * weights.price);

            if score > best_score {
                best_score = score;
                best_candidate = Some(drug_id);
            }
        }

        let Some(best_candidate) = best_candidate else {
            break;
        };
        let best_candidate = best_candidate.clone();

        let covered_now: Vec<String> = uncovered
            .iter()
            .filter(|c| {
                candidate_set
                    .coverage
                    .get(*c)
                    .map(|s| s.contains(&best_candidate))
                    .unwrap_or(false)
            })
            .cloned()
            .collect();

        if let Some(neighbors) = adjacency.get(&best_candidate) {
            total_conflicts_found += neighbors.intersection(&selected_set).count() as f64;
        }

        selected_set.insert(best_candidate.clone());
        selected.push(best_candidate);
        for c in covered_now {
            uncovered.remove(&c);
        }
    }

    let mut total_cost = 0.0;
    let mut regimen = Vec::with_capacity(selected.len());
    for id in &selected {
        let drug = candidate_set.drug_info[id].clone();
        total_cost += drug.price_val;
        regimen.push(RegimenEntry {
            covered_conditions: covered_conditions(id, conditions, &candidate_set.coverage),
            drug,
        });
    }

    Ok(SolveResult {
        status: "Success (Greedy)".to_string(),
        regimen,
        total_cost,
        conflict_count: total_conflicts_found,
        warnings: candidate_set.uncovered.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Drug;

    fn drug(id: &str, toxicity: f64, price: f64) -> Drug {
        Drug {
            id: DrugId(id.to_string()),
            name: id.to_string(),
            description: None,
            toxicity_score: toxicity,
            price_val: price,
            half_life_hours: 4.0,
        }
    }

    fn candidate_set(drugs: Vec<Drug>, coverage: Vec<(&str, Vec<&str>)>) -> CandidateSet {
        let mut coverage_map: HashMap<String, HashSet<DrugId>> = HashMap::new();
        for (condition, ids) in coverage {
            coverage_map.insert(
                condition.to_string(),
                ids.into_iter().map(|id| DrugId(id.to_string())).collect(),
            );
        }
        let mut drug_info = HashMap::new();
        let mut candidates = Vec::new();
        for d in drugs {
            candidates.push(d.id.clone());
            drug_info.insert(d.id.clone(), d);
        }
        CandidateSet {
            candidates,
            coverage: coverage_map,
            drug_info,
            uncovered: Vec::new(),
        }
    }

    #[test]
    fn test_greedy_picks_cheaper_drug_when_coverage_is_equal() {
        let set = candidate_set(
            vec![drug("DB1", 10.0, 50.0), drug("DB2", 10.0, 1.0)],
            vec![("headache", vec!["DB1", "DB2"])],
        );
        let conflicts = ConflictGraph {
            edges: HashMap::new(),
        };
        let weights = SolverWeights::default();
        let result = solve(&["headache".to_string()], &set, &conflicts, &weights).unwrap();
        assert_eq!(result.regimen.len(), 1);
        assert_eq!(result.regimen[0].drug.id, DrugId("DB2".to_string()));
    }

    #[test]
    fn test_greedy_stops_when_no_candidate_covers_remaining_condition() {
        let set = candidate_set(
            vec![drug("DB1", 1.0, 1.0)],
            vec![("headache", vec!["DB1"]), ("gout", vec![])],
        );
        let conflicts = ConflictGraph {
            edges: HashMap::new(),
        };
        let weights = SolverWeights::default();
        let result = solve(
            &["headache".to_string(), "gout".to_string()],
            &set,
            &conflicts,
            &weights,
        )
        .unwrap();
        assert_eq!(result.regimen.len(), 1);
    }

    #[test]
    fn test_empty_candidate_set_reports_no_drugs_found() {
        let set = candidate_set(vec![], vec![]);
        let conflicts = ConflictGraph {
            edges: HashMap::new(),
        };
        let weights = SolverWeights::default();
        let result = solve(&["depression".to_string()], &set, &conflicts, &weights).unwrap();
        assert_eq!(result.status, "No drugs found");
        assert!(result.regimen.is_empty());
        assert_eq!(result.total_cost, 0.0);
    }
}
