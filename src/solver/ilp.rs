/*!
 * Exact ILP Solver
 *
 * Formulates regimen selection as a binary integer program and solves it
 * with `good_lp`'s pure-Rust `microlp` backend (no external solver
 * process).
 *
 * Variables:
 * - `x_i` (binary) per candidate drug: 1 if selected.
 * - `z_e` (binary) per conflict edge `(a, b)`: 1 if both `a` and `b` are
 *   selected.
 *
 * Objective (minimize):
 * `W_COUNT * sum(x_i) + sum(W(e) * z_e) + W_SAFETY * sum(x_i * toxicity_i)
 *  + W_PRICE * sum(x_i * price_i)`
 *
 * Constraints:
 * - Coverage: `sum(x_i for i in coverage[c]) >= 1` for every condition `c`
 *   with a non-empty coverage set.
 * - Conflict linearization: `z_e >= x_a + x_b - 1` for every conflict edge.
 */

use std::collections::HashMap;

use good_lp::solvers::microlp::microlp;
use good_lp::{constraint, variable, Expression, ProblemVariables, Solution, SolverModel, Variable};

use crate::candidates::CandidateSet;
use crate::config::SolverWeights;
use crate::conflicts::{ConflictGraph, ConflictKind};
use crate::db::DrugId;
use crate::utils::{OptimizerError, Result};

use super::{covered_conditions, RegimenEntry, SolveResult, STATUS_NO_DRUGS_FOUND};

/// Solve for the exact minimum-cost conflict-aware regimen covering
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

    let mut vars = ProblemVariables::new();

    let mut x_vars: HashMap<DrugId, Variable> = HashMap::new();
    for id in &candidate_set.candidates {
        x_vars.insert(id.clone(), vars.add(variable().binary()));
    }

    let mut z_vars: HashMap<(DrugId, DrugId), Variable> = HashMap::new();
    for pair in conflicts.edges.keys() {
        z_vars.insert(pair.clone(), vars.add(variable().binary()));
    }

    let mut objective = Expression::from(0.0);
    for id in &candidate_set.candidates {
        let x = x_vars[id];
        objective += x * weights.count;

        let drug = &candidate_set.drug_info[id];
        objective += x * (drug.toxicity_score * weights.safety);
        objective += x * (drug.price_val * weights.price);
    }
    for (pair, kind) in &conflicts.edges {
        let z = z_vars[pair];
        let weight = match kind {
            ConflictKind::Direct => weights.direct,
            ConflictKind::Metabolic => weights.metabolic,
        };
        objective += z * weight;
    }

    let mut model = vars.minimise(objective).using(microlp);

    let mut any_constrained = false;
    for condition in conditions {
        let Some(drugs) = candidate_set.coverage.get(condition) else {
            continue;
        };
        if drugs.is_empty() {
            continue;
        }
        any_constrained = true;
        let mut sum_expr = Expression::from(0.0);
        for drug_id in drugs {
            sum_expr += x_vars[drug_id];
        }
        model = model.with(constraint!(sum_expr >= 1.0));
    }

    for ((a, b), _kind) in &conflicts.edges {
        let z = z_vars[&(a.clone(), b.clone())];
        let xa = x_vars[a];
        let xb = x_vars[b];
        model = model.with(constraint!(z >= xa + xb - 1.0));
    }

    // No coverage constraints and no candidates worth selecting: the
    // trivial all-zero assignment is already optimal, skip the solve.
    if !any_constrained && conflicts.edges.is_empty() {
        return Ok(SolveResult {
            status: "Success".to_string(),
            regimen: Vec::new(),
            total_cost: 0.0,
            conflict_count: 0.0,
            warnings: candidate_set.uncovered.clone(),
        });
    }

    let solution = model
        .solve()
        .map_err(|e| OptimizerError::Infeasible(e.to_string()))?;

    let selected: Vec<&DrugId> = candidate_set
        .candidates
        .iter()
        .filter(|id| solution.value(x_vars[id]) > 0.5)
        .collect();

    let mut total_cost = 0.0;
    let mut regimen = Vec::with_capacity(selected.len());
    for id in &selected {
        let drug = candidate_set.drug_info[*id].clone();
        total_cost += drug.price_val;
        regimen.push(RegimenEntry {
            covered_conditions: covered_conditions(id, conditions, &candidate_set.coverage),
            drug,
        });
    }

    let conflict_count: f64 = conflicts
        .edges
        .keys()
        .map(|pair| solution.value(z_vars[pair]))
        .sum();

    Ok(SolveResult {
        status: "Success".to_string(),
        regimen,
        total_cost,
        conflict_count,
        warnings: candidate_set.uncovered.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conflicts::ConflictKind;
    use crate::db::Drug;
    use std::collections::HashSet;

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

    #[test]
    fn test_substrate_inhibitor_conflict_selects_exactly_one() {
        // A (substrate) and B (inhibitor) both cover "headache"; the direct
        // conflict between them means the count penalty alone already
        // favors picking just one, so z never needs to be 1 at optimum.
        let set = candidate_set(
            vec![drug("A", 1.0, 1.0), drug("B", 1.0, 1.0)],
            vec![("headache", vec!["A", "B"])],
        );
        let mut edges = HashMap::new();
        edges.insert(
            (DrugId("A".to_string()), DrugId("B".to_string())),
            ConflictKind::Metabolic,
        );
        let conflicts = ConflictGraph { edges };
        let weights = SolverWeights::default();
        let result = solve(&["headache".to_string()], &set, &conflicts, &weights).unwrap();
        assert_eq!(result.status, "Success");
        assert_eq!(result.regimen.len(), 1);
        assert_eq!(result.conflict_count, 0.0);
    }

    #[test]
    fn test_direct_conflict_across_distinct_conditions_selects_both() {
        // A and B each uniquely cover a distinct condition, so both must be
        // selected regardless of their direct interaction with each other.
        let set = candidate_set(
            vec![drug("A", 1.0, 1.0), drug("B", 1.0, 1.0)],
            vec![("headache", vec!["A"]), ("fever", vec!["B"])],
        );
        let mut edges = HashMap::new();
        edges.insert(
            (DrugId("A".to_string()), DrugId("B".to_string())),
            ConflictKind::Direct,
        );
        let conflicts = ConflictGraph { edges };
        let weights = SolverWeights::default();
        let result = solve(
            &["headache".to_string(), "fever".to_string()],
            &set,
            &conflicts,
            &weights,
        )
        .unwrap();
        assert_eq!(result.regimen.len(), 2);
        assert_eq!(result.conflict_count, 1.0);
    }
}
