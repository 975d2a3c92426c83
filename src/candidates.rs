/*!
 * Candidate Fetching
 *
 * Aggregates drug candidates, condition coverage, and drug attributes
 * across every condition in a request.
 */

use std::collections::{HashMap, HashSet};

use crate::conditions::ConditionMapper;
use crate::db::{Drug, DrugId, StoreGateway};
use crate::utils::Result;

/// The result of fetching candidates for a set of conditions.
pub struct CandidateSet {
    /// Every distinct drug returned for any condition.
    pub candidates: Vec<DrugId>,
    /// Condition name -> set of drugs whose indication text matched it.
    pub coverage: HashMap<String, HashSet<DrugId>>,
    /// Drug attributes, keyed by id.
    pub drug_info: HashMap<DrugId, Drug>,
    /// Conditions for which the store returned no candidates at all.
    pub uncovered: Vec<String>,
}

/// Fetches and aggregates drug candidates for a list of conditions.
pub struct CandidateFetcher<'a> {
    store: &'a StoreGateway<'a>,
}

impl<'a> CandidateFetcher<'a> {
    pub fn new(store: &'a StoreGateway<'a>) -> Self {
        Self { store }
    }

    pub async fn fetch(&self, conditions: &[String]) -> Result<CandidateSet> {
        let all_conditions_text = conditions.join(" ").to_lowercase();

        // Insertion order, not hash order: the solvers (greedy in
        // particular) break ties by iteration order over `candidates`, so
        // that order has to be stable across repeated solves of the same
        // input rather than following a randomly-seeded hasher.
        let mut seen: HashSet<DrugId> = HashSet::new();
        let mut candidates: Vec<DrugId> = Vec::new();
        let mut coverage: HashMap<String, HashSet<DrugId>> = HashMap::new();
        let mut drug_info: HashMap<DrugId, Drug> = HashMap::new();
        let mut uncovered = Vec::new();

        for condition in conditions {
            let search_terms = ConditionMapper::search_terms(condition, &all_conditions_text);
            let exclusion_terms = ConditionMapper::exclusion_terms(condition, &all_conditions_text);
            let route_filter = ConditionMapper::route_filter(condition);

            let drugs = self
                .store
                .fetch_candidates(&search_terms, &exclusion_terms, route_filter)
                .await?;

            if drugs.is_empty() {
                tracing::warn!(
                    condition = condition.as_str(),
                    ?search_terms,
                    "no drugs found for condition"
                );
                uncovered.push(condition.clone());
            }

            let entry = coverage.entry(condition.clone()).or_default();
            for drug in drugs {
                entry.insert(drug.id.clone());
                if seen.insert(drug.id.clone()) {
                    candidates.push(drug.id.clone());
                }
                drug_info.entry(drug.id.clone()).or_insert(drug);
            }
        }

        Ok(CandidateSet {
            candidates,
            coverage,
            drug_info,
            uncovered,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Drug;

    fn drug(id: &str) -> Drug {
        Drug {
            id: DrugId(id.to_string()),
            name: id.to_string(),
            description: None,
            toxicity_score: 10.0,
            price_val: 1.0,
            half_life_hours: 4.0,
        }
    }

    #[test]
    fn test_candidate_set_tracks_coverage_and_info_independently() {
        let mut coverage: HashMap<String, HashSet<DrugId>> = HashMap::new();
        let mut drug_info: HashMap<DrugId, Drug> = HashMap::new();
        let d = drug("DB00001");

        coverage
            .entry("hypertension".to_string())
            .or_default()
            .insert(d.id.clone());
        drug_info.insert(d.id.clone(), d.clone());

        let set = CandidateSet {
            candidates: vec![d.id.clone()],
            coverage,
            drug_info,
            uncovered: vec![],
        };

        assert!(set.coverage["hypertension"].contains(&d.id));
        assert_eq!(set.drug_info[&d.id].name, "DB00001");
        assert!(set.uncovered.is_empty());
    }
}
