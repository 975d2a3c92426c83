/*!
 * Conflict Graph Construction
 *
 * Builds the conflict graph used by both solvers: documented direct
 * drug-drug interactions, plus metabolic conflicts derived from shared
 * CYP450 enzyme roles (a substrate sharing an enzyme with an inhibitor or
 * inducer).
 */

use std::collections::{HashMap, HashSet};

use crate::config::MetabolicPolicy;
use crate::db::{canonical_pair, DrugId, EnzymeRole, StoreGateway};
use crate::utils::Result;

/// Why a pair of drugs conflicts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConflictKind {
    /// A documented direct drug-drug interaction.
    Direct,
    /// A derived CYP450 substrate/inhibitor or substrate/inducer pairing.
    Metabolic,
}

/// The full conflict graph for a candidate set: every conflicting pair and
/// the strongest kind of conflict each pair carries (direct conflicts take
/// precedence over metabolic ones for weighting purposes, matching the
/// union-of-sets behavior of the original solvers).
pub struct ConflictGraph {
    pub edges: HashMap<(DrugId, DrugId), ConflictKind>,
}

impl ConflictGraph {
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Per-drug adjacency: every drug this one conflicts with.
    pub fn adjacency(&self) -> HashMap<DrugId, HashSet<DrugId>> {
        let mut adj: HashMap<DrugId, HashSet<DrugId>> = HashMap::new();
        for (a, b) in self.edges.keys() {
            adj.entry(a.clone()).or_default().insert(b.clone());
            adj.entry(b.clone()).or_default().insert(a.clone());
        }
        adj
    }
}

/// Builds conflict graphs from the drug store.
pub struct ConflictBuilder<'a> {
    store: &'a StoreGateway<'a>,
}

impl<'a> ConflictBuilder<'a> {
    pub fn new(store: &'a StoreGateway<'a>) -> Self {
        Self { store }
    }

    pub async fn build(
        &self,
        candidates: &[DrugId],
        policy: MetabolicPolicy,
    ) -> Result<ConflictGraph> {
        if candidates.is_empty() {
            return Ok(ConflictGraph {
                edges: HashMap::new(),
            });
        }

        let direct = self.store.direct_interactions(candidates).await?;
        let roles = self.store.enzyme_roles(candidates).await?;
        let metabolic = metabolic_conflicts(&roles, policy);

        let mut edges = HashMap::new();
        for pair in metabolic {
            edges.insert(pair, ConflictKind::Metabolic);
        }
        // Direct interactions are inserted last so they win when a pair is
        // flagged by both mechanisms.
        for pair in direct {
            edges.insert(pair, ConflictKind::Direct);
        }

        Ok(ConflictGraph { edges })
    }
}

/// Whether an enzyme role's strength should count under `policy`.
fn strength_allowed(strength: Option<&str>, policy: MetabolicPolicy) -> bool {
    match policy {
        MetabolicPolicy::AllPairs => true,
        MetabolicPolicy::StrongOnly => strength
            .map(|s| s.to_lowercase().contains("strong"))
            .unwrap_or(false),
    }
}

/// Derive metabolic conflicts from a flat list of enzyme role rows.
///
/// Groups roles by enzyme, then pairs every substrate with every inhibitor
/// and every inducer recorded for that enzyme.
fn metabolic_conflicts(
    roles: &[EnzymeRole],
    policy: MetabolicPolicy,
) -> HashSet<(DrugId, DrugId)> {
    let mut substrates: HashMap<&str, Vec<&DrugId>> = HashMap::new();
    let mut inhibitors: HashMap<&str, Vec<(&DrugId, Option<&str>)>> = HashMap::new();
    let mut inducers: HashMap<&str, Vec<(&DrugId, Option<&str>)>> = HashMap::new();

    for role in roles {
        if role.action.contains("substrate") {
            substrates.entry(&role.enzyme_name).or_default().push(&role.drug);
        }
        if role.action.contains("inhibitor") {
            inhibitors
                .entry(&role.enzyme_name)
                .or_default()
                .push((&role.drug, role.inhibition_strength.as_deref()));
        }
        if role.action.contains("inducer") {
            inducers
                .entry(&role.enzyme_name)
                .or_default()
                .push((&role.drug, role.induction_strength.as_deref()));
        }
    }

    let mut conflicts = HashSet::new();

    for (enzyme, subs) in &substrates {
        if let Some(inhs) = inhibitors.get(enzyme) {
            for sub in subs {
                for (inh, strength) in inhs {
                    if sub != inh && strength_allowed(*strength, policy) {
                        conflicts.insert(canonical_pair((*sub).clone(), (*inh).clone()));
                    }
                }
            }
        }
        if let Some(inds) = inducers.get(enzyme) {
            for sub in subs {
                for (ind, strength) in inds {
                    if sub != ind && strength_allowed(*strength, policy) {
                        conflicts.insert(canonical_pair((*sub).clone(), (*ind).clone()));
                    }
                }
            }
        }
    }

    conflicts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn role(drug: &str, enzyme: &str, action: &str, strength: Option<&str>) -> EnzymeRole {
        EnzymeRole {
            drug: DrugId(drug.to_string()),
            enzyme_name: enzyme.to_string(),
            action: action.to_string(),
            inhibition_strength: strength.map(String::from),
            induction_strength: strength.map(String::from),
        }
    }

    #[test]
    fn test_substrate_inhibitor_pair_conflicts() {
        let roles = vec![
            role("DB1", "CYP3A4", "substrate", None),
            role("DB2", "CYP3A4", "inhibitor", Some("weak")),
        ];
        let conflicts = metabolic_conflicts(&roles, MetabolicPolicy::AllPairs);
        assert!(conflicts.contains(&canonical_pair(DrugId("DB1".into()), DrugId("DB2".into()))));
    }

    #[test]
    fn test_strong_only_policy_excludes_weak_inhibitors() {
        let roles = vec![
            role("DB1", "CYP3A4", "substrate", None),
            role("DB2", "CYP3A4", "inhibitor", Some("weak")),
        ];
        let conflicts = metabolic_conflicts(&roles, MetabolicPolicy::StrongOnly);
        assert!(conflicts.is_empty());
    }

    #[test]
    fn test_strong_only_policy_keeps_strong_inhibitors() {
        let roles = vec![
            role("DB1", "CYP3A4", "substrate", None),
            role("DB2", "CYP3A4", "inhibitor", Some("strong")),
        ];
        let conflicts = metabolic_conflicts(&roles, MetabolicPolicy::StrongOnly);
        assert_eq!(conflicts.len(), 1);
    }

    #[test]
    fn test_same_drug_is_never_a_conflict_with_itself() {
        let roles = vec![role("DB1", "CYP3A4", "substrate, inhibitor", None)];
        let conflicts = metabolic_conflicts(&roles, MetabolicPolicy::AllPairs);
        assert!(conflicts.is_empty());
    }

    #[test]
    fn test_adjacency_is_symmetric() {
        let mut edges = HashMap::new();
        edges.insert(
            canonical_pair(DrugId("A".into()), DrugId("B".into())),
            ConflictKind::Direct,
        );
        let graph = ConflictGraph { edges };
        let adj = graph.adjacency();
        assert!(adj[&DrugId("A".into())].contains(&DrugId("B".into())));
        assert!(adj[&DrugId("B".into())].contains(&DrugId("A".into())));
    }
}
