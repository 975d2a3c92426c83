/*!
 * Drug Store Gateway
 *
 * Read-only access to the drug interaction store: indication search,
 * direct drug-drug interactions, and CYP450 enzyme roles. All queries are
 * parameterized; the only values ever interpolated into SQL text are fixed
 * internal route tokens (`"oral"` / `"topical"` / `"ophthalmic"`), never
 * caller-supplied search or exclusion terms.
 */

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use sqlx::{PgPool, QueryBuilder};

use crate::utils::Result;

/// DrugBank identifier, e.g. `"DB00001"`.
///
/// The store keys drugs by this free-text identifier rather than a UUID, so
/// it's modeled as a thin string newtype instead of reusing a UUID-based
/// domain key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DrugId(pub String);

impl fmt::Display for DrugId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for DrugId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// A candidate drug and the numeric attributes the solvers need.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Drug {
    pub id: DrugId,
    pub name: String,
    pub description: Option<String>,
    /// Derived from toxicity text length and half-life; see [`crate::text::toxicity_score`].
    pub toxicity_score: f64,
    pub price_val: f64,
    pub half_life_hours: f64,
}

struct CandidateRow {
    drugbank_id: String,
    name: String,
    description: Option<String>,
    toxicity_text: Option<String>,
    cost: Option<String>,
    half_life: Option<String>,
}

struct InteractionPairRow {
    drugbank_id: String,
    target_drug_id: String,
}

struct EnzymeRoleRow {
    drugbank_id: String,
    enzyme_name: Option<String>,
    action: Option<String>,
    inhibition_strength: Option<String>,
    induction_strength: Option<String>,
}

/// Gateway over the read-only drug store.
pub struct StoreGateway<'a> {
    pool: &'a PgPool,
}

impl<'a> StoreGateway<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Fetch approved drugs whose indication text matches any of
    /// `search_terms`, restricted by an optional administration route and a
    /// set of exclusion terms checked against indication, MOA, and
    /// description text.
    ///
    /// `route_filter` must be one of the fixed internal route tokens
    /// (`"oral"`, `"topical"`, `"ophthalmic"`) produced by
    /// [`crate::conditions::ConditionMapper::route_filter`] — never a value
    /// derived from user input.
    pub async fn fetch_candidates(
        &self,
        search_terms: &[String],
        exclusion_terms: &[&str],
        route_filter: Option<&str>,
    ) -> Result<Vec<Drug>> {
        if search_terms.is_empty() {
            return Ok(Vec::new());
        }

        let mut qb: QueryBuilder<sqlx::Postgres> = QueryBuilder::new(
            "SELECT d.drugbank_id, d.name, d.description, t.toxicity_text, p.cost, d.half_life \
             FROM indications i \
             JOIN drugs d ON i.drugbank_id = d.drugbank_id \
             LEFT JOIN toxicity t ON d.drugbank_id = t.drugbank_id \
             LEFT JOIN prices p ON d.drugbank_id = p.drugbank_id \
             WHERE (",
        );

        for (idx, term) in search_terms.iter().enumerate() {
            if idx > 0 {
                qb.push(" OR ");
            }
            qb.push("i.indication_text ILIKE ")
                .push_bind(format!("%{term}%"));
        }
        qb.push(")");

        for term in exclusion_terms {
            qb.push(" AND (i.indication_text NOT ILIKE ")
                .push_bind(format!("%{term}%"))
                .push(" AND d.moa NOT ILIKE ")
                .push_bind(format!("%{term}%"))
                .push(" AND d.description NOT ILIKE ")
                .push_bind(format!("%{term}%"))
                .push(")");
        }

        qb.push(
            " AND d.groups ILIKE '%approved%' \
              AND d.groups NOT ILIKE '%vet_approved%' \
              AND d.groups NOT ILIKE '%withdrawn%'",
        );

        if let Some(route) = route_filter {
            qb.push(
                " AND EXISTS (SELECT 1 FROM dosages dos \
                  WHERE dos.drugbank_id = d.drugbank_id AND dos.route ILIKE ",
            )
            .push_bind(format!("%{route}%"))
            .push(")");
        }

        let rows: Vec<CandidateRow> = qb
            .build_query_as()
            .fetch_all(self.pool)
            .await
            .map_err(crate::utils::OptimizerError::Database)?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let half_life_hours = crate::text::parse_half_life_hours(row.half_life.as_deref());
                Drug {
                    id: DrugId(row.drugbank_id),
                    name: row.name,
                    description: row.description,
                    toxicity_score: crate::text::toxicity_score(
                        row.toxicity_text.as_deref(),
                        half_life_hours,
                    ),
                    price_val: crate::text::parse_price(row.cost.as_deref()),
                    half_life_hours,
                }
            })
            .collect())
    }

    /// Documented direct drug-drug interactions among `candidates`,
    /// canonicalized as sorted pairs.
    pub async fn direct_interactions(
        &self,
        candidates: &[DrugId],
    ) -> Result<HashSet<(DrugId, DrugId)>> {
        if candidates.is_empty() {
            return Ok(HashSet::new());
        }
        let ids: Vec<&str> = candidates.iter().map(|d| d.0.as_str()).collect();

        let rows: Vec<InteractionPairRow> = sqlx::query_as!(
            InteractionPairRow,
            r#"
            SELECT drugbank_id, target_drug_id
            FROM interactions
            WHERE drugbank_id = ANY($1) AND target_drug_id = ANY($1)
            "#,
            &ids as &[&str]
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| canonical_pair(DrugId(row.drugbank_id), DrugId(row.target_drug_id)))
            .collect())
    }

    /// CYP450 enzyme roles recorded for `candidates`, restricted to human
    /// (or unspecified-organism) rows.
    pub async fn enzyme_roles(&self, candidates: &[DrugId]) -> Result<Vec<EnzymeRole>> {
        if candidates.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<&str> = candidates.iter().map(|d| d.0.as_str()).collect();

        let rows: Vec<EnzymeRoleRow> = sqlx::query_as!(
            EnzymeRoleRow,
            r#"
            SELECT drugbank_id, enzyme_name, action, inhibition_strength, induction_strength
            FROM enzymes
            WHERE drugbank_id = ANY($1)
              AND (organism = 'Humans' OR organism IS NULL OR organism = '')
            "#,
            &ids as &[&str]
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| EnzymeRole {
                drug: DrugId(row.drugbank_id),
                enzyme_name: row.enzyme_name.unwrap_or_default(),
                action: row.action.unwrap_or_default().to_lowercase(),
                inhibition_strength: row.inhibition_strength,
                induction_strength: row.induction_strength,
            })
            .collect())
    }
}

/// A single drug/enzyme role record (substrate, inhibitor, and/or inducer
/// roles are reported as separate rows per drug/enzyme pair).
#[derive(Debug, Clone)]
pub struct EnzymeRole {
    pub drug: DrugId,
    pub enzyme_name: String,
    pub action: String,
    pub inhibition_strength: Option<String>,
    pub induction_strength: Option<String>,
}

/// Order a drug pair deterministically so `(a, b)` and `(b, a)` hash to the
/// same set entry.
pub fn canonical_pair(a: DrugId, b: DrugId) -> (DrugId, DrugId) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}
