/*!
 * Condition Mapping
 *
 * Translates a free-text condition name into the indication search terms,
 * preferred administration route, and indication/MOA/description exclusion
 * terms used to fetch drug candidates from the store.
 */

/// Maps a condition name to search terms, route preference, and exclusions.
///
/// Stateless; all category rules live in the associated functions below.
pub struct ConditionMapper;

impl ConditionMapper {
    /// Indication-text search terms for a condition.
    ///
    /// `all_conditions_text` is the lowercased, space-joined text of every
    /// condition in the current request — needed because the hypertension
    /// category changes its term set when asthma/COPD is also present (beta
    /// blockers are relatively contraindicated there).
    pub fn search_terms(condition: &str, all_conditions_text: &str) -> Vec<String> {
        let c_lower = condition.to_lowercase();
        let c_lower = c_lower.trim();

        // Bacterial/infection: no generic "antibiotic" term, it over-matches
        // unrelated drugs (e.g. Acetohydroxamic acid).
        if c_lower.contains("bacterial") || c_lower.contains("infection") {
            return [
                "penicillin",
                "cephalosporin",
                "fluoroquinolone",
                "macrolide",
                "tetracycline",
                "sulfonamide",
                "aminoglycoside",
                "carbapenem",
                "nitroimidazole",
                "quinolone",
                "lincomycin",
                "glycopeptide",
            ]
            .into_iter()
            .map(String::from)
            .collect();
        }

        if c_lower.contains("fungal") || c_lower.contains("fungus") || c_lower.contains("yeast") {
            return ["antifungal", "azole", "echinocandin", "allylamine"]
                .into_iter()
                .map(String::from)
                .collect();
        }

        if c_lower.contains("gerd") || c_lower.contains("reflux") {
            return [
                "gastroesophageal",
                "proton pump inhibitor",
                "antacid",
                "h2 antagonist",
            ]
            .into_iter()
            .map(String::from)
            .collect();
        }

        if c_lower.contains("stomach") || c_lower.contains("gastric") {
            return [
                "antacid",
                "proton pump inhibitor",
                "h2 antagonist",
                "gastric",
            ]
            .into_iter()
            .map(String::from)
            .collect();
        }

        if c_lower.contains("hypertension") || c_lower.contains("blood pressure") {
            if all_conditions_text.contains("asthma") || all_conditions_text.contains("copd") {
                return [
                    "antihypertensive",
                    "ace inhibitor",
                    "calcium channel blocker",
                    "diuretic",
                    "angiotensin",
                ]
                .into_iter()
                .map(String::from)
                .collect();
            }
            return [
                "antihypertensive",
                "ace inhibitor",
                "beta blocker",
                "calcium channel blocker",
                "diuretic",
            ]
            .into_iter()
            .map(String::from)
            .collect();
        }

        if c_lower.contains("headache") || c_lower.contains("migraine") {
            return [
                "migraine",
                "acetaminophen",
                "paracetamol",
                "triptan",
                "nsaid",
                "salicylate",
            ]
            .into_iter()
            .map(String::from)
            .collect();
        }

        // Generic category additions: start from the condition text itself
        // and layer in synonyms for any category it also matches.
        let mut terms = vec![c_lower.to_string()];

        if c_lower.contains("pain") || c_lower.contains("ache") {
            terms.extend(
                ["analgesic", "antinociceptive", "nsaid", "acetaminophen", "paracetamol"]
                    .map(String::from),
            );
        }
        if c_lower.contains("fever") {
            terms.extend(["antipyretic", "pyrexia", "acetaminophen", "paracetamol"].map(String::from));
        }
        if c_lower.contains("diabetes") {
            terms.extend(
                ["hypoglycemic", "antidiabetic", "insulin", "biguanide", "sulfonylurea"]
                    .map(String::from),
            );
        }
        if c_lower.contains("anxiety") {
            terms.extend(["anxiolytic", "benzodiazepine"].map(String::from));
        }
        if c_lower.contains("insomnia") {
            terms.extend(["sedative", "hypnotic", "sleep"].map(String::from));
        }
        if c_lower.contains("cholesterol") {
            terms.extend(["statin", "lipid-lowering", "fibrates"].map(String::from));
        }
        // Ensures Mianserin/SSRIs are found correctly.
        if c_lower.contains("depression") {
            terms.extend(
                ["antidepressant", "ssri", "snri", "tricyclic", "tetracyclic", "mao inhibitor"]
                    .map(String::from),
            );
        }

        terms.sort();
        terms.dedup();
        terms
    }

    /// Preferred administration route filter for a condition, or `None` for
    /// no route constraint.
    pub fn route_filter(condition: &str) -> Option<&'static str> {
        let c_lower = condition.to_lowercase();

        let systemic_indicators = [
            "headache",
            "back pain",
            "fever",
            "diabetes",
            "hypertension",
            "cholesterol",
            "gerd",
            "stomach",
            "anxiety",
            "insomnia",
            "bacterial",
            "infection",
            "depression",
        ];
        if systemic_indicators.iter().any(|x| c_lower.contains(x)) {
            return Some("oral");
        }

        if ["eye", "ocular", "glaucoma"].iter().any(|x| c_lower.contains(x)) {
            return Some("ophthalmic");
        }
        if ["skin", "rash", "dermatitis", "topical", "itch", "fungal"]
            .iter()
            .any(|x| c_lower.contains(x))
        {
            return Some("topical");
        }

        Some("oral")
    }

    /// Indication/MOA/description exclusion terms for a condition, given
    /// the lowercased text of every condition in the current request.
    pub fn exclusion_terms(condition: &str, all_conditions_text: &str) -> Vec<&'static str> {
        let c_lower = condition.to_lowercase();
        let mut exclusions = Vec::new();

        if !c_lower.contains("cancer") && !c_lower.contains("tumor") && !c_lower.contains("chemo")
        {
            exclusions.extend(["cancer", "carcinoma", "metastatic", "chemotherapy", "palliation"]);
        }

        if c_lower.contains("pain") || c_lower.contains("headache") || c_lower.contains("ache") {
            exclusions.extend(["anesthetic", "numbing", "local anesthesia"]);
        }

        if all_conditions_text.contains("asthma") || all_conditions_text.contains("copd") {
            exclusions.extend(["beta blocker", "beta-adrenergic", "beta-blocker", "beta antagonist"]);
        }

        exclusions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bacterial_terms_exclude_generic_antibiotic() {
        let terms = ConditionMapper::search_terms("bacterial infection", "bacterial infection");
        assert!(terms.contains(&"penicillin".to_string()));
        assert!(!terms.iter().any(|t| t == "antibiotic"));
    }

    #[test]
    fn test_hypertension_drops_beta_blocker_with_asthma() {
        let all_text = "hypertension asthma";
        let terms = ConditionMapper::search_terms("hypertension", all_text);
        assert!(!terms.iter().any(|t| t == "beta blocker"));
        assert!(terms.iter().any(|t| t == "angiotensin"));
    }

    #[test]
    fn test_hypertension_keeps_beta_blocker_without_asthma() {
        let terms = ConditionMapper::search_terms("hypertension", "hypertension");
        assert!(terms.iter().any(|t| t == "beta blocker"));
    }

    #[test]
    fn test_depression_adds_antidepressant_terms() {
        let terms = ConditionMapper::search_terms("depression", "depression");
        assert!(terms.iter().any(|t| t == "ssri"));
        assert!(terms.iter().any(|t| t == "antidepressant"));
    }

    #[test]
    fn test_route_filter_systemic_vs_topical_vs_fungal() {
        assert_eq!(ConditionMapper::route_filter("headache"), Some("oral"));
        assert_eq!(ConditionMapper::route_filter("glaucoma"), Some("ophthalmic"));
        assert_eq!(ConditionMapper::route_filter("skin rash"), Some("topical"));
        // The systemic-indicator check runs first and includes "infection",
        // so any condition naming both an infection and a fungal/topical
        // term (e.g. "fungal infection") routes to oral, not topical.
        assert_eq!(ConditionMapper::route_filter("fungal infection"), Some("oral"));
    }

    #[test]
    fn test_exclusion_terms_skip_cancer_filter_for_oncology_conditions() {
        let exclusions = ConditionMapper::exclusion_terms("metastatic cancer", "metastatic cancer");
        assert!(!exclusions.contains(&"cancer"));
    }

    #[test]
    fn test_exclusion_terms_add_beta_blocker_with_copd() {
        let exclusions = ConditionMapper::exclusion_terms("hypertension", "hypertension copd");
        assert!(exclusions.contains(&"beta blocker"));
    }
}
