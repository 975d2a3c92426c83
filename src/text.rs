/*!
 * Text Normalization
 *
 * Parses the free-text numeric fields carried by the drug store (price
 * strings, half-life descriptions) into the numbers the solvers need.
 */

use once_cell::sync::Lazy;
use regex::Regex;

static NUMBER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+(\.\d+)?)").unwrap());
static NON_NUMERIC_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\d.]").unwrap());

/// Strip a currency/unit string down to its numeric value.
///
/// Returns `0.0` for missing, empty, or unparseable input.
pub fn parse_price(raw: Option<&str>) -> f64 {
    let Some(raw) = raw else { return 0.0 };
    let cleaned = NON_NUMERIC_RE.replace_all(raw, "");
    cleaned.parse::<f64>().unwrap_or(0.0)
}

/// Parse a half-life description (e.g. `"5-7 hours"`, `"2 days"`, `"45
/// minutes"`) into a value in hours.
///
/// Returns `0.0` for missing or unparseable input. The first decimal number
/// found in the string is taken as the magnitude; the unit is inferred from
/// the substrings `"day"` and `"minute"` (case-insensitive), defaulting to
/// hours otherwise.
pub fn parse_half_life_hours(raw: Option<&str>) -> f64 {
    let Some(raw) = raw else { return 0.0 };
    let Some(captures) = NUMBER_RE.captures(raw) else {
        return 0.0;
    };
    let Ok(value) = captures[1].parse::<f64>() else {
        return 0.0;
    };

    let lower = raw.to_lowercase();
    if lower.contains("day") {
        value * 24.0
    } else if lower.contains("minute") {
        value / 60.0
    } else {
        value
    }
}

/// Derive the toxicity score used by both solvers from a toxicity
/// description and a parsed half-life.
///
/// Absent toxicity text is treated as a fixed penalty (`500` characters'
/// worth) rather than zero, so drugs with no recorded toxicity profile
/// aren't scored as perfectly safe.
pub fn toxicity_score(toxicity_text: Option<&str>, half_life_hours: f64) -> f64 {
    let tox_chars = toxicity_text.map(str::len).unwrap_or(500) as f64;
    (tox_chars / 10.0) + (half_life_hours * 0.5)
}
