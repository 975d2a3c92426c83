/*!
 * Configuration Module
 *
 * Handles application configuration loading from environment variables
 * and provides structured access to configuration values.
 */

use std::time::Duration;

use anyhow::Context;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Database configuration
    pub database: DatabaseConfig,
    /// Solver weights and policy knobs
    pub weights: SolverWeights,
}

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,
    /// Maximum number of connections in the pool
    pub max_connections: u32,
    /// Minimum number of connections in the pool
    pub min_connections: u32,
    /// Connection acquire timeout in seconds
    pub acquire_timeout: Duration,
    /// Idle connection timeout in seconds
    pub idle_timeout: Duration,
    /// Maximum connection lifetime in seconds
    pub max_lifetime: Duration,
}

/// Whether a weak (as opposed to every) CYP450 inhibitor/inducer pairing
/// counts as a metabolic conflict.
///
/// The source data flags every substrate-inhibitor pair regardless of
/// `inhibition_strength`. Whether weak inhibitors should be excluded is an
/// open clinical question (see SPEC_FULL.md §9) — exposed as a policy knob
/// instead of guessed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetabolicPolicy {
    /// Flag every substrate/inhibitor or substrate/inducer pairing sharing
    /// an enzyme, regardless of documented strength. Matches the original
    /// behavior; this is the default.
    AllPairs,
    /// Only flag pairings where `inhibition_strength`/`induction_strength`
    /// indicates a strong effect.
    StrongOnly,
}

impl Default for MetabolicPolicy {
    fn default() -> Self {
        Self::AllPairs
    }
}

/// Tunable weights for both solvers.
///
/// Recognized configuration keys: `count`, `direct`, `metabolic`, `safety`,
/// `price`, `cover`, `conflict`. These are read from environment variables
/// rather than hard-coded so clinical tuning doesn't require a code change.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverWeights {
    /// ILP: per-drug count penalty (dominates, favors smaller regimens).
    pub count: f64,
    /// ILP: penalty for a co-selected pair with a documented direct interaction.
    pub direct: f64,
    /// ILP: penalty for a co-selected pair with a derived metabolic conflict.
    pub metabolic: f64,
    /// Both solvers: per-unit toxicity-score penalty.
    pub safety: f64,
    /// Both solvers: per-unit price penalty.
    pub price: f64,
    /// Greedy: reward per newly covered condition.
    pub cover: f64,
    /// Greedy: penalty per conflict with an already-selected drug.
    pub conflict: f64,
    /// Policy for which metabolic pairs count as conflicts.
    pub metabolic_policy: MetabolicPolicy,
}

impl Default for SolverWeights {
    fn default() -> Self {
        Self {
            count: 1000.0,
            direct: 500.0,
            metabolic: 300.0,
            safety: 5.0,
            price: 0.05,
            cover: 1000.0,
            conflict: 500.0,
            metabolic_policy: MetabolicPolicy::default(),
        }
    }
}

impl SolverWeights {
    /// Load weights from environment variables, falling back to the
    /// documented defaults for any key that is unset or fails to parse.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            count: env_f64("REGIMEN_WEIGHT_COUNT", defaults.count),
            direct: env_f64("REGIMEN_WEIGHT_DIRECT", defaults.direct),
            metabolic: env_f64("REGIMEN_WEIGHT_METABOLIC", defaults.metabolic),
            safety: env_f64("REGIMEN_WEIGHT_SAFETY", defaults.safety),
            price: env_f64("REGIMEN_WEIGHT_PRICE", defaults.price),
            cover: env_f64("REGIMEN_WEIGHT_COVER", defaults.cover),
            conflict: env_f64("REGIMEN_WEIGHT_CONFLICT", defaults.conflict),
            metabolic_policy: match std::env::var("REGIMEN_METABOLIC_POLICY").as_deref() {
                Ok("strong_only") => MetabolicPolicy::StrongOnly,
                _ => MetabolicPolicy::AllPairs,
            },
        }
    }
}

fn env_f64(key: &str, default: f64) -> f64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<f64>().ok())
        .unwrap_or(default)
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if required environment variables are missing
    /// or contain invalid values.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = Self {
            database: DatabaseConfig {
                url: std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
                max_connections: std::env::var("DATABASE_MAX_CONNECTIONS")
                    .unwrap_or_else(|_| "20".to_string())
                    .parse()
                    .unwrap_or(20),
                min_connections: std::env::var("DATABASE_MIN_CONNECTIONS")
                    .unwrap_or_else(|_| "5".to_string())
                    .parse()
                    .unwrap_or(5),
                acquire_timeout: Duration::from_secs(
                    std::env::var("DATABASE_CONNECT_TIMEOUT")
                        .unwrap_or_else(|_| "30".to_string())
                        .parse()
                        .unwrap_or(30),
                ),
                idle_timeout: Duration::from_secs(
                    std::env::var("DATABASE_IDLE_TIMEOUT")
                        .unwrap_or_else(|_| "600".to_string())
                        .parse()
                        .unwrap_or(600),
                ),
                max_lifetime: Duration::from_secs(
                    std::env::var("DATABASE_MAX_LIFETIME")
                        .unwrap_or_else(|_| "1800".to_string())
                        .parse()
                        .unwrap_or(1800),
                ),
            },

            weights: SolverWeights::from_env(),
        };

        Ok(config)
    }
}
