//! Regimen Solve CLI
//!
//! Runs the regimen optimizer against a set of conditions and prints the
//! selected regimen.
//!
//! Usage:
//!   regimen-solve --ilp "hypertension" "gerd"
//!   regimen-solve --greedy --json "bacterial infection" "fever"
//!
//! Reads `DATABASE_URL` (and the `REGIMEN_WEIGHT_*` / `REGIMEN_METABOLIC_POLICY`
//! overrides documented in `regimen_optimizer::config`) from the environment
//! or a `.env` file.

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use regimen_optimizer::candidates::CandidateFetcher;
use regimen_optimizer::config::Config;
use regimen_optimizer::conflicts::ConflictBuilder;
use regimen_optimizer::db::{create_pool, StoreGateway};
use regimen_optimizer::solver::{greedy, ilp, SolveResult, STATUS_NO_DRUGS_FOUND};

/// Solve a drug regimen for a list of conditions.
#[derive(Debug, Parser)]
#[command(name = "regimen-solve", version, about)]
struct Cli {
    /// Conditions to cover, e.g. "hypertension" "gerd"
    #[arg(required = true)]
    conditions: Vec<String>,

    /// Use the exact ILP solver instead of the greedy approximation.
    #[arg(long, conflicts_with = "greedy")]
    ilp: bool,

    /// Use the greedy approximate solver (default).
    #[arg(long, conflicts_with = "ilp")]
    greedy: bool,

    /// Print the result as JSON instead of a human-readable summary.
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("regimen_solve=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let config = Config::from_env().context("failed to load configuration")?;

    info!("connecting to drug store...");
    let pool = create_pool(&config.database)
        .await
        .context("failed to connect to drug store")?;
    info!("connected");

    let store = StoreGateway::new(&pool);

    let candidate_set = CandidateFetcher::new(&store)
        .fetch(&cli.conditions)
        .await
        .context("failed to fetch candidates")?;

    if candidate_set.candidates.is_empty() {
        info!("no candidate drugs found for any condition");
        let result = SolveResult {
            status: STATUS_NO_DRUGS_FOUND.to_string(),
            regimen: Vec::new(),
            total_cost: 0.0,
            conflict_count: 0.0,
            warnings: candidate_set.uncovered,
        };
        print_result(&result, cli.json)?;
        return Ok(());
    }

    let conflicts = ConflictBuilder::new(&store)
        .build(&candidate_set.candidates, config.weights.metabolic_policy)
        .await
        .context("failed to build conflict graph")?;

    let result = if cli.ilp {
        ilp::solve(&cli.conditions, &candidate_set, &conflicts, &config.weights)
    } else {
        greedy::solve(&cli.conditions, &candidate_set, &conflicts, &config.weights)
    }
    .context("solver failed")?;

    for warning in &result.warnings {
        tracing::warn!(condition = warning.as_str(), "condition could not be covered");
    }

    print_result(&result, cli.json)?;

    Ok(())
}

fn print_result(result: &SolveResult, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(result)?);
        return Ok(());
    }

    println!(
        "{} — {} drugs, total cost ${:.2}, {} conflicts:",
        result.status,
        result.regimen.len(),
        result.total_cost,
        result.conflict_count
    );
    for entry in &result.regimen {
        println!(
            "  {} ({}) — covers: {}",
            entry.drug.name,
            entry.drug.id,
            entry.covered_conditions.join(", ")
        );
    }

    Ok(())
}
