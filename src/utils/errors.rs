/*!
 * Error Handling
 *
 * Defines the library-wide error type returned by every public operation.
 */

use thiserror::Error;

/// Library result type
pub type Result<T> = std::result::Result<T, OptimizerError>;

/// Errors produced while fetching candidates, building conflicts, or solving.
#[derive(Debug, Error)]
pub enum OptimizerError {
    /// A database query against the drug store failed.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The ILP solver failed to find a feasible assignment.
    #[error("ILP solver could not find a feasible solution: {0}")]
    Infeasible(String),

    /// No conditions were supplied to optimize over.
    #[error("no conditions supplied")]
    NoConditions,

    /// A condition yielded no drug candidates and no coverage constraint
    /// could be built for it.
    #[error("no candidates found for condition: {0}")]
    NoCandidates(String),
}
