/*!
 * Database Module
 *
 * Handles PostgreSQL database connection pooling and provides
 * database access utilities.
 */

pub mod pool;
pub mod store;

pub use pool::create_pool;
pub use store::{canonical_pair, Drug, DrugId, EnzymeRole, StoreGateway};
