//! External collaborators of the filter compiler: the saved filter store and
//! the query executor, plus their shared configuration.

pub mod config;
pub mod error;
pub mod executor;
pub mod retry;
pub mod store;

pub use config::StoreConfig;
pub use error::{ExecutorError, StoreError};
pub use executor::{HttpQueryExecutor, QueryExecutor};
pub use retry::{RetryError, RetryPolicy};
pub use store::{FilterStore, http::HttpFilterStore, memory::InMemoryFilterStore};
