//! Persistence layer — durable local storage for the onboarding payload.

pub mod libsql_backend;
pub mod traits;

pub use libsql_backend::LibSqlStore;
pub use traits::LocalStore;
