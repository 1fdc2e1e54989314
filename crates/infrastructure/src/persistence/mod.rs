//! Persistence module
//!
//! SQLite storage for weather readings via sqlx.

pub mod async_connection;
pub mod error;
pub mod reading_store;

pub use async_connection::{AsyncDatabase, AsyncDatabaseConfig, AsyncDatabaseError};
pub use error::map_sqlx_error;
pub use reading_store::SqliteReadingStore;
