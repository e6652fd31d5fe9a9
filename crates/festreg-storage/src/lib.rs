// Postgres storage layer with sqlx
//
// The `Database` handle is constructed once at startup and passed down to
// the services; there is no global connection state.

pub mod models;
pub mod password;
pub mod repositories;

pub use models::*;
pub use password::{hash_password, verify_password};
pub use repositories::Database;
