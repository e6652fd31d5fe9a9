// Authentication module
// Decision: bearer tokens only; the frontend keeps the token client-side
// Decision: password resets are random tokens stored hashed, single-use

pub mod config;
pub mod extract;
pub mod jwt;
pub mod reset;
pub mod routes;

pub use config::AuthConfig;
pub use extract::{AdminUser, AuthState, CurrentUser};
pub use routes::routes;
