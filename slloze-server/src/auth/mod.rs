//! Authentication
//!
//! JWT issuance and verification, the user directory, and the Axum
//! middleware that turns a bearer token into a [`Principal`].

mod directory;
mod jwt;
mod middleware;
mod principal;

pub use directory::{UserDirectory, UserRecord, hash_password};
pub use jwt::{Claims, JwtConfig, JwtError, JwtService};
pub use middleware::{require_admin, require_auth};
pub use principal::Principal;
