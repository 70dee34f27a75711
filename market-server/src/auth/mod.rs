//! Authentication module
//!
//! JWT issuance and validation, Argon2 password hashing, and the Axum
//! middleware gating the API by role.

pub mod extractor;
pub mod jwt;
pub mod middleware;
pub mod password;

pub use jwt::{Claims, CurrentUser, JwtConfig, JwtError, JwtService};
pub use middleware::{require_admin, require_auth, require_customer, require_driver};
