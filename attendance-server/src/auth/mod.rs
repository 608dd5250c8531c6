//! Authentication: JWT issuing and validation, bearer middleware, rate limiting

pub mod jwt;
pub mod middleware;
pub mod rate_limit;

pub use jwt::{CurrentUser, JwtConfig, JwtError, JwtService};
pub use middleware::{require_admin, require_auth};
