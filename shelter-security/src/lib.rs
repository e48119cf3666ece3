pub mod bearer;
pub mod caller;
pub mod config;
pub mod error;
pub mod guards;
pub mod jwt;
pub mod password;
pub mod permission;
pub mod role;
pub mod token;

pub use bearer::{bearer_from_headers, bearer_token};
pub use caller::{Caller, HasCaller};
pub use config::SecurityConfig;
pub use error::{AuthError, SecurityError};
pub use guards::{has_permission, has_role, require_authenticated, require_permission, require_role};
pub use jwt::{JwtValidator, TokenClaims};
pub use password::{hash_password, verify_password};
pub use permission::{permission_table, Permission};
pub use role::Role;
pub use token::{IssuedToken, TokenService};
