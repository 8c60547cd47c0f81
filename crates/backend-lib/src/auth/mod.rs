// ============================
// backend-lib/src/auth/mod.rs
// ============================
//! Authentication module: password verification, signed session tokens,
//! session cookies and the gate that ties them together.

pub mod cookie;
pub mod credentials;
pub mod gate;
pub mod password;
pub mod token;

pub use cookie::{clear_cookie_header, cookie_value, session_cookie_header, session_token_from_headers};
pub use credentials::Credentials;
pub use gate::{AuthenticatedUser, GateState, IssuedSession, SessionGate, MAX_SESSION_TTL_SECS};
pub use password::{check_hash_format, hash_password, hash_password_secure, verify_password};
pub use token::{issue_token, validate_token, Claims, SessionKeys, DEFAULT_SESSION_TTL_SECS};
