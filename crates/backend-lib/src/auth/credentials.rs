//! The single account this deployment serves.
use std::fmt;

use zeroize::Zeroizing;

/// Credential record loaded once at start and never mutated.
#[derive(Clone)]
pub struct Credentials {
    username: String,
    password_hash: String,
    signing_secret: Zeroizing<Vec<u8>>,
}

impl Credentials {
    pub fn new(username: String, password_hash: String, signing_secret: Vec<u8>) -> Self {
        Self {
            username,
            password_hash,
            signing_secret: Zeroizing::new(signing_secret),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// PHC string of the account password
    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }

    pub fn signing_secret(&self) -> &[u8] {
        &self.signing_secret
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password_hash", &"<redacted>")
            .field("signing_secret", &"<redacted>")
            .finish()
    }
}
