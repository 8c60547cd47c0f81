// ============================
// backend-lib/src/config.rs
// ============================
//! Configuration management.
use std::fmt;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    value::{Uncased, UncasedStr},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::auth::{check_hash_format, Credentials, DEFAULT_SESSION_TTL_SECS, MAX_SESSION_TTL_SECS};

/// Prefix of environment overrides, nested with `__`
pub const ENV_PREFIX: &str = "BATCLOUD_";

/// Config file read when no explicit path is given
pub const DEFAULT_CONFIG_FILE: &str = "batcloud.toml";

/// Default session cookie name
pub const DEFAULT_COOKIE_NAME: &str = "batcloud_token";

/// Default upload cap (100 MiB)
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 100 * 1024 * 1024;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Deployment variables of the original setup, read without a prefix
const LEGACY_ENV_KEYS: [&str; 3] = ["MY_USERNAME", "MY_PASSWORD_HASH", "JWT_SECRET"];

/// Opaque strings: environment values for these keys are never parsed as
/// numbers or booleans.
const VERBATIM_KEYS: [&str; 3] = ["auth.username", "auth.password_hash", "auth.signing_secret"];

/// Application settings
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    /// Server bind address
    pub bind_addr: SocketAddr,
    /// Log level
    pub log_level: String,
    /// File store settings
    pub storage: StorageSettings,
    /// Account and session settings
    pub auth: AuthSettings,
}

/// File store settings
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Directory holding the user's files
    pub root: PathBuf,
    /// Largest accepted request body on the upload route
    pub max_upload_bytes: usize,
}

/// The single account and its session parameters
#[derive(Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AuthSettings {
    pub username: String,
    /// PHC string (`$argon2id$...`, `$scrypt$...`) or bcrypt (`$2b$...`)
    pub password_hash: String,
    pub signing_secret: String,
    /// Session TTL in seconds
    pub session_ttl_secs: u64,
    pub cookie_name: String,
    /// Emit the `Secure` cookie attribute
    pub secure_cookie: bool,
}

impl fmt::Debug for AuthSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthSettings")
            .field("username", &self.username)
            .field("password_hash", &"<redacted>")
            .field("signing_secret", &"<redacted>")
            .field("session_ttl_secs", &self.session_ttl_secs)
            .field("cookie_name", &self.cookie_name)
            .field("secure_cookie", &self.secure_cookie)
            .finish()
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            log_level: "info".to_string(),
            storage: StorageSettings::default(),
            auth: AuthSettings::default(),
        }
    }
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            root: PathBuf::from("data"),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            username: String::new(),
            password_hash: String::new(),
            signing_secret: String::new(),
            session_ttl_secs: DEFAULT_SESSION_TTL_SECS,
            cookie_name: DEFAULT_COOKIE_NAME.to_string(),
            secure_cookie: true,
        }
    }
}

impl Settings {
    /// Check that the settings describe a usable deployment
    pub fn validate(&self) -> Result<()> {
        if !LOG_LEVELS.contains(&self.log_level.to_ascii_lowercase().as_str()) {
            bail!("invalid log level `{}`", self.log_level);
        }
        if self.storage.max_upload_bytes == 0 {
            bail!("storage.max_upload_bytes must be greater than zero");
        }

        let auth = &self.auth;
        if auth.username.is_empty() {
            bail!("auth.username is not configured");
        }
        if auth.password_hash.is_empty() {
            bail!("auth.password_hash is not configured");
        }
        check_hash_format(&auth.password_hash)
            .map_err(|e| anyhow::anyhow!("auth.password_hash is not usable: {e}"))?;
        if auth.signing_secret.is_empty() {
            bail!("auth.signing_secret is not configured");
        }
        if auth.session_ttl_secs == 0 || auth.session_ttl_secs > MAX_SESSION_TTL_SECS {
            bail!("auth.session_ttl_secs must be between 1 and {MAX_SESSION_TTL_SECS}");
        }
        if auth.cookie_name.is_empty()
            || !auth.cookie_name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            bail!("auth.cookie_name `{}` is not a valid cookie name", auth.cookie_name);
        }
        Ok(())
    }

    /// Immutable credential record for the session gate
    pub fn credentials(&self) -> Credentials {
        Credentials::new(
            self.auth.username.clone(),
            self.auth.password_hash.clone(),
            self.auth.signing_secret.as_bytes().to_vec(),
        )
    }
}

/// Load settings from defaults, an optional TOML file and the environment.
///
/// Later sources win: defaults, then the file, then the legacy
/// `MY_USERNAME`/`MY_PASSWORD_HASH`/`JWT_SECRET` variables, then
/// `BATCLOUD_*` variables.
pub fn load_settings(path: Option<&Path>) -> Result<Settings> {
    let file = path.map_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE), Path::to_path_buf);
    if path.is_some() && !file.exists() {
        bail!("config file {} does not exist", file.display());
    }

    let figment = Figment::from(Serialized::defaults(Settings::default())).merge(Toml::file(&file));
    let figment = merge_env(figment, Env::raw().only(&LEGACY_ENV_KEYS).map(legacy_env_key));
    let settings = merge_env(figment, Env::prefixed(ENV_PREFIX).split("__"))
        .extract()
        .with_context(|| format!("loading settings (file: {})", file.display()))?;

    Ok(settings)
}

/// Merge `env`, then re-merge its credential values as plain strings so
/// `JWT_SECRET=0123` stays `"0123"` instead of becoming the integer 123.
fn merge_env(figment: Figment, env: Env) -> Figment {
    let verbatim: Vec<(String, String)> = env
        .iter()
        .map(|(key, value)| (key.as_str().to_ascii_lowercase(), value))
        .filter(|(key, _)| VERBATIM_KEYS.contains(&key.as_str()))
        .collect();

    verbatim
        .into_iter()
        .fold(figment.merge(env), |figment, (key, value)| {
            figment.merge(Serialized::default(&key, value))
        })
}

fn legacy_env_key(key: &UncasedStr) -> Uncased<'_> {
    if key == "MY_USERNAME" {
        "auth.username".into()
    } else if key == "MY_PASSWORD_HASH" {
        "auth.password_hash".into()
    } else if key == "JWT_SECRET" {
        "auth.signing_secret".into()
    } else {
        key.into()
    }
}

#[cfg(test)]
mod config_tests;
