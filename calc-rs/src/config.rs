//! Runtime configuration resolved from flags and environment variables.
//!
//! | Variable | Meaning | Default |
//! |----------|---------|---------|
//! | `CALC_HEALTH_ADDR` | bind address of `calc-health` | `127.0.0.1:8000` |
//! | `CALC_LOG` | `tracing` filter directives | `warn` |

use std::net::SocketAddr;

use thiserror::Error;

pub const HEALTH_ADDR_ENV: &str = "CALC_HEALTH_ADDR";
pub const DEFAULT_HEALTH_ADDR: &str = "127.0.0.1:8000";

pub const LOG_ENV: &str = "CALC_LOG";
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Where a configuration value came from, for error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    Flag,
    Env,
    Default,
}

impl std::fmt::Display for Origin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Origin::Flag => write!(f, "--bind"),
            Origin::Env => write!(f, "{HEALTH_ADDR_ENV}"),
            Origin::Default => write!(f, "built-in default"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("invalid bind address {value:?} (from {origin}): {reason}")]
    BadAddress {
        value: String,
        origin: Origin,
        reason: String,
    },
}

/// Settings for the health-check server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HealthConfig {
    pub bind: SocketAddr,
}

impl HealthConfig {
    /// Resolve the bind address.
    ///
    /// Priority: `--bind` flag → `CALC_HEALTH_ADDR` → `127.0.0.1:8000`.
    /// A value that is present but unparsable is an error rather than a
    /// silent fall-through to the next source.
    pub fn resolve(flag: Option<&str>, env: Option<&str>) -> Result<Self, ConfigError> {
        let (value, origin) = match (flag, env) {
            (Some(v), _) => (v, Origin::Flag),
            (None, Some(v)) if !v.trim().is_empty() => (v, Origin::Env),
            _ => (DEFAULT_HEALTH_ADDR, Origin::Default),
        };
        let bind = value
            .trim()
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::BadAddress {
                value: value.to_owned(),
                origin,
                reason: e.to_string(),
            })?;
        Ok(HealthConfig { bind })
    }

    /// [`resolve`](Self::resolve) against the process environment.
    pub fn from_env(flag: Option<&str>) -> Result<Self, ConfigError> {
        let env = std::env::var(HEALTH_ADDR_ENV).ok();
        Self::resolve(flag, env.as_deref())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
