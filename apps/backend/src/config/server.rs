use std::env;
use std::str::FromStr;

use crate::error::AppError;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3001;
pub const DEFAULT_IDLE_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_REAPER_INTERVAL_SECS: u64 = 15;

/// Runtime settings, read from the environment.
///
/// | Variable                   | Default   |
/// |----------------------------|-----------|
/// | `BACKEND_HOST`             | `0.0.0.0` |
/// | `BACKEND_PORT`             | `3001`    |
/// | `TAB_IDLE_TIMEOUT_SECS`    | `120`     |
/// | `TAB_REAPER_INTERVAL_SECS` | `15`      |
/// | `TAB_PASSWORD_PEPPER`      | empty     |
/// | `TAB_DICE_SEED`            | unset (OS entropy) |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub idle_timeout_secs: u64,
    pub reaper_interval_secs: u64,
    pub password_pepper: String,
    pub dice_seed: Option<u64>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            idle_timeout_secs: DEFAULT_IDLE_TIMEOUT_SECS,
            reaper_interval_secs: DEFAULT_REAPER_INTERVAL_SECS,
            password_pepper: String::new(),
            dice_seed: None,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the config from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let defaults = Self::default();
        let config = Self {
            host: lookup("BACKEND_HOST").unwrap_or(defaults.host),
            port: parsed(&lookup, "BACKEND_PORT")?.unwrap_or(defaults.port),
            idle_timeout_secs: parsed(&lookup, "TAB_IDLE_TIMEOUT_SECS")?
                .unwrap_or(defaults.idle_timeout_secs),
            reaper_interval_secs: parsed(&lookup, "TAB_REAPER_INTERVAL_SECS")?
                .unwrap_or(defaults.reaper_interval_secs),
            password_pepper: lookup("TAB_PASSWORD_PEPPER").unwrap_or_default(),
            dice_seed: parsed(&lookup, "TAB_DICE_SEED")?,
        };

        if config.idle_timeout_secs == 0 || config.reaper_interval_secs == 0 {
            return Err(AppError::config(
                "TAB_IDLE_TIMEOUT_SECS and TAB_REAPER_INTERVAL_SECS must be positive",
            ));
        }
        Ok(config)
    }

    pub fn idle_timeout(&self) -> time::Duration {
        time::Duration::seconds(i64::try_from(self.idle_timeout_secs).unwrap_or(i64::MAX))
    }

    pub fn reaper_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.reaper_interval_secs)
    }
}

fn parsed<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
) -> Result<Option<T>, AppError> {
    match lookup(name) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| AppError::config(format!("{name} must be a valid number, got '{raw}'"))),
    }
}
