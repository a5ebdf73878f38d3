//! Harness configuration.
//!
//! A [`HarnessConfig`] is assembled once at startup (defaults, then the
//! `BRZ_*` environment, then command-line overrides) and installed process-wide
//! with [`install`]. Test functions reach it through [`current`] when they
//! create uprocs, so the runner and the capture primitive always agree on the
//! banner policy.

use crate::errors::ConfigError;
use once_cell::sync::OnceCell;
use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

pub const ENV_TIMEOUT_MS: &str = "BRZ_UPROC_TIMEOUT_MS";
pub const ENV_RETRIES: &str = "BRZ_UPROC_RETRIES";
pub const ENV_BANNER_POLICY: &str = "BRZ_BANNER_POLICY";
pub const ENV_STRICT_EXIT: &str = "BRZ_STRICT_EXIT";

const DEFAULT_READY_TIMEOUT: Duration = Duration::from_millis(100);
const DEFAULT_READY_RETRIES: u32 = 3;

static INSTALLED: OnceCell<HarnessConfig> = OnceCell::new();

/// How the runner's progress line is kept out of a uproc's captured stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BannerPolicy {
    /// Flush the progress line before each test and stdio before each fork.
    /// Nothing needs stripping.
    #[default]
    Flush,
    /// Leave the progress line buffered. The child inherits it and writes it
    /// into the pipe on exit, so the parent drops `18 + name.len()` bytes.
    Strip,
}

impl BannerPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            BannerPolicy::Flush => "flush",
            BannerPolicy::Strip => "strip",
        }
    }
}

impl fmt::Display for BannerPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BannerPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "flush" => Ok(BannerPolicy::Flush),
            "strip" => Ok(BannerPolicy::Strip),
            other => Err(format!("expected `flush` or `strip`, got `{other}`")),
        }
    }
}

/// Knobs for the output-readiness wait after a uproc exits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UprocConfig {
    /// How long to wait for a pipe to become readable.
    pub ready_timeout: Duration,
    /// How many interrupted readiness waits are retried before giving up.
    pub ready_retries: u32,
    pub banner: BannerPolicy,
}

impl Default for UprocConfig {
    fn default() -> Self {
        Self {
            ready_timeout: DEFAULT_READY_TIMEOUT,
            ready_retries: DEFAULT_READY_RETRIES,
            banner: BannerPolicy::default(),
        }
    }
}

/// Configuration for a whole run.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HarnessConfig {
    pub uproc: UprocConfig,
    /// Exit with status 1 when any test fails. Off by default, so a run
    /// reports failures but still exits 0.
    pub strict_exit: bool,
}

impl HarnessConfig {
    pub fn banner(&self) -> BannerPolicy {
        self.uproc.banner
    }

    /// Defaults overlaid with any `BRZ_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Like [`HarnessConfig::from_env`] but reads variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&'static str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(ENV_TIMEOUT_MS) {
            let millis: u64 = parse_var(ENV_TIMEOUT_MS, &raw)?;
            config.uproc.ready_timeout = Duration::from_millis(millis);
        }
        if let Some(raw) = lookup(ENV_RETRIES) {
            config.uproc.ready_retries = parse_var(ENV_RETRIES, &raw)?;
        }
        if let Some(raw) = lookup(ENV_BANNER_POLICY) {
            config.uproc.banner = parse_var(ENV_BANNER_POLICY, &raw)?;
        }
        if let Some(raw) = lookup(ENV_STRICT_EXIT) {
            config.strict_exit = parse_flag(ENV_STRICT_EXIT, &raw)?;
        }

        Ok(config)
    }
}

fn parse_var<T>(var: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: ToString,
{
    raw.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
        var,
        value: raw.to_string(),
        reason: e.to_string(),
    })
}

fn parse_flag(var: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            var,
            value: raw.to_string(),
            reason: "expected a boolean flag".to_string(),
        }),
    }
}

// ============================================================================
// PROCESS-WIDE CONFIGURATION
// ============================================================================

/// Installs `config` for the rest of the process. Only the first call wins.
pub fn install(config: HarnessConfig) -> Result<&'static HarnessConfig, ConfigError> {
    let mut fresh = false;
    let installed = INSTALLED.get_or_init(|| {
        fresh = true;
        config
    });
    if fresh {
        Ok(installed)
    } else {
        Err(ConfigError::AlreadyInstalled)
    }
}

/// The installed configuration, or the defaults if nothing was installed.
pub fn current() -> &'static HarnessConfig {
    INSTALLED.get_or_init(HarnessConfig::default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&'static str, &str)]) -> impl Fn(&'static str) -> Option<String> {
        let map: HashMap<&'static str, String> =
            pairs.iter().map(|(k, v)| (*k, v.to_string())).collect();
        move |var| map.get(var).cloned()
    }

    #[test]
    fn test_defaults_without_environment() {
        let config = HarnessConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config, HarnessConfig::default());
        assert_eq!(config.banner(), BannerPolicy::Flush);
        assert_eq!(config.uproc.ready_timeout, Duration::from_millis(100));
        assert!(!config.strict_exit);
    }

    #[test]
    fn test_environment_overrides() {
        let config = HarnessConfig::from_lookup(lookup_from(&[
            (ENV_TIMEOUT_MS, "250"),
            (ENV_RETRIES, "7"),
            (ENV_BANNER_POLICY, "Strip"),
            (ENV_STRICT_EXIT, "yes"),
        ]))
        .unwrap();
        assert_eq!(config.uproc.ready_timeout, Duration::from_millis(250));
        assert_eq!(config.uproc.ready_retries, 7);
        assert_eq!(config.banner(), BannerPolicy::Strip);
        assert!(config.strict_exit);
    }

    #[test]
    fn test_invalid_values_are_reported() {
        let err = HarnessConfig::from_lookup(lookup_from(&[(ENV_TIMEOUT_MS, "soon")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { var: ENV_TIMEOUT_MS, .. }));

        let err = HarnessConfig::from_lookup(lookup_from(&[(ENV_BANNER_POLICY, "hide")])).unwrap_err();
        assert!(err.to_string().contains("hide"));

        let err = HarnessConfig::from_lookup(lookup_from(&[(ENV_STRICT_EXIT, "maybe")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { var: ENV_STRICT_EXIT, .. }));
    }
}
