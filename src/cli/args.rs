//! Defines the command-line arguments for the brz test binary.
//!
//! This module uses the `clap` crate with its "derive" feature to create a
//! declarative and type-safe argument parsing structure.

use crate::config::{BannerPolicy, HarnessConfig};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use termcolor::ColorChoice;

/// The main CLI argument structure.
#[derive(Debug, Parser)]
#[command(
    name = "brz",
    version,
    about = "Runs the brz unit tests, isolating fatal scenarios in subprocesses."
)]
pub struct BrzArgs {
    /// When to colour the pass/fail verdicts.
    #[arg(long, value_enum, default_value_t = ColorMode::Auto)]
    pub color: ColorMode,

    /// How the progress banner is kept out of captured uproc output.
    /// Overrides BRZ_BANNER_POLICY.
    #[arg(long, value_enum)]
    pub banner: Option<BannerMode>,

    /// Exit with status 1 when any test fails. Overrides BRZ_STRICT_EXIT.
    #[arg(long)]
    pub strict_exit: bool,

    /// List the registered tests in run order and exit.
    #[arg(long)]
    pub list: bool,

    /// Also write the run summary as JSON to this file.
    #[arg(long, value_name = "FILE")]
    pub summary_json: Option<PathBuf>,
}

impl BrzArgs {
    /// Layers the command-line overrides on top of `config`.
    pub fn apply(&self, config: &mut HarnessConfig) {
        if let Some(banner) = self.banner {
            config.uproc.banner = banner.into();
        }
        if self.strict_exit {
            config.strict_exit = true;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    Auto,
    Always,
    Never,
}

impl ColorMode {
    /// Resolves `auto` against whether stdout is a terminal.
    pub fn choice(self) -> ColorChoice {
        match self {
            ColorMode::Auto if atty::is(atty::Stream::Stdout) => ColorChoice::Auto,
            ColorMode::Auto | ColorMode::Never => ColorChoice::Never,
            ColorMode::Always => ColorChoice::Always,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BannerMode {
    Flush,
    Strip,
}

impl From<BannerMode> for BannerPolicy {
    fn from(mode: BannerMode) -> Self {
        match mode {
            BannerMode::Flush => BannerPolicy::Flush,
            BannerMode::Strip => BannerPolicy::Strip,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_config() {
        let args = BrzArgs::parse_from(["brz", "--banner", "strip", "--strict-exit"]);
        let mut config = HarnessConfig::default();
        args.apply(&mut config);
        assert_eq!(config.banner(), BannerPolicy::Strip);
        assert!(config.strict_exit);
    }

    #[test]
    fn test_absent_flags_keep_config() {
        let args = BrzArgs::parse_from(["brz"]);
        let mut config = HarnessConfig::default();
        config.strict_exit = true;
        args.apply(&mut config);
        assert_eq!(config.banner(), BannerPolicy::Flush);
        assert!(config.strict_exit);
        assert_eq!(args.color, ColorMode::Auto);
    }

    #[test]
    fn test_never_disables_color() {
        assert_eq!(ColorMode::Never.choice(), ColorChoice::Never);
        assert_eq!(ColorMode::Always.choice(), ColorChoice::Always);
    }
}
