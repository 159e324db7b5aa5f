use anyhow::Context;
use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::Path;
use tabsplit_core::{LedgerConfig, Money};

/// Output rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Text,
    Json,
}

/// CLI settings: built-in defaults, then `tabsplit.toml` (or `--config`),
/// then `TABSPLIT_*` environment variables
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Dust tolerance in minor units
    pub dust_tolerance: i64,

    /// Default tracing level when no `-v` flag is given
    pub log_level: String,

    pub format: OutputFormat,
}

impl Settings {
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let builder = Config::builder()
            .set_default("dust_tolerance", 0)?
            .set_default("log_level", "warn")?
            .set_default("format", "text")?;

        let builder = match path {
            Some(path) => builder.add_source(File::from(path)),
            None => builder.add_source(File::with_name("tabsplit").required(false)),
        };

        let settings: Settings = builder
            .add_source(Environment::with_prefix("TABSPLIT"))
            .build()
            .context("failed to read settings")?
            .try_deserialize()
            .context("invalid settings")?;

        anyhow::ensure!(
            settings.dust_tolerance >= 0,
            "dust_tolerance must not be negative, got {}",
            settings.dust_tolerance
        );

        Ok(settings)
    }

    pub fn ledger_config(&self) -> LedgerConfig {
        LedgerConfig {
            dust_tolerance: Money::new(self.dust_tolerance),
        }
    }
}
