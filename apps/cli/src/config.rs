//! CLI configuration
//!
//! Sources, lowest precedence first:
//! 1. built-in defaults
//! 2. `groove.toml` in the working directory (or the file given by `--config`)
//! 3. environment variables `GROOVE__<SECTION>__<KEY>`, after loading `.env`

use std::path::Path;

use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError, Environment, File};
use groove_client::BackendConfig;
use groove_query::CompilerConfig;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub compiler: CompilerConfig,
    pub backend: BackendConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter level when `RUST_LOG` is unset.
    pub level: String,
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            json: false,
        }
    }
}

impl Config {
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        // A missing .env file is fine.
        let _ = dotenvy::dotenv();

        let builder = config::Config::builder();
        let builder = match path {
            Some(path) => builder.add_source(File::from(path).required(true)),
            None => builder.add_source(File::with_name("groove").required(false)),
        };
        Self::build(builder.add_source(
            Environment::with_prefix("GROOVE")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        ))
    }

    fn build(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        builder.build()?.try_deserialize()
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        self.compiler.validate()?;
        self.backend.validate()?;
        if !matches!(
            self.logging.level.to_ascii_lowercase().as_str(),
            "trace" | "debug" | "info" | "warn" | "error" | "off"
        ) {
            anyhow::bail!("Unknown logging level '{}'", self.logging.level);
        }
        Ok(())
    }
}
