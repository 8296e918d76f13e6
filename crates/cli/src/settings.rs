//! CLI configuration: optional TOML file overlaid by `RESEARCHCHAIN_*` variables.

use anyhow::{bail, Context, Result};
use config::{Config, ConfigError, Environment, File as ConfigFile};
use researchchain_files::pinata::{DEFAULT_PINATA_API_URL, DEFAULT_PINATA_GATEWAY_URL};
use researchchain_files::PinataConfig;
use researchchain_types::Address;
use researchchain_wallet::GasLimits;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const DEFAULT_CONFIG_PATH: &str = "researchchain.toml";
pub const ENV_PREFIX: &str = "RESEARCHCHAIN";
const DEFAULT_CHAIN_ID: u64 = 31337;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentBackend {
    Local,
    Pinata,
}

impl FromStr for ContentBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" => Ok(ContentBackend::Local),
            "pinata" => Ok(ContentBackend::Pinata),
            other => bail!("unknown content backend '{other}' (expected local or pinata)"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CliConfig {
    pub log_level: String,
    pub log_format: String,
    pub content_backend: ContentBackend,
    pub content_dir: PathBuf,
    pub registry_snapshot: PathBuf,
    pub pinata_api_url: String,
    pub pinata_gateway_url: String,
    pub pinata_api_key: Option<String>,
    pub pinata_secret_api_key: Option<String>,
    pub account: Option<Address>,
    pub chain_id: u64,
    pub gas: GasLimits,
}

impl CliConfig {
    pub fn load(config_path_override: Option<&Path>) -> Result<Self> {
        let resolved_path = match config_path_override {
            Some(path) => {
                if !path.exists() {
                    bail!(
                        "Configuration file {} not found (specified via --config)",
                        path.display()
                    );
                }
                Some(path.to_path_buf())
            }
            None => Some(PathBuf::from(DEFAULT_CONFIG_PATH)).filter(|p| p.exists()),
        };

        let mut builder = Config::builder();
        if let Some(path) = &resolved_path {
            builder = builder.add_source(ConfigFile::from(path.as_path()));
        }
        builder = builder.add_source(Environment::with_prefix(ENV_PREFIX));

        let config = builder.build().context("failed to read configuration")?;
        Self::from_config(&config)
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let string_or = |key: &str, default: &str| -> Result<String> {
            Ok(optional::<String>(config, key)?.unwrap_or_else(|| default.to_string()))
        };

        let defaults = GasLimits::default();
        let gas = GasLimits {
            publish: optional(config, "publish_gas_limit")?.unwrap_or(defaults.publish),
            pricing: optional(config, "pricing_gas_limit")?.unwrap_or(defaults.pricing),
        };

        let account = match optional::<String>(config, "account")? {
            Some(raw) if !raw.trim().is_empty() => Some(
                raw.parse::<Address>()
                    .with_context(|| format!("invalid account address '{raw}'"))?,
            ),
            _ => None,
        };

        let log_format = string_or("log_format", "pretty")?;
        if log_format != "pretty" && log_format != "json" {
            bail!("unknown log_format '{log_format}' (expected pretty or json)");
        }

        Ok(Self {
            log_level: string_or("log_level", "info")?,
            log_format,
            content_backend: string_or("content_backend", "local")?.parse()?,
            content_dir: PathBuf::from(string_or("content_dir", "./data/content")?),
            registry_snapshot: PathBuf::from(string_or(
                "registry_snapshot",
                "./data/registry.json",
            )?),
            pinata_api_url: string_or("pinata_api_url", DEFAULT_PINATA_API_URL)?,
            pinata_gateway_url: string_or("pinata_gateway_url", DEFAULT_PINATA_GATEWAY_URL)?,
            pinata_api_key: optional(config, "pinata_api_key")?,
            pinata_secret_api_key: optional(config, "pinata_secret_api_key")?,
            account,
            chain_id: optional(config, "chain_id")?.unwrap_or(DEFAULT_CHAIN_ID),
            gas,
        })
    }

    pub fn pinata(&self) -> Result<PinataConfig> {
        let api_key = self
            .pinata_api_key
            .clone()
            .context("pinata_api_key is required for the pinata backend")?;
        let secret = self
            .pinata_secret_api_key
            .clone()
            .context("pinata_secret_api_key is required for the pinata backend")?;

        let mut pinata = PinataConfig::new(api_key, secret);
        pinata.api_url = self.pinata_api_url.clone();
        pinata.gateway_url = self.pinata_gateway_url.clone();
        Ok(pinata)
    }
}

/// Value of `key`, or `None` when it is not set. A value of the wrong type
/// is an error.
fn optional<T: DeserializeOwned>(config: &Config, key: &str) -> Result<Option<T>> {
    match config.get::<T>(key) {
        Ok(value) => Ok(Some(value)),
        Err(ConfigError::NotFound(_)) => Ok(None),
        Err(e) => Err(e).with_context(|| format!("invalid value for {key}")),
    }
}

pub fn init_logging(config: &CliConfig) -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    if config.log_format == "json" {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .pretty()
                    .with_writer(std::io::stderr),
            )
            .init();
    }

    Ok(())
}
