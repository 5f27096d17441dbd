use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::contracts::execution::ExecutionSettings;
use crate::error::{StarportError, StarportResult};

/// Environment variable that overrides the secret file.
pub const PRIVATE_KEY_ENV: &str = "STARPORT_PRIVATE_KEY";

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub settings: Settings,
    /// `[[chains]]` entries. Names are values, not table keys, so their case
    /// survives the `config` crate's key normalisation.
    #[serde(default)]
    pub chains: Vec<ChainDetails>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct Settings {
    pub secret_path: PathBuf,
    pub interface_path: PathBuf,
    pub gas_limit: Option<u64>,
    pub receipt_poll_interval_ms: u64,
}

/// One `[[chains]]` entry as it appears in the configuration source.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct ChainDetails {
    pub name: String,
    pub rpc_endpoint: String,
    pub chain_id: u64,
    pub contract_address: String,
    pub abi_path: PathBuf,
    pub cross_chain_contract_address: String,
    pub interface_name: String,
}

/// A fully resolved chain: the configuration entry plus its name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkConfig {
    pub chain_name: String,
    pub rpc_endpoint: String,
    pub chain_id: u64,
    pub contract_address: String,
    pub abi_path: PathBuf,
    pub cross_chain_contract_address: String,
    pub interface_name: String,
}

impl NetworkConfig {
    pub fn from_details(details: &ChainDetails) -> Self {
        Self {
            chain_name: details.name.clone(),
            rpc_endpoint: details.rpc_endpoint.clone(),
            chain_id: details.chain_id,
            contract_address: details.contract_address.clone(),
            abi_path: details.abi_path.clone(),
            cross_chain_contract_address: details.cross_chain_contract_address.clone(),
            interface_name: details.interface_name.clone(),
        }
    }
}

impl AppConfig {
    /// Load from `path` when given, otherwise from `config/default.*` if present,
    /// layered with `STARPORT__`-prefixed environment variables.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        tracing::info!("Loading configuration...");

        let builder = config::Config::builder();
        let builder = match path {
            Some(path) => builder.add_source(config::File::from(path).required(true)),
            None => builder.add_source(config::File::with_name("config/default").required(false)),
        };

        let settings = builder
            .add_source(
                config::Environment::with_prefix("STARPORT")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("Failed to read configuration sources")?;

        let config: AppConfig = settings
            .try_deserialize()
            .context("Configuration does not match the expected layout")?;
        config.validate()?;

        tracing::info!("Final configuration:");
        tracing::info!("  Chains: {:?}", config.chain_names());
        tracing::info!("  Interface document: {}", config.settings.interface_path.display());
        match config.settings.gas_limit {
            Some(limit) => tracing::info!("  Gas limit: {}", limit),
            None => tracing::info!("  Gas limit: node estimate"),
        }

        Ok(config)
    }

    /// Chain names must be non-empty and unique.
    pub fn validate(&self) -> StarportResult<()> {
        let mut seen = HashSet::new();
        for chain in &self.chains {
            if chain.name.is_empty() {
                return Err(StarportError::InvalidConfig(format!(
                    "chain with id {} has an empty name",
                    chain.chain_id
                )));
            }
            if !seen.insert(chain.name.as_str()) {
                return Err(StarportError::InvalidConfig(format!(
                    "chain {} is configured more than once",
                    chain.name
                )));
            }
        }
        Ok(())
    }

    pub fn chain_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.chains.iter().map(|c| c.name.as_str()).collect();
        names.sort_unstable();
        names
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            secret_path: PathBuf::from(".secret"),
            interface_path: PathBuf::from("config/interface.json"),
            gas_limit: None,
            receipt_poll_interval_ms: 1000,
        }
    }
}

impl Settings {
    pub fn execution(&self) -> ExecutionSettings {
        ExecutionSettings {
            gas_limit: self.gas_limit,
            receipt_poll_interval: Duration::from_millis(self.receipt_poll_interval_ms),
        }
    }

    /// Read the signing key, preferring the environment override to the secret file.
    ///
    /// The returned string is key material: callers hand it straight to the signer
    /// and must not log it.
    pub fn load_private_key(&self) -> StarportResult<String> {
        if let Ok(private_key) = std::env::var(PRIVATE_KEY_ENV) {
            tracing::info!("Signing key taken from {}", PRIVATE_KEY_ENV);
            return Ok(private_key.trim().to_string());
        }

        let raw = std::fs::read_to_string(&self.secret_path).map_err(|e| {
            StarportError::Secret(format!("cannot read {}: {}", self.secret_path.display(), e))
        })?;
        let key = raw.trim();
        if key.is_empty() {
            return Err(StarportError::Secret(format!(
                "{} is empty",
                self.secret_path.display()
            )));
        }

        tracing::info!("Signing key loaded from {}", self.secret_path.display());
        Ok(key.to_string())
    }
}

/// Interface document: interface name to a table of method keys and the
/// method names the destination chain exposes for them.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct InterfaceTable(HashMap<String, HashMap<String, String>>);

impl InterfaceTable {
    pub fn load(path: &Path) -> StarportResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            StarportError::InvalidConfig(format!(
                "cannot read interface document {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_json(&raw).map_err(|e| match e {
            StarportError::InvalidConfig(reason) => {
                StarportError::InvalidConfig(format!("{}: {}", path.display(), reason))
            }
            other => other,
        })
    }

    pub fn from_json(raw: &str) -> StarportResult<Self> {
        serde_json::from_str(raw).map_err(|e| {
            StarportError::InvalidConfig(format!("malformed interface document: {}", e))
        })
    }

    pub fn contains(&self, interface: &str) -> bool {
        self.0.contains_key(interface)
    }

    pub fn method(&self, interface: &str, key: &str) -> Option<&str> {
        self.0.get(interface)?.get(key).map(String::as_str)
    }
}
