use std::collections::HashMap;
use tracing::{info, warn};

use crate::config::{AppConfig, NetworkConfig};
use crate::error::{StarportError, StarportResult};

/// Read-only table of the configured chains, keyed by exact (case-sensitive) name.
#[derive(Debug, Clone, Default)]
pub struct ChainRegistry {
    networks: HashMap<String, NetworkConfig>,
}

impl ChainRegistry {
    pub fn from_config(config: &AppConfig) -> Self {
        let networks = config
            .chains
            .iter()
            .map(|details| (details.name.clone(), NetworkConfig::from_details(details)))
            .collect();

        Self { networks }
    }

    pub fn from_networks(networks: impl IntoIterator<Item = NetworkConfig>) -> Self {
        Self {
            networks: networks
                .into_iter()
                .map(|network| (network.chain_name.clone(), network))
                .collect(),
        }
    }

    /// Resolve a chain name to its configuration.
    ///
    /// A miss is reported as [`StarportError::ConfigNotFound`] so the caller can
    /// abort before any network I/O.
    pub fn resolve(&self, chain_name: &str) -> StarportResult<&NetworkConfig> {
        if chain_name.is_empty() {
            warn!("Empty chain name requested");
            return Err(StarportError::ConfigNotFound(String::new()));
        }

        match self.networks.get(chain_name) {
            Some(network) => {
                info!("🔗 Resolved chain {} (chain id {})", chain_name, network.chain_id);
                Ok(network)
            }
            None => {
                warn!(
                    "Config of chain ({}) not exists; known chains: {:?}",
                    chain_name,
                    self.names()
                );
                Err(StarportError::ConfigNotFound(chain_name.to_string()))
            }
        }
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.networks.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.networks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.networks.is_empty()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::path::PathBuf;

    pub(crate) fn network(name: &str, chain_id: u64) -> NetworkConfig {
        NetworkConfig {
            chain_name: name.to_string(),
            rpc_endpoint: "http://localhost:8545".to_string(),
            chain_id,
            contract_address: "0x5FC8d32690cc91D4c39d9d3abcBD16989F875707".to_string(),
            abi_path: PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/abi/Starport.json")),
            cross_chain_contract_address: "0x9fE46736679d2D9a65F0992F2272dE9f3c7fa6e0".to_string(),
            interface_name: "EVM".to_string(),
        }
    }

    #[test]
    fn test_resolve_known_chains() {
        let rinkeby = network("rinkeby", 4);
        let local = network("local", 31337);
        let registry = ChainRegistry::from_networks([rinkeby.clone(), local.clone()]);

        assert_eq!(registry.resolve("rinkeby").unwrap(), &rinkeby);
        assert_eq!(registry.resolve("local").unwrap(), &local);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_resolve_is_case_sensitive() {
        let registry = ChainRegistry::from_networks([network("rinkeby", 4)]);

        match registry.resolve("Rinkeby") {
            Err(StarportError::ConfigNotFound(name)) => assert_eq!(name, "Rinkeby"),
            other => panic!("expected ConfigNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_resolve_unknown_and_empty() {
        let registry = ChainRegistry::from_networks([network("rinkeby", 4)]);

        assert!(matches!(registry.resolve("moonbase"), Err(StarportError::ConfigNotFound(_))));
        assert!(matches!(registry.resolve(""), Err(StarportError::ConfigNotFound(_))));
    }

    #[test]
    fn test_from_app_config() {
        let config = AppConfig {
            settings: Default::default(),
            chains: vec![crate::config::ChainDetails {
                name: "local".to_string(),
                rpc_endpoint: "http://localhost:8545".to_string(),
                chain_id: 31337,
                contract_address: "0x5FC8d32690cc91D4c39d9d3abcBD16989F875707".to_string(),
                abi_path: PathBuf::from("abi/Starport.json"),
                cross_chain_contract_address: "0x9fE46736679d2D9a65F0992F2272dE9f3c7fa6e0"
                    .to_string(),
                interface_name: "EVM".to_string(),
            }],
        };

        let registry = ChainRegistry::from_config(&config);
        let resolved = registry.resolve("local").unwrap();
        assert_eq!(resolved.chain_name, "local");
        assert_eq!(resolved.chain_id, 31337);
        assert_eq!(registry.names(), vec!["local"]);
    }

    #[test]
    fn test_mixed_case_chain_resolves_through_config() {
        let config: AppConfig = config::Config::builder()
            .add_source(config::File::from_str(
                r#"
                [[chains]]
                name = "chainA"
                rpc_endpoint = "http://127.0.0.1:8545"
                chain_id = 31337
                contract_address = "0x5FC8d32690cc91D4c39d9d3abcBD16989F875707"
                abi_path = "abi/Starport.json"
                cross_chain_contract_address = "0x9fE46736679d2D9a65F0992F2272dE9f3c7fa6e0"
                interface_name = "EVM"
                "#,
                config::FileFormat::Toml,
            ))
            .build()
            .expect("config builds")
            .try_deserialize()
            .expect("config deserializes");

        let registry = ChainRegistry::from_config(&config);

        let resolved = registry.resolve("chainA").expect("configured name resolves");
        assert_eq!(resolved.chain_name, "chainA");
        assert_eq!(resolved.chain_id, 31337);
        assert!(matches!(registry.resolve("chaina"), Err(StarportError::ConfigNotFound(_))));

        println!("✅ Mixed-case chain name resolves exactly as configured");
    }
}
