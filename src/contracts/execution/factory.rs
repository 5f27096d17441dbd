use std::sync::Arc;
use tracing::info;

use super::alloy_client::AlloyClient;
use super::traits::ChainClient;
use crate::config::NetworkConfig;
use crate::error::StarportResult;

/// Creates a [`ChainClient`] for a resolved network.
///
/// Connections are only opened through a factory, so a command that fails
/// before reaching this point never touches a node.
pub trait ClientFactory: Send + Sync {
    fn connect(&self, network: &NetworkConfig) -> StarportResult<Arc<dyn ChainClient>>;
}

/// Factory for alloy HTTP clients.
#[derive(Debug, Default, Clone, Copy)]
pub struct AlloyClientFactory;

impl ClientFactory for AlloyClientFactory {
    fn connect(&self, network: &NetworkConfig) -> StarportResult<Arc<dyn ChainClient>> {
        info!("🏭 Connecting to {} (chain id {})", network.chain_name, network.chain_id);
        let client = AlloyClient::connect(&network.rpc_endpoint)?;
        Ok(Arc::new(client))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::contracts::execution::mock::MockChainClient;
    use crate::contracts::registry::tests::network;
    use std::sync::Mutex;

    /// Hands out one shared mock per chain and counts every connection.
    pub(crate) struct MockClientFactory {
        clients: Mutex<Vec<(String, Arc<MockChainClient>)>>,
        connects: Mutex<Vec<String>>,
    }

    impl MockClientFactory {
        pub(crate) fn new() -> Self {
            Self {
                clients: Mutex::new(Vec::new()),
                connects: Mutex::new(Vec::new()),
            }
        }

        pub(crate) fn with_client(self, chain_name: &str, client: MockChainClient) -> Self {
            self.clients
                .lock()
                .unwrap()
                .push((chain_name.to_string(), Arc::new(client)));
            self
        }

        pub(crate) fn client(&self, chain_name: &str) -> Arc<MockChainClient> {
            self.clients
                .lock()
                .unwrap()
                .iter()
                .find(|(name, _)| name == chain_name)
                .map(|(_, client)| client.clone())
                .expect("mock client registered")
        }

        pub(crate) fn connects(&self) -> Vec<String> {
            self.connects.lock().unwrap().clone()
        }
    }

    impl ClientFactory for MockClientFactory {
        fn connect(&self, network: &NetworkConfig) -> StarportResult<Arc<dyn ChainClient>> {
            self.connects.lock().unwrap().push(network.chain_name.clone());
            let client: Arc<dyn ChainClient> = self.client(&network.chain_name);
            Ok(client)
        }
    }

    #[test]
    fn test_alloy_factory_connects_lazily() {
        let client = AlloyClientFactory
            .connect(&network("local", 31337))
            .expect("client for a valid endpoint");

        assert!(client.description().contains("AlloyClient"));
        println!("✅ AlloyClientFactory builds a client without network I/O");
    }

    #[test]
    fn test_mock_factory_counts_connections() {
        let factory = MockClientFactory::new().with_client("local", MockChainClient::new(31337));

        factory.connect(&network("local", 31337)).unwrap();
        assert_eq!(factory.connects(), vec!["local".to_string()]);
    }
}
