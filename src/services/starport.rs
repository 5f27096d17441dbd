use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::config::{InterfaceTable, NetworkConfig, Settings};
use crate::contracts::abi::{ContractBinding, ContractHandle};
use crate::contracts::execution::{ChainClient, ClientFactory, ExecutionSettings, SignedAccount};
use crate::contracts::operations::catalog::{self, DOCK_METHOD_KEY};
use crate::contracts::operations::{DockTarget, Starport};
use crate::contracts::registry::ChainRegistry;
use crate::error::{StarportError, StarportResult};

/// Everything one command needs to talk to one chain's Starport contract.
pub struct StarportContext {
    pub network: NetworkConfig,
    pub handle: ContractHandle,
    pub client: Arc<dyn ChainClient>,
}

/// Resolves chains, binds contracts and opens clients for the dispatcher.
pub struct StarportService {
    registry: ChainRegistry,
    execution: ExecutionSettings,
    interface_path: PathBuf,
    interfaces: Option<InterfaceTable>,
    account: Option<SignedAccount>,
    factory: Arc<dyn ClientFactory>,
}

impl StarportService {
    pub fn new(
        registry: ChainRegistry,
        settings: &Settings,
        factory: Arc<dyn ClientFactory>,
    ) -> Self {
        info!("🏗️ Creating StarportService");
        if registry.is_empty() {
            warn!("⚠️ No chains configured");
        } else {
            info!("  Chains ({}): {:?}", registry.len(), registry.names());
        }

        Self {
            registry,
            execution: settings.execution(),
            interface_path: settings.interface_path.clone(),
            interfaces: None,
            account: None,
            factory,
        }
    }

    pub fn with_account(mut self, account: SignedAccount) -> Self {
        info!("  Signer: {}", account.address());
        self.account = Some(account);
        self
    }

    /// Use an already loaded interface document instead of reading `interface_path`.
    pub fn with_interfaces(mut self, interfaces: InterfaceTable) -> Self {
        self.interfaces = Some(interfaces);
        self
    }

    pub fn resolve(&self, chain_name: &str) -> StarportResult<&NetworkConfig> {
        self.registry.resolve(chain_name)
    }

    /// Resolve, bind and connect. Fails before any connection when the chain
    /// is unknown or its ABI lacks a catalog method.
    pub fn open(&self, chain_name: &str) -> StarportResult<StarportContext> {
        let network = self.registry.resolve(chain_name).map_err(|e| {
            error!("❌ {}", e);
            e
        })?;
        let handle = ContractBinding::bind(network, catalog::ALL)?;
        let client = self.factory.connect(network)?;
        info!("  Client: {}", client.description());

        Ok(StarportContext {
            network: network.clone(),
            handle,
            client,
        })
    }

    /// Look up the destination chain and the method name its interface uses
    /// for docking. Touches no node.
    pub fn dock_target(&self, dest_chain: &str) -> StarportResult<DockTarget> {
        let dest = self.registry.resolve(dest_chain)?;

        let loaded;
        let interfaces = match &self.interfaces {
            Some(interfaces) => interfaces,
            None => {
                loaded = InterfaceTable::load(&self.interface_path)?;
                &loaded
            }
        };

        if !interfaces.contains(&dest.interface_name) {
            return Err(StarportError::InterfaceNotFound {
                chain: dest.chain_name.clone(),
                interface: dest.interface_name.clone(),
            });
        }
        let dock_method = interfaces
            .method(&dest.interface_name, DOCK_METHOD_KEY)
            .ok_or_else(|| {
                StarportError::InvalidConfig(format!(
                    "interface {} has no {} method",
                    dest.interface_name, DOCK_METHOD_KEY
                ))
            })?;

        Ok(DockTarget {
            chain_name: dest.chain_name.clone(),
            contract_address: dest.contract_address.clone(),
            dock_method: dock_method.to_string(),
        })
    }

    /// The catalog operations for an opened context.
    pub fn operations<'a>(&'a self, context: &'a StarportContext) -> Starport<'a> {
        Starport::new(
            &context.network,
            &context.handle,
            context.client.as_ref(),
            &self.execution,
            self.account.as_ref(),
        )
    }
}
