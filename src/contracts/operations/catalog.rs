use std::str::FromStr;
use tracing::info;

use crate::config::NetworkConfig;
use crate::contracts::abi::{ContractHandle, OperationDescriptor};
use crate::contracts::encoding::CallArg;
use crate::contracts::execution::{
    ChainClient, ExecutionSettings, QueryExecutor, SignedAccount, TransactionExecutor,
};
use crate::error::{StarportError, StarportResult};
use crate::models::{QueryResult, TransactionOutcome};

pub const INITIALIZE: OperationDescriptor =
    OperationDescriptor::transaction("initialize", "setCrossChainContract", 1);
pub const REGISTER_DEST_CONTRACT: OperationDescriptor =
    OperationDescriptor::transaction("registerDestContract", "registerDestContract", 4);
pub const TREK: OperationDescriptor = OperationDescriptor::transaction("trek", "trek", 3);
pub const GET_SHIP_INFO: OperationDescriptor =
    OperationDescriptor::query("getShipInfo", "_dockedShips", 1);
pub const BALANCE_OF: OperationDescriptor =
    OperationDescriptor::query("balanceOf", "diamondBalanceOf", 1);
pub const SYNTHESIZE_DIAMOND: OperationDescriptor =
    OperationDescriptor::transaction("synthesizeDiamond", "synthesizeDiamond", 2);
pub const GET_DIAMOND: OperationDescriptor =
    OperationDescriptor::transaction("getDiamond", "diamondFaucet", 0);
pub const CREATE_STARSHIP: OperationDescriptor =
    OperationDescriptor::transaction("createStarship", "createStarship", 2);
pub const SET_STARPORTS: OperationDescriptor =
    OperationDescriptor::transaction("setStarports", "setStarports", 1);
pub const GET_STARPORTS: OperationDescriptor =
    OperationDescriptor::query("getStarports", "starports", 0);
pub const SETTLE_REWARD: OperationDescriptor =
    OperationDescriptor::transaction("settleReward", "settleReward", 1);

pub const ALL: &[OperationDescriptor] = &[
    INITIALIZE,
    REGISTER_DEST_CONTRACT,
    TREK,
    GET_SHIP_INFO,
    BALANCE_OF,
    SYNTHESIZE_DIAMOND,
    GET_DIAMOND,
    CREATE_STARSHIP,
    SET_STARPORTS,
    GET_STARPORTS,
    SETTLE_REWARD,
];

/// Method key looked up in the interface document when registering a destination.
pub const DOCK_METHOD_KEY: &str = "dock";

/// One `{galaxy, starportId}` row of the starport table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StarportEntry {
    pub galaxy: String,
    pub starport_id: String,
}

impl StarportEntry {
    fn to_arg(&self) -> CallArg {
        CallArg::Tuple(vec![
            CallArg::text(self.galaxy.clone()),
            CallArg::text(self.starport_id.clone()),
        ])
    }
}

impl FromStr for StarportEntry {
    type Err = StarportError;

    /// Parse `galaxy|starport`.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.split_once('|') {
            Some((galaxy, starport_id)) if !galaxy.is_empty() && !starport_id.is_empty() => {
                Ok(Self {
                    galaxy: galaxy.to_string(),
                    starport_id: starport_id.to_string(),
                })
            }
            _ => Err(StarportError::InvalidArguments(format!(
                "starport entry {:?} must look like <galaxy>|<starport>",
                raw
            ))),
        }
    }
}

/// Destination registered through `registerDestContract`, already resolved
/// against the chain registry and the interface document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DockTarget {
    pub chain_name: String,
    pub contract_address: String,
    pub dock_method: String,
}

/// The Starport operations bound to one chain.
///
/// Each method only maps its domain arguments onto a catalog descriptor and
/// hands them to the query or transaction executor.
pub struct Starport<'a> {
    network: &'a NetworkConfig,
    handle: &'a ContractHandle,
    client: &'a dyn ChainClient,
    settings: &'a ExecutionSettings,
    account: Option<&'a SignedAccount>,
}

impl<'a> Starport<'a> {
    pub fn new(
        network: &'a NetworkConfig,
        handle: &'a ContractHandle,
        client: &'a dyn ChainClient,
        settings: &'a ExecutionSettings,
        account: Option<&'a SignedAccount>,
    ) -> Self {
        Self {
            network,
            handle,
            client,
            settings,
            account,
        }
    }

    /// Point the contract at this chain's cross-chain messaging contract.
    pub async fn initialize(&self) -> StarportResult<TransactionOutcome> {
        let cross_chain = self.network.cross_chain_contract_address.as_str();
        info!("🔗 Setting cross-chain contract {} on {}", cross_chain, self.network.chain_name);
        self.submit(&INITIALIZE, &[cross_chain.into()]).await
    }

    pub async fn register_dest_contract(
        &self,
        target: &DockTarget,
    ) -> StarportResult<TransactionOutcome> {
        info!(
            "🔗 Registering {} on {} (dock method {})",
            target.chain_name, self.network.chain_name, target.dock_method
        );
        self.submit(
            &REGISTER_DEST_CONTRACT,
            &[
                DOCK_METHOD_KEY.into(),
                target.chain_name.as_str().into(),
                target.contract_address.as_str().into(),
                target.dock_method.as_str().into(),
            ],
        )
        .await
    }

    pub async fn trek(
        &self,
        ship_id: &str,
        receiver: &str,
        to_chain: &str,
    ) -> StarportResult<TransactionOutcome> {
        self.submit(&TREK, &[ship_id.into(), receiver.into(), to_chain.into()]).await
    }

    pub async fn get_ship_info(&self, ship_id: &str) -> StarportResult<QueryResult> {
        self.query(&GET_SHIP_INFO, &[ship_id.into()]).await
    }

    pub async fn balance_of(&self, account: &str) -> StarportResult<QueryResult> {
        self.query(&BALANCE_OF, &[account.into()]).await
    }

    pub async fn synthesize_diamond(
        &self,
        ship_id: &str,
        amount: &str,
    ) -> StarportResult<TransactionOutcome> {
        self.submit(&SYNTHESIZE_DIAMOND, &[ship_id.into(), amount.into()]).await
    }

    pub async fn get_diamond(&self) -> StarportResult<TransactionOutcome> {
        self.submit(&GET_DIAMOND, &[]).await
    }

    pub async fn create_starship(
        &self,
        to: &str,
        ship_type: &str,
    ) -> StarportResult<TransactionOutcome> {
        self.submit(&CREATE_STARSHIP, &[to.into(), ship_type.into()]).await
    }

    /// Replace the starport table. Entries are encoded in the order given.
    pub async fn set_starports(
        &self,
        entries: &[StarportEntry],
    ) -> StarportResult<TransactionOutcome> {
        let table = CallArg::List(entries.iter().map(StarportEntry::to_arg).collect());
        info!("🌌 Setting {} starport(s) on {}", entries.len(), self.network.chain_name);
        self.submit(&SET_STARPORTS, &[table]).await
    }

    pub async fn get_starports(&self) -> StarportResult<QueryResult> {
        self.query(&GET_STARPORTS, &[]).await
    }

    pub async fn settle_reward(&self, ship_id: &str) -> StarportResult<TransactionOutcome> {
        self.submit(&SETTLE_REWARD, &[ship_id.into()]).await
    }

    async fn submit(
        &self,
        descriptor: &OperationDescriptor,
        args: &[CallArg],
    ) -> StarportResult<TransactionOutcome> {
        let account = self.account.ok_or_else(|| {
            StarportError::Secret(format!("{} needs a signing key", descriptor.operation))
        })?;

        TransactionExecutor::new(self.client, self.settings)
            .submit(self.handle, descriptor, account, args)
            .await
    }

    async fn query(
        &self,
        descriptor: &OperationDescriptor,
        args: &[CallArg],
    ) -> StarportResult<QueryResult> {
        QueryExecutor::new(self.client).call(self.handle, descriptor, args).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contracts::encoding::DynAbiEncoder;
    use crate::contracts::execution::account::tests::test_account;
    use crate::contracts::execution::mock::MockChainClient;
    use crate::contracts::registry::tests::network;
    use alloy::consensus::{Transaction, TxEnvelope};
    use alloy::dyn_abi::DynSolValue;
    use alloy::eips::eip2718::Decodable2718;
    use std::time::Duration;

    const STARPORT_ARTIFACT: &str = include_str!("../../../abi/Starport.json");

    struct Fixture {
        network: NetworkConfig,
        handle: ContractHandle,
        client: MockChainClient,
        settings: ExecutionSettings,
        account: SignedAccount,
    }

    impl Fixture {
        fn new() -> Self {
            let network = network("local", 31337);
            let handle = ContractHandle::from_artifact(&network, STARPORT_ARTIFACT).unwrap();
            Self {
                network,
                handle,
                client: MockChainClient::new(31337),
                settings: ExecutionSettings {
                    gas_limit: None,
                    receipt_poll_interval: Duration::from_millis(1),
                },
                account: test_account(),
            }
        }

        fn starport(&self) -> Starport<'_> {
            Starport::new(
                &self.network,
                &self.handle,
                &self.client,
                &self.settings,
                Some(&self.account),
            )
        }

        /// Decode the arguments of the only broadcast transaction.
        fn broadcast_args(&self, descriptor: &OperationDescriptor) -> Vec<DynSolValue> {
            let broadcasts = self.client.broadcasts();
            assert_eq!(broadcasts.len(), 1, "exactly one transaction broadcast");

            let envelope = TxEnvelope::decode_2718(&mut &broadcasts[0][..]).unwrap();
            let method = self.handle.method(descriptor).unwrap();
            DynAbiEncoder::decode_input(&method, envelope.input()).unwrap()
        }
    }

    #[test]
    fn test_every_descriptor_binds_to_the_abi() {
        let fixture = Fixture::new();

        for descriptor in ALL {
            let method = fixture
                .handle
                .method(descriptor)
                .unwrap_or_else(|e| panic!("{} does not bind: {}", descriptor.operation, e));
            assert_eq!(method.is_read_only(), descriptor.is_query());
        }

        println!("✅ All {} catalog operations bind to the Starport ABI", ALL.len());
    }

    #[test]
    fn test_parse_starport_entry() {
        let entry: StarportEntry = "andromeda|port-7".parse().unwrap();
        assert_eq!(entry.galaxy, "andromeda");
        assert_eq!(entry.starport_id, "port-7");

        assert!("andromeda".parse::<StarportEntry>().is_err());
        assert!("|port-7".parse::<StarportEntry>().is_err());
        assert!("andromeda|".parse::<StarportEntry>().is_err());
    }

    #[tokio::test]
    async fn test_set_starports_keeps_order_in_one_transaction() {
        let fixture = Fixture::new();
        let entries: Vec<StarportEntry> = ["galaxy1|port1", "galaxy2|port2"]
            .iter()
            .map(|raw| raw.parse().unwrap())
            .collect();

        let outcome = fixture.starport().set_starports(&entries).await.unwrap();
        assert!(outcome.is_confirmed());

        let args = fixture.broadcast_args(&SET_STARPORTS);
        assert_eq!(
            args,
            vec![DynSolValue::Array(vec![
                DynSolValue::Tuple(vec![
                    DynSolValue::String("galaxy1".into()),
                    DynSolValue::String("port1".into()),
                ]),
                DynSolValue::Tuple(vec![
                    DynSolValue::String("galaxy2".into()),
                    DynSolValue::String("port2".into()),
                ]),
            ])]
        );

        println!("✅ setStarports encodes both entries in order in a single transaction");
    }

    #[tokio::test]
    async fn test_initialize_sends_cross_chain_address() {
        let fixture = Fixture::new();
        fixture.starport().initialize().await.unwrap();

        let args = fixture.broadcast_args(&INITIALIZE);
        assert_eq!(
            args,
            vec![DynSolValue::Address(
                fixture.network.cross_chain_contract_address.parse().unwrap()
            )]
        );
    }

    #[tokio::test]
    async fn test_register_dest_contract_argument_order() {
        let fixture = Fixture::new();
        let target = DockTarget {
            chain_name: "astar".to_string(),
            contract_address: "XnrLUQucQvzp5kaaWLG9Q3LbZw5DPwpGn69B5YcywSWVr5w".to_string(),
            dock_method: "dock_ship".to_string(),
        };

        fixture.starport().register_dest_contract(&target).await.unwrap();

        let args = fixture.broadcast_args(&REGISTER_DEST_CONTRACT);
        let expected: Vec<DynSolValue> = [
            "dock",
            "astar",
            "XnrLUQucQvzp5kaaWLG9Q3LbZw5DPwpGn69B5YcywSWVr5w",
            "dock_ship",
        ]
        .iter()
        .map(|s| DynSolValue::String(s.to_string()))
        .collect();
        assert_eq!(args, expected);
    }

    #[tokio::test]
    async fn test_transaction_without_key_is_refused() {
        let fixture = Fixture::new();
        let starport = Starport::new(
            &fixture.network,
            &fixture.handle,
            &fixture.client,
            &fixture.settings,
            None,
        );

        let result = starport.get_diamond().await;

        assert!(matches!(result, Err(StarportError::Secret(_))));
        assert!(fixture.client.rpcs().is_empty());
    }

    #[tokio::test]
    async fn test_query_needs_no_key() {
        let mut fixture = Fixture::new();
        fixture.client.call_result = Ok(DynSolValue::Uint(alloy::primitives::U256::from(3u64), 256)
            .abi_encode()
            .into());
        let starport = Starport::new(
            &fixture.network,
            &fixture.handle,
            &fixture.client,
            &fixture.settings,
            None,
        );

        let result = starport
            .balance_of("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266")
            .await
            .unwrap();

        assert_eq!(result.to_json(), serde_json::json!("3"));
        assert!(fixture.client.broadcasts().is_empty());
    }
}
