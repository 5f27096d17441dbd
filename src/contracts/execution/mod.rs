pub mod account;
pub mod alloy_client;
pub mod factory;
pub mod query;
pub mod traits;
pub mod transaction;

#[cfg(test)]
pub(crate) mod mock;

pub use account::SignedAccount;
pub use alloy_client::AlloyClient;
pub use factory::{AlloyClientFactory, ClientFactory};
pub use query::QueryExecutor;
pub use traits::{ChainClient, ClientError, ExecutionSettings, GasParams, ReceiptSummary};
pub use transaction::TransactionExecutor;
