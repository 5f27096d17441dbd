use clap::{ArgGroup, Parser, ValueEnum};
use serde_json::{json, Value};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::filter::LevelFilter;

use crate::contracts::operations::StarportEntry;
use crate::error::{StarportError, StarportResult};
use crate::models::{QueryResult, TransactionOutcome};
use crate::services::StarportService;

/// Exit code for a transaction that was mined but reverted.
pub const EXIT_REVERTED: i32 = 11;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(group(ArgGroup::new("operation").required(true).multiple(false)))]
pub struct Cli {
    #[arg(
        short = 'i',
        long,
        value_name = "CHAIN",
        value_delimiter = ',',
        group = "operation",
        help = "Set the cross-chain contract address"
    )]
    pub initialize: Option<Vec<String>>,

    #[arg(
        short = 'r',
        long,
        value_name = "CHAIN,DEST_CHAIN",
        value_delimiter = ',',
        group = "operation",
        help = "Register destination chain contract"
    )]
    pub register: Option<Vec<String>>,

    #[arg(
        short = 't',
        long,
        value_name = "CHAIN,SHIP_ID,RECEIVER,DEST_CHAIN",
        value_delimiter = ',',
        group = "operation",
        help = "Trek the ship to another starport"
    )]
    pub trek: Option<Vec<String>>,

    #[arg(
        short = 'g',
        long,
        value_name = "CHAIN,SHIP_ID",
        value_delimiter = ',',
        group = "operation",
        help = "Get ship information"
    )]
    pub get: Option<Vec<String>>,

    #[arg(
        short = 's',
        long,
        value_name = "CHAIN,SHIP_ID,AMOUNT",
        value_delimiter = ',',
        group = "operation",
        help = "Synthesize diamonds"
    )]
    pub synthesize: Option<Vec<String>>,

    #[arg(
        short = 'b',
        long,
        value_name = "CHAIN,ACCOUNT",
        value_delimiter = ',',
        group = "operation",
        help = "Get diamond balance"
    )]
    pub balance: Option<Vec<String>>,

    #[arg(
        short = 'c',
        long,
        value_name = "CHAIN,TO,SHIP_TYPE",
        value_delimiter = ',',
        group = "operation",
        help = "Create a starship"
    )]
    pub create: Option<Vec<String>>,

    #[arg(
        short = 'd',
        long,
        value_name = "CHAIN",
        value_delimiter = ',',
        group = "operation",
        help = "Get some diamond for testing"
    )]
    pub diamond: Option<Vec<String>>,

    #[arg(
        short = 'S',
        long,
        value_name = "CHAIN,GALAXY|STARPORT...",
        value_delimiter = ',',
        group = "operation",
        help = "Set starports"
    )]
    pub set_starports: Option<Vec<String>>,

    #[arg(
        short = 'p',
        long,
        value_name = "CHAIN",
        value_delimiter = ',',
        group = "operation",
        help = "Get starports"
    )]
    pub starports: Option<Vec<String>>,

    #[arg(
        short = 'e',
        long,
        value_name = "CHAIN,SHIP_ID",
        value_delimiter = ',',
        group = "operation",
        help = "Settle rewards"
    )]
    pub settle: Option<Vec<String>>,

    #[arg(long, help = "Configuration file", env = "STARPORT_CONFIG")]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Control the verbosity of logging", env = "STARPORT_LOG")]
    pub log_level: Option<LogLevel>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for LevelFilter {
    fn from(value: LogLevel) -> Self {
        match value {
            LogLevel::Trace => LevelFilter::TRACE,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Error => LevelFilter::ERROR,
        }
    }
}

/// A selector flag with its arguments checked and named.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    Initialize { chain: String },
    Register { chain: String, dest_chain: String },
    Trek { chain: String, ship_id: String, receiver: String, dest_chain: String },
    GetShipInfo { chain: String, ship_id: String },
    Synthesize { chain: String, ship_id: String, amount: String },
    Balance { chain: String, account: String },
    Create { chain: String, to: String, ship_type: String },
    Diamond { chain: String },
    SetStarports { chain: String, entries: Vec<StarportEntry> },
    Starports { chain: String },
    Settle { chain: String, ship_id: String },
}

fn exact<const N: usize>(values: &[String]) -> StarportResult<[String; N]> {
    <[String; N]>::try_from(values.to_vec()).map_err(|_| {
        StarportError::InvalidArguments(format!(
            "{} arguments are needed, but {} provided",
            N,
            values.len()
        ))
    })
}

impl Cli {
    /// Validate the arity of whichever selector was given.
    pub fn invocation(&self) -> StarportResult<Invocation> {
        if let Some(values) = &self.initialize {
            let [chain] = exact(values)?;
            return Ok(Invocation::Initialize { chain });
        }
        if let Some(values) = &self.register {
            let [chain, dest_chain] = exact(values)?;
            return Ok(Invocation::Register { chain, dest_chain });
        }
        if let Some(values) = &self.trek {
            let [chain, ship_id, receiver, dest_chain] = exact(values)?;
            return Ok(Invocation::Trek { chain, ship_id, receiver, dest_chain });
        }
        if let Some(values) = &self.get {
            let [chain, ship_id] = exact(values)?;
            return Ok(Invocation::GetShipInfo { chain, ship_id });
        }
        if let Some(values) = &self.synthesize {
            let [chain, ship_id, amount] = exact(values)?;
            return Ok(Invocation::Synthesize { chain, ship_id, amount });
        }
        if let Some(values) = &self.balance {
            let [chain, account] = exact(values)?;
            return Ok(Invocation::Balance { chain, account });
        }
        if let Some(values) = &self.create {
            let [chain, to, ship_type] = exact(values)?;
            return Ok(Invocation::Create { chain, to, ship_type });
        }
        if let Some(values) = &self.diamond {
            let [chain] = exact(values)?;
            return Ok(Invocation::Diamond { chain });
        }
        if let Some(values) = &self.set_starports {
            if values.len() < 2 {
                return Err(StarportError::InvalidArguments(
                    "At least 2 arguments are needed".to_string(),
                ));
            }
            let entries = values[1..]
                .iter()
                .map(|raw| raw.parse())
                .collect::<StarportResult<Vec<StarportEntry>>>()?;
            return Ok(Invocation::SetStarports { chain: values[0].clone(), entries });
        }
        if let Some(values) = &self.starports {
            let [chain] = exact(values)?;
            return Ok(Invocation::Starports { chain });
        }
        if let Some(values) = &self.settle {
            let [chain, ship_id] = exact(values)?;
            return Ok(Invocation::Settle { chain, ship_id });
        }

        Err(StarportError::InvalidArguments("no operation selected".to_string()))
    }
}

impl Invocation {
    /// Chain the operation runs against.
    pub fn chain(&self) -> &str {
        match self {
            Invocation::Initialize { chain }
            | Invocation::Register { chain, .. }
            | Invocation::Trek { chain, .. }
            | Invocation::GetShipInfo { chain, .. }
            | Invocation::Synthesize { chain, .. }
            | Invocation::Balance { chain, .. }
            | Invocation::Create { chain, .. }
            | Invocation::Diamond { chain }
            | Invocation::SetStarports { chain, .. }
            | Invocation::Starports { chain }
            | Invocation::Settle { chain, .. } => chain,
        }
    }

    pub fn needs_signer(&self) -> bool {
        !matches!(
            self,
            Invocation::GetShipInfo { .. }
                | Invocation::Balance { .. }
                | Invocation::Starports { .. }
        )
    }
}

/// What a finished command prints.
#[derive(Debug)]
pub enum Report {
    Transaction(TransactionOutcome),
    Query { label: &'static str, result: QueryResult },
}

impl Report {
    pub fn to_json(&self) -> Value {
        match self {
            Report::Transaction(outcome) => json!(outcome),
            Report::Query { result, .. } => result.to_json(),
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            Report::Transaction(outcome) if !outcome.is_confirmed() => EXIT_REVERTED,
            _ => 0,
        }
    }
}

/// Run one invocation: resolve the chain, bind the contract, then call or submit.
pub async fn dispatch(invocation: Invocation, service: &StarportService) -> StarportResult<Report> {
    let dock_target = match &invocation {
        Invocation::Register { chain, dest_chain } => {
            service.resolve(chain)?;
            Some(service.dock_target(dest_chain)?)
        }
        _ => None,
    };

    let context = service.open(invocation.chain())?;
    let starport = service.operations(&context);

    let report = match invocation {
        Invocation::Initialize { .. } => Report::Transaction(starport.initialize().await?),
        Invocation::Register { dest_chain, .. } => {
            let target = dock_target.ok_or(StarportError::ConfigNotFound(dest_chain))?;
            Report::Transaction(starport.register_dest_contract(&target).await?)
        }
        Invocation::Trek { ship_id, receiver, dest_chain, .. } => {
            Report::Transaction(starport.trek(&ship_id, &receiver, &dest_chain).await?)
        }
        Invocation::GetShipInfo { ship_id, .. } => Report::Query {
            label: "Ship info",
            result: starport.get_ship_info(&ship_id).await?,
        },
        Invocation::Synthesize { ship_id, amount, .. } => {
            Report::Transaction(starport.synthesize_diamond(&ship_id, &amount).await?)
        }
        Invocation::Balance { account, .. } => Report::Query {
            label: "Diamond balance",
            result: starport.balance_of(&account).await?,
        },
        Invocation::Create { to, ship_type, .. } => {
            Report::Transaction(starport.create_starship(&to, &ship_type).await?)
        }
        Invocation::Diamond { .. } => Report::Transaction(starport.get_diamond().await?),
        Invocation::SetStarports { entries, .. } => {
            Report::Transaction(starport.set_starports(&entries).await?)
        }
        Invocation::Starports { .. } => Report::Query {
            label: "Starports",
            result: starport.get_starports().await?,
        },
        Invocation::Settle { ship_id, .. } => {
            Report::Transaction(starport.settle_reward(&ship_id).await?)
        }
    };

    if let Report::Query { label, result } = &report {
        info!("📊 {} from {}", label, result.chain);
    }

    Ok(report)
}
