pub mod outcome;

pub use outcome::{QueryResult, TransactionOutcome, TransactionStatus};
