pub mod abi;
pub mod encoding;
pub mod execution;
pub mod operations;
pub mod registry;

pub use registry::ChainRegistry;
