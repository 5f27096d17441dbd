pub mod starport;

pub use starport::{StarportContext, StarportService};
