pub mod catalog;

pub use catalog::{DockTarget, Starport, StarportEntry};
