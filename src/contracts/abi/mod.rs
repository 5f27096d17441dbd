pub mod binding;
pub mod descriptor;

pub use binding::{ContractBinding, ContractHandle, MethodDescriptor};
pub use descriptor::{OperationDescriptor, OperationKind};
