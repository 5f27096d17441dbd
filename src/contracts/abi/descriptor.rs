/// Whether an operation reads chain state or submits a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    /// Read-only `eth_call`, no signer.
    Query,
    /// Signed, state-changing transaction.
    Transaction,
}

/// Typed description of one catalog operation: which ABI method it targets,
/// how many positional inputs that method takes, and how it is executed.
///
/// Descriptors are checked against the bound ABI before any network I/O, so a
/// renamed method or a changed signature fails locally instead of on the node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperationDescriptor {
    pub operation: &'static str,
    pub method: &'static str,
    pub arity: usize,
    pub kind: OperationKind,
}

impl OperationDescriptor {
    pub const fn query(operation: &'static str, method: &'static str, arity: usize) -> Self {
        Self { operation, method, arity, kind: OperationKind::Query }
    }

    pub const fn transaction(operation: &'static str, method: &'static str, arity: usize) -> Self {
        Self { operation, method, arity, kind: OperationKind::Transaction }
    }

    pub fn is_query(&self) -> bool {
        self.kind == OperationKind::Query
    }
}
