/// One positional argument as supplied by the operator, before it is typed.
///
/// Leaves are plain text and are coerced against the ABI parameter type at
/// encoding time. Tuples and lists mirror ABI tuples and arrays so structured
/// arguments (such as the starport table) keep their shape and order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallArg {
    Text(String),
    Tuple(Vec<CallArg>),
    List(Vec<CallArg>),
}

impl CallArg {
    pub fn text(value: impl Into<String>) -> Self {
        CallArg::Text(value.into())
    }

    /// Short human-readable rendering for logs.
    pub fn preview(&self) -> String {
        match self {
            CallArg::Text(value) => value.clone(),
            CallArg::Tuple(items) => {
                let inner: Vec<String> = items.iter().map(CallArg::preview).collect();
                format!("({})", inner.join(","))
            }
            CallArg::List(items) => {
                let inner: Vec<String> = items.iter().map(CallArg::preview).collect();
                format!("[{}]", inner.join(","))
            }
        }
    }
}

impl From<&str> for CallArg {
    fn from(value: &str) -> Self {
        CallArg::Text(value.to_string())
    }
}

impl From<String> for CallArg {
    fn from(value: String) -> Self {
        CallArg::Text(value)
    }
}
