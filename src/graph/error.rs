use thiserror::Error;

/// The single error surface of the crate.
///
/// All variants are fatal at declaration or load time; evaluation
/// itself never fails — electrical ambiguity is resolved by the
/// short-circuit rule and the `Unknown` propagation default.
#[derive(Debug, Error)]
pub enum SimError {
    /// Illegal structural declaration: output-to-output connection,
    /// reference to an unregistered component, mismatched port name.
    #[error("{block}: {reason}")]
    MalformedNetlist { block: String, reason: String },

    /// A value vector or labeling disagrees with a bus width.
    #[error("{block}: expected {expected} values, got {actual}")]
    SizeMismatch {
        block: String,
        expected: usize,
        actual: usize,
    },

    /// A label reference not present in the bus labeling.
    #[error("{block}: unknown label `{label}`")]
    UnknownLabel { block: String, label: String },

    /// The backing part store failed to read or write.
    #[error("persistence failure: {0}")]
    Persistence(String),
}

impl From<std::io::Error> for SimError {
    fn from(err: std::io::Error) -> Self {
        SimError::Persistence(err.to_string())
    }
}

impl From<serde_json::Error> for SimError {
    fn from(err: serde_json::Error) -> Self {
        SimError::Persistence(err.to_string())
    }
}
