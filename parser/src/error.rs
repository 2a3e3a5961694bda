use thiserror::Error;

/// Everything that can go wrong between the grammar editor and the
/// rendered views. None of these is fatal to the view: the caller reports
/// them next to the control that produced them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ViewError {
    /// Grammar text is not well-formed JSON, has the wrong shape, or fails
    /// the structural checks.
    #[error("Invalid grammar: {0}")]
    MalformedGrammar(String),

    /// The producer answered with a non-success status; `detail` is shown
    /// to the user as-is.
    #[error("{detail}")]
    ProducerError { status: u16, detail: String },

    /// The request did not complete (network failure or timeout).
    #[error("Request failed: {0}")]
    TransportFailure(String),

    /// The producer answered with success, but the body is not a parser response.
    #[error("Malformed parser response: {0}")]
    MalformedResponse(String),

    #[error("Malformed table key {key:?}: {reason}")]
    MalformedTableKey { key: String, reason: String },

    #[error("Item {item:?} has dot position {dot_position}, expected 0..={len}")]
    InvalidDotPosition {
        item: String,
        dot_position: i64,
        len: usize,
    },
}

pub type Result<T, E = ViewError> = std::result::Result<T, E>;

impl ViewError {
    pub(crate) fn malformed_key(key: &str, reason: &str) -> Self {
        ViewError::MalformedTableKey {
            key: key.to_string(),
            reason: reason.to_string(),
        }
    }
}
