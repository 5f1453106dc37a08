/// Convenience result type used across the hierarchy.
pub type DraweeResult<T> = Result<T, DraweeError>;

/// Error taxonomy for hierarchy construction and mutation.
///
/// Every public operation checks its inputs before touching the tree, so an `Err`
/// means nothing was mutated.
#[derive(thiserror::Error, Debug)]
pub enum DraweeError {
    /// Layer or overlay index outside the allocated slot range.
    #[error("index out of range: {0}")]
    OutOfRange(String),

    /// A required argument or tree shape was missing.
    #[error("precondition violated: {0}")]
    Precondition(String),

    /// Invalid configuration data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors when serializing or deserializing configuration.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DraweeError {
    /// Build a [`DraweeError::OutOfRange`] value.
    pub fn out_of_range(msg: impl Into<String>) -> Self {
        Self::OutOfRange(msg.into())
    }

    /// Build a [`DraweeError::Precondition`] value.
    pub fn precondition(msg: impl Into<String>) -> Self {
        Self::Precondition(msg.into())
    }

    /// Build a [`DraweeError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`DraweeError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Whether this error reports an invalid index.
    pub fn is_out_of_range(&self) -> bool {
        matches!(self, Self::OutOfRange(_))
    }
}

impl From<serde_json::Error> for DraweeError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde(err.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
