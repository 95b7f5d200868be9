/// Convenience result type used across papershred.
pub type ShredResult<T> = Result<T, ShredError>;

/// Top-level error taxonomy for the fallible edges of the crate.
///
/// The animation core itself never fails: out-of-range settings are ignored and a
/// missing pixel buffer renders the background only. These variants cover decode,
/// configuration, export and encoding.
#[derive(thiserror::Error, Debug)]
pub enum ShredError {
    /// Invalid user-provided configuration or arguments.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors while producing pixels.
    #[error("render error: {0}")]
    Render(String),

    /// Errors while streaming frames to an encoder.
    #[error("encode error: {0}")]
    Encode(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ShredError {
    /// Build a [`ShredError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`ShredError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`ShredError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Build a [`ShredError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
