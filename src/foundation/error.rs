/// Result alias used across the crate.
pub type SketchResult<T> = Result<T, SketchError>;

/// Error type for sketch configuration, parameter updates, rendering and capture.
///
/// Guarded commands (placing an anchor while animating, starting twice, ...) are not errors; they
/// report an `Ignored` outcome instead.
#[derive(thiserror::Error, Debug)]
pub enum SketchError {
    /// Malformed configuration or inconsistent input.
    #[error("validation error: {0}")]
    Validation(String),

    /// A parameter setter received an out-of-range value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// A frame sink failed to start, accept a frame, or finish.
    #[error("capture error: {0}")]
    Capture(String),

    /// Rasterization failed.
    #[error("render error: {0}")]
    Render(String),

    /// JSON (de)serialization failed.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Any other error, usually an I/O failure with context attached.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SketchError {
    /// Build a [`SketchError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`SketchError::InvalidParameter`].
    pub fn invalid_parameter(msg: impl Into<String>) -> Self {
        Self::InvalidParameter(msg.into())
    }

    /// Build a [`SketchError::Capture`].
    pub fn capture(msg: impl Into<String>) -> Self {
        Self::Capture(msg.into())
    }

    /// Build a [`SketchError::Render`].
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`SketchError::Serde`].
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
