/// Convenience result type used across the compositing pipeline.
pub type SpriteResult<T> = Result<T, SpriteError>;

/// Error taxonomy for frame decoding, compositing and encoding.
#[derive(thiserror::Error, Debug)]
pub enum SpriteError {
    /// Caller logic error: empty frame collections, mismatched lengths, bad geometry.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Input bytes could not be turned into frames.
    #[error("decode error: {0}")]
    Decode(String),

    /// Frames could not be written to the output container.
    #[error("encode error: {0}")]
    Encode(String),

    /// Configuration values failed validation.
    #[error("config error: {0}")]
    Config(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SpriteError {
    /// Build a [`SpriteError::InvalidInput`] value.
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Build a [`SpriteError::Decode`] value.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build a [`SpriteError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Build a [`SpriteError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// `true` for errors caused by the arguments rather than by codecs or IO.
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }
}
