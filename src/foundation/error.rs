use std::time::Duration;

pub type ReelResult<T> = Result<T, ReelError>;

#[derive(thiserror::Error, Debug)]
pub enum ReelError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("data unavailable: {0}")]
    DataUnavailable(String),

    #[error("encoder timed out after {}s", .0.as_secs_f64())]
    Timeout(Duration),

    #[error("encoding failed ({status}): {stderr}")]
    EncodingFailed { status: String, stderr: String },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("render error: {0}")]
    Render(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Coarse classification reported to callers of a pipeline run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    InvalidInput,
    DataUnavailable,
    Timeout,
    EncodingFailed,
    Internal,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ErrorKind::InvalidInput => "invalid input",
            ErrorKind::DataUnavailable => "data unavailable",
            ErrorKind::Timeout => "timeout",
            ErrorKind::EncodingFailed => "encoding failed",
            ErrorKind::Internal => "internal error",
        };
        f.write_str(s)
    }
}

impl ReelError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn data_unavailable(msg: impl Into<String>) -> Self {
        Self::DataUnavailable(msg.into())
    }

    pub fn encoding_failed(status: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self::EncodingFailed {
            status: status.into(),
            stderr: stderr.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ReelError::InvalidInput(_) => ErrorKind::InvalidInput,
            ReelError::DataUnavailable(_) => ErrorKind::DataUnavailable,
            ReelError::Timeout(_) => ErrorKind::Timeout,
            ReelError::EncodingFailed { .. } => ErrorKind::EncodingFailed,
            ReelError::Config(_) | ReelError::Render(_) | ReelError::Other(_) => {
                ErrorKind::Internal
            }
        }
    }
}
