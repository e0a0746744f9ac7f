use thiserror::Error;

/// Application-level error type.
/// Returned by content loading, site rendering and the terminal session; the
/// binary entry point converts it into `anyhow::Error`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Content parse error: {0}")]
    ContentParse(#[from] serde_json::Error),

    #[error("Invalid content: {0}")]
    Content(String),
}

impl AppError {
    /// Short machine-readable code, used as a structured field in log lines.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Io(_) => "IO_ERROR",
            AppError::ContentParse(_) => "CONTENT_PARSE_ERROR",
            AppError::Content(_) => "INVALID_CONTENT",
        }
    }
}
