use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("student not found: {0}")]
    NotFound(String),

    #[error("mentor session required")]
    Unauthorized,

    #[error("storage error: {0:#}")]
    Storage(#[from] anyhow::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Error code reported over IPC.
    pub fn code(&self) -> &'static str {
        match self {
            Error::InvalidCredentials => "invalid_credentials",
            Error::NotFound(_) => "not_found",
            Error::Unauthorized => "unauthorized",
            Error::Storage(_) | Error::Json(_) => "storage_failed",
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
