use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenerationError {
    #[error("API key not found in environment variables ({0})")]
    MissingCredential(String),

    #[error("{0}")]
    ServiceError(String),

    #[error("{0}")]
    GenerationFailed(String),

    #[error("{0}")]
    FetchFailed(String),
}

impl GenerationError {
    pub fn service(msg: impl Into<String>) -> Self {
        Self::ServiceError(msg.into())
    }

    pub fn generation_failed(msg: impl Into<String>) -> Self {
        Self::GenerationFailed(msg.into())
    }

    pub fn fetch_failed(msg: impl Into<String>) -> Self {
        Self::FetchFailed(msg.into())
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::MissingCredential(_) => "missing_credential",
            Self::ServiceError(_) => "service_error",
            Self::GenerationFailed(_) => "generation_failed",
            Self::FetchFailed(_) => "fetch_failed",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("failed reading {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} is empty", .0.display())]
    Empty(PathBuf),
}
