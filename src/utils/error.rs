use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("IO-fel: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON-fel: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Kunde inte läsa inställningar: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Nätverksfel: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Tjänsten svarade med status {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Ingen API-nyckel är konfigurerad")]
    MissingApiKey,

    #[error("Ljudfel: {0}")]
    Audio(String),

    #[error("{0}")]
    Other(String),
}

impl AppError {
    pub fn audio(msg: impl Into<String>) -> Self {
        Self::Audio(msg.into())
    }

    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }

    /// Tillfälliga fel (kvot, serverfel, timeout) som är värda ett nytt försök
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Api { status, .. } => *status == 429 || *status >= 500,
            Self::Http(e) => e.is_timeout() || e.is_connect(),
            _ => false,
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_statuses() {
        let quota = AppError::Api { status: 429, body: String::new() };
        let unavailable = AppError::Api { status: 503, body: String::new() };
        let bad_request = AppError::Api { status: 400, body: "fel".into() };

        assert!(quota.is_retryable());
        assert!(unavailable.is_retryable());
        assert!(!bad_request.is_retryable());
        assert!(!AppError::MissingApiKey.is_retryable());
        assert!(!AppError::audio("ingen enhet").is_retryable());
    }

    #[test]
    fn test_display() {
        let err = AppError::Api { status: 403, body: "forbidden".into() };
        assert_eq!(err.to_string(), "Tjänsten svarade med status 403: forbidden");
    }
}
