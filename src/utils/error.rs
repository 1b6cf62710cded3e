use thiserror::Error;

#[derive(Error, Debug)]
pub enum RegisterError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration field '{field}' is required")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("TOML parsing failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Session lookup failed: {message}")]
    SessionError { message: String },
}

/// 認證服務回報的錯誤
#[derive(Error, Debug)]
pub enum AuthBackendError {
    /// 服務端回應了非 2xx 狀態碼
    #[error("auth service returned {status}: {message}")]
    Api {
        status: u16,
        message: String,
        code: Option<String>,
    },

    #[error("auth service unreachable: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected auth service response: {message}")]
    Decode { message: String },
}

impl AuthBackendError {
    pub fn status(&self) -> Option<u16> {
        match self {
            AuthBackendError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, RegisterError>;
