use thiserror::Error;

/// All possible error types that may occur during account portal operations
#[derive(Error, Debug)]
pub enum PortalError {
    #[cfg(feature = "database")]
    #[error("Generic SQL error\n{0}")]
    Sql(#[from] sqlx::Error),
    #[cfg(feature = "jwt")]
    #[error("Token error\n{0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
    #[error("MessagePack encode error\n{0}")]
    RmpEncode(#[from] rmp_serde::encode::Error),
    #[error("MessagePack decode error\n{0}")]
    RmpDecode(#[from] rmp_serde::decode::Error),
    #[error("JSON error\n{0}")]
    Json(#[from] serde_json::Error),
    #[error("IO error\n{0}")]
    Io(#[from] std::io::Error),
    #[error("Generic error\n{0}")]
    Generic(String),
    #[error("Invalid credentials")]
    InvalidUser,
    #[error("Not authenticated. {reason}")]
    InvalidToken { reason: String },
    #[error("Email is already registered")]
    DuplicateEmail,
    #[error("Could not find record for {id}")]
    MissingRecord { id: String },
    #[error("{0}")]
    InvalidPayload(String),
    #[error("Invalid request. {reason}\n{request}")]
    InvalidRequest { request: String, reason: String },
    #[error("Could not hash password. {0}")]
    PasswordHash(String),
    #[error("{0}")]
    ParseInt(#[from] std::num::ParseIntError),
    #[error("Environment Variable error\n{0}")]
    EnvVar(#[from] std::env::VarError),
}

impl PortalError {
    /// True if the error was caused by the caller (bad input or credentials) rather than an
    /// internal failure
    pub const fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidUser
                | Self::InvalidToken { .. }
                | Self::DuplicateEmail
                | Self::MissingRecord { .. }
                | Self::InvalidRequest { .. }
                | Self::InvalidPayload(_)
                | Self::RmpDecode(_)
        )
    }
}

impl From<&str> for PortalError {
    fn from(value: &str) -> Self {
        Self::Generic(value.to_owned())
    }
}

impl From<String> for PortalError {
    fn from(value: String) -> Self {
        Self::Generic(value)
    }
}

impl<R, S> From<(&R, S)> for PortalError
where
    R: std::fmt::Debug,
    S: Into<String>,
{
    fn from((request, reason): (&R, S)) -> Self {
        Self::InvalidRequest {
            request: format!("{request:?}"),
            reason: reason.into(),
        }
    }
}

/// Generic [Result][std::result::Result] type where the error is always [PortalError]
pub type PortalResult<T> = std::result::Result<T, PortalError>;
