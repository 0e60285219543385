//! Error types for the FPL table adapter

use thiserror::Error;

#[cfg(test)]
mod tests;

pub type Result<T> = std::result::Result<T, FplError>;

#[derive(Error, Debug)]
pub enum FplError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse id: {0}")]
    InvalidId(#[from] std::num::ParseIntError),

    #[error(
        "Email not provided. For functions that require login, the email address is mandatory. \
         Set it in the credentials or the {env_var} environment variable."
    )]
    MissingEmail { env_var: String },

    #[error(
        "Password not provided. For functions that require login, the password is mandatory. \
         Set it in the credentials or the {env_var} environment variable."
    )]
    MissingPassword { env_var: String },

    #[error("No user ID was specified and none could be resolved from the user profile")]
    MissingUserId,

    #[error("User must be logged in")]
    NotLoggedIn,

    #[error("Login rejected: {message}")]
    LoginRejected { message: String },

    #[error("User ID does not match provided email address")]
    EntryMismatch,

    #[error("Player not found: {id}")]
    PlayerNotFound { id: u32 },

    #[error("Unexpected API payload: {context}")]
    UnexpectedPayload { context: String },

    #[error("Record is missing index key '{key}'")]
    MissingIndexKey { key: String },

    #[error("Background worker is no longer running")]
    WorkerUnavailable,
}

impl FplError {
    pub(crate) fn unexpected(context: impl Into<String>) -> Self {
        FplError::UnexpectedPayload {
            context: context.into(),
        }
    }
}
