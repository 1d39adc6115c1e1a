//! Errors raised while loading inputs and writing reports.

use thiserror::Error;

use crate::user::UserId;

#[derive(Debug, Error)]
pub enum Error {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("invalid activity trace of user {user}: {reason}")]
    InvalidTrace { user: UserId, reason: String },
}

pub type Result<T> = std::result::Result<T, Error>;
