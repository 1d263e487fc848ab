// Recoverable errors raised by the record and device managers
use crate::domain::record::RecordId;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("invalid `{field}`: {message}")]
    Validation { field: String, message: String },

    #[error("record {0} not found")]
    NotFound(RecordId),

    #[error("{0} not found")]
    UnknownTarget(String),

    #[error("another change is awaiting confirmation")]
    ConfirmationPending,

    #[error("no change is awaiting confirmation")]
    NothingPending,

    #[error("ticket {0} does not match the change awaiting confirmation")]
    StaleTicket(u64),

    #[error("module {0} is read-only")]
    ReadOnly(String),
}

impl RecordError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        RecordError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }
}
