use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Dispatch was reached with an empty channel set. Callers must run
    /// validation first; this guard exists to catch programming errors, not
    /// user input.
    #[error("dispatch requires at least one channel")]
    NoChannels,

    #[error("duplicate message id: {id}")]
    DuplicateId { id: String },

    #[error("message not found: {id}")]
    MessageNotFound { id: String },

    #[error("message already completed: {id}")]
    AlreadyCompleted { id: String },

    #[error(transparent)]
    Validation(#[from] crate::validate::ValidationError),

    #[error("{message}")]
    Message { message: String },
}

impl Error {
    #[must_use]
    pub fn duplicate_id(id: impl Into<String>) -> Self {
        Self::DuplicateId { id: id.into() }
    }

    #[must_use]
    pub fn message_not_found(id: impl Into<String>) -> Self {
        Self::MessageNotFound { id: id.into() }
    }

    #[must_use]
    pub fn already_completed(id: impl Into<String>) -> Self {
        Self::AlreadyCompleted { id: id.into() }
    }

    #[must_use]
    pub fn message(message: impl Into<String>) -> Self {
        Self::Message {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
