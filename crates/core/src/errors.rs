use thiserror::Error;

#[derive(Error, Debug)]
pub enum BookingError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Backend rejected request ({status}): {}", .message.as_deref().unwrap_or("no message"))]
    Api {
        status: u16,
        message: Option<String>,
    },

    #[error("Transport error: {0}")]
    Transport(#[from] eyre::Report),

    #[error("Internal error: {0}")]
    Internal(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl BookingError {
    /// Text to show next to the action that failed.
    ///
    /// Backend messages are passed through verbatim; everything else collapses
    /// to `fallback` so transport details never reach the user.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            BookingError::Api {
                message: Some(message),
                ..
            } if !message.trim().is_empty() => message.clone(),
            BookingError::Validation(message) => message.clone(),
            _ => fallback.to_string(),
        }
    }
}

pub type BookingResult<T> = Result<T, BookingError>;
