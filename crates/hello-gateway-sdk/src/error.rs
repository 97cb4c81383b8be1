//! Error types for Hello Gateway handlers

use thiserror::Error;

/// Errors that can occur while delivering an invocation to a handler or while
/// the handler processes it
#[derive(Error, Debug)]
pub enum HandlerError {
    #[error("IPC error: {0}")]
    Ipc(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Frame of {len} bytes exceeds limit of {max} bytes")]
    FrameTooLarge { len: usize, max: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl HandlerError {
    /// Convert the error to an HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            HandlerError::BadRequest(_) => 400,
            HandlerError::FrameTooLarge { .. } => 413,
            _ => 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(HandlerError::BadRequest("bad delimiter".into()).status_code(), 400);
        assert_eq!(HandlerError::FrameTooLarge { len: 10, max: 5 }.status_code(), 413);
        assert_eq!(HandlerError::Internal("disk full".into()).status_code(), 500);
        assert_eq!(HandlerError::Ipc("closed".into()).status_code(), 500);
    }
}
