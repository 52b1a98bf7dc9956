//! Error types for custom code methods and the dispatch layer

use thiserror::Error;

/// Errors that can occur while dispatching or serving a custom code method
#[derive(Error, Debug)]
pub enum HandlerError {
    #[error("IPC error: {0}")]
    Ipc(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Custom code method not found: {0}")]
    MethodNotFound(String),

    #[error("Custom code method already registered: {0}")]
    DuplicateMethod(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl HandlerError {
    /// Convert the error to an HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            HandlerError::BadRequest(_) => 400,
            HandlerError::MethodNotFound(_) => 404,
            HandlerError::DuplicateMethod(_) => 409,
            _ => 500,
        }
    }

    /// Convert to a Response
    pub fn to_response(&self) -> crate::Response {
        crate::Response::error(self.status_code(), self.to_string())
    }
}

impl From<HandlerError> for crate::Response {
    fn from(err: HandlerError) -> Self {
        err.to_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Response;

    #[test]
    fn test_status_codes() {
        assert_eq!(HandlerError::BadRequest("x".into()).status_code(), 400);
        assert_eq!(HandlerError::MethodNotFound("x".into()).status_code(), 404);
        assert_eq!(HandlerError::DuplicateMethod("x".into()).status_code(), 409);
        assert_eq!(HandlerError::Ipc("x".into()).status_code(), 500);
    }

    #[test]
    fn test_handler_error_conversion() {
        let err = HandlerError::MethodNotFound("nope".to_string());
        let response: Response = err.into();
        assert_eq!(response.status, 404);
        assert_eq!(
            response.field("error"),
            Some(Some("Custom code method not found: nope"))
        );
    }
}
