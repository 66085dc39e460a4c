use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::fmt;

/// Application-specific error types.
///
/// The bureau-facing variants mirror the BCRA response taxonomy one to one.
/// Every bureau failure carries the diagnostic strings the bureau returned
/// (possibly none) so they can be surfaced to the advisor verbatim.
#[derive(Debug, Clone)]
pub enum AppError {
    /// Identifier did not normalize to a valid CUIT, or the bureau rejected
    /// the request parameters (HTTP-equivalent 400).
    InvalidIdentifier(Vec<String>),
    /// The bureau has no record for the identifier (HTTP-equivalent 404).
    NotFound(Vec<String>),
    /// The bureau reported a server-side failure (HTTP-equivalent 500).
    UpstreamUnavailable(Vec<String>),
    /// The bureau answered with a status outside the documented contract.
    UnexpectedResponse {
        /// Raw status code reported by the bureau.
        status: u16,
        /// Diagnostic messages accompanying the response.
        messages: Vec<String>,
    },
    /// Transport-level failure: the bureau could not be reached at all.
    NetworkError(String),
    /// Bad request error (invalid input outside the bureau contract).
    BadRequest(String),
    /// Internal server error.
    InternalError(String),
    /// Error with context chain for better debugging.
    WithContext {
        /// The underlying source of the error.
        source: Box<AppError>,
        /// Additional context message.
        context: String,
    },
}

impl AppError {
    /// Machine status-code equivalent for the bureau error taxonomy.
    pub fn status_code(&self) -> u16 {
        match self {
            AppError::InvalidIdentifier(_) => 400,
            AppError::NotFound(_) => 404,
            AppError::UpstreamUnavailable(_) => 500,
            AppError::UnexpectedResponse { status, .. } => *status,
            AppError::NetworkError(_) => 0,
            AppError::BadRequest(_) => 400,
            AppError::InternalError(_) => 500,
            AppError::WithContext { source, .. } => source.status_code(),
        }
    }

    /// Human-readable diagnostic messages carried by the error.
    pub fn messages(&self) -> &[String] {
        match self {
            AppError::InvalidIdentifier(msgs)
            | AppError::NotFound(msgs)
            | AppError::UpstreamUnavailable(msgs)
            | AppError::UnexpectedResponse { messages: msgs, .. } => msgs,
            AppError::WithContext { source, .. } => source.messages(),
            _ => &[],
        }
    }
}

impl fmt::Display for AppError {
    /// Formats the error for display.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::InvalidIdentifier(msgs) => {
                write!(f, "Invalid identifier: {}", msgs.join("; "))
            }
            AppError::NotFound(msgs) => write!(f, "Not found: {}", msgs.join("; ")),
            AppError::UpstreamUnavailable(msgs) => {
                write!(f, "Bureau unavailable: {}", msgs.join("; "))
            }
            AppError::UnexpectedResponse { status, messages } => {
                write!(
                    f,
                    "Unexpected bureau response {}: {}",
                    status,
                    messages.join("; ")
                )
            }
            AppError::NetworkError(msg) => write!(f, "Network error: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            AppError::InternalError(msg) => write!(f, "Internal error: {}", msg),
            AppError::WithContext { source, context } => {
                write!(f, "{}: {}", context, source)
            }
        }
    }
}

impl IntoResponse for AppError {
    /// Converts the error into an HTTP response.
    ///
    /// Maps each error variant to an appropriate HTTP status code and JSON body.
    /// Logs errors appropriately based on their severity.
    fn into_response(self) -> Response {
        let (status, error_message, messages) = match &self {
            AppError::InvalidIdentifier(msgs) => (
                StatusCode::BAD_REQUEST,
                "Invalid taxpayer identifier".to_string(),
                msgs.clone(),
            ),
            AppError::NotFound(msgs) => (
                StatusCode::NOT_FOUND,
                "No bureau record for identifier".to_string(),
                msgs.clone(),
            ),
            AppError::UpstreamUnavailable(msgs) => {
                tracing::error!("Bureau unavailable: {:?}", msgs);
                (
                    StatusCode::BAD_GATEWAY,
                    "Credit bureau unavailable".to_string(),
                    msgs.clone(),
                )
            }
            AppError::UnexpectedResponse { status, messages } => {
                tracing::error!("Unexpected bureau response {}: {:?}", status, messages);
                (
                    StatusCode::BAD_GATEWAY,
                    format!("Unexpected bureau response ({})", status),
                    messages.clone(),
                )
            }
            AppError::NetworkError(msg) => {
                tracing::error!("Network error reaching bureau: {}", msg);
                (
                    StatusCode::GATEWAY_TIMEOUT,
                    "Credit bureau unreachable".to_string(),
                    vec![],
                )
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone(), vec![]),
            AppError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                    vec![],
                )
            }
            AppError::WithContext { source, context } => {
                // Log full context chain for debugging
                tracing::error!("Error with context: {} -> {}", context, source);
                // Delegate to underlying error's response
                return source.clone().into_response();
            }
        };

        let body = Json(json!({
            "error": error_message,
            "messages": messages,
        }));

        (status, body).into_response()
    }
}

impl From<reqwest::Error> for AppError {
    /// Converts a `reqwest::Error` into an `AppError`.
    ///
    /// Connect/timeout failures mean the bureau was never reached; anything
    /// else surfaced by reqwest is treated the same way, since by then no
    /// well-formed bureau envelope was obtained.
    fn from(err: reqwest::Error) -> Self {
        AppError::NetworkError(err.to_string())
    }
}

/// Extension trait for adding context to errors.
/// Similar to `anyhow::Context` but for our `AppError` type.
pub trait ResultExt<T> {
    /// Add context to an error.
    ///
    /// # Arguments
    ///
    /// * `context` - The context message to add.
    fn context(self, context: impl Into<String>) -> Result<T, AppError>;

    /// Add context lazily (only evaluated on error).
    ///
    /// # Arguments
    ///
    /// * `f` - A closure that produces the context message.
    #[allow(dead_code)]
    fn with_context<F>(self, f: F) -> Result<T, AppError>
    where
        F: FnOnce() -> String;
}

impl<T> ResultExt<T> for Result<T, AppError> {
    fn context(self, context: impl Into<String>) -> Result<T, AppError> {
        self.map_err(|e| AppError::WithContext {
            source: Box::new(e),
            context: context.into(),
        })
    }

    fn with_context<F>(self, f: F) -> Result<T, AppError>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| AppError::WithContext {
            source: Box::new(e),
            context: f(),
        })
    }
}
