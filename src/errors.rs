use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use thiserror::Error;

/// Failures in the web layer itself, before any flow runs.
#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn payload_too_large(limit: usize) -> Self {
        Self {
            status: StatusCode::PAYLOAD_TOO_LARGE,
            message: format!("upload exceeds {limit} bytes"),
        }
    }
}

impl From<MultipartError> for AppError {
    fn from(err: MultipartError) -> Self {
        Self {
            status: err.status(),
            message: err.body_text(),
        }
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (self.status, self.message).into_response()
    }
}

/// Failures talking to the remote records API.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("{message}")]
    Server { status: u16, message: String },

    #[error("not found")]
    NotFound,

    #[error("record id '{0}' is not a valid path segment")]
    InvalidId(String),

    #[error("invalid API base URL: {0}")]
    InvalidBaseUrl(String),

    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ApiError {
    /// Message shown to the user: the server's own wording when it sent one,
    /// otherwise `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ApiError::Server { message, .. } if !message.trim().is_empty() => message.clone(),
            _ => fallback.to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum FlowError {
    #[error("a request is already in flight")]
    Busy,

    #[error("{0}")]
    Invalid(String),

    #[error("record is not loaded")]
    NotReady,

    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Flattens a server error body into one line. JSON objects of the form
/// `{"field": ["msg", ...]}` become `field: msg`; anything else is kept verbatim.
pub fn server_message(body: &str) -> String {
    let trimmed = body.trim();
    let Ok(value) = serde_json::from_str::<serde_json::Value>(trimmed) else {
        return trimmed.to_string();
    };

    match value {
        serde_json::Value::Object(fields) => fields
            .iter()
            .map(|(field, detail)| {
                let text = flatten_detail(detail);
                if field == "detail" || field == "non_field_errors" {
                    text
                } else {
                    format!("{field}: {text}")
                }
            })
            .collect::<Vec<_>>()
            .join("; "),
        serde_json::Value::String(text) => text,
        other => other.to_string(),
    }
}

fn flatten_detail(detail: &serde_json::Value) -> String {
    match detail {
        serde_json::Value::String(text) => text.clone(),
        serde_json::Value::Array(items) => items
            .iter()
            .map(flatten_detail)
            .collect::<Vec<_>>()
            .join(", "),
        other => other.to_string(),
    }
}
