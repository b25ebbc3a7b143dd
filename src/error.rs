//! Error types for moodlist.
//!
//! Every fallible operation in the library returns [`AppError`]. Handlers
//! return it directly; [`IntoResponse`] turns it into an HTML error page.

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;

use crate::{render, warning};

#[derive(Error, Debug)]
pub enum AppError {
    /// Missing or malformed configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Network or transport errors talking to Spotify
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Spotify answered with a non-success status
    #[error("Spotify API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// OAuth flow errors (denied access, state mismatch, missing code)
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Invalid form input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, AppError>;

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidInput(_) | AppError::Auth(_) => StatusCode::BAD_REQUEST,
            AppError::Http(_) | AppError::Api { .. } => StatusCode::BAD_GATEWAY,
            AppError::Config(_) | AppError::Json(_) | AppError::Io(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        warning!("Request failed with {}: {}", status, self);
        (status, Html(render::error_page(status, &self.to_string()))).into_response()
    }
}
