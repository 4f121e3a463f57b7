//! Error taxonomy shared by the pipeline and the HTTP layer.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

/// Where an empty input came from; the two paths report different messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputSource {
    Text,
    File,
}

impl InputSource {
    pub fn empty_message(&self) -> &'static str {
        match self {
            InputSource::Text => "No text provided!",
            InputSource::File => "Empty file content",
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{}", .0.empty_message())]
    EmptyInput(InputSource),
    #[error("Error: No file uploaded")]
    MissingFile,
    #[error("File decoding failed. Ensure it is a UTF-8 encoded text file.")]
    InvalidEncoding,
    #[error("Network diagram requires exactly two entity labels (found {0})")]
    UnsupportedLabelCount(usize),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Status code for the response; only unrecognised failures are 500s.
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Internal(err.into())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Internal(err) => {
                error!(error = ?err, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
            }
            other => (other.status(), other.to_string()).into_response(),
        }
    }
}
