//! Application-level error type returned by HTTP handlers.
//!
//! Every module error converts into [`AppError`], which renders as
//! `{"error": "<message>"}` with a status code chosen by error kind.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

use crate::core::assembler::AssemblyError;
use crate::core::audio::AudioError;
use crate::core::editor::EditorError;
use crate::core::engine::EngineError;
use crate::core::storage::StorageError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Assembly(#[from] AssemblyError),
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error(transparent)]
    Editor(#[from] EditorError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Audio(#[from] AudioError),
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Internal(String),
}

pub type AppResult<T> = Result<T, AppError>;

fn engine_status(err: &EngineError) -> StatusCode {
    match err {
        EngineError::Uninitialized(_) => StatusCode::SERVICE_UNAVAILABLE,
        EngineError::Synthesis(_) => StatusCode::BAD_GATEWAY,
    }
}

fn audio_status(err: &AudioError) -> StatusCode {
    match err {
        AudioError::InvalidRange { .. } | AudioError::UnsupportedFormat(_) => {
            StatusCode::BAD_REQUEST
        }
        AudioError::Decode(_) | AudioError::Encode(_) | AudioError::Io(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

fn storage_status(err: &StorageError) -> StatusCode {
    match err {
        StorageError::NotFound(_) => StatusCode::NOT_FOUND,
        StorageError::InvalidName(_) => StatusCode::BAD_REQUEST,
        StorageError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Assembly(err) => match err {
                AssemblyError::EmptyRequest => StatusCode::BAD_REQUEST,
                AssemblyError::Synthesis { source, .. } => engine_status(source),
                AssemblyError::InconsistentSampleRate { .. } => StatusCode::INTERNAL_SERVER_ERROR,
                AssemblyError::Audio(audio) => audio_status(audio),
                AssemblyError::Storage(storage) => storage_status(storage),
            },
            AppError::Engine(err) => engine_status(err),
            AppError::Editor(err) => match err {
                EditorError::ImportFormat(_) | EditorError::InvalidField(_) => {
                    StatusCode::BAD_REQUEST
                }
                EditorError::IndexOutOfRange { .. } => StatusCode::NOT_FOUND,
                EditorError::Export(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            AppError::Storage(err) => storage_status(err),
            AppError::Audio(err) => audio_status(err),
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.to_string();

        if status.is_server_error() {
            error!("Request failed with {}: {}", status, message);
        } else {
            warn!("Request rejected with {}: {}", status, message);
        }

        (status, Json(json!({ "error": message }))).into_response()
    }
}
