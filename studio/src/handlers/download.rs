use axum::{
    extract::{Path, State},
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tracing::{debug, info};

use crate::core::audio::content_type_for_file;
use crate::core::storage::is_valid_artifact_name;
use crate::errors::app_error::{AppError, AppResult};
use crate::state::AppState;

/// Download a generated artifact
///
/// `.mp3` files are served as `audio/mpeg`, everything else as `audio/wav`.
pub async fn download_artifact(
    State(state): State<Arc<AppState>>,
    Path((run_id, file_name)): Path<(String, String)>,
) -> AppResult<Response> {
    info!(
        "Artifact download requested - run_id={}, file={}",
        run_id, file_name
    );

    if !is_valid_artifact_name(&run_id) || !is_valid_artifact_name(&file_name) {
        return Err(AppError::BadRequest("Invalid file name".to_string()));
    }

    let body = state.store.read(&run_id, &file_name).await?;
    debug!("Serving {} bytes for {}/{}", body.len(), run_id, file_name);

    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static(content_type_for_file(&file_name)),
    );
    // Non-ASCII names are served without a suggested filename
    if let Ok(disposition) =
        HeaderValue::from_str(&format!("attachment; filename=\"{file_name}\""))
    {
        headers.insert(header::CONTENT_DISPOSITION, disposition);
    }

    Ok((StatusCode::OK, headers, body).into_response())
}
