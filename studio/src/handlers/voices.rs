use axum::{extract::State, response::Json};
use serde::Serialize;
use std::sync::Arc;

use crate::core::registry::{self, Language};
use crate::errors::app_error::AppResult;
use crate::state::AppState;

#[derive(Debug, Clone, Serialize)]
pub struct VoicesResponse {
    pub voices: Vec<String>,
}

/// List the voices advertised by the loaded engine, verbatim
pub async fn list_voices(State(state): State<Arc<AppState>>) -> AppResult<Json<VoicesResponse>> {
    let voices = state.engine.list_voices().await?;
    Ok(Json(VoicesResponse { voices }))
}

/// List the languages of the registry with their voices
pub async fn list_languages() -> Json<Vec<&'static Language>> {
    Json(registry::languages().collect())
}
