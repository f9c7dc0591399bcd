use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use crate::core::assembler::AssemblyOutput;
use crate::core::audio::OutputFormat;
use crate::core::sentence::Sentence;
use crate::errors::app_error::AppResult;
use crate::state::AppState;

/// Body of `POST /generate-audio`. Unset values use the configured defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateAudioRequest {
    pub sentences: Vec<Sentence>,
    #[serde(default)]
    pub min_pause: Option<f64>,
    #[serde(default)]
    pub max_pause: Option<f64>,
    #[serde(default)]
    pub output_format: Option<OutputFormat>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GenerateAudioResponse {
    pub run_id: String,
    /// Path of the full mix on the server
    pub file_path: String,
    /// Relative URL serving the full mix
    pub download_url: String,
    /// Paths of the per-sentence clips, in order
    pub sentence_files: Vec<String>,
    pub sample_rate: u32,
    pub duration_secs: f64,
}

/// Relative URL of an artifact.
pub fn download_url(run_id: &str, file_name: &str) -> String {
    format!("/download/{run_id}/{file_name}")
}

impl From<&AssemblyOutput> for GenerateAudioResponse {
    fn from(output: &AssemblyOutput) -> Self {
        Self {
            run_id: output.run_id.clone(),
            file_path: output.output_file.display().to_string(),
            download_url: download_url(&output.run_id, &output.output_file_name()),
            sentence_files: output
                .sentence_files
                .iter()
                .map(|p| p.display().to_string())
                .collect(),
            sample_rate: output.sample_rate,
            duration_secs: output.duration_secs,
        }
    }
}

/// Synthesize and assemble a list of sentences with the startup engine
pub async fn generate_audio(
    State(state): State<Arc<AppState>>,
    Json(request): Json<GenerateAudioRequest>,
) -> AppResult<Json<GenerateAudioResponse>> {
    info!(
        "Audio generation requested for {} sentences",
        request.sentences.len()
    );

    let generation = state.config.generation_request(
        request.sentences,
        request.min_pause,
        request.max_pause,
        request.output_format,
    );
    let output = state.assembler().assemble(&generation).await?;

    Ok(Json(GenerateAudioResponse::from(&output)))
}
