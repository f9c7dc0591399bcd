//! Interactive editor session endpoints.
//!
//! The server holds one sentence list in [`AppState`]. These handlers edit
//! it, move it in and out as JSON, and generate audio from it.

use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use super::generate::GenerateAudioResponse;
use crate::core::audio::OutputFormat;
use crate::core::editor::{Direction, EditorError, EditorSession, SentenceList};
use crate::core::engine::create_engine;
use crate::core::sentence::{Sentence, SentenceField};
use crate::errors::app_error::{AppError, AppResult};
use crate::state::AppState;

/// Partial update of one sentence. The language is applied before the
/// voice, so a voice can be chosen for the new language in one request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SentenceUpdate {
    pub text: Option<String>,
    #[serde(alias = "language")]
    pub lang: Option<String>,
    pub voice: Option<String>,
    pub speed: Option<f32>,
}

impl SentenceUpdate {
    /// Field updates in application order.
    fn into_fields(self) -> Vec<SentenceField> {
        let mut fields = Vec::with_capacity(4);
        if let Some(text) = self.text {
            fields.push(SentenceField::Text(text));
        }
        if let Some(lang) = self.lang {
            fields.push(SentenceField::Lang(lang));
        }
        if let Some(voice) = self.voice {
            fields.push(SentenceField::Voice(voice));
        }
        if let Some(speed) = self.speed {
            fields.push(SentenceField::Speed(speed));
        }
        fields
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MoveRequest {
    pub direction: Direction,
}

/// Body of `POST /editor/generate`. Unset values use the configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EditorGenerateRequest {
    pub model_file: Option<String>,
    pub voices_file: Option<String>,
    pub min_pause: Option<f64>,
    pub max_pause: Option<f64>,
    pub output_format: Option<OutputFormat>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SentenceResponse {
    pub index: usize,
    pub sentence: Sentence,
}

/// Current session: sentences and the last generation
pub async fn get_session(State(state): State<Arc<AppState>>) -> Json<EditorSession> {
    Json(state.editor.lock().await.clone())
}

/// Append a sentence cloned from the last one
pub async fn add_sentence(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let mut session = state.editor.lock().await;
    let index = session.sentences.add();
    let sentence = session.sentences.as_slice()[index].clone();
    (StatusCode::CREATED, Json(SentenceResponse { index, sentence }))
}

/// Update fields of one sentence
pub async fn update_sentence(
    State(state): State<Arc<AppState>>,
    Path(index): Path<usize>,
    Json(update): Json<SentenceUpdate>,
) -> AppResult<Json<SentenceResponse>> {
    let mut session = state.editor.lock().await;
    session.sentences.check_index(index)?;

    // Apply to a scratch copy so a rejected update changes nothing
    let mut updated = session.sentences.as_slice()[index].clone();
    for field in update.into_fields() {
        updated.set_field(field).map_err(EditorError::from)?;
    }

    if let Some(slot) = session.sentences.get_mut(index) {
        *slot = updated.clone();
    }
    Ok(Json(SentenceResponse {
        index,
        sentence: updated,
    }))
}

/// Delete one sentence
pub async fn delete_sentence(
    State(state): State<Arc<AppState>>,
    Path(index): Path<usize>,
) -> AppResult<Json<SentenceList>> {
    let mut session = state.editor.lock().await;
    let removed = session.sentences.try_delete(index)?;
    info!("Deleted sentence {}: {:?}", index, removed.text);
    Ok(Json(session.sentences.clone()))
}

/// Swap a sentence with its neighbour
pub async fn move_sentence(
    State(state): State<Arc<AppState>>,
    Path(index): Path<usize>,
    Json(request): Json<MoveRequest>,
) -> AppResult<Json<SentenceList>> {
    let mut session = state.editor.lock().await;
    session.sentences.check_index(index)?;
    session.sentences.move_sentence(index, request.direction);
    Ok(Json(session.sentences.clone()))
}

/// Download the sentence list as a JSON file
pub async fn export_sentences(State(state): State<Arc<AppState>>) -> AppResult<Response> {
    let exported = state.editor.lock().await.sentences.export()?;

    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    headers.insert(
        header::CONTENT_DISPOSITION,
        HeaderValue::from_static("attachment; filename=\"sentences.json\""),
    );
    Ok((StatusCode::OK, headers, exported).into_response())
}

/// Replace the sentence list with an imported JSON array
pub async fn import_sentences(
    State(state): State<Arc<AppState>>,
    body: String,
) -> AppResult<Json<SentenceList>> {
    let imported = SentenceList::import(&body)?;
    info!("Imported {} sentences", imported.len());

    let mut session = state.editor.lock().await;
    session.sentences = imported;
    Ok(Json(session.sentences.clone()))
}

/// Generate audio from the session's sentences with a freshly loaded engine
///
/// The model and voices files must exist whatever the configured engine
/// kind; a missing file answers 404 and nothing is generated. Only the
/// command engine reads them.
pub async fn generate_from_session(
    State(state): State<Arc<AppState>>,
    Json(request): Json<EditorGenerateRequest>,
) -> AppResult<Json<GenerateAudioResponse>> {
    let engine_config =
        state.engine_config_for(request.model_file.as_deref(), request.voices_file.as_deref());

    for (path, what) in [
        (&engine_config.model_file, "Model file"),
        (&engine_config.voices_file, "Voices file"),
    ] {
        if !path.is_file() {
            return Err(AppError::NotFound(format!(
                "{} not found: {}",
                what,
                path.display()
            )));
        }
    }

    let engine = create_engine(&engine_config)?;

    // Snapshot so the session stays editable while audio is generated
    let sentences: Vec<Sentence> = state.editor.lock().await.sentences.clone().into();
    let generation = state.config.generation_request(
        sentences,
        request.min_pause,
        request.max_pause,
        request.output_format,
    );

    let output = state.assembler_with(engine).assemble(&generation).await?;
    let response = GenerateAudioResponse::from(&output);

    state.editor.lock().await.last_generation = Some(output);
    Ok(Json(response))
}
