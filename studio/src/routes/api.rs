use axum::{
    Router,
    routing::{get, patch, post},
};
use tower_http::trace::TraceLayer;

use crate::handlers::{api, download, editor, generate, voices};
use crate::state::AppState;
use std::sync::Arc;

/// Create the API router
pub fn create_api_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(api::health_check))
        .route("/generate-audio", post(generate::generate_audio))
        .route(
            "/download/{run_id}/{file_name}",
            get(download::download_artifact),
        )
        .route("/voices", get(voices::list_voices))
        .route("/languages", get(voices::list_languages))
        // Editor session
        .route("/editor", get(editor::get_session))
        .route("/editor/sentences", post(editor::add_sentence))
        .route(
            "/editor/sentences/{index}",
            patch(editor::update_sentence).delete(editor::delete_sentence),
        )
        .route(
            "/editor/sentences/{index}/move",
            post(editor::move_sentence),
        )
        .route("/editor/export", get(editor::export_sentences))
        .route("/editor/import", post(editor::import_sentences))
        .route("/editor/generate", post(editor::generate_from_session))
        .layer(TraceLayer::new_for_http())
}
