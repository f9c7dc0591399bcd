//! HTTP API Tests
//!
//! Exercises the router in-process with `tower::ServiceExt::oneshot`, backed
//! by the scripted engine and a temporary artifact directory.

mod mock_engine;

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::util::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use mock_engine::{MOCK_SAMPLE_RATE, ScriptedEngine, test_config};
use sentence_studio::core::audio::Waveform;
use sentence_studio::core::engine::EngineConfig;
use sentence_studio::{routes, state::AppState};

fn app_with(dir: &TempDir, engine: ScriptedEngine) -> Router {
    let state = AppState::with_engine(test_config(dir.path()), Arc::new(engine));
    routes::api::create_api_router().with_state(state)
}

fn app(dir: &TempDir) -> Router {
    app_with(dir, ScriptedEngine::new())
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn send_json(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_bytes(response: axum::response::Response) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

async fn body_json(response: axum::response::Response) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

fn two_sentences() -> Value {
    json!({
        "sentences": [
            {"text": "Hello", "lang": "en-us", "voice": "af_sarah", "speed": 1.0},
            {"text": "World!", "lang": "en-us", "voice": "af_bella", "speed": 1.0}
        ],
        "min_pause": 0.5,
        "max_pause": 0.5
    })
}

// =============================================================================
// Health and registry
// =============================================================================

#[tokio::test]
async fn test_health_check() {
    let dir = TempDir::new().unwrap();
    let response = app(&dir).oneshot(get("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "OK");
    assert_eq!(body["engine"]["provider"], "scripted");
}

#[tokio::test]
async fn test_voices_from_engine() {
    let dir = TempDir::new().unwrap();
    let response = app(&dir).oneshot(get("/voices")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({"voices": ["af_sarah", "bf_emma"]})
    );
}

#[tokio::test]
async fn test_languages_from_registry() {
    let dir = TempDir::new().unwrap();
    let response = app(&dir).oneshot(get("/languages")).await.unwrap();
    let body = body_json(response).await;

    let languages = body.as_array().unwrap();
    assert_eq!(languages.len(), 9);
    assert_eq!(languages[0]["code"], "en-us");
    assert_eq!(languages[0]["name"], "American English");
    assert_eq!(languages[0]["voices"][0], "af_heart");
    assert!(languages[0].get("engine_code").is_none());
}

// =============================================================================
// Generation and download
// =============================================================================

#[tokio::test]
async fn test_generate_then_download() {
    let dir = TempDir::new().unwrap();
    let app = app(&dir);

    let response = app
        .clone()
        .oneshot(send_json("POST", "/generate-audio", two_sentences()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let run_id = body["run_id"].as_str().unwrap();
    assert_eq!(
        body["download_url"],
        format!("/download/{run_id}/output.wav")
    );
    assert_eq!(body["sentence_files"].as_array().unwrap().len(), 2);
    assert_eq!(body["sample_rate"], MOCK_SAMPLE_RATE);

    let response = app
        .oneshot(get(body["download_url"].as_str().unwrap()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "audio/wav");

    let mix = Waveform::from_wav_bytes(&body_bytes(response).await).unwrap();
    assert_eq!(mix.len(), 500 + 12000 + 600);
}

#[tokio::test]
async fn test_download_mp3_content_type() {
    let dir = TempDir::new().unwrap();
    let run_dir = dir.path().join("run-1");
    std::fs::create_dir_all(&run_dir).unwrap();
    std::fs::write(run_dir.join("output.mp3"), b"ID3").unwrap();
    std::fs::write(run_dir.join("notes.txt"), b"x").unwrap();

    let app = app(&dir);
    let response = app
        .clone()
        .oneshot(get("/download/run-1/output.mp3"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "audio/mpeg");
    assert_eq!(body_bytes(response).await, b"ID3");

    // Anything that is not .mp3 is served as WAV
    let response = app
        .oneshot(get("/download/run-1/notes.txt"))
        .await
        .unwrap();
    assert_eq!(response.headers()[header::CONTENT_TYPE], "audio/wav");
}

#[tokio::test]
async fn test_download_missing_file_is_404() {
    let dir = TempDir::new().unwrap();
    let response = app(&dir)
        .oneshot(get("/download/no-such-run/output.wav"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(body_json(response).await["error"].is_string());
}

#[tokio::test]
async fn test_download_rejects_traversal() {
    let dir = TempDir::new().unwrap();
    let response = app(&dir)
        .oneshot(get("/download/../output.wav"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_generate_empty_list_is_400() {
    let dir = TempDir::new().unwrap();
    let response = app(&dir)
        .oneshot(send_json(
            "POST",
            "/generate-audio",
            json!({"sentences": []}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_generate_invalid_pause_range_is_400() {
    let dir = TempDir::new().unwrap();
    let mut request = two_sentences();
    request["min_pause"] = json!(2.0);
    request["max_pause"] = json!(1.0);

    let response = app(&dir)
        .oneshot(send_json("POST", "/generate-audio", request))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_generate_engine_failure_is_502() {
    let dir = TempDir::new().unwrap();
    let response = app_with(&dir, ScriptedEngine::new().failing_at(0))
        .oneshot(send_json("POST", "/generate-audio", two_sentences()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn test_generate_inconsistent_rate_is_500() {
    let dir = TempDir::new().unwrap();
    let response = app_with(&dir, ScriptedEngine::new().with_rate_at(1, 16000))
        .oneshot(send_json("POST", "/generate-audio", two_sentences()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

// =============================================================================
// Editor session
// =============================================================================

#[tokio::test]
async fn test_editor_starts_with_default_sentence() {
    let dir = TempDir::new().unwrap();
    let response = app(&dir).oneshot(get("/editor")).await.unwrap();
    let body = body_json(response).await;

    assert_eq!(
        body["sentences"],
        json!([{"text": "", "lang": "en-us", "voice": "af_sarah", "speed": 1.0}])
    );
    assert!(body["last_generation"].is_null());
}

#[tokio::test]
async fn test_editor_edit_cycle() {
    let dir = TempDir::new().unwrap();
    let app = app(&dir);

    let response = app
        .clone()
        .oneshot(send_json(
            "PATCH",
            "/editor/sentences/0",
            json!({"text": "Cheerio", "lang": "en-gb"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["sentence"]["voice"], "bf_alice");

    let response = app
        .clone()
        .oneshot(send_json("POST", "/editor/sentences", json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["index"], 1);
    assert_eq!(body["sentence"]["text"], "");
    assert_eq!(body["sentence"]["lang"], "en-gb");

    let response = app
        .clone()
        .oneshot(send_json(
            "POST",
            "/editor/sentences/1/move",
            json!({"direction": "up"}),
        ))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body[0]["text"], "");
    assert_eq!(body[1]["text"], "Cheerio");

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/editor/sentences/0")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["text"], "Cheerio");
}

#[tokio::test]
async fn test_editor_rejects_voice_from_other_language() {
    let dir = TempDir::new().unwrap();
    let app = app(&dir);

    let response = app
        .clone()
        .oneshot(send_json(
            "PATCH",
            "/editor/sentences/0",
            json!({"text": "changed", "voice": "jf_alpha"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Rejected updates leave the sentence untouched
    let body = body_json(app.oneshot(get("/editor")).await.unwrap()).await;
    assert_eq!(body["sentences"][0]["text"], "");
}

#[tokio::test]
async fn test_editor_index_out_of_range_is_404() {
    let dir = TempDir::new().unwrap();
    let app = app(&dir);

    let response = app
        .clone()
        .oneshot(send_json(
            "PATCH",
            "/editor/sentences/5",
            json!({"text": "x"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/editor/sentences/5")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_editor_export_and_import() {
    let dir = TempDir::new().unwrap();
    let app = app(&dir);

    let imported = json!([
        {"text": "Uno", "lang": "es", "voice": "em_alex", "speed": 1.0},
        {"text": "Due"}
    ]);
    let response = app
        .clone()
        .oneshot(send_json("POST", "/editor/import", imported))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.oneshot(get("/editor/export")).await.unwrap();
    assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");
    assert!(
        response.headers()[header::CONTENT_DISPOSITION]
            .to_str()
            .unwrap()
            .contains("sentences.json")
    );

    let body = body_json(response).await;
    assert_eq!(body[0]["voice"], "em_alex");
    assert_eq!(
        body[1],
        json!({"text": "Due", "lang": "en-us", "voice": "af_sarah", "speed": 1.0})
    );
}

#[tokio::test]
async fn test_editor_import_not_a_list_is_400() {
    let dir = TempDir::new().unwrap();
    let app = app(&dir);

    let response = app
        .clone()
        .oneshot(send_json("POST", "/editor/import", json!("not a list")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert!(body["error"].as_str().unwrap().contains("Invalid format"));

    // Session unchanged
    let body = body_json(app.oneshot(get("/editor")).await.unwrap()).await;
    assert_eq!(body["sentences"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_editor_generate_missing_model_is_404() {
    let dir = TempDir::new().unwrap();
    let output_dir = dir.path().join("artifacts");
    let state = AppState::with_engine(test_config(&output_dir), Arc::new(ScriptedEngine::new()));
    let app = routes::api::create_api_router().with_state(state);

    let missing = dir.path().join("missing.onnx").display().to_string();
    let response = app
        .oneshot(send_json(
            "POST",
            "/editor/generate",
            json!({"model_file": missing, "voices_file": missing}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = body_json(response).await;
    assert!(body["error"].as_str().unwrap().contains("Model file not found"));
    // Nothing generated
    assert!(!output_dir.exists());
}

/// State whose configured engine kind is `http`, pointed at `server`.
fn http_engine_state(dir: &TempDir, server: &MockServer) -> (Arc<AppState>, Arc<ScriptedEngine>) {
    let mut config = test_config(&dir.path().join("artifacts"));
    config.engine = EngineConfig {
        kind: "http".to_string(),
        base_url: server.uri(),
        timeout_seconds: 5,
        ..Default::default()
    };
    let startup = Arc::new(ScriptedEngine::new());
    (AppState::with_engine(config, startup.clone()), startup)
}

#[tokio::test]
async fn test_editor_generate_loads_fresh_engine() {
    let dir = TempDir::new().unwrap();
    let server = MockServer::start().await;
    let wav = Waveform::new(vec![0.2; 2400], MOCK_SAMPLE_RATE)
        .to_wav_bytes()
        .unwrap();
    Mock::given(method("POST"))
        .and(path("/v1/audio/speech"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(wav))
        .expect(2)
        .mount(&server)
        .await;

    let model = dir.path().join("kokoro.onnx");
    let voices = dir.path().join("voices.bin");
    std::fs::write(&model, b"model").unwrap();
    std::fs::write(&voices, b"voices").unwrap();

    let (state, startup) = http_engine_state(&dir, &server);
    let app = routes::api::create_api_router().with_state(state);

    let response = app
        .clone()
        .oneshot(send_json(
            "POST",
            "/editor/import",
            json!([{"text": "First"}, {"text": "Second"}]),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(send_json(
            "POST",
            "/editor/generate",
            json!({
                "model_file": model.display().to_string(),
                "voices_file": voices.display().to_string(),
                "min_pause": 0.5,
                "max_pause": 0.5
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let run_id = body["run_id"].as_str().unwrap().to_string();
    assert_eq!(body["sample_rate"], MOCK_SAMPLE_RATE);
    assert_eq!(body["sentence_files"].as_array().unwrap().len(), 2);
    assert_eq!(
        body["download_url"],
        format!("/download/{run_id}/output.wav")
    );
    // The startup engine is not used for editor generations
    assert_eq!(startup.call_count(), 0);

    let session = body_json(app.clone().oneshot(get("/editor")).await.unwrap()).await;
    let last = &session["last_generation"];
    assert_eq!(last["run_id"], run_id.as_str());
    assert_eq!(last["total_samples"], 2400 * 2 + 12000);

    let response = app
        .oneshot(get(body["download_url"].as_str().unwrap()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_editor_generate_checks_files_for_http_engine() {
    let dir = TempDir::new().unwrap();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/audio/speech"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let (state, _) = http_engine_state(&dir, &server);
    let app = routes::api::create_api_router().with_state(state);

    let missing = dir.path().join("missing.bin").display().to_string();
    let response = app
        .clone()
        .oneshot(send_json(
            "POST",
            "/editor/generate",
            json!({"model_file": missing, "voices_file": missing}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let session = body_json(app.oneshot(get("/editor")).await.unwrap()).await;
    assert!(session["last_generation"].is_null());
}

#[tokio::test]
async fn test_editor_rejects_non_finite_speed() {
    let dir = TempDir::new().unwrap();
    let app = app(&dir);

    let response = app
        .clone()
        .oneshot(send_json(
            "PATCH",
            "/editor/sentences/0",
            json!({"speed": -2.0}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(
        body_json(response).await["error"]
            .as_str()
            .unwrap()
            .contains("Speed must be a positive number")
    );

    let body = body_json(app.oneshot(get("/editor/export")).await.unwrap()).await;
    assert_eq!(body[0]["speed"], 1.0);
}
