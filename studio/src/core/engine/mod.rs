//! Speech synthesis engines.
//!
//! The studio treats the TTS model as a black box reached through the
//! [`SpeechEngine`] trait:
//!
//! - `http` - an OpenAI-compatible `/v1/audio/speech` server (Kokoro-FastAPI)
//! - `command` - a local Kokoro command line run once per sentence
//!
//! Engines are built once with [`create_engine`] and shared as
//! `Arc<dyn SpeechEngine>`.

pub mod command;
pub mod http;

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use phf::phf_map;
use thiserror::Error;
use tracing::info;

use super::audio::Waveform;
use super::sentence::Sentence;

pub use command::CommandEngine;
pub use http::HttpEngine;

/// Default engine base URL (Kokoro-FastAPI)
pub const DEFAULT_ENGINE_BASE_URL: &str = "http://localhost:8880";
pub const DEFAULT_ENGINE_MODEL: &str = "kokoro";
pub const DEFAULT_ENGINE_COMMAND: &str = "kokoro-tts";
pub const DEFAULT_MODEL_FILE: &str = "models/kokoro-v1.0.onnx";
pub const DEFAULT_VOICES_FILE: &str = "models/voices-v1.0.bin";
pub const DEFAULT_ENGINE_TIMEOUT_SECONDS: u64 = 120;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Engine not initialized: {0}")]
    Uninitialized(String),
    #[error("Synthesis failed: {0}")]
    Synthesis(String),
}

pub type EngineResult<T> = Result<T, EngineError>;

/// One synthesis call. Values are passed to the engine unvalidated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SynthesisRequest<'a> {
    pub text: &'a str,
    pub lang: &'a str,
    pub voice: &'a str,
    pub speed: f32,
}

impl<'a> From<&'a Sentence> for SynthesisRequest<'a> {
    fn from(sentence: &'a Sentence) -> Self {
        Self {
            text: &sentence.text,
            lang: &sentence.lang,
            voice: &sentence.voice,
            speed: sentence.speed,
        }
    }
}

#[async_trait]
pub trait SpeechEngine: Send + Sync {
    /// Engine name as used in configuration
    fn name(&self) -> &str;

    /// Synthesize one sentence into a mono waveform.
    async fn synthesize(&self, request: &SynthesisRequest<'_>) -> EngineResult<Waveform>;

    /// Voices the engine advertises, verbatim.
    async fn list_voices(&self) -> EngineResult<Vec<String>>;

    fn provider_info(&self) -> serde_json::Value;
}

/// Which engine implementation to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineKind {
    Http,
    Command,
}

impl EngineKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EngineKind::Http => "http",
            EngineKind::Command => "command",
        }
    }
}

pub static ENGINE_KIND_MAP: phf::Map<&'static str, EngineKind> = phf_map! {
    // Primary names
    "http" => EngineKind::Http,
    "command" => EngineKind::Command,
    // Aliases
    "kokoro-http" => EngineKind::Http,
    "kokoro-fastapi" => EngineKind::Http,
    "cli" => EngineKind::Command,
    "kokoro-cli" => EngineKind::Command,
    "kokoro-tts" => EngineKind::Command,
};

/// Resolve an engine name or alias, case-insensitively.
#[inline]
pub fn resolve_engine_kind(name: &str) -> Option<EngineKind> {
    ENGINE_KIND_MAP.get(name.trim().to_lowercase().as_str()).copied()
}

/// Engine settings shared by all engine kinds.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Engine name or alias (`http`, `command`, ...)
    pub kind: String,
    /// Base URL of the HTTP engine
    pub base_url: String,
    /// Optional bearer token for the HTTP engine
    pub api_key: Option<String>,
    /// Model name sent to the HTTP engine
    pub model: String,
    /// Executable run by the command engine
    pub command: String,
    /// Model weights used by the command engine
    pub model_file: PathBuf,
    /// Voice pack used by the command engine
    pub voices_file: PathBuf,
    /// Per-sentence synthesis timeout
    pub timeout_seconds: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            kind: EngineKind::Command.as_str().to_string(),
            base_url: DEFAULT_ENGINE_BASE_URL.to_string(),
            api_key: None,
            model: DEFAULT_ENGINE_MODEL.to_string(),
            command: DEFAULT_ENGINE_COMMAND.to_string(),
            model_file: PathBuf::from(DEFAULT_MODEL_FILE),
            voices_file: PathBuf::from(DEFAULT_VOICES_FILE),
            timeout_seconds: DEFAULT_ENGINE_TIMEOUT_SECONDS,
        }
    }
}

impl EngineConfig {
    /// Same settings with different model and voice files.
    pub fn with_model_files(&self, model_file: PathBuf, voices_file: PathBuf) -> Self {
        Self {
            model_file,
            voices_file,
            ..self.clone()
        }
    }
}

/// Factory function to create a speech engine.
///
/// # Supported Engines
///
/// - `"http"` or `"kokoro-http"` or `"kokoro-fastapi"` - OpenAI-compatible speech server
/// - `"command"` or `"cli"` or `"kokoro-cli"` or `"kokoro-tts"` - local Kokoro command line
///
/// Fails with [`EngineError::Uninitialized`] when the engine cannot be loaded.
pub fn create_engine(config: &EngineConfig) -> EngineResult<Arc<dyn SpeechEngine>> {
    let kind = resolve_engine_kind(&config.kind).ok_or_else(|| {
        EngineError::Uninitialized(format!(
            "Unsupported engine: {}. Supported engines: http, command",
            config.kind
        ))
    })?;

    let engine: Arc<dyn SpeechEngine> = match kind {
        EngineKind::Http => Arc::new(HttpEngine::new(config)?),
        EngineKind::Command => Arc::new(CommandEngine::new(config)?),
    };
    info!("Loaded {} speech engine", engine.name());
    Ok(engine)
}
