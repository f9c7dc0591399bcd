//! Scripted Speech Engine
//!
//! Stands in for a real TTS engine in integration tests:
//! - Produces `chars(text) * 100` samples per sentence
//! - Can report a different sample rate for chosen calls
//! - Can fail on a chosen call
//! - Records every request it receives

// Allow dead code in test infrastructure - not every test binary uses every helper
#![allow(dead_code)]

use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use serde_json::json;

use sentence_studio::ServerConfig;
use sentence_studio::core::audio::{OutputFormat, Waveform};
use sentence_studio::core::engine::{
    EngineConfig, EngineError, EngineResult, SpeechEngine, SynthesisRequest,
};

pub const MOCK_SAMPLE_RATE: u32 = 24000;
pub const SAMPLES_PER_CHAR: usize = 100;

/// A call the engine received, with owned fields.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub text: String,
    pub lang: String,
    pub voice: String,
    pub speed: f32,
}

pub struct ScriptedEngine {
    sample_rate: u32,
    rate_overrides: HashMap<usize, u32>,
    fail_at: Option<usize>,
    calls: AtomicUsize,
    recorded: Mutex<Vec<RecordedCall>>,
}

impl ScriptedEngine {
    pub fn new() -> Self {
        Self {
            sample_rate: MOCK_SAMPLE_RATE,
            rate_overrides: HashMap::new(),
            fail_at: None,
            calls: AtomicUsize::new(0),
            recorded: Mutex::new(Vec::new()),
        }
    }

    pub fn with_sample_rate(mut self, sample_rate: u32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    /// Report `sample_rate` for the `call`-th synthesis (zero based).
    pub fn with_rate_at(mut self, call: usize, sample_rate: u32) -> Self {
        self.rate_overrides.insert(call, sample_rate);
        self
    }

    /// Fail the `call`-th synthesis (zero based).
    pub fn failing_at(mut self, call: usize) -> Self {
        self.fail_at = Some(call);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn recorded(&self) -> Vec<RecordedCall> {
        self.recorded.lock().unwrap().clone()
    }
}

impl Default for ScriptedEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SpeechEngine for ScriptedEngine {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn synthesize(&self, request: &SynthesisRequest<'_>) -> EngineResult<Waveform> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        self.recorded.lock().unwrap().push(RecordedCall {
            text: request.text.to_string(),
            lang: request.lang.to_string(),
            voice: request.voice.to_string(),
            speed: request.speed,
        });

        if self.fail_at == Some(call) {
            return Err(EngineError::Synthesis(format!(
                "scripted failure on call {call}"
            )));
        }

        let sample_rate = self
            .rate_overrides
            .get(&call)
            .copied()
            .unwrap_or(self.sample_rate);
        let samples = vec![0.1; request.text.chars().count() * SAMPLES_PER_CHAR];
        Ok(Waveform::new(samples, sample_rate))
    }

    async fn list_voices(&self) -> EngineResult<Vec<String>> {
        Ok(vec!["af_sarah".to_string(), "bf_emma".to_string()])
    }

    fn provider_info(&self) -> serde_json::Value {
        json!({ "provider": "scripted", "sample_rate": self.sample_rate })
    }
}

/// Configuration writing artifacts under `output_dir`, WAV by default so no
/// encoder binary is needed.
pub fn test_config(output_dir: &Path) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 8000,
        tls: None,
        output_dir: output_dir.to_path_buf(),
        engine: EngineConfig::default(),
        ffmpeg_path: "ffmpeg".to_string(),
        default_min_pause: 0.5,
        default_max_pause: 1.2,
        default_output_format: OutputFormat::Wav,
        cors_allowed_origins: None,
        rate_limit_requests_per_second: 60,
        rate_limit_burst_size: 10,
    }
}
