//! OpenAI-compatible speech server engine.
//!
//! # API Reference
//!
//! - Endpoint: `POST {base_url}/v1/audio/speech`
//! - Voices: `GET {base_url}/v1/audio/voices` returning `{"voices": [...]}`
//! - Output requested as `wav` so the studio can decode and concatenate it

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, error};
use url::Url;

use super::{EngineConfig, EngineError, EngineResult, SpeechEngine, SynthesisRequest};
use crate::core::audio::Waveform;
use crate::core::registry;

const SPEECH_PATH: &str = "v1/audio/speech";
const VOICES_PATH: &str = "v1/audio/voices";

#[derive(Debug, Deserialize)]
struct VoicesResponse {
    voices: Vec<String>,
}

/// Speech engine backed by a Kokoro-FastAPI style HTTP server
pub struct HttpEngine {
    client: reqwest::Client,
    base_url: Url,
    speech_url: Url,
    voices_url: Url,
    model: String,
    api_key: Option<String>,
}

impl HttpEngine {
    pub fn new(config: &EngineConfig) -> EngineResult<Self> {
        // Trailing slash keeps any base path when joining
        let normalized = format!("{}/", config.base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalized).map_err(|e| {
            EngineError::Uninitialized(format!("Invalid engine URL {}: {}", config.base_url, e))
        })?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(EngineError::Uninitialized(format!(
                "Engine URL must use http or https: {}",
                config.base_url
            )));
        }

        let speech_url = base_url
            .join(SPEECH_PATH)
            .map_err(|e| EngineError::Uninitialized(e.to_string()))?;
        let voices_url = base_url
            .join(VOICES_PATH)
            .map_err(|e| EngineError::Uninitialized(e.to_string()))?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| {
                EngineError::Uninitialized(format!("Failed to build HTTP client: {e}"))
            })?;

        Ok(Self {
            client,
            base_url,
            speech_url,
            voices_url,
            model: config.model.clone(),
            api_key: config.api_key.clone().filter(|key| !key.is_empty()),
        })
    }

    fn build_http_request(&self, request: &SynthesisRequest<'_>) -> reqwest::RequestBuilder {
        // Kokoro servers take single-letter language codes
        let lang_code = registry::language(request.lang)
            .map(|lang| lang.engine_code)
            .unwrap_or(request.lang);

        let body = json!({
            "model": self.model,
            "input": request.text,
            "voice": request.voice,
            "response_format": "wav",
            "speed": request.speed,
            "lang_code": lang_code,
        });

        let builder = self
            .client
            .post(self.speech_url.clone())
            .header("Content-Type", "application/json")
            .json(&body);

        match &self.api_key {
            Some(key) => builder.bearer_auth(key),
            None => builder,
        }
    }
}

#[async_trait]
impl SpeechEngine for HttpEngine {
    fn name(&self) -> &str {
        "http"
    }

    async fn synthesize(&self, request: &SynthesisRequest<'_>) -> EngineResult<Waveform> {
        debug!(
            "Synthesizing {} chars with voice={} lang={} speed={}",
            request.text.len(),
            request.voice,
            request.lang,
            request.speed
        );

        let response = self
            .build_http_request(request)
            .send()
            .await
            .map_err(|e| {
                EngineError::Synthesis(format!("Request to {} failed: {}", self.speech_url, e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Speech server returned {}: {}", status, body);
            return Err(EngineError::Synthesis(format!(
                "Speech server returned {status}: {body}"
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| EngineError::Synthesis(format!("Failed to read audio: {e}")))?;

        Waveform::from_wav_bytes(&bytes).map_err(|e| EngineError::Synthesis(e.to_string()))
    }

    async fn list_voices(&self) -> EngineResult<Vec<String>> {
        let mut builder = self.client.get(self.voices_url.clone());
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| {
                EngineError::Synthesis(format!("Request to {} failed: {}", self.voices_url, e))
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(EngineError::Synthesis(format!("Voice listing returned {status}")));
        }

        let parsed: VoicesResponse = response
            .json()
            .await
            .map_err(|e| EngineError::Synthesis(format!("Invalid voices response: {e}")))?;
        Ok(parsed.voices)
    }

    fn provider_info(&self) -> serde_json::Value {
        json!({
            "engine": "http",
            "api_type": "HTTP REST",
            "model": self.model,
            "endpoint": self.speech_url.as_str(),
            "base_url": self.base_url.as_str(),
            "response_format": "wav",
            "authenticated": self.api_key.is_some(),
        })
    }
}
