//! Local Kokoro command-line engine.
//!
//! Each synthesis runs
//! `<command> <input.txt> <output.wav> --model <m> --voices <v> --lang <l> --voice <id> --speed <s>`
//! inside a scratch directory that is removed afterwards.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use tokio::process::Command;
use tracing::{debug, error};

use super::{EngineConfig, EngineError, EngineResult, SpeechEngine, SynthesisRequest};
use crate::core::audio::Waveform;
use crate::core::registry;

/// Speech engine that shells out to a Kokoro CLI per sentence
#[derive(Debug, Clone)]
pub struct CommandEngine {
    command: String,
    model_file: PathBuf,
    voices_file: PathBuf,
    timeout: Duration,
}

fn require_file(path: &Path, what: &str) -> EngineResult<()> {
    if path.is_file() {
        Ok(())
    } else {
        Err(EngineError::Uninitialized(format!(
            "{} not found: {}",
            what,
            path.display()
        )))
    }
}

impl CommandEngine {
    /// Load the engine. Both the model and the voices file must exist.
    pub fn new(config: &EngineConfig) -> EngineResult<Self> {
        require_file(&config.model_file, "Model file")?;
        require_file(&config.voices_file, "Voices file")?;

        if config.command.trim().is_empty() {
            return Err(EngineError::Uninitialized(
                "Engine command must not be empty".to_string(),
            ));
        }

        Ok(Self {
            command: config.command.clone(),
            model_file: config.model_file.clone(),
            voices_file: config.voices_file.clone(),
            timeout: Duration::from_secs(config.timeout_seconds),
        })
    }

    fn build_command(
        &self,
        request: &SynthesisRequest<'_>,
        input: &Path,
        output: &Path,
    ) -> Command {
        let mut cmd = Command::new(&self.command);
        cmd.arg(input)
            .arg(output)
            .arg("--model")
            .arg(&self.model_file)
            .arg("--voices")
            .arg(&self.voices_file)
            .arg("--lang")
            .arg(request.lang)
            .arg("--voice")
            .arg(request.voice)
            .arg("--speed")
            .arg(request.speed.to_string())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        cmd
    }
}

#[async_trait]
impl SpeechEngine for CommandEngine {
    fn name(&self) -> &str {
        "command"
    }

    async fn synthesize(&self, request: &SynthesisRequest<'_>) -> EngineResult<Waveform> {
        let scratch = tempfile::Builder::new()
            .prefix("sentence-studio-")
            .tempdir()
            .map_err(|e| EngineError::Synthesis(format!("Failed to create scratch dir: {e}")))?;
        let input = scratch.path().join("input.txt");
        let output = scratch.path().join("output.wav");

        tokio::fs::write(&input, request.text)
            .await
            .map_err(|e| EngineError::Synthesis(format!("Failed to write input text: {e}")))?;

        debug!(
            "Running {} for voice={} lang={} speed={}",
            self.command, request.voice, request.lang, request.speed
        );

        let mut cmd = self.build_command(request, &input, &output);
        let result = match tokio::time::timeout(self.timeout, cmd.output()).await {
            Ok(result) => result,
            Err(_) => {
                error!("{} timed out after {:?}", self.command, self.timeout);
                return Err(EngineError::Synthesis(format!(
                    "{} timed out after {}s",
                    self.command,
                    self.timeout.as_secs()
                )));
            }
        };

        let process_output = match result {
            Ok(out) => out,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(EngineError::Uninitialized(format!(
                    "Engine command not found: {}",
                    self.command
                )));
            }
            Err(e) => {
                return Err(EngineError::Synthesis(format!(
                    "Failed to run {}: {}",
                    self.command, e
                )));
            }
        };

        if !process_output.status.success() {
            let stderr = String::from_utf8_lossy(&process_output.stderr);
            error!(
                "{} exited with {}: {}",
                self.command,
                process_output.status,
                stderr.trim()
            );
            return Err(EngineError::Synthesis(format!(
                "{} exited with {}: {}",
                self.command,
                process_output.status,
                stderr.trim()
            )));
        }

        let bytes = tokio::fs::read(&output)
            .await
            .map_err(|e| EngineError::Synthesis(format!("Failed to read synthesized audio: {e}")))?;

        Waveform::from_wav_bytes(&bytes).map_err(|e| EngineError::Synthesis(e.to_string()))
    }

    async fn list_voices(&self) -> EngineResult<Vec<String>> {
        Ok(registry::all_voices()
            .into_iter()
            .map(str::to_string)
            .collect())
    }

    fn provider_info(&self) -> serde_json::Value {
        json!({
            "engine": "command",
            "api_type": "Local process",
            "command": self.command,
            "model_file": self.model_file.display().to_string(),
            "voices_file": self.voices_file.display().to_string(),
            "timeout_seconds": self.timeout.as_secs(),
        })
    }
}
