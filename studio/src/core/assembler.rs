//! Sentence-to-audio assembly.
//!
//! Sentences are synthesized strictly in order. Each one is stored as
//! `sentence_<i>.<ext>`; between consecutive sentences (never after the last)
//! a random pause is inserted, and the whole sequence is stored as
//! `output.<ext>`. All pieces of a run share the sample rate returned by the
//! first synthesis call.

use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use super::audio::{
    AudioEncoder, AudioError, OutputFormat, Waveform, concatenate, generate_silence,
    validate_pause_range,
};
use super::engine::{EngineError, SpeechEngine, SynthesisRequest};
use super::sentence::Sentence;
use super::storage::{ArtifactStore, StorageError};

/// Base name of the full mix.
pub const OUTPUT_BASE_NAME: &str = "output";

pub const DEFAULT_MIN_PAUSE: f64 = 0.5;
pub const DEFAULT_MAX_PAUSE: f64 = 1.2;

#[derive(Debug, Error)]
pub enum AssemblyError {
    #[error("No sentences to assemble")]
    EmptyRequest,
    #[error("Sentence {index} failed: {source}")]
    Synthesis {
        index: usize,
        #[source]
        source: EngineError,
    },
    #[error("Sentence {index} has sample rate {actual} Hz but the run uses {expected} Hz")]
    InconsistentSampleRate {
        index: usize,
        expected: u32,
        actual: u32,
    },
    #[error(transparent)]
    Audio(#[from] AudioError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

pub type AssemblyResult<T> = Result<T, AssemblyError>;

/// Everything needed for one assembly run.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioGenerationRequest {
    pub sentences: Vec<Sentence>,
    /// Shortest pause between sentences, in seconds
    pub min_pause: f64,
    /// Longest pause between sentences, in seconds
    pub max_pause: f64,
    pub output_format: OutputFormat,
}

impl AudioGenerationRequest {
    pub fn new(sentences: Vec<Sentence>) -> Self {
        Self {
            sentences,
            min_pause: DEFAULT_MIN_PAUSE,
            max_pause: DEFAULT_MAX_PAUSE,
            output_format: OutputFormat::default(),
        }
    }

    pub fn with_pauses(mut self, min_pause: f64, max_pause: f64) -> Self {
        self.min_pause = min_pause;
        self.max_pause = max_pause;
        self
    }

    pub fn with_format(mut self, output_format: OutputFormat) -> Self {
        self.output_format = output_format;
        self
    }
}

/// Artifacts and statistics of a finished run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssemblyOutput {
    pub run_id: String,
    pub output_file: PathBuf,
    pub sentence_files: Vec<PathBuf>,
    pub output_format: OutputFormat,
    pub sample_rate: u32,
    pub total_samples: usize,
    pub duration_secs: f64,
    /// Samples synthesized for each sentence, in order
    pub sentence_sample_counts: Vec<usize>,
    /// Samples of each inserted pause, in order
    pub pause_sample_counts: Vec<usize>,
}

impl AssemblyOutput {
    /// File name of the full mix inside the run directory.
    pub fn output_file_name(&self) -> String {
        artifact_name(OUTPUT_BASE_NAME, self.output_format)
    }
}

fn artifact_name(base: &str, format: OutputFormat) -> String {
    format!("{}.{}", base, format.extension())
}

/// Name of the clip stored for sentence `index`.
pub fn sentence_file_name(index: usize, format: OutputFormat) -> String {
    artifact_name(&format!("sentence_{index}"), format)
}

/// Drives the engine over a sentence list and stores the results.
#[derive(Clone)]
pub struct Assembler {
    engine: Arc<dyn SpeechEngine>,
    store: ArtifactStore,
    encoder: AudioEncoder,
}

impl Assembler {
    pub fn new(
        engine: Arc<dyn SpeechEngine>,
        store: ArtifactStore,
        encoder: AudioEncoder,
    ) -> Self {
        Self {
            engine,
            store,
            encoder,
        }
    }

    pub fn engine(&self) -> &Arc<dyn SpeechEngine> {
        &self.engine
    }

    /// Run the whole pipeline. Any failure aborts the run; clips already
    /// written stay on disk.
    pub async fn assemble(
        &self,
        request: &AudioGenerationRequest,
    ) -> AssemblyResult<AssemblyOutput> {
        if request.sentences.is_empty() {
            return Err(AssemblyError::EmptyRequest);
        }
        validate_pause_range(request.min_pause, request.max_pause)?;

        let format = request.output_format;
        let total = request.sentences.len();
        let run = self.store.create_run().await?;
        info!(
            "Assembling {} sentences into run {} ({})",
            total,
            run.run_id(),
            format
        );

        // Fixed by the first synthesized sentence
        let mut pinned_rate: Option<u32> = None;
        let mut parts: Vec<Vec<f32>> = Vec::with_capacity(total * 2 - 1);
        let mut sentence_files = Vec::with_capacity(total);
        let mut sentence_sample_counts = Vec::with_capacity(total);
        let mut pause_sample_counts = Vec::with_capacity(total - 1);

        for (index, sentence) in request.sentences.iter().enumerate() {
            info!("Generating sentence {}/{}", index + 1, total);

            let waveform = self
                .engine
                .synthesize(&SynthesisRequest::from(sentence))
                .await
                .map_err(|source| AssemblyError::Synthesis { index, source })?;

            let sample_rate = *pinned_rate.get_or_insert(waveform.sample_rate);
            if waveform.sample_rate != sample_rate {
                return Err(AssemblyError::InconsistentSampleRate {
                    index,
                    expected: sample_rate,
                    actual: waveform.sample_rate,
                });
            }

            let clip = self.encoder.encode(&waveform, format).await?;
            let path = run.write(&sentence_file_name(index, format), &clip).await?;
            sentence_files.push(path);
            sentence_sample_counts.push(waveform.len());
            parts.push(waveform.samples);

            if index + 1 < total {
                let silence =
                    generate_silence(sample_rate, request.min_pause, request.max_pause)?;
                debug!("Pause after sentence {}: {} samples", index, silence.len());
                pause_sample_counts.push(silence.len());
                parts.push(silence);
            }
        }

        let Some(sample_rate) = pinned_rate else {
            return Err(AssemblyError::EmptyRequest);
        };
        let mix = Waveform::new(concatenate(&parts), sample_rate);
        let encoded = self.encoder.encode(&mix, format).await?;
        let output_file = run
            .write(&artifact_name(OUTPUT_BASE_NAME, format), &encoded)
            .await?;

        info!(
            "Run {} complete: {} samples ({:.2}s) at {} Hz",
            run.run_id(),
            mix.len(),
            mix.duration_secs(),
            sample_rate
        );

        Ok(AssemblyOutput {
            run_id: run.run_id().to_string(),
            output_file,
            sentence_files,
            output_format: format,
            sample_rate,
            total_samples: mix.len(),
            duration_secs: mix.duration_secs(),
            sentence_sample_counts,
            pause_sample_counts,
        })
    }
}
