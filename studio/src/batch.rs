//! Batch rendering of a sentence list file.
//!
//! This module hosts the logic behind the `sentence-studio generate` CLI
//! command: read a JSON array of sentences (the editor export format),
//! assemble it with the state's engine and return the run's artifacts.
//!
//! ```text
//! $ sentence-studio generate --input sentences.json --format wav
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::core::assembler::AssemblyOutput;
use crate::core::audio::OutputFormat;
use crate::core::editor::SentenceList;
use crate::state::AppState;

/// Render the sentences stored in `input`. Unset options use the
/// configured defaults.
pub async fn render_file(
    state: &AppState,
    input: &Path,
    min_pause: Option<f64>,
    max_pause: Option<f64>,
    format: Option<OutputFormat>,
) -> Result<AssemblyOutput> {
    let content = tokio::fs::read_to_string(input)
        .await
        .with_context(|| format!("Failed to read {}", input.display()))?;
    let sentences = SentenceList::import(&content)?;
    info!(
        "Loaded {} sentences from {}",
        sentences.len(),
        input.display()
    );

    let request = state
        .config
        .generation_request(sentences.into(), min_pause, max_pause, format);
    Ok(state.assembler().assemble(&request).await?)
}
