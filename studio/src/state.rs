use std::sync::Arc;

use tokio::sync::Mutex;

use crate::config::ServerConfig;
use crate::core::assembler::Assembler;
use crate::core::editor::EditorSession;
use crate::core::engine::{EngineConfig, EngineResult, SpeechEngine, create_engine};
use crate::core::storage::ArtifactStore;

/// Shared state handed to every request handler.
pub struct AppState {
    pub config: ServerConfig,
    /// Engine loaded at startup from the configuration
    pub engine: Arc<dyn SpeechEngine>,
    pub store: ArtifactStore,
    /// Sentence list being composed through the editor routes
    pub editor: Mutex<EditorSession>,
}

impl AppState {
    /// Build the state, loading the configured engine.
    ///
    /// Fails when the engine cannot be loaded, so the server never runs
    /// without one.
    pub fn new(config: ServerConfig) -> EngineResult<Arc<Self>> {
        let engine = create_engine(&config.engine)?;
        Ok(Self::with_engine(config, engine))
    }

    /// Build the state around an already constructed engine.
    pub fn with_engine(config: ServerConfig, engine: Arc<dyn SpeechEngine>) -> Arc<Self> {
        let store = config.artifact_store();
        Arc::new(Self {
            config,
            engine,
            store,
            editor: Mutex::new(EditorSession::default()),
        })
    }

    /// Assembler driving the startup engine.
    pub fn assembler(&self) -> Assembler {
        self.assembler_with(self.engine.clone())
    }

    /// Assembler driving `engine` with this state's storage and encoder.
    pub fn assembler_with(&self, engine: Arc<dyn SpeechEngine>) -> Assembler {
        Assembler::new(
            engine,
            self.store.clone(),
            self.config.audio_encoder(),
        )
    }

    /// Engine settings with the given model files swapped in.
    pub fn engine_config_for(
        &self,
        model_file: Option<&str>,
        voices_file: Option<&str>,
    ) -> EngineConfig {
        let model_file = model_file
            .map(Into::into)
            .unwrap_or_else(|| self.config.engine.model_file.clone());
        let voices_file = voices_file
            .map(Into::into)
            .unwrap_or_else(|| self.config.engine.voices_file.clone());
        self.config.engine.with_model_files(model_file, voices_file)
    }
}
