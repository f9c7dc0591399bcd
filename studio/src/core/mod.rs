pub mod assembler;
pub mod audio;
pub mod editor;
pub mod engine;
pub mod registry;
pub mod sentence;
pub mod storage;

// Re-export commonly used types for convenience
pub use assembler::{
    Assembler, AssemblyError, AssemblyOutput, AssemblyResult, AudioGenerationRequest,
};
pub use audio::{AudioEncoder, AudioError, OutputFormat, Waveform, generate_silence};
pub use editor::{Direction, EditorError, EditorSession, SentenceList, create_sentence};
pub use engine::{
    EngineConfig, EngineError, EngineKind, EngineResult, SpeechEngine, SynthesisRequest,
    create_engine,
};
pub use sentence::{FieldError, Sentence, SentenceField};
pub use storage::{ArtifactStore, StorageError};
