//! Configuration module for Sentence Studio
//!
//! This module handles server configuration from various sources: .env files, YAML files,
//! and environment variables. Priority: YAML > ENV vars > .env values > defaults.
//!
//! # Modules
//! - `yaml`: YAML configuration file loading
//! - `env`: Environment variable loading
//! - `merge`: Merging YAML and environment configurations
//! - `validation`: Configuration validation logic
//! - `utils`: Utility functions for configuration parsing
//!
//! # Example
//! ```rust,no_run
//! use sentence_studio::config::ServerConfig;
//! use std::path::PathBuf;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Load from environment variables only
//! let config = ServerConfig::from_env()?;
//!
//! // Load from YAML file with environment variable overrides
//! let config_path = PathBuf::from("config.yaml");
//! let config = ServerConfig::from_file(&config_path)?;
//!
//! println!("Server listening on {}", config.address());
//! # Ok(())
//! # }
//! ```

use std::path::PathBuf;

mod env;
mod merge;
mod utils;
mod validation;
mod yaml;

pub use env::{DEFAULT_FFMPEG_PATH, DEFAULT_HOST, DEFAULT_OUTPUT_DIR, DEFAULT_PORT};

use crate::core::assembler::AudioGenerationRequest;
use crate::core::audio::{AudioEncoder, OutputFormat};
use crate::core::engine::EngineConfig;
use crate::core::sentence::Sentence;
use crate::core::storage::ArtifactStore;

/// TLS configuration for HTTPS
#[derive(Debug, Clone)]
pub struct TlsConfig {
    /// Path to the TLS certificate file (PEM format)
    pub cert_path: PathBuf,
    /// Path to the TLS private key file (PEM format)
    pub key_path: PathBuf,
}

/// Server configuration
///
/// Contains everything needed to run the studio:
/// - Server settings (host, port, TLS, artifact directory)
/// - Speech engine settings
/// - Encoder and generation defaults
/// - Security settings (CORS, rate limiting)
#[derive(Debug, Clone)]
pub struct ServerConfig {
    // Server settings
    pub host: String,
    pub port: u16,

    // TLS configuration (optional)
    pub tls: Option<TlsConfig>,

    /// Directory holding one subdirectory per generation run
    pub output_dir: PathBuf,

    // Speech engine
    pub engine: EngineConfig,

    /// External MP3 encoder binary
    pub ffmpeg_path: String,

    // Generation defaults, used when a request leaves them out
    pub default_min_pause: f64,
    pub default_max_pause: f64,
    pub default_output_format: OutputFormat,

    // Security configuration
    /// CORS allowed origins (comma-separated list or "*" for all)
    /// Default: None (CORS disabled, same-origin only)
    pub cors_allowed_origins: Option<String>,

    // Rate limiting configuration
    /// Maximum requests per second per IP address
    /// Default: 60
    pub rate_limit_requests_per_second: u32,
    /// Maximum burst size for rate limiting
    /// Default: 10
    pub rate_limit_burst_size: u32,
}

/// Zeroize the engine API key when the configuration is dropped.
impl Drop for ServerConfig {
    fn drop(&mut self) {
        use zeroize::Zeroize;

        if let Some(ref mut key) = self.engine.api_key {
            key.zeroize();
        }
    }
}

impl ServerConfig {
    /// Load configuration from a YAML file with environment variable base
    ///
    /// Priority order (highest to lowest):
    /// 1. YAML file values
    /// 2. Environment variables (actual ENV vars override .env values)
    /// 3. .env file values
    /// 4. Default values
    ///
    /// After loading and merging, performs validation on the final configuration.
    ///
    /// # Errors
    /// Returns an error if:
    /// - The YAML file cannot be read or is malformed
    /// - Environment variables have invalid formats
    /// - Configuration validation fails
    pub fn from_file(path: &PathBuf) -> Result<Self, Box<dyn std::error::Error>> {
        // Note: .env file is loaded in main.rs at application startup
        let yaml_config = yaml::YamlConfig::from_file(path)?;

        let config = merge::merge_config(Some(yaml_config))?;

        validation::validate_config(&config)?;

        Ok(config)
    }

    /// Get the server address as a string
    ///
    /// Returns the address in the format "host:port"
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Check if TLS is configured
    pub fn is_tls_enabled(&self) -> bool {
        self.tls.is_some()
    }

    pub fn artifact_store(&self) -> ArtifactStore {
        ArtifactStore::new(self.output_dir.clone())
    }

    pub fn audio_encoder(&self) -> AudioEncoder {
        AudioEncoder::new(self.ffmpeg_path.clone())
    }

    /// Generation request filling unset values from the configured defaults.
    pub fn generation_request(
        &self,
        sentences: Vec<Sentence>,
        min_pause: Option<f64>,
        max_pause: Option<f64>,
        output_format: Option<OutputFormat>,
    ) -> AudioGenerationRequest {
        AudioGenerationRequest {
            sentences,
            min_pause: min_pause.unwrap_or(self.default_min_pause),
            max_pause: max_pause.unwrap_or(self.default_max_pause),
            output_format: output_format.unwrap_or(self.default_output_format),
        }
    }
}
