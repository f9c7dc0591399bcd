use std::path::PathBuf;

use super::utils::{env_var, parse_env, tls_from_paths};
use super::{ServerConfig, validation};
use crate::core::assembler::{DEFAULT_MAX_PAUSE, DEFAULT_MIN_PAUSE};
use crate::core::audio::OutputFormat;
use crate::core::engine::{
    DEFAULT_ENGINE_BASE_URL, DEFAULT_ENGINE_COMMAND, DEFAULT_ENGINE_MODEL,
    DEFAULT_ENGINE_TIMEOUT_SECONDS, DEFAULT_MODEL_FILE, DEFAULT_VOICES_FILE, EngineConfig,
    EngineKind,
};

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_OUTPUT_DIR: &str = "temp";
pub const DEFAULT_FFMPEG_PATH: &str = "ffmpeg";
pub const DEFAULT_RATE_LIMIT_RPS: u32 = 60;
pub const DEFAULT_RATE_LIMIT_BURST: u32 = 10;

/// Build a configuration from environment variables and defaults, without
/// validating it.
pub(super) fn load_env_config() -> Result<ServerConfig, Box<dyn std::error::Error>> {
    let engine = EngineConfig {
        kind: env_var("ENGINE").unwrap_or_else(|| EngineKind::Command.as_str().to_string()),
        base_url: env_var("ENGINE_BASE_URL")
            .unwrap_or_else(|| DEFAULT_ENGINE_BASE_URL.to_string()),
        api_key: env_var("ENGINE_API_KEY"),
        model: env_var("ENGINE_MODEL").unwrap_or_else(|| DEFAULT_ENGINE_MODEL.to_string()),
        command: env_var("ENGINE_COMMAND").unwrap_or_else(|| DEFAULT_ENGINE_COMMAND.to_string()),
        model_file: PathBuf::from(
            env_var("MODEL_FILE").unwrap_or_else(|| DEFAULT_MODEL_FILE.to_string()),
        ),
        voices_file: PathBuf::from(
            env_var("VOICES_FILE").unwrap_or_else(|| DEFAULT_VOICES_FILE.to_string()),
        ),
        timeout_seconds: parse_env("ENGINE_TIMEOUT_SECONDS", DEFAULT_ENGINE_TIMEOUT_SECONDS)?,
    };

    Ok(ServerConfig {
        host: env_var("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
        port: parse_env("PORT", DEFAULT_PORT)?,
        tls: tls_from_paths(env_var("TLS_CERT_PATH"), env_var("TLS_KEY_PATH"))?,
        output_dir: PathBuf::from(
            env_var("OUTPUT_DIR").unwrap_or_else(|| DEFAULT_OUTPUT_DIR.to_string()),
        ),
        engine,
        ffmpeg_path: env_var("FFMPEG_PATH").unwrap_or_else(|| DEFAULT_FFMPEG_PATH.to_string()),
        default_min_pause: parse_env("DEFAULT_MIN_PAUSE", DEFAULT_MIN_PAUSE)?,
        default_max_pause: parse_env("DEFAULT_MAX_PAUSE", DEFAULT_MAX_PAUSE)?,
        default_output_format: parse_env("DEFAULT_OUTPUT_FORMAT", OutputFormat::Mp3)?,
        cors_allowed_origins: env_var("CORS_ALLOWED_ORIGINS"),
        rate_limit_requests_per_second: parse_env(
            "RATE_LIMIT_REQUESTS_PER_SECOND",
            DEFAULT_RATE_LIMIT_RPS,
        )?,
        rate_limit_burst_size: parse_env("RATE_LIMIT_BURST_SIZE", DEFAULT_RATE_LIMIT_BURST)?,
    })
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// The `.env` file is loaded into the process environment by `main`
    /// before this runs, so actual environment variables win over `.env`
    /// values and unset variables fall back to defaults.
    ///
    /// # Errors
    /// Returns an error if a variable cannot be parsed or validation fails.
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        let config = load_env_config()?;
        validation::validate_config(&config)?;
        Ok(config)
    }
}
