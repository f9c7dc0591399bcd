use serde::Deserialize;
use std::path::PathBuf;

/// Complete YAML configuration structure
///
/// All fields are optional to allow partial configuration. Values present in
/// the file override environment variables.
///
/// # Example YAML structure
/// ```yaml
/// server:
///   host: "0.0.0.0"
///   port: 8000
///   output_dir: "temp"
///   tls:
///     cert_path: "/etc/studio/cert.pem"
///     key_path: "/etc/studio/key.pem"
///
/// engine:
///   kind: "http"
///   base_url: "http://localhost:8880"
///   api_key: "optional-bearer-token"
///   model: "kokoro"
///   command: "kokoro-tts"
///   model_file: "models/kokoro-v1.0.onnx"
///   voices_file: "models/voices-v1.0.bin"
///   timeout_seconds: 120
///
/// encoder:
///   ffmpeg_path: "/usr/bin/ffmpeg"
///
/// defaults:
///   min_pause: 0.5
///   max_pause: 1.2
///   output_format: "mp3"
///
/// security:
///   cors_allowed_origins: "https://studio.example.com"
///   rate_limit_requests_per_second: 60
///   rate_limit_burst_size: 10
/// ```
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct YamlConfig {
    pub server: Option<ServerYaml>,
    pub engine: Option<EngineYaml>,
    pub encoder: Option<EncoderYaml>,
    pub defaults: Option<DefaultsYaml>,
    pub security: Option<SecurityYaml>,
}

/// Server configuration from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ServerYaml {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub output_dir: Option<String>,
    pub tls: Option<TlsYaml>,
}

/// TLS configuration from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct TlsYaml {
    pub cert_path: Option<String>,
    pub key_path: Option<String>,
}

/// Speech engine configuration from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct EngineYaml {
    pub kind: Option<String>,
    pub base_url: Option<String>,
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub command: Option<String>,
    pub model_file: Option<String>,
    pub voices_file: Option<String>,
    pub timeout_seconds: Option<u64>,
}

/// Audio encoder configuration from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct EncoderYaml {
    pub ffmpeg_path: Option<String>,
}

/// Generation defaults from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct DefaultsYaml {
    pub min_pause: Option<f64>,
    pub max_pause: Option<f64>,
    pub output_format: Option<String>,
}

/// Security configuration from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct SecurityYaml {
    pub cors_allowed_origins: Option<String>,
    pub rate_limit_requests_per_second: Option<u32>,
    pub rate_limit_burst_size: Option<u32>,
}

impl YamlConfig {
    /// Load YAML configuration from a file
    ///
    /// # Errors
    /// Returns an error if:
    /// - The file cannot be read
    /// - The YAML is malformed
    /// - Fields have invalid types
    pub fn from_file(path: &PathBuf) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file {}: {e}", path.display()))?;

        let config: YamlConfig = serde_yaml::from_str(&contents)
            .map_err(|e| format!("Failed to parse YAML config: {e}"))?;

        Ok(config)
    }
}
