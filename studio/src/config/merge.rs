use std::path::PathBuf;

use super::ServerConfig;
use super::env::load_env_config;
use super::utils::tls_from_paths;
use super::yaml::YamlConfig;
use crate::core::audio::OutputFormat;

/// Merge environment configuration (base) with YAML overrides.
///
/// Every value present in the YAML file replaces the environment value.
pub fn merge_config(yaml: Option<YamlConfig>) -> Result<ServerConfig, Box<dyn std::error::Error>> {
    let mut config = load_env_config()?;
    let Some(yaml) = yaml else {
        return Ok(config);
    };

    if let Some(server) = yaml.server {
        if let Some(host) = server.host {
            config.host = host;
        }
        if let Some(port) = server.port {
            config.port = port;
        }
        if let Some(output_dir) = server.output_dir {
            config.output_dir = PathBuf::from(output_dir);
        }
        if let Some(tls) = server.tls {
            config.tls = tls_from_paths(tls.cert_path, tls.key_path)?;
        }
    }

    if let Some(engine) = yaml.engine {
        if let Some(kind) = engine.kind {
            config.engine.kind = kind;
        }
        if let Some(base_url) = engine.base_url {
            config.engine.base_url = base_url;
        }
        if let Some(api_key) = engine.api_key {
            config.engine.api_key = Some(api_key);
        }
        if let Some(model) = engine.model {
            config.engine.model = model;
        }
        if let Some(command) = engine.command {
            config.engine.command = command;
        }
        if let Some(model_file) = engine.model_file {
            config.engine.model_file = PathBuf::from(model_file);
        }
        if let Some(voices_file) = engine.voices_file {
            config.engine.voices_file = PathBuf::from(voices_file);
        }
        if let Some(timeout) = engine.timeout_seconds {
            config.engine.timeout_seconds = timeout;
        }
    }

    if let Some(ffmpeg_path) = yaml.encoder.and_then(|e| e.ffmpeg_path) {
        config.ffmpeg_path = ffmpeg_path;
    }

    if let Some(defaults) = yaml.defaults {
        if let Some(min_pause) = defaults.min_pause {
            config.default_min_pause = min_pause;
        }
        if let Some(max_pause) = defaults.max_pause {
            config.default_max_pause = max_pause;
        }
        if let Some(format) = defaults.output_format {
            config.default_output_format = format
                .parse::<OutputFormat>()
                .map_err(|e| format!("Invalid defaults.output_format: {e}"))?;
        }
    }

    if let Some(security) = yaml.security {
        if let Some(origins) = security.cors_allowed_origins {
            config.cors_allowed_origins = Some(origins);
        }
        if let Some(rps) = security.rate_limit_requests_per_second {
            config.rate_limit_requests_per_second = rps;
        }
        if let Some(burst) = security.rate_limit_burst_size {
            config.rate_limit_burst_size = burst;
        }
    }

    Ok(config)
}
