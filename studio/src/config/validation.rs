use super::{ServerConfig, TlsConfig};
use crate::core::audio::validate_pause_range;
use crate::core::engine::resolve_engine_kind;

/// Validate the default pause range.
pub fn validate_pause_defaults(min_pause: f64, max_pause: f64) -> Result<(), String> {
    validate_pause_range(min_pause, max_pause)
        .map_err(|e| format!("Invalid default pauses: {e}"))
}

/// Validate that the port is usable.
pub fn validate_port(port: u16) -> Result<(), String> {
    if port == 0 {
        return Err("PORT must be non-zero".to_string());
    }
    Ok(())
}

/// Validate that configured TLS files exist.
pub fn validate_tls(tls: &Option<TlsConfig>) -> Result<(), String> {
    if let Some(tls) = tls {
        if !tls.cert_path.exists() {
            return Err(format!(
                "TLS certificate file not found: {}",
                tls.cert_path.display()
            ));
        }
        if !tls.key_path.exists() {
            return Err(format!(
                "TLS key file not found: {}",
                tls.key_path.display()
            ));
        }
    }
    Ok(())
}

/// Validate that the engine name resolves to a known engine.
pub fn validate_engine_kind(kind: &str) -> Result<(), String> {
    if resolve_engine_kind(kind).is_none() {
        return Err(format!(
            "Unsupported engine: {kind}. Supported engines: http, command"
        ));
    }
    Ok(())
}

/// Validate rate limiting and sample rate settings.
pub fn validate_limits(config: &ServerConfig) -> Result<(), String> {
    if config.rate_limit_requests_per_second == 0 {
        return Err("RATE_LIMIT_REQUESTS_PER_SECOND must be greater than zero".to_string());
    }
    if config.rate_limit_burst_size == 0 {
        return Err("RATE_LIMIT_BURST_SIZE must be greater than zero".to_string());
    }
    if config.engine.timeout_seconds == 0 {
        return Err("ENGINE_TIMEOUT_SECONDS must be greater than zero".to_string());
    }
    Ok(())
}

/// Run every validation on a merged configuration.
pub fn validate_config(config: &ServerConfig) -> Result<(), String> {
    validate_port(config.port)?;
    validate_tls(&config.tls)?;
    validate_engine_kind(&config.engine.kind)?;
    validate_pause_defaults(config.default_min_pause, config.default_max_pause)?;
    validate_limits(config)?;
    Ok(())
}
