use super::models::Config;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Cadence delay must be positive: {field}")]
    ZeroDelay { field: String },

    #[error("error_delay ({error_delay}) is shorter than success_delay ({success_delay})")]
    ErrorDelayTooShort {
        success_delay: String,
        error_delay: String,
    },

    #[error("Fetch timeout must be positive: {field}")]
    ZeroTimeout { field: String },

    #[error("user_agent must not be empty")]
    EmptyUserAgent,
}

/// Validate the entire configuration
///
/// Channel URLs are deliberately not checked here; the worker checks them
/// every cycle so live edits take effect.
pub fn validate(config: &Config) -> Result<(), ValidationError> {
    validate_cadence(config)?;
    validate_fetch(config)?;
    Ok(())
}

fn validate_cadence(config: &Config) -> Result<(), ValidationError> {
    let cadence = &config.cadence;

    if cadence.success_delay.is_zero() {
        return Err(ValidationError::ZeroDelay {
            field: "success_delay".to_string(),
        });
    }

    if cadence.error_delay.is_zero() {
        return Err(ValidationError::ZeroDelay {
            field: "error_delay".to_string(),
        });
    }

    // Errors back off at least as long as successes
    if cadence.error_delay < cadence.success_delay {
        return Err(ValidationError::ErrorDelayTooShort {
            success_delay: cadence.success_delay.to_string(),
            error_delay: cadence.error_delay.to_string(),
        });
    }

    Ok(())
}

fn validate_fetch(config: &Config) -> Result<(), ValidationError> {
    let fetch = &config.fetch;

    if fetch.connect_timeout.is_zero() {
        return Err(ValidationError::ZeroTimeout {
            field: "connect_timeout".to_string(),
        });
    }

    if fetch.request_timeout.is_zero() {
        return Err(ValidationError::ZeroTimeout {
            field: "request_timeout".to_string(),
        });
    }

    if fetch.user_agent.trim().is_empty() {
        return Err(ValidationError::EmptyUserAgent);
    }

    Ok(())
}
