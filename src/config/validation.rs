//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, non-empty id list)
//! - Check that the endpoint URL parses
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: DemoConfig → Result<(), Vec<ValidationError>>

use thiserror::Error;
use url::Url;

use crate::config::schema::DemoConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("endpoint.base_url '{url}' is invalid: {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("{field} must be greater than zero")]
    ZeroValue { field: &'static str },

    #[error("scenario.batch_ids must not be empty")]
    EmptyBatch,
}

/// Check a configuration, collecting every problem found.
pub fn validate_config(config: &DemoConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let base_url = &config.endpoint.base_url;
    match Url::parse(base_url) {
        Ok(url) if url.cannot_be_a_base() => errors.push(ValidationError::InvalidBaseUrl {
            url: base_url.clone(),
            reason: "cannot be used as a base".to_string(),
        }),
        Ok(_) => {}
        Err(e) => errors.push(ValidationError::InvalidBaseUrl {
            url: base_url.clone(),
            reason: e.to_string(),
        }),
    }

    if config.scenario.single_timeout_ms == 0 {
        errors.push(ValidationError::ZeroValue {
            field: "scenario.single_timeout_ms",
        });
    }
    if config.scenario.batch_timeout_ms == 0 {
        errors.push(ValidationError::ZeroValue {
            field: "scenario.batch_timeout_ms",
        });
    }
    if config.scenario.batch_ids.is_empty() {
        errors.push(ValidationError::EmptyBatch);
    }
    if config.display.title_width == 0 {
        errors.push(ValidationError::ZeroValue {
            field: "display.title_width",
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&DemoConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_every_error() {
        let mut config = DemoConfig::default();
        config.endpoint.base_url = "nowhere".to_string();
        config.scenario.batch_timeout_ms = 0;
        config.scenario.batch_ids.clear();

        let errors = validate_config(&config).unwrap_err();

        assert_eq!(errors.len(), 3);
        assert!(matches!(errors[0], ValidationError::InvalidBaseUrl { .. }));
        assert_eq!(
            errors[1],
            ValidationError::ZeroValue {
                field: "scenario.batch_timeout_ms"
            }
        );
        assert_eq!(errors[2], ValidationError::EmptyBatch);
    }
}
