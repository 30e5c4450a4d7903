//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check every status code in the injector tree
//! - Validate value ranges (delays > 0, connection limit > 0, addresses parse)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: FaultConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::{FaultConfig, InjectorConfig};
use crate::injector::error::status_text;

/// Deepest injector nesting accepted from a config file.
pub const MAX_DEPTH: usize = 16;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{path}: not a valid http status code: {code}")]
    InvalidStatus { path: String, code: u16 },

    #[error("{path}: slow injector delay must be greater than zero")]
    ZeroDelay { path: String },

    #[error("{path}: chain injector has no members")]
    EmptyChain { path: String },

    #[error("{path}: injectors nested deeper than {max} levels")]
    TooDeep { path: String, max: usize },

    #[error("invalid {field} address '{value}'")]
    InvalidAddress { field: &'static str, value: String },

    #[error("listener.max_connections must be greater than zero")]
    ZeroConnections,
}

/// Validate a configuration, collecting every problem found.
pub fn validate_config(config: &FaultConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "listener.bind_address",
            value: config.listener.bind_address.clone(),
        });
    }
    if config.listener.max_connections == 0 {
        errors.push(ValidationError::ZeroConnections);
    }
    if let Some(address) = &config.upstream.address {
        if address.parse::<SocketAddr>().is_err() {
            errors.push(ValidationError::InvalidAddress {
                field: "upstream.address",
                value: address.clone(),
            });
        }
    }
    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidAddress {
            field: "observability.metrics_address",
            value: config.observability.metrics_address.clone(),
        });
    }

    validate_injector(&config.injector, "injector".to_string(), 1, &mut errors);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_injector(
    config: &InjectorConfig,
    path: String,
    depth: usize,
    errors: &mut Vec<ValidationError>,
) {
    if depth > MAX_DEPTH {
        errors.push(ValidationError::TooDeep {
            path,
            max: MAX_DEPTH,
        });
        return;
    }

    match config {
        InjectorConfig::Noop | InjectorConfig::Reject => {}
        InjectorConfig::Error { status } => {
            if status_text(*status).is_none() {
                errors.push(ValidationError::InvalidStatus {
                    path,
                    code: *status,
                });
            }
        }
        InjectorConfig::Slow { delay_ms, enabled } => {
            if *enabled && *delay_ms == 0 {
                errors.push(ValidationError::ZeroDelay { path });
            }
        }
        InjectorConfig::Chain { injectors } => {
            if injectors.is_empty() {
                errors.push(ValidationError::EmptyChain { path: path.clone() });
            }
            validate_members(injectors, &path, depth, errors);
        }
        // An empty random injector is a pass-through, so it is allowed.
        InjectorConfig::Random { injectors, .. } => {
            validate_members(injectors, &path, depth, errors);
        }
    }
}

fn validate_members(
    injectors: &[InjectorConfig],
    path: &str,
    depth: usize,
    errors: &mut Vec<ValidationError>,
) {
    for (i, member) in injectors.iter().enumerate() {
        validate_injector(member, format!("{}.injectors[{}]", path, i), depth + 1, errors);
    }
}
