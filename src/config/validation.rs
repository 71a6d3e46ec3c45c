//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Header names must be valid HTTP header names
//! - Value ranges (timeouts > 0, bind address parses)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Pure function: &MirrorConfig → Result<(), Vec<ValidationError>>

use std::net::SocketAddr;

use axum::http::HeaderName;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

use crate::config::schema::MirrorConfig;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("mirror.{field}: `{value}` is not a valid header name")]
    InvalidHeaderName { field: &'static str, value: String },

    #[error("mirror: source and target are the same header `{0}`")]
    SameHeader(String),

    #[error("listener.bind_address: `{0}` is not a socket address")]
    InvalidBindAddress(String),

    #[error("listener.max_connections must be greater than zero")]
    ZeroConnections,

    #[error("timeouts.request_secs must be greater than zero")]
    ZeroTimeout,

    #[error("observability.log_level: `{0}` is not a valid filter")]
    InvalidLogLevel(String),
}

pub fn validate_config(config: &MirrorConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let mirror = &config.mirror;
    let source = check_header(&mut errors, "source_header", &mirror.source_header);
    let target = check_header(&mut errors, "target_header", &mirror.target_header);
    if let (Some(source), Some(target)) = (source, target) {
        if source == target {
            errors.push(ValidationError::SameHeader(source.to_string()));
        }
    }

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }
    if config.listener.max_connections == 0 {
        errors.push(ValidationError::ZeroConnections);
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }
    if EnvFilter::try_new(&config.observability.log_level).is_err() {
        errors.push(ValidationError::InvalidLogLevel(
            config.observability.log_level.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_header(
    errors: &mut Vec<ValidationError>,
    field: &'static str,
    value: &str,
) -> Option<HeaderName> {
    match HeaderName::from_bytes(value.trim().as_bytes()) {
        Ok(name) => Some(name),
        Err(_) => {
            errors.push(ValidationError::InvalidHeaderName {
                field,
                value: value.to_string(),
            });
            None
        }
    }
}
