//! Header mirroring.
//!
//! # Responsibilities
//! - Read the source header (`host` by default)
//! - Write its value into the target header (`x-host` by default)
//! - Apply the missing-header policy
//!
//! # Design Decisions
//! - The target is overwritten unconditionally, including any `multiValue`
//! - Header names are validated once, at construction
//! - The same rule serves edge events and live `http` requests

use std::fmt;
use std::str::FromStr;

use axum::http::{header, HeaderMap, HeaderName, HeaderValue, Uri};
use serde::{Deserialize, Serialize};

use crate::config::MirrorSettings;
use crate::event::{Event, HeaderEntry, Headers, Request};
use crate::handler::{HandlerError, Rejection};

/// Default source header.
pub const HOST: &str = "host";

/// Default target header.
pub const X_HOST: &str = "x-host";

/// What to do with a request that lacks the source header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OnMissing {
    /// Refuse the request with a named error.
    #[default]
    Reject,
    /// Pass the request on unmodified.
    Forward,
}

impl FromStr for OnMissing {
    type Err = HandlerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "reject" => Ok(OnMissing::Reject),
            "forward" => Ok(OnMissing::Forward),
            _ => Err(HandlerError::UnknownPolicy(s.to_string())),
        }
    }
}

impl fmt::Display for OnMissing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OnMissing::Reject => f.write_str("reject"),
            OnMissing::Forward => f.write_str("forward"),
        }
    }
}

/// Result of applying the mirror to one event.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Request to hand back to the platform.
    Forwarded(Request),
    /// Request refused; the platform should not forward it.
    Rejected(Rejection),
}

/// A configured source → target header copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderMirror {
    source: HeaderName,
    target: HeaderName,
    on_missing: OnMissing,
}

impl Default for HeaderMirror {
    fn default() -> Self {
        Self {
            source: header::HOST,
            target: HeaderName::from_static(X_HOST),
            on_missing: OnMissing::default(),
        }
    }
}

impl HeaderMirror {
    /// Create a mirror from header names. Names are case-insensitive.
    pub fn new(source: &str, target: &str, on_missing: OnMissing) -> Result<Self, HandlerError> {
        Ok(Self {
            source: parse_name(source)?,
            target: parse_name(target)?,
            on_missing,
        })
    }

    pub fn from_settings(settings: &MirrorSettings) -> Result<Self, HandlerError> {
        Self::new(
            &settings.source_header,
            &settings.target_header,
            settings.on_missing,
        )
    }

    /// Settings equivalent to this mirror.
    pub fn settings(&self) -> MirrorSettings {
        MirrorSettings {
            source_header: self.source.as_str().to_string(),
            target_header: self.target.as_str().to_string(),
            on_missing: self.on_missing,
        }
    }

    pub fn source(&self) -> &HeaderName {
        &self.source
    }

    pub fn target(&self) -> &HeaderName {
        &self.target
    }

    pub fn on_missing(&self) -> OnMissing {
        self.on_missing
    }

    /// Copy the source header into the target header, in place.
    ///
    /// Leaves `headers` untouched when the source is absent.
    pub fn mirror(&self, headers: &mut Headers) -> Result<(), Rejection> {
        let value = headers
            .get(self.source.as_str())
            .map(|entry| entry.value.clone())
            .ok_or_else(|| self.missing())?;

        headers.set(self.target.as_str(), HeaderEntry::new(value));
        Ok(())
    }

    /// Strict form: a missing source header is always an error.
    pub fn handle(&self, event: Event) -> Result<Request, HandlerError> {
        let mut request = event.request;
        self.mirror(&mut request.headers)?;
        Ok(request)
    }

    /// Policy-aware form.
    pub fn apply(&self, event: Event) -> Outcome {
        let mut request = event.request;

        match self.mirror(&mut request.headers) {
            Ok(()) => {
                tracing::debug!(
                    source = %self.source,
                    target = %self.target,
                    uri = request.uri.as_deref().unwrap_or("-"),
                    "Header mirrored"
                );
                Outcome::Forwarded(request)
            }
            Err(rejection) => match self.on_missing {
                OnMissing::Forward => {
                    tracing::debug!(
                        source = %self.source,
                        "Source header missing, forwarding unmodified"
                    );
                    Outcome::Forwarded(request)
                }
                OnMissing::Reject => {
                    tracing::warn!(
                        source = %self.source,
                        uri = request.uri.as_deref().unwrap_or("-"),
                        "Rejecting request: {}",
                        rejection
                    );
                    Outcome::Rejected(rejection)
                }
            },
        }
    }

    /// [`apply`](Self::apply) over a raw JSON event.
    pub fn apply_json(&self, body: &[u8]) -> Result<Outcome, HandlerError> {
        let event: Event = serde_json::from_slice(body).map_err(HandlerError::MalformedEvent)?;
        Ok(self.apply(event))
    }

    /// Mirror on a live HTTP header map.
    ///
    /// HTTP/2 requests carry the host in `:authority`, which surfaces as the
    /// URI authority rather than a `Host` header; it is used as the source
    /// value when mirroring `host`.
    pub fn mirror_http(&self, headers: &mut HeaderMap, uri: &Uri) -> Result<(), Rejection> {
        let value = match headers.get(&self.source) {
            Some(value) => value.clone(),
            None if self.source == header::HOST => uri
                .authority()
                .and_then(|authority| HeaderValue::from_str(authority.as_str()).ok())
                .ok_or_else(|| self.missing())?,
            None => return Err(self.missing()),
        };

        headers.insert(self.target.clone(), value);
        Ok(())
    }

    fn missing(&self) -> Rejection {
        Rejection::MissingHeader {
            name: self.source.as_str().to_string(),
        }
    }
}

fn parse_name(name: &str) -> Result<HeaderName, HandlerError> {
    HeaderName::from_bytes(name.trim().as_bytes())
        .map_err(|_| HandlerError::InvalidHeaderName(name.to_string()))
}
