//! Invocation event and the request record it carries.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::event::Headers;

/// The request record handed to the handler and returned to the platform.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Request {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub querystring: Option<Value>,

    #[serde(default)]
    pub headers: Headers,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cookies: Option<Value>,

    /// Platform fields we do not model, passed back untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Invocation input.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Event {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub viewer: Option<Value>,

    pub request: Request,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Event {
    pub fn new(request: Request) -> Self {
        Self {
            request,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_full_viewer_request_event() {
        let event: Event = serde_json::from_value(json!({
            "version": "1.0",
            "context": { "eventType": "viewer-request", "requestId": "abc" },
            "viewer": { "ip": "198.51.100.11" },
            "request": {
                "method": "GET",
                "uri": "/index.html",
                "querystring": { "page": { "value": "2" } },
                "headers": { "host": { "value": "example.com" } },
                "cookies": {}
            }
        }))
        .unwrap();

        assert_eq!(event.version.as_deref(), Some("1.0"));
        assert_eq!(event.request.method.as_deref(), Some("GET"));
        assert_eq!(event.request.headers.get("host").unwrap().value, "example.com");
        assert!(event.extra.is_empty());
    }

    #[test]
    fn test_unknown_fields_survive() {
        let input = json!({
            "request": {
                "headers": {},
                "clientIp": "203.0.113.7",
                "body": { "data": "" }
            },
            "config": { "distributionId": "E123" }
        });

        let event: Event = serde_json::from_value(input.clone()).unwrap();
        assert_eq!(event.request.extra["clientIp"], "203.0.113.7");
        assert_eq!(serde_json::to_value(&event).unwrap(), input);
    }

    #[test]
    fn test_missing_request_is_an_error() {
        let result: Result<Event, _> = serde_json::from_value(json!({ "version": "1.0" }));
        assert!(result.is_err());
    }
}
