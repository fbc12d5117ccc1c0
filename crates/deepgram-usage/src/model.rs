//! Request and response types for the usage API.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Filters for listing project requests.
///
/// Unset fields are left out of the query string.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ListAllRequestsOptions {
    /// Start of the time range (ISO 8601 date or datetime)
    pub start: Option<String>,

    /// End of the time range (ISO 8601 date or datetime)
    pub end: Option<String>,

    /// Number of results to return per page
    pub limit: Option<u32>,

    /// Page number to return
    pub page: Option<u32>,

    /// Request status filter, e.g. "succeeded" or "failed"
    pub status: Option<String>,
}

impl ListAllRequestsOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_range(mut self, start: impl Into<String>, end: impl Into<String>) -> Self {
        self.start = Some(start.into());
        self.end = Some(end.into());
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }
}

/// One page of the project's request log.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ListAllRequestsResponse {
    /// Number of results returned per page
    pub limit: i32,

    /// Page number that was returned
    pub page: i32,

    /// Requests on this page
    #[serde(default)]
    pub requests: Vec<UsageRequest>,
}

/// A single logged API request.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UsageRequest {
    pub request_id: String,

    /// When the request was received (ISO 8601)
    pub created: String,

    /// Endpoint path, including query string
    pub path: String,

    #[serde(default)]
    pub api_key_id: Option<String>,

    /// Response summary; its shape depends on the endpoint
    #[serde(default)]
    pub response: Option<Value>,

    /// Callback delivery details, present when a callback was requested
    #[serde(default)]
    pub callback: Option<Value>,
}

#[cfg(test)]
mod tests {
    use deepgram_core::encode_parameters;

    use super::*;

    #[test]
    fn test_options_encoding() {
        assert_eq!(encode_parameters(&ListAllRequestsOptions::new()).unwrap(), "");

        let options = ListAllRequestsOptions::new()
            .with_range("2024-01-01", "2024-01-31T23:59:59Z")
            .with_limit(10)
            .with_status("Succeeded");
        assert_eq!(
            encode_parameters(&options).unwrap(),
            "start=2024-01-01&end=2024-01-31t23%3a59%3a59z&limit=10&status=succeeded"
        );
    }

    #[test]
    fn test_response_deserialization() {
        let body = r#"{
            "page": 0,
            "limit": 10,
            "requests": [
                {
                    "request_id": "a1b2",
                    "created": "2024-01-05T10:00:00Z",
                    "path": "/v1/listen?model=nova",
                    "api_key_id": "key-1",
                    "response": { "code": 200, "details": { "duration": 1.5 } },
                    "callback": null
                },
                {
                    "request_id": "c3d4",
                    "created": "2024-01-06T10:00:00Z",
                    "path": "/v1/listen"
                }
            ]
        }"#;

        let response: ListAllRequestsResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.limit, 10);
        assert_eq!(response.requests.len(), 2);
        assert_eq!(response.requests[0].api_key_id.as_deref(), Some("key-1"));
        assert_eq!(response.requests[0].response.as_ref().unwrap()["code"], 200);
        assert!(response.requests[1].response.is_none());
    }
}
