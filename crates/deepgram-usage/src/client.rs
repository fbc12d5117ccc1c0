//! HTTP client for the usage API.

use async_trait::async_trait;
use deepgram_core::{Credentials, encode_parameters, user_agent};
use deepgram_logging::{Level, LoggerHandle, get_logger};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use reqwest::header::AUTHORIZATION;

use crate::{ListAllRequestsOptions, ListAllRequestsResponse, Result, Usage, UsageError};

const LOG_CATEGORY: &str = "deepgram::usage";

/// Bytes left as-is in a path segment: the RFC 3986 unreserved set.
const PATH_SEGMENT_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Usage API client.
#[derive(Debug, Clone)]
pub struct UsageClient {
    client: reqwest::Client,
    credentials: Credentials,
    logger: LoggerHandle,
}

impl UsageClient {
    /// Create a client. Fails with [`UsageError::NoApiKey`] if no key is set.
    pub fn new(credentials: Credentials) -> Result<Self> {
        if credentials.api_key().is_none_or(str::is_empty) {
            return Err(UsageError::NoApiKey);
        }

        let client = reqwest::Client::builder()
            .user_agent(user_agent())
            .build()?;

        Ok(Self {
            client,
            credentials,
            logger: get_logger(LOG_CATEGORY),
        })
    }

    /// Create a client for the hosted API from just an API key.
    pub fn from_api_key(api_key: impl Into<String>) -> Result<Self> {
        Self::new(Credentials::from_api_key(api_key))
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// URL listing the requests of `project_id`, with `options` as the query.
    pub fn requests_url(
        &self,
        project_id: &str,
        options: &ListAllRequestsOptions,
    ) -> Result<String> {
        let base = self.credentials.api_url().trim_end_matches('/');
        let project = utf8_percent_encode(project_id, PATH_SEGMENT_SET);
        let query = encode_parameters(options)?;
        let mut url = format!("{base}/v1/projects/{project}/requests");
        if !query.is_empty() {
            url.push('?');
            url.push_str(&query);
        }
        Ok(url)
    }

    fn authorization(&self) -> String {
        format!("Token {}", self.credentials.api_key().unwrap_or_default())
    }
}

#[async_trait]
impl Usage for UsageClient {
    async fn list_all_requests(
        &self,
        project_id: &str,
        options: &ListAllRequestsOptions,
    ) -> Result<ListAllRequestsResponse> {
        let url = self.requests_url(project_id, options)?;
        if self.logger.is_enabled(Level::DEBUG) {
            self.logger.debug(format_args!(
                "[{}] Listing usage requests: {url}",
                self.name()
            ));
        }

        let response = self
            .client
            .get(&url)
            .header(AUTHORIZATION, self.authorization())
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            self.logger.warn(format_args!(
                "[{}] Usage request failed with {status}",
                self.name()
            ));
            return Err(UsageError::ApiError(format!(
                "API returned {}: {}",
                status, body
            )));
        }

        response
            .json::<ListAllRequestsResponse>()
            .await
            .map_err(|e| UsageError::InvalidResponse(e.to_string()))
    }

    fn name(&self) -> &str {
        "deepgram"
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use deepgram_logging::{Logger, LoggerError, LoggerFactory, Record, set_factory};
    use parking_lot::Mutex;

    use super::*;

    #[derive(Clone, Default)]
    struct RecordingFactory(Arc<Mutex<Vec<String>>>);

    impl LoggerFactory for RecordingFactory {
        fn create_logger(
            &self,
            _category: &str,
        ) -> std::result::Result<Arc<dyn Logger>, LoggerError> {
            Ok(Arc::new(self.clone()))
        }
    }

    impl Logger for RecordingFactory {
        fn log(&self, record: &Record<'_>) {
            self.0.lock().push(record.args().to_string());
        }
    }

    #[test]
    fn test_requires_api_key() {
        assert!(matches!(
            UsageClient::new(Credentials::default()),
            Err(UsageError::NoApiKey)
        ));
        assert!(matches!(
            UsageClient::from_api_key(""),
            Err(UsageError::NoApiKey)
        ));
    }

    #[test]
    fn test_requests_url() {
        let client = UsageClient::from_api_key("secret").unwrap();
        assert_eq!(client.name(), "deepgram");
        assert_eq!(client.authorization(), "Token secret");

        let url = client
            .requests_url("proj-1", &ListAllRequestsOptions::new())
            .unwrap();
        assert_eq!(url, "https://api.deepgram.com/v1/projects/proj-1/requests");

        let url = client
            .requests_url("proj-1", &ListAllRequestsOptions::new().with_page(2))
            .unwrap();
        assert_eq!(
            url,
            "https://api.deepgram.com/v1/projects/proj-1/requests?page=2"
        );
    }

    #[test]
    fn test_project_id_is_a_single_segment() {
        let client = UsageClient::from_api_key("secret").unwrap();
        let url = client
            .requests_url("a/b?c#d e", &ListAllRequestsOptions::new())
            .unwrap();
        assert_eq!(
            url,
            "https://api.deepgram.com/v1/projects/a%2Fb%3Fc%23d%20e/requests"
        );

        let url = client
            .requests_url("3f1c-a_b.c~d", &ListAllRequestsOptions::new())
            .unwrap();
        assert_eq!(
            url,
            "https://api.deepgram.com/v1/projects/3f1c-a_b.c~d/requests"
        );
    }

    #[test]
    fn test_on_premise_url() {
        let credentials = Credentials::new(
            Some("secret".into()),
            Some("http://localhost:8080/".into()),
        );
        let client = UsageClient::new(credentials).unwrap();
        let url = client
            .requests_url("p", &ListAllRequestsOptions::new().with_limit(1))
            .unwrap();
        assert_eq!(url, "http://localhost:8080/v1/projects/p/requests?limit=1");
    }

    #[tokio::test]
    async fn test_request_log_names_backend() {
        let factory = RecordingFactory::default();
        set_factory(factory.clone());

        // Nothing listens on the discard port, so the request fails after
        // the debug record is written.
        let credentials = Credentials::new(
            Some("secret".into()),
            Some("http://127.0.0.1:9".into()),
        );
        let client = UsageClient::new(credentials).unwrap();
        let result = client
            .list_all_requests("p", &ListAllRequestsOptions::new())
            .await;
        assert!(matches!(result, Err(UsageError::NetworkError(_))));

        let records = factory.0.lock();
        assert_eq!(records.len(), 1);
        assert!(records[0].starts_with("[deepgram] Listing usage requests: "));
        assert!(records[0].ends_with("http://127.0.0.1:9/v1/projects/p/requests"));
    }
}
