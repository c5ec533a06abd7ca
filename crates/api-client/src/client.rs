//! Main API client implementation

use crate::config::ClientConfig;
use crate::endpoints::{MenuApi, RestaurantsApi};
use crate::error::{ApiError, ApiResult};
use platter_core::retry::{CircuitBreaker, CircuitBreakerConfig, CircuitState};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

/// Request correlation ID header
const X_REQUEST_ID: &str = "X-Request-ID";

/// API key header
const APIKEY_HEADER: &str = "apikey";

/// Catalog API client with built-in resilience patterns
///
/// This client wraps `reqwest` and adds:
/// - Automatic retry with exponential backoff
/// - A circuit breaker shared by all clones
/// - Request correlation IDs for tracing
#[derive(Clone)]
pub struct PlatterClient {
    inner: Client,
    config: Arc<ClientConfig>,
    circuit_breaker: Arc<CircuitBreaker>,
}

impl PlatterClient {
    /// Create a new client with configuration from the environment
    pub fn new() -> ApiResult<Self> {
        Self::with_config(ClientConfig::from_env()?)
    }

    /// Create a new client with specific configuration
    pub fn with_config(config: ClientConfig) -> ApiResult<Self> {
        Self::with_circuit_breaker(config, CircuitBreakerConfig::default())
    }

    /// Create a new client with a specific circuit breaker policy
    pub fn with_circuit_breaker(
        config: ClientConfig,
        breaker: CircuitBreakerConfig,
    ) -> ApiResult<Self> {
        config.validate()?;

        let mut default_headers = HeaderMap::new();
        default_headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        default_headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("platter/", env!("CARGO_PKG_VERSION"))),
        );

        if let Some(ref key) = config.api_key {
            let invalid = || ApiError::config("API key contains characters not allowed in a header");

            let mut apikey = HeaderValue::from_str(key).map_err(|_| invalid())?;
            apikey.set_sensitive(true);
            default_headers.insert(APIKEY_HEADER, apikey);

            let mut bearer = HeaderValue::from_str(&format!("Bearer {key}")).map_err(|_| invalid())?;
            bearer.set_sensitive(true);
            default_headers.insert(AUTHORIZATION, bearer);
        }

        let inner = Client::builder()
            .timeout(config.timeout)
            .default_headers(default_headers)
            .build()
            .map_err(ApiError::Request)?;

        Ok(Self {
            inner,
            config: Arc::new(config),
            circuit_breaker: Arc::new(CircuitBreaker::new(breaker)),
        })
    }

    /// Get the current configuration
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Get the base URL
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Get circuit breaker state
    #[must_use]
    pub fn circuit_state(&self) -> CircuitState {
        self.circuit_breaker.state()
    }

    /// Reset the circuit breaker
    pub fn reset_circuit(&self) {
        self.circuit_breaker.reset();
    }

    /// Access menu item endpoints
    #[must_use]
    pub fn menu(&self) -> MenuApi {
        MenuApi::new(self.clone())
    }

    /// Access restaurant endpoints
    #[must_use]
    pub fn restaurants(&self) -> RestaurantsApi {
        RestaurantsApi::new(self.clone())
    }

    /// Build an absolute URL for a path below the base URL
    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Perform a GET request with resilience patterns
    #[instrument(skip(self, query), fields(request_id = tracing::field::Empty))]
    pub async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> ApiResult<T> {
        let request_id = Uuid::new_v4().to_string();
        tracing::Span::current().record("request_id", request_id.as_str());
        let url = self.url(path);

        if !self.circuit_breaker.can_execute() {
            warn!(url = %url, "Circuit breaker is open, rejecting request");
            return Err(ApiError::CircuitOpen);
        }

        self.execute_with_retry(&request_id, &url, query).await
    }

    /// Execute request with retry logic
    async fn execute_with_retry<T: DeserializeOwned>(
        &self,
        request_id: &str,
        url: &str,
        query: &[(&str, &str)],
    ) -> ApiResult<T> {
        let retry_config = &self.config.retry;
        let mut last_error: Option<ApiError> = None;

        for attempt in 0..retry_config.max_attempts {
            if attempt > 0 {
                let delay = retry_config.delay_for_attempt(attempt);
                debug!(
                    attempt = attempt,
                    delay_ms = delay.as_millis() as u64,
                    "Retrying after delay"
                );
                tokio::time::sleep(delay).await;
            }

            let start = Instant::now();
            let result = self.execute_single_request(request_id, url, query).await;
            let elapsed = start.elapsed();

            match result {
                Ok(value) => {
                    self.circuit_breaker.record_success();
                    debug!(
                        attempt = attempt + 1,
                        elapsed_ms = elapsed.as_millis() as u64,
                        "Request succeeded"
                    );
                    return Ok(value);
                }
                Err(e) if e.is_retryable() => {
                    self.circuit_breaker.record_failure();
                    if attempt + 1 < retry_config.max_attempts {
                        debug!(attempt = attempt + 1, error = %e, "Request failed, will retry");
                    }
                    last_error = Some(e);
                }
                Err(e) => {
                    debug!(attempt = attempt + 1, error = %e, "Request failed, not retrying");
                    return Err(e);
                }
            }
        }

        let last_error = last_error.map_or_else(|| "Unknown error".to_string(), |e| e.to_string());
        warn!(attempts = retry_config.max_attempts, error = %last_error, "Retries exhausted");
        Err(ApiError::RetriesExhausted {
            attempts: retry_config.max_attempts,
            last_error,
        })
    }

    /// Execute a single request without retry
    async fn execute_single_request<T: DeserializeOwned>(
        &self,
        request_id: &str,
        url: &str,
        query: &[(&str, &str)],
    ) -> ApiResult<T> {
        let response = self
            .inner
            .get(url)
            .header(X_REQUEST_ID, request_id)
            .query(query)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ApiError::Timeout(self.config.timeout)
                } else {
                    ApiError::Request(e)
                }
            })?;

        self.handle_response(response).await
    }

    /// Handle HTTP response and deserialize
    async fn handle_response<T: DeserializeOwned>(&self, response: Response) -> ApiResult<T> {
        let status = response.status();

        if status.is_success() {
            let body = response.bytes().await?;
            Ok(serde_json::from_slice(&body)?)
        } else {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            Err(ApiError::api_response(status.as_u16(), message))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_server::TestServer;
    use platter_core::retry::RetryConfig;
    use std::time::Duration;

    fn fast_retry(max_attempts: u32) -> RetryConfig {
        RetryConfig {
            max_attempts,
            initial_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(5),
            backoff_multiplier: 2.0,
            jitter: false,
        }
    }

    fn client_for(server: &TestServer, max_attempts: u32) -> PlatterClient {
        let config = ClientConfig::default()
            .with_base_url(&server.url)
            .with_retry(fast_retry(max_attempts));
        PlatterClient::with_config(config).unwrap()
    }

    #[test]
    fn test_client_creation() {
        assert!(PlatterClient::with_config(ClientConfig::default()).is_ok());
        assert!(PlatterClient::with_config(ClientConfig::default().with_base_url("")).is_err());
    }

    #[test]
    fn test_invalid_api_key_rejected() {
        let config = ClientConfig::default().with_api_key("bad\nkey");
        assert!(matches!(
            PlatterClient::with_config(config),
            Err(ApiError::Config(_))
        ));
    }

    #[test]
    fn test_url_joining() {
        let client = PlatterClient::with_config(
            ClientConfig::default().with_base_url("http://localhost:9000/api/"),
        )
        .unwrap();
        assert_eq!(client.url("/menu-items"), "http://localhost:9000/api/menu-items");
        assert_eq!(client.url("restaurants"), "http://localhost:9000/api/restaurants");
    }

    #[tokio::test]
    async fn test_get_sends_query_and_headers() {
        let server = TestServer::start(vec![(200, "[1, 2, 3]".to_string())]).await;
        let config = ClientConfig::default()
            .with_base_url(&server.url)
            .with_api_key("k-123");
        let client = PlatterClient::with_config(config).unwrap();

        let values: Vec<u32> = client.get("menu-items", &[("q", "adana kebap")]).await.unwrap();
        assert_eq!(values, vec![1, 2, 3]);

        let request = server.requests().remove(0).to_lowercase();
        assert!(request.starts_with("get /menu-items?q=adana+kebap "));
        assert!(request.contains("x-request-id: "));
        assert!(request.contains("apikey: k-123"));
        assert!(request.contains("authorization: bearer k-123"));
    }

    #[tokio::test]
    async fn test_retries_server_errors() {
        let server = TestServer::start(vec![
            (503, "unavailable".to_string()),
            (502, "bad gateway".to_string()),
            (200, "[]".to_string()),
        ])
        .await;
        let client = client_for(&server, 3);

        let values: Vec<u32> = client.get("restaurants", &[]).await.unwrap();
        assert!(values.is_empty());
        assert_eq!(server.requests().len(), 3);
        assert_eq!(client.circuit_state(), CircuitState::Closed);
    }

    #[tokio::test]
    async fn test_client_errors_not_retried() {
        let server = TestServer::start(vec![(404, "no such route".to_string())]).await;
        let client = client_for(&server, 3);

        let err = client.get::<Vec<u32>>("nope", &[]).await.unwrap_err();
        assert!(err.is_client_error());
        assert_eq!(server.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_retries_exhausted() {
        let server = TestServer::start(vec![(500, "boom".to_string())]).await;
        let client = client_for(&server, 2);

        let err = client.get::<Vec<u32>>("menu-items", &[]).await.unwrap_err();
        match err {
            ApiError::RetriesExhausted { attempts, last_error } => {
                assert_eq!(attempts, 2);
                assert!(last_error.contains("boom"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_malformed_body_is_json_error() {
        let server = TestServer::start(vec![(200, "{not json".to_string())]).await;
        let client = client_for(&server, 3);

        let err = client.get::<Vec<u32>>("menu-items", &[]).await.unwrap_err();
        assert!(matches!(err, ApiError::Json(_)));
        assert_eq!(server.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_circuit_opens_and_rejects() {
        let server = TestServer::start(vec![(500, "boom".to_string())]).await;
        let config = ClientConfig::default()
            .with_base_url(&server.url)
            .with_retry(fast_retry(1));
        let breaker = CircuitBreakerConfig {
            failure_threshold: 2,
            ..CircuitBreakerConfig::default()
        };
        let client = PlatterClient::with_circuit_breaker(config, breaker).unwrap();

        assert!(client.get::<Vec<u32>>("menu-items", &[]).await.is_err());
        assert!(client.get::<Vec<u32>>("menu-items", &[]).await.is_err());
        assert_eq!(client.circuit_state(), CircuitState::Open);

        let err = client.get::<Vec<u32>>("menu-items", &[]).await.unwrap_err();
        assert!(matches!(err, ApiError::CircuitOpen));
        assert_eq!(server.requests().len(), 2);

        client.reset_circuit();
        assert_eq!(client.circuit_state(), CircuitState::Closed);
    }
}
