//! Pluggable HTTP transport

use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::{Method, StatusCode, Url};
use std::time::Duration;
use tracing::debug;

use crate::core::errors::{Result, TranslationError};

/// Default per-attempt timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Fully buffered request, replayable on every attempt
#[derive(Debug, Clone)]
pub struct PreparedRequest {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    pub body: Option<Vec<u8>>,
}

/// Fully buffered response
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Build a response with no headers
    pub fn new(status: StatusCode, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: body.into(),
        }
    }

    /// Body as text, lossy on invalid UTF-8
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Performs exactly one HTTP exchange.
///
/// Implementations must not retry on their own; the retry executor owns that
/// policy. A returned `Err` means no response was received at all.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn execute(&self, request: &PreparedRequest) -> Result<HttpResponse>;
}

/// Default transport backed by a pooled `reqwest::Client`
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Create a transport whose requests time out after `timeout`
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .pool_idle_timeout(Some(Duration::from_secs(30)))
            .pool_max_idle_per_host(10)
            .build()?;

        Ok(Self { client })
    }

    /// Wrap an existing client
    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn execute(&self, request: &PreparedRequest) -> Result<HttpResponse> {
        debug!("{} {}", request.method, request.url);

        let mut builder = self
            .client
            .request(request.method.clone(), request.url.clone())
            .headers(request.headers.clone());
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        let response = builder
            .send()
            .await
            .map_err(|e| TranslationError::NetworkError {
                message: e.to_string(),
            })?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .bytes()
            .await
            .map_err(|e| TranslationError::NetworkError {
                message: e.to_string(),
            })?
            .to_vec();

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

/// Scripted transport for tests
#[cfg(test)]
pub(crate) mod mock {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Replays queued outcomes in order, repeating the last one when drained
    pub(crate) struct MockTransport {
        outcomes: Mutex<VecDeque<Outcome>>,
        last: Mutex<Option<Outcome>>,
        requests: Mutex<Vec<PreparedRequest>>,
    }

    #[derive(Clone)]
    pub(crate) enum Outcome {
        Respond(u16, String),
        Fail(String),
    }

    impl MockTransport {
        pub(crate) fn new(outcomes: Vec<Outcome>) -> Self {
            Self {
                outcomes: Mutex::new(outcomes.into()),
                last: Mutex::new(None),
                requests: Mutex::new(Vec::new()),
            }
        }

        /// Always answer with `status` and `body`
        pub(crate) fn always(status: u16, body: &str) -> Self {
            Self::new(vec![Outcome::Respond(status, body.to_string())])
        }

        pub(crate) fn attempts(&self) -> usize {
            self.requests.lock().unwrap().len()
        }

        pub(crate) fn requests(&self) -> Vec<PreparedRequest> {
            self.requests.lock().unwrap().clone()
        }

        /// Body of the most recent request, parsed as JSON
        pub(crate) fn last_json_body(&self) -> serde_json::Value {
            let requests = self.requests.lock().unwrap();
            let body = requests
                .last()
                .and_then(|r| r.body.clone())
                .expect("no request body recorded");
            serde_json::from_slice(&body).unwrap()
        }
    }

    #[async_trait]
    impl HttpTransport for MockTransport {
        async fn execute(&self, request: &PreparedRequest) -> Result<HttpResponse> {
            self.requests.lock().unwrap().push(request.clone());

            let outcome = {
                let mut last = self.last.lock().unwrap();
                match self.outcomes.lock().unwrap().pop_front() {
                    Some(outcome) => {
                        *last = Some(outcome.clone());
                        outcome
                    }
                    None => last.clone().expect("mock transport has no outcomes"),
                }
            };

            match outcome {
                Outcome::Respond(status, body) => Ok(HttpResponse::new(
                    StatusCode::from_u16(status).unwrap(),
                    body,
                )),
                Outcome::Fail(message) => Err(TranslationError::NetworkError { message }),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::mock::{MockTransport, Outcome};
    use super::*;

    fn request() -> PreparedRequest {
        PreparedRequest {
            method: Method::POST,
            url: Url::parse("http://localhost/translate").unwrap(),
            headers: HeaderMap::new(),
            body: Some(b"{}".to_vec()),
        }
    }

    #[test]
    fn test_reqwest_transport_creation() {
        assert!(ReqwestTransport::new(DEFAULT_TIMEOUT).is_ok());
    }

    #[tokio::test]
    async fn test_mock_transport_replays_outcomes() {
        let transport = MockTransport::new(vec![
            Outcome::Respond(503, String::new()),
            Outcome::Fail("connection reset".to_string()),
            Outcome::Respond(200, "ok".to_string()),
        ]);

        let first = transport.execute(&request()).await.unwrap();
        assert_eq!(first.status, StatusCode::SERVICE_UNAVAILABLE);
        assert!(transport.execute(&request()).await.is_err());
        let third = transport.execute(&request()).await.unwrap();
        assert_eq!(third.text(), "ok");
        // Drained queue repeats the last outcome
        let fourth = transport.execute(&request()).await.unwrap();
        assert_eq!(fourth.status, StatusCode::OK);
        assert_eq!(transport.attempts(), 4);
    }
}
