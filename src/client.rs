use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client as ReqwestClient, Response, header};
use serde::de::DeserializeOwned;
use std::env;
use std::time::{Duration, Instant};
use url::Url;

use crate::error::{Error, Result};
use crate::observability::{
    CLIENT_PINGS, CLIENT_REQUEST_DURATION, CLIENT_REQUEST_ERRORS, CLIENT_REQUESTS,
};
use crate::types::{AgentReply, AgentRequest, PingReply};

/// Environment variable consulted for the service base URL.
pub const API_URL_ENV: &str = "AGENTCHAT_API_URL";

const DEFAULT_API_URL: &str = "http://localhost:8000";
const AGENT_PATH: [&str; 2] = ["api", "demo-agent"];

/// A way to deliver one user message to the agent service.
///
/// [`AgentClient`] speaks HTTP; tests and embedders can substitute their own
/// implementation.
#[async_trait::async_trait]
pub trait AgentTransport: Send + Sync {
    /// Send `request` to the thread `thread_id`, or start a new thread when
    /// `thread_id` is `None`.
    async fn send(&self, thread_id: Option<&str>, request: &AgentRequest) -> Result<AgentReply>;
}

/// HTTP client for the agent service.
#[derive(Debug, Clone)]
pub struct AgentClient {
    client: ReqwestClient,
    base_url: Url,
    timeout: Option<Duration>,
}

impl AgentClient {
    /// Create a new agent client.
    ///
    /// The base URL can be provided directly or read from the
    /// AGENTCHAT_API_URL environment variable, falling back to
    /// `http://localhost:8000`.
    pub fn new(base_url: Option<String>) -> Result<Self> {
        Self::with_options(base_url, None)
    }

    /// Create a new client with custom settings.
    ///
    /// Without a timeout a request waits for as long as the transport allows.
    pub fn with_options(base_url: Option<String>, timeout: Option<Duration>) -> Result<Self> {
        let base_url = resolve_base_url(base_url);
        let base_url = Url::parse(&base_url)
            .map_err(|e| Error::url(format!("invalid base URL {base_url:?}: {e}"), Some(e)))?;
        if base_url.cannot_be_a_base() {
            return Err(Error::configuration(format!(
                "base URL {base_url} cannot carry a path"
            )));
        }

        let mut builder = ReqwestClient::builder().default_headers(default_headers());
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| {
            Error::http_client(
                format!("Failed to build HTTP client: {}", e),
                Some(Box::new(e)),
            )
        })?;

        Ok(Self {
            client,
            base_url,
            timeout,
        })
    }

    /// The base URL requests are made against.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The configured request timeout, if any.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// The endpoint for a message: the thread-creation endpoint when
    /// `thread_id` is `None` or empty, the continuation endpoint otherwise.
    pub fn endpoint(&self, thread_id: Option<&str>) -> Result<Url> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| Error::configuration("base URL cannot carry a path"))?;
            segments.pop_if_empty().extend(AGENT_PATH);
            if let Some(thread_id) = thread_id.filter(|id| !id.is_empty()) {
                segments.push(thread_id);
            }
        }
        Ok(url)
    }

    /// Post a message to the agent service.
    pub async fn post_message(
        &self,
        thread_id: Option<&str>,
        request: &AgentRequest,
    ) -> Result<AgentReply> {
        let url = self.endpoint(thread_id)?;
        CLIENT_REQUESTS.click();
        let start = Instant::now();
        let result = self.execute(self.client.post(url).json(request)).await;
        CLIENT_REQUEST_DURATION.add(start.elapsed().as_secs_f64());
        if result.is_err() {
            CLIENT_REQUEST_ERRORS.click();
        }
        result
    }

    /// Query the service health check and return its greeting.
    pub async fn ping(&self) -> Result<String> {
        CLIENT_PINGS.click();
        let reply: PingReply = self.execute(self.client.get(self.base_url.clone())).await?;
        Ok(reply.message)
    }

    async fn execute<T: DeserializeOwned>(&self, request: reqwest::RequestBuilder) -> Result<T> {
        let response = request.send().await.map_err(|e| self.transport_error(e))?;

        if !response.status().is_success() {
            return Err(Self::process_error_response(response).await);
        }

        response.json::<T>().await.map_err(|e| {
            Error::serialization(
                format!("Failed to parse response: {}", e),
                Some(Box::new(e)),
            )
        })
    }

    fn transport_error(&self, e: reqwest::Error) -> Error {
        if e.is_timeout() {
            Error::timeout(
                format!("Request timed out: {}", e),
                self.timeout.map(|t| t.as_secs_f64()),
            )
        } else if e.is_connect() {
            Error::connection(format!("Connection error: {}", e), Some(Box::new(e)))
        } else {
            Error::http_client(format!("Request failed: {}", e), Some(Box::new(e)))
        }
    }

    /// Every non-success status is the same failure; keep the body for context.
    async fn process_error_response(response: Response) -> Error {
        let status_code = response.status().as_u16();
        match response.text().await {
            Ok(body) => Error::api(status_code, body.trim()),
            Err(e) => Error::http_client(
                format!("Failed to read error response: {}", e),
                Some(Box::new(e)),
            ),
        }
    }
}

#[async_trait::async_trait]
impl AgentTransport for AgentClient {
    async fn send(&self, thread_id: Option<&str>, request: &AgentRequest) -> Result<AgentReply> {
        self.post_message(thread_id, request).await
    }
}

/// Picks the service base URL: `explicit` if given, else AGENTCHAT_API_URL,
/// else `http://localhost:8000`.
pub fn resolve_base_url(explicit: Option<String>) -> String {
    explicit
        .or_else(|| env::var(API_URL_ENV).ok().filter(|url| !url.trim().is_empty()))
        .unwrap_or_else(|| DEFAULT_API_URL.to_string())
}

fn default_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
    headers
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client_for(base: &str) -> AgentClient {
        AgentClient::new(Some(base.to_string())).unwrap()
    }

    #[test]
    fn client_creation() {
        let client = AgentClient::with_options(
            Some("https://agent.example.com".to_string()),
            Some(Duration::from_secs(30)),
        )
        .unwrap();
        assert_eq!(client.base_url().as_str(), "https://agent.example.com/");
        assert_eq!(client.timeout(), Some(Duration::from_secs(30)));

        let client = client_for("http://localhost:8000");
        assert_eq!(client.timeout(), None);
    }

    #[test]
    fn explicit_base_url_wins() {
        assert_eq!(
            resolve_base_url(Some("https://agent.example.com".to_string())),
            "https://agent.example.com"
        );
    }

    #[test]
    fn invalid_base_url() {
        assert!(AgentClient::new(Some("not a url".to_string())).is_err());
        assert!(matches!(
            AgentClient::new(Some("mailto:agent@example.com".to_string())),
            Err(Error::Configuration { .. })
        ));
    }

    #[test]
    fn endpoint_without_thread() {
        let client = client_for("http://localhost:8000");
        assert_eq!(
            client.endpoint(None).unwrap().as_str(),
            "http://localhost:8000/api/demo-agent"
        );
    }

    #[test]
    fn endpoint_with_thread() {
        let client = client_for("http://localhost:8000");
        assert_eq!(
            client.endpoint(Some("t1")).unwrap().as_str(),
            "http://localhost:8000/api/demo-agent/t1"
        );
    }

    #[test]
    fn endpoint_with_trailing_slash_and_prefix() {
        let client = client_for("https://example.com/prod/");
        assert_eq!(
            client.endpoint(None).unwrap().as_str(),
            "https://example.com/prod/api/demo-agent"
        );
        let client = client_for("https://example.com/prod");
        assert_eq!(
            client.endpoint(Some("abc")).unwrap().as_str(),
            "https://example.com/prod/api/demo-agent/abc"
        );
    }

    #[test]
    fn endpoint_with_empty_thread_starts_new_thread() {
        let client = client_for("http://localhost:8000");
        assert_eq!(
            client.endpoint(Some("")).unwrap().as_str(),
            "http://localhost:8000/api/demo-agent"
        );
    }

    #[test]
    fn endpoint_encodes_thread_id() {
        let client = client_for("http://localhost:8000");
        assert_eq!(
            client.endpoint(Some("a/b c")).unwrap().as_str(),
            "http://localhost:8000/api/demo-agent/a%2Fb%20c"
        );
    }
}
