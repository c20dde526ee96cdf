use crate::config::GraphConfig;
use crate::constants::{limits, network};
use crate::errors::ToolError;
use crate::services::credentials::TokenSource;
use crate::services::logger::Logger;
use crate::utils::text::truncate_utf8_prefix;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method, StatusCode};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphMethod {
    Get,
    Post,
    Patch,
    Delete,
}

impl GraphMethod {
    pub fn as_reqwest(self) -> Method {
        match self {
            GraphMethod::Get => Method::GET,
            GraphMethod::Post => Method::POST,
            GraphMethod::Patch => Method::PATCH,
            GraphMethod::Delete => Method::DELETE,
        }
    }

    pub fn carries_body(self) -> bool {
        matches!(self, GraphMethod::Post | GraphMethod::Patch)
    }
}

impl fmt::Display for GraphMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_reqwest().as_str())
    }
}

/// Single authenticated call against the directory service.
#[async_trait]
pub trait RequestExecutor: Send + Sync {
    /// Absolute base the relative paths are joined to.
    fn base_url(&self) -> &str;

    async fn execute(
        &self,
        method: GraphMethod,
        path: &str,
        body: Option<&Value>,
    ) -> Result<Value, ToolError>;
}

pub fn success_sentinel() -> Value {
    serde_json::json!({ "success": true })
}

pub struct GraphClient {
    logger: Logger,
    client: Client,
    base_url: String,
    credentials: Arc<dyn TokenSource>,
    timeout_ms: u64,
}

impl GraphClient {
    pub fn new(
        logger: Logger,
        config: &GraphConfig,
        credentials: Arc<dyn TokenSource>,
    ) -> Result<Self, ToolError> {
        let client = Client::builder()
            .user_agent(network::USER_AGENT)
            .build()
            .map_err(|err| ToolError::internal(format!("Failed to build HTTP client: {}", err)))?;
        Ok(Self {
            logger: logger.child("graph"),
            client,
            base_url: config.graph_endpoint.clone(),
            credentials,
            timeout_ms: config.request_timeout_ms,
        })
    }

    fn build_url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    fn build_headers(&self, token: &str) -> Result<HeaderMap, ToolError> {
        let mut headers = HeaderMap::new();
        let bearer = HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|_| ToolError::auth("Access token contains invalid header characters"))?;
        headers.insert(AUTHORIZATION, bearer);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        Ok(headers)
    }
}

#[async_trait]
impl RequestExecutor for GraphClient {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn execute(
        &self,
        method: GraphMethod,
        path: &str,
        body: Option<&Value>,
    ) -> Result<Value, ToolError> {
        let token = self.credentials.token().await?;
        let url = self.build_url(path);
        let started = Instant::now();

        let mut request = self
            .client
            .request(method.as_reqwest(), &url)
            .headers(self.build_headers(&token)?);
        if method.carries_body() {
            if let Some(body) = body {
                request = request.json(body);
            }
        }

        let exchange = async {
            let response = request
                .send()
                .await
                .map_err(|err| ToolError::internal(format!("{} {} failed: {}", method, path, err)))?;
            let status = response.status();
            let text = response.text().await.map_err(|err| {
                ToolError::internal(format!(
                    "{} {} failed to read response body: {}",
                    method, path, err
                ))
            })?;
            Ok::<_, ToolError>((status, text))
        };
        let (status, text) = tokio::time::timeout(Duration::from_millis(self.timeout_ms), exchange)
            .await
            .map_err(|_| ToolError::timeout(format!("{} {} timed out", method, path)))??;

        self.logger.debug(
            "graph response",
            Some(&serde_json::json!({
                "method": method.to_string(),
                "path": path,
                "status": status.as_u16(),
                "duration_ms": started.elapsed().as_millis() as u64,
            })),
        );

        if status == StatusCode::NO_CONTENT {
            return Ok(success_sentinel());
        }

        if status == StatusCode::UNAUTHORIZED {
            self.credentials.invalidate().await;
        }
        if !status.is_success() {
            let body = truncate_utf8_prefix(&text, limits::ERROR_BODY_BYTES);
            return Err(ToolError::request(
                status.as_u16(),
                format!("Graph request failed ({}): {}", status, body),
                &body,
            ));
        }

        if text.trim().is_empty() {
            return Ok(success_sentinel());
        }
        serde_json::from_str(&text).map_err(|err| {
            ToolError::internal(format!("Graph returned a non-JSON body for {} {}: {}", method, path, err))
        })
    }
}
