use crate::config::GraphConfig;
use crate::constants::{auth, network};
use crate::errors::ToolError;
use crate::services::logger::Logger;
use async_trait::async_trait;
use reqwest::header::{HeaderValue, ACCEPT};
use reqwest::Client;
use serde_json::Value;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

#[async_trait]
pub trait TokenSource: Send + Sync {
    async fn token(&self) -> Result<String, ToolError>;

    /// Drops any cached token so the next call performs a fresh exchange.
    async fn invalidate(&self) {}
}

#[derive(Clone)]
struct CachedToken {
    token: String,
    expires_at: Instant,
}

impl CachedToken {
    fn is_usable(&self) -> bool {
        Instant::now() < self.expires_at
    }
}

/// Client-credentials flow against the Microsoft identity platform.
///
/// A token is served from the cache until `expires_in` minus the refresh
/// buffer has elapsed; after that the next caller performs a fresh exchange.
/// The cache lock is held across the exchange so concurrent callers share it.
pub struct ClientCredentialProvider {
    logger: Logger,
    client: Client,
    token_url: String,
    client_id: String,
    client_secret: String,
    scope: String,
    timeout_ms: u64,
    expiry_buffer_ms: u64,
    cache: Mutex<Option<CachedToken>>,
}

impl ClientCredentialProvider {
    pub fn new(logger: Logger, config: &GraphConfig) -> Result<Self, ToolError> {
        let client = Client::builder()
            .user_agent(network::USER_AGENT)
            .build()
            .map_err(|err| ToolError::internal(format!("Failed to build HTTP client: {}", err)))?;
        Ok(Self {
            logger: logger.child("auth"),
            client,
            token_url: config.token_url(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            scope: config.scope(),
            timeout_ms: config.request_timeout_ms,
            expiry_buffer_ms: auth::EXPIRY_BUFFER_MS,
            cache: Mutex::new(None),
        })
    }

    pub fn with_expiry_buffer_ms(mut self, buffer_ms: u64) -> Self {
        self.expiry_buffer_ms = buffer_ms;
        self
    }

    async fn exchange(&self) -> Result<(String, Option<u64>), ToolError> {
        let payload = [
            ("grant_type", auth::GRANT_TYPE),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("scope", self.scope.as_str()),
        ];
        let request = self
            .client
            .post(&self.token_url)
            .header(ACCEPT, HeaderValue::from_static("application/json"))
            .form(&payload);

        let exchange = async {
            let response = request
                .send()
                .await
                .map_err(|err| ToolError::auth(format!("Token request failed: {}", err)))?;
            let status = response.status();
            let text = response.text().await.map_err(|err| {
                ToolError::auth(format!("Token request failed to read response body: {}", err))
            })?;
            Ok::<_, ToolError>((status, text))
        };
        let (status, text) = tokio::time::timeout(Duration::from_millis(self.timeout_ms), exchange)
            .await
            .map_err(|_| ToolError::timeout("Token request timed out"))??;
        let parsed: Value = serde_json::from_str(&text).unwrap_or(Value::Null);

        let token = parsed
            .get("access_token")
            .and_then(|v| v.as_str())
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        let Some(token) = token else {
            let reason = parsed
                .get("error_description")
                .and_then(|v| v.as_str())
                .or_else(|| parsed.get("error").and_then(|v| v.as_str()))
                .map(|s| s.to_string())
                .unwrap_or_else(|| format!("token endpoint returned {}", status));
            self.logger.error(
                "token exchange rejected",
                Some(&serde_json::json!({
                    "status": status.as_u16(),
                    "error": parsed.get("error"),
                })),
            );
            return Err(ToolError::auth(format!("Failed to acquire token: {}", reason))
                .with_details(serde_json::json!({
                    "status": status.as_u16(),
                    "error": parsed.get("error").cloned().unwrap_or(Value::Null),
                })));
        };

        let expires_in = parsed.get("expires_in").and_then(|v| {
            v.as_u64()
                .or_else(|| v.as_str().and_then(|s| s.parse::<u64>().ok()))
        });
        Ok((token, expires_in))
    }
}

#[async_trait]
impl TokenSource for ClientCredentialProvider {
    async fn token(&self) -> Result<String, ToolError> {
        let mut cache = self.cache.lock().await;
        if let Some(cached) = cache.as_ref().filter(|c| c.is_usable()) {
            self.logger.debug("reusing cached token", None);
            return Ok(cached.token.clone());
        }

        let (token, expires_in) = self.exchange().await?;
        let ttl_ms = expires_in.map(|secs| secs.saturating_mul(1000));
        *cache = match ttl_ms {
            Some(ttl) if ttl > self.expiry_buffer_ms => Some(CachedToken {
                token: token.clone(),
                expires_at: Instant::now() + Duration::from_millis(ttl - self.expiry_buffer_ms),
            }),
            _ => None,
        };
        self.logger.info(
            "acquired token",
            Some(&serde_json::json!({ "expires_in": expires_in, "cached": cache.is_some() })),
        );
        Ok(token)
    }

    async fn invalidate(&self) {
        if self.cache.lock().await.take().is_some() {
            self.logger.info("cached token dropped", None);
        }
    }
}
