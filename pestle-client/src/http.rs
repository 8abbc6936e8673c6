//! HTTP transport for the inventory API
//!
//! Thin `reqwest` wrapper with unified response handling. Error bodies
//! are parsed as the server's error envelope when possible, otherwise
//! mapped from the HTTP status. Reads retry once on transport failure
//! (configurable); mutations never auto-retry.

use reqwest::{Client, StatusCode};
use serde_json::Value;

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

/// Error response envelope returned by the inventory API
#[derive(serde::Deserialize)]
struct ApiErrorResponse {
    pub code: String,
    pub message: String,
    #[serde(default)]
    pub details: Option<Value>,
}

/// Network HTTP transport
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: String,
    retry_attempts: u32,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout))
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            retry_attempts: config.retry_attempts,
        })
    }

    /// Server base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn error_from(status: StatusCode, text: String) -> ClientError {
        // Prefer the structured error envelope when the server sent one
        if let Ok(api_err) = serde_json::from_str::<ApiErrorResponse>(&text) {
            return ClientError::Api {
                code: api_err.code,
                message: api_err.message,
                details: api_err.details,
            };
        }
        match status {
            StatusCode::NOT_FOUND => ClientError::NotFound(text),
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                ClientError::Validation(text)
            }
            _ => ClientError::Internal(text),
        }
    }

    async fn handle_response(&self, response: reqwest::Response) -> ClientResult<Value> {
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(Self::error_from(status, text));
        }
        if status == StatusCode::NO_CONTENT {
            return Ok(Value::Null);
        }
        response
            .json()
            .await
            .map_err(|e| ClientError::InvalidResponse(format!("body is not JSON: {e}")))
    }

    fn map_send_error(e: reqwest::Error) -> ClientError {
        if e.is_timeout() {
            ClientError::Timeout
        } else {
            ClientError::Http(e)
        }
    }

    /// GET, retrying transport failures up to the configured attempts.
    pub async fn get(&self, path: &str) -> ClientResult<Value> {
        let url = self.url(path);
        let mut attempt = 0;
        loop {
            let result = match self.client.get(&url).send().await {
                Ok(response) => self.handle_response(response).await,
                Err(e) => Err(Self::map_send_error(e)),
            };
            match result {
                Err(e) if e.is_transport() && attempt < self.retry_attempts => {
                    attempt += 1;
                    tracing::warn!(url = %url, error = %e, attempt, "read failed, retrying");
                }
                other => return other,
            }
        }
    }

    pub async fn post(&self, path: &str, body: &Value) -> ClientResult<Value> {
        let response = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .map_err(Self::map_send_error)?;
        self.handle_response(response).await
    }

    pub async fn put(&self, path: &str, body: &Value) -> ClientResult<Value> {
        let response = self
            .client
            .put(self.url(path))
            .json(body)
            .send()
            .await
            .map_err(Self::map_send_error)?;
        self.handle_response(response).await
    }

    /// DELETE returns no content on success; any body is ignored.
    pub async fn delete(&self, path: &str) -> ClientResult<()> {
        let response = self
            .client
            .delete(self.url(path))
            .send()
            .await
            .map_err(Self::map_send_error)?;
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let text = response.text().await.unwrap_or_default();
        Err(Self::error_from(status, text))
    }
}
