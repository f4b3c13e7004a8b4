//! reqwest-backed transport.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method};
use tracing::debug;

use pulsewatch_core::config::ApiConfig;
use pulsewatch_core::error::AppError;

use super::{ApiRequest, HttpMethod, Transport, TransportFailure, TransportResponse, decode_body};

/// Sends requests over HTTP with a shared connection pool.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    /// Pooled client.
    client: Client,
}

impl HttpTransport {
    /// Build a transport with the configured request timeout.
    pub fn new(config: &ApiConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self { client })
    }
}

fn to_reqwest(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Patch => Method::PATCH,
        HttpMethod::Delete => Method::DELETE,
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> Result<TransportResponse, TransportFailure> {
        let mut builder = self
            .client
            .request(to_reqwest(request.method), request.url.as_str());

        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| TransportFailure::no_response(e.to_string()))?;

        let status = response.status().as_u16();
        // A body that cannot be read still counts as a received response.
        let text = response.text().await.unwrap_or_default();

        debug!(status, url = %request.url, bytes = text.len(), "HTTP response received");

        Ok(TransportResponse::new(status, decode_body(&text)))
    }
}
