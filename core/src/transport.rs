//! The network seam of the pipeline.
//!
//! `ApiClient` never talks to the network itself; it hands a fully prepared
//! `HttpRequest` and an absolute URL to a `Transport`. `HttpTransport` is the
//! reqwest-backed implementation used in production. Tests substitute a fake
//! that records requests and returns scripted envelopes.

use std::time::Duration;

use async_trait::async_trait;

use crate::config::ConfigError;
use crate::error::TransportError;
use crate::http::{header_text, Body, HttpMethod, HttpRequest, HttpResponse};

/// Executes one HTTP round-trip.
///
/// Any status code is a successful exchange at this level; only failures to
/// get a response at all are errors.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, url: &str, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// reqwest-backed transport with a fixed request timeout.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Result<Self, ConfigError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;
        Ok(Self { client, timeout })
    }

    fn map_error(&self, err: reqwest::Error) -> TransportError {
        if err.is_timeout() {
            TransportError::Timeout { after: self.timeout }
        } else {
            TransportError::Network(err.to_string())
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(&self, url: &str, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let method = match request.method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Delete => reqwest::Method::DELETE,
        };

        let mut builder = self.client.request(method, url);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        builder = match &request.body {
            Some(Body::Json(value)) => builder.body(value.to_string()),
            Some(Body::Bytes { data, .. }) => builder.body(data.clone()),
            None => builder,
        };

        let response = builder.send().await.map_err(|e| self.map_error(e))?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| (name.as_str().to_string(), header_text(value.as_bytes())))
            .collect();
        let body = response.bytes().await.map_err(|e| self.map_error(e))?.to_vec();

        Ok(HttpResponse { status, headers, body })
    }
}
