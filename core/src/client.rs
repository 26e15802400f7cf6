//! The request pipeline shared by every resource client.
//!
//! # Design
//! `ApiClient` holds the fixed `ClientConfig`, a `Transport` and a request
//! interceptor, all behind `Arc`, so clones are cheap and concurrent calls
//! share nothing mutable. A call goes through four steps:
//!
//! 1. default headers are set and the request interceptor may add to them;
//! 2. the transport performs the round-trip against `base_url + prefix + path`;
//! 3. the response is unwrapped according to `ResponseKind`;
//! 4. any failure is normalized into an `ApiError` and logged.
//!
//! Step 4 is the only place an `ApiError` is created. There are no retries.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::{debug, error};

use crate::config::{ClientConfig, ConfigError};
use crate::error::{ApiError, TransportError};
use crate::http::{ApiResponse, Body, HttpRequest, HttpResponse, ResponseKind};
use crate::transport::{HttpTransport, Transport};

/// Hook run on every outgoing request.
///
/// Only the header list is exposed, so an interceptor can add transport
/// metadata but cannot change what the request means.
pub trait RequestInterceptor: Send + Sync {
    fn intercept(&self, headers: &mut Vec<(String, String)>);
}

/// Leaves requests untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassThrough;

impl RequestInterceptor for PassThrough {
    fn intercept(&self, _headers: &mut Vec<(String, String)>) {}
}

/// Adds `authorization: Bearer <token>`.
#[derive(Debug, Clone)]
pub struct BearerToken(String);

impl BearerToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

impl RequestInterceptor for BearerToken {
    fn intercept(&self, headers: &mut Vec<(String, String)>) {
        headers.push(("authorization".to_string(), format!("Bearer {}", self.0)));
    }
}

/// Configured entry point for all studio API calls.
#[derive(Clone)]
pub struct ApiClient {
    config: Arc<ClientConfig>,
    transport: Arc<dyn Transport>,
    interceptor: Arc<dyn RequestInterceptor>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient").field("config", &self.config).finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Build a client backed by `HttpTransport`.
    pub fn new(config: ClientConfig) -> Result<Self, ConfigError> {
        let transport = HttpTransport::new(config.timeout)?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    pub fn with_transport(config: ClientConfig, transport: Arc<dyn Transport>) -> Self {
        let interceptor: Arc<dyn RequestInterceptor> = match &config.token {
            Some(token) => Arc::new(BearerToken::new(token.clone())),
            None => Arc::new(PassThrough),
        };
        Self {
            config: Arc::new(config),
            transport,
            interceptor,
        }
    }

    /// Replace the request interceptor.
    pub fn with_interceptor(mut self, interceptor: impl RequestInterceptor + 'static) -> Self {
        self.interceptor = Arc::new(interceptor);
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Issue `request` and unwrap the response according to its `ResponseKind`.
    pub async fn request(&self, request: HttpRequest) -> Result<ApiResponse, ApiError> {
        self.dispatch(request).await.map_err(reject)
    }

    /// Issue a JSON request and decode the unwrapped payload into `T`.
    pub async fn json<T: DeserializeOwned>(&self, mut request: HttpRequest) -> Result<T, ApiError> {
        request.response_kind = ResponseKind::Json;
        let result = self.dispatch(request).await.and_then(|response| match response {
            ApiResponse::Json(value) => {
                serde_json::from_value(value).map_err(|e| TransportError::Decode(e.to_string()))
            }
            ApiResponse::Binary(_) => Err(TransportError::Decode("expected a JSON response".into())),
        });
        result.map_err(reject)
    }

    /// Issue a binary request and return the untouched envelope.
    pub async fn binary(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let result = self.dispatch(request.binary()).await.and_then(|response| match response {
            ApiResponse::Binary(envelope) => Ok(envelope),
            ApiResponse::Json(_) => Err(TransportError::Decode("expected a binary response".into())),
        });
        result.map_err(reject)
    }

    async fn dispatch(&self, mut request: HttpRequest) -> Result<ApiResponse, TransportError> {
        if let Some(reason) = request.encode_error() {
            return Err(TransportError::Encode(reason.to_string()));
        }
        request.headers = self.headers_for(&request);

        let url = self.config.url_for(&request.path);
        debug!(method = request.method.as_str(), %url, "dispatching request");
        let response = self.transport.execute(&url, &request).await?;
        unwrap_response(request.response_kind, response)
    }

    fn headers_for(&self, request: &HttpRequest) -> Vec<(String, String)> {
        let content_type = match &request.body {
            Some(Body::Bytes { content_type, .. }) => content_type.clone(),
            _ => self.config.content_type.clone(),
        };
        let mut headers = vec![("content-type".to_string(), content_type)];
        self.interceptor.intercept(&mut headers);
        headers
    }
}

/// Response-phase interceptor.
fn unwrap_response(kind: ResponseKind, response: HttpResponse) -> Result<ApiResponse, TransportError> {
    if !response.is_success() {
        return Err(TransportError::Status {
            status: response.status,
            body: response.text(),
        });
    }
    match kind {
        ResponseKind::Binary => Ok(ApiResponse::Binary(response)),
        ResponseKind::Json if response.body.iter().all(u8::is_ascii_whitespace) => {
            Ok(ApiResponse::Json(serde_json::Value::Null))
        }
        ResponseKind::Json => serde_json::from_slice(&response.body)
            .map(ApiResponse::Json)
            .map_err(|e| TransportError::Decode(e.to_string())),
    }
}

fn reject(cause: TransportError) -> ApiError {
    let err = ApiError::normalize(cause);
    error!(status = ?err.status(), reason = %err.message(), "API error");
    err
}
