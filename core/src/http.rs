//! Plain-data request and response types for the studio API pipeline.
//!
//! # Design
//! An `HttpRequest` is the request descriptor every resource client builds:
//! method, path relative to the API prefix, query, body and the expected
//! `ResponseKind`. The pipeline in `client.rs` turns it into a network call
//! through a `Transport`, which hands back an `HttpResponse` envelope. Both
//! are ordinary owned data so fake transports can record and script them.

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};
use serde::Serialize;

/// Characters escaped when a value is placed in a single path segment.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'\\')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Percent-encode an opaque id so it stays one path segment.
pub fn segment(value: &str) -> String {
    utf8_percent_encode(value, PATH_SEGMENT).to_string()
}

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

/// How the pipeline unwraps a successful response.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ResponseKind {
    /// Decode the body as JSON and hand back the payload only.
    #[default]
    Json,
    /// Hand back the whole envelope (status, headers, raw bytes).
    Binary,
}

/// Request payload.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    Json(serde_json::Value),
    Bytes { content_type: String, data: Vec<u8> },
}

/// Query string builder that drops absent optional values.
///
/// ```
/// use studio_core::Query;
///
/// let q = Query::new().opt("platform", None::<&str>).push("limit", 20);
/// assert_eq!(q.into_pairs(), vec![("limit".to_string(), "20".to_string())]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pairs: Vec<(String, String)>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(mut self, key: &str, value: impl ToString) -> Self {
        self.pairs.push((key.to_string(), value.to_string()));
        self
    }

    /// Append `key` only when `value` is present.
    pub fn opt<V: ToString>(self, key: &str, value: Option<V>) -> Self {
        match value {
            Some(value) => self.push(key, value),
            None => self,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn into_pairs(self) -> Vec<(String, String)> {
        self.pairs
    }
}

/// A request descriptor.
///
/// `headers` only ever carries transport-level metadata; the pipeline fills
/// in defaults and interceptors may add to it.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub body: Option<Body>,
    pub response_kind: ResponseKind,
    encode_error: Option<String>,
}

impl HttpRequest {
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            headers: Vec::new(),
            body: None,
            response_kind: ResponseKind::Json,
            encode_error: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Put, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Delete, path)
    }

    pub fn query(mut self, query: Query) -> Self {
        self.query = query.into_pairs();
        self
    }

    /// Attach a JSON body.
    ///
    /// Encoding happens here; a failure is remembered and the request is
    /// rejected when it reaches the pipeline.
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Self {
        match serde_json::to_value(body) {
            Ok(value) => self.body = Some(Body::Json(value)),
            Err(e) => self.encode_error = Some(e.to_string()),
        }
        self
    }

    pub fn bytes(mut self, content_type: impl Into<String>, data: Vec<u8>) -> Self {
        self.body = Some(Body::Bytes {
            content_type: content_type.into(),
            data,
        });
        self
    }

    pub fn binary(mut self) -> Self {
        self.response_kind = ResponseKind::Binary;
        self
    }

    pub fn encode_error(&self) -> Option<&str> {
        self.encode_error.as_deref()
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

/// A raw response envelope as returned by a `Transport`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }

    pub fn content_type(&self) -> Option<&str> {
        self.header("content-type")
    }

    /// File name from `Content-Disposition`, preferring the RFC 5987
    /// `filename*=charset'lang'...` form.
    pub fn filename(&self) -> Option<String> {
        let disposition = self.header("content-disposition")?;
        let mut plain = None;
        for param in split_params(disposition) {
            let Some((name, value)) = param.split_once('=') else {
                continue;
            };
            let value = value.trim();
            match name.trim().to_ascii_lowercase().as_str() {
                "filename*" => return Some(decode_ext_value(value)),
                "filename" => plain = Some(unquote(value)),
                _ => {}
            }
        }
        plain
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Result of a successful pipeline call.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiResponse {
    /// The response body, unwrapped. Empty bodies become `Value::Null`.
    Json(serde_json::Value),
    /// The untouched envelope.
    Binary(HttpResponse),
}

impl ApiResponse {
    pub fn into_json(self) -> Option<serde_json::Value> {
        match self {
            ApiResponse::Json(value) => Some(value),
            ApiResponse::Binary(_) => None,
        }
    }

    pub fn into_binary(self) -> Option<HttpResponse> {
        match self {
            ApiResponse::Binary(response) => Some(response),
            ApiResponse::Json(_) => None,
        }
    }
}

fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.as_str())
}

/// Header value as text. Bytes that are not UTF-8 are read as ISO-8859-1,
/// which maps every byte to one char and loses nothing.
pub(crate) fn header_text(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => latin1(bytes),
    }
}

fn latin1(bytes: &[u8]) -> String {
    bytes.iter().copied().map(char::from).collect()
}

/// Split header parameters on `;`, ignoring separators inside quotes.
fn split_params(header: &str) -> Vec<&str> {
    let mut params = Vec::new();
    let mut start = 0;
    let mut quoted = false;
    let mut escaped = false;
    for (i, c) in header.char_indices() {
        match c {
            _ if escaped => escaped = false,
            '\\' if quoted => escaped = true,
            '"' => quoted = !quoted,
            ';' if !quoted => {
                params.push(&header[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    params.push(&header[start..]);
    params
}

fn unquote(value: &str) -> String {
    let Some(inner) = value.strip_prefix('"').and_then(|v| v.strip_suffix('"')) else {
        return value.to_string();
    };
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            out.extend(chars.next());
        } else {
            out.push(c);
        }
    }
    out
}

fn decode_ext_value(value: &str) -> String {
    let mut parts = value.splitn(3, '\'');
    let (charset, encoded) = match (parts.next(), parts.next(), parts.next()) {
        (Some(charset), Some(_lang), Some(encoded)) => (charset, encoded),
        _ => ("utf-8", value),
    };
    let decoded = percent_decode_str(encoded);
    if charset.eq_ignore_ascii_case("iso-8859-1") {
        latin1(&decoded.collect::<Vec<u8>>())
    } else {
        decoded.decode_utf8_lossy().into_owned()
    }
}
