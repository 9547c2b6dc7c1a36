//! Endpoint descriptors
//!
//! An [`Endpoint`] is an immutable description of one HTTP call: relative path,
//! method, ordered query parameters and custom headers. [`Endpoint::build`] turns
//! it into a [`PreparedRequest`] given the API key, base URL and user agent.
//!
//! Parameter placement is decided by the method alone: GET puts every parameter
//! in the URL query string, mutating methods put them in an
//! `application/x-www-form-urlencoded` body. `api_key` always travels in the URL.

pub mod routes;

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use std::time::Duration;

/// Characters escaped in query keys, query values and form bodies.
///
/// Sub-delimiters `: [ ] @ ! $ ' ( ) * , ;` and `/ ?` pass through unescaped;
/// only the pair/fragment separators `& = # +` are escaped because leaving them
/// as-is would change the meaning of the encoded string.
const QUERY_ENCODE_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'<')
    .add(b'>')
    .add(b'`')
    .add(b'{')
    .add(b'}')
    .add(b'|')
    .add(b'\\')
    .add(b'^')
    .add(b'%')
    .add(b'&')
    .add(b'=')
    .add(b'#')
    .add(b'+');

/// Characters escaped inside a single path segment built from caller input
const PATH_SEGMENT_ENCODE_SET: &AsciiSet = &QUERY_ENCODE_SET.add(b'/').add(b'?');

/// Query name of the API key parameter
pub const API_KEY_PARAM: &str = "api_key";

/// Percent-encode a query key or value
pub fn encode_query_component(input: &str) -> String {
    utf8_percent_encode(input, QUERY_ENCODE_SET).to_string()
}

/// Percent-encode one path segment so it cannot introduce extra segments
pub fn encode_path_segment(input: &str) -> String {
    utf8_percent_encode(input, PATH_SEGMENT_ENCODE_SET).to_string()
}

/// Join `(name, value)` pairs into `a=1&b=2`, encoding both sides
pub fn encode_pairs<'a, I>(pairs: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    pairs
        .into_iter()
        .map(|(k, v)| format!("{}={}", encode_query_component(k), encode_query_component(v)))
        .collect::<Vec<_>>()
        .join("&")
}

/// HTTP method of an endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HttpMethod {
    /// Read
    #[default]
    Get,
    /// Create
    Post,
    /// Replace
    Put,
    /// Remove
    Delete,
}

impl HttpMethod {
    /// Upper-case method name
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }

    /// Whether parameters travel in the body rather than the URL
    pub fn is_mutating(&self) -> bool {
        !matches!(self, HttpMethod::Get)
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable description of one API call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    path: String,
    method: HttpMethod,
    query: Vec<(String, String)>,
    headers: Vec<(String, String)>,
}

impl Endpoint {
    /// GET endpoint at `path` (relative to the base URL)
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(path, HttpMethod::Get)
    }

    /// Endpoint with an explicit method
    pub fn new(path: impl Into<String>, method: HttpMethod) -> Self {
        Self {
            path: path.into(),
            method,
            query: Vec::new(),
            headers: Vec::new(),
        }
    }

    /// Set a parameter, replacing any previous value for the same name.
    /// Insertion order of first occurrence is kept.
    pub fn with_query(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        let name = name.into();
        let value = value.to_string();
        match self.query.iter_mut().find(|(k, _)| *k == name) {
            Some(entry) => entry.1 = value,
            None => self.query.push((name, value)),
        }
        self
    }

    /// Set a parameter only when a value is present
    pub fn with_optional_query(self, name: impl Into<String>, value: Option<impl ToString>) -> Self {
        match value {
            Some(v) => self.with_query(name, v),
            None => self,
        }
    }

    /// Add a custom header
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Copy of this endpoint with `offset` and `limit` substituted
    pub fn with_page(&self, offset: u32, limit: u32) -> Self {
        self.clone().with_query("offset", offset).with_query("limit", limit)
    }

    /// Relative path
    pub fn path(&self) -> &str {
        &self.path
    }

    /// HTTP method
    pub fn method(&self) -> HttpMethod {
        self.method
    }

    /// Ordered query parameters
    pub fn query(&self) -> &[(String, String)] {
        &self.query
    }

    /// Value of a query parameter, if set
    pub fn query_value(&self, name: &str) -> Option<&str> {
        self.query.iter().find(|(k, _)| k == name).map(|(_, v)| v.as_str())
    }

    /// Custom headers
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Build a ready-to-send request
    pub fn build(&self, api_key: &str, base_url: &str, user_agent: &str) -> PreparedRequest {
        let mut url = join_url(base_url, &self.path);
        let mut headers = vec![("User-Agent".to_string(), user_agent.to_string())];
        let body;

        if self.method.is_mutating() {
            url.push('?');
            url.push_str(&encode_pairs([(API_KEY_PARAM, api_key)]));
            body = Some(encode_pairs(
                self.query.iter().map(|(k, v)| (k.as_str(), v.as_str())),
            ));
            headers.push((
                "Content-Type".to_string(),
                "application/x-www-form-urlencoded".to_string(),
            ));
        } else {
            let pairs = self
                .query
                .iter()
                .map(|(k, v)| (k.as_str(), v.as_str()))
                .chain(std::iter::once((API_KEY_PARAM, api_key)));
            url.push('?');
            url.push_str(&encode_pairs(pairs));
            body = None;
        }

        headers.extend(self.headers.iter().cloned());

        PreparedRequest {
            method: self.method,
            url,
            headers,
            body,
            timeout: None,
        }
    }
}

fn join_url(base_url: &str, path: &str) -> String {
    let base = base_url.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    format!("{base}/{path}")
}

/// Fully-formed request, ready for a [`Transport`](crate::transport::Transport)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedRequest {
    /// HTTP method
    pub method: HttpMethod,
    /// Absolute URL including the query string
    pub url: String,
    /// Headers in send order
    pub headers: Vec<(String, String)>,
    /// Form-encoded body for mutating methods
    pub body: Option<String>,
    /// Per-call timeout; `None` means the transport default
    pub timeout: Option<Duration>,
}

impl PreparedRequest {
    /// Override the per-call timeout
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}
