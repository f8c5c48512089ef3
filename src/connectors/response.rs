//! Decoding of DirectAdmin API responses.
//!
//! The panel answers with a URL-encoded query string, except when it
//! doesn't: authentication failures are signalled by a header, and some
//! command errors come back as a full HTML page.

use reqwest::StatusCode;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::ops::Index;
use tracing::debug;
use url::form_urlencoded;

use crate::error::{ApiError, Result, INVALID_CREDENTIALS, UNEXPECTED_HTML, UNKNOWN_ERROR};

/// Header the panel sets to `unauthorized` on a failed login.
pub const AUTH_HEADER: &str = "X-DirectAdmin";
/// Error text found on the HTML page returned for forbidden commands.
pub const CANNOT_EXECUTE: &str = "You cannot execute that command";

/// Successfully decoded panel response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiResponse {
    /// `error=0`
    Success,
    /// Values of the `list[]` key
    List(Vec<String>),
    /// Any other body, key -> all values in order of appearance
    Map(QueryMap),
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        matches!(self, ApiResponse::Success)
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            ApiResponse::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&QueryMap> {
        match self {
            ApiResponse::Map(map) => Some(map),
            _ => None,
        }
    }
}

// `true`, `["a", ...]` or `{"key": ["v", ...]}`
impl Serialize for ApiResponse {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            ApiResponse::Success => serializer.serialize_bool(true),
            ApiResponse::List(items) => items.serialize(serializer),
            ApiResponse::Map(map) => map.serialize(serializer),
        }
    }
}

/// Key -> values, keys kept in the order they first appear in the body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryMap {
    entries: Vec<(String, Vec<String>)>,
}

impl QueryMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `value` under `key`, creating the key at the end if new.
    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, values)) => values.push(value.into()),
            None => self.entries.push((key, vec![value.into()])),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Vec<String>> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, values)| values)
    }

    pub fn remove(&mut self, key: &str) -> Option<Vec<String>> {
        let pos = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(pos).1)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(k, values)| (k.as_str(), values.as_slice()))
    }
}

impl Index<&str> for QueryMap {
    type Output = Vec<String>;

    fn index(&self, key: &str) -> &Vec<String> {
        match self.get(key) {
            Some(values) => values,
            None => panic!("no key `{}` in query map", key),
        }
    }
}

impl Serialize for QueryMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, values) in &self.entries {
            map.serialize_entry(key, values)?;
        }
        map.end()
    }
}

/// Maps a substring of an HTML error page to the error message to raise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HtmlErrorRule {
    pub needle: String,
    pub message: String,
}

impl HtmlErrorRule {
    pub fn new(needle: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            needle: needle.into(),
            message: message.into(),
        }
    }

    /// Rule that reports the matched text itself.
    pub fn verbatim(text: impl Into<String>) -> Self {
        let text = text.into();
        Self::new(text.clone(), text)
    }
}

/// The parts of an HTTP response the decoder looks at.
#[derive(Debug, Clone, Copy)]
pub struct RawResponse<'a> {
    pub status: StatusCode,
    pub unauthorized: bool,
    pub content_type: Option<&'a str>,
    pub body: &'a [u8],
}

#[derive(Debug, Clone)]
pub struct ResponseDecoder {
    html_errors: Vec<HtmlErrorRule>,
}

impl Default for ResponseDecoder {
    fn default() -> Self {
        Self {
            html_errors: vec![HtmlErrorRule::verbatim(CANNOT_EXECUTE)],
        }
    }
}

impl ResponseDecoder {
    /// Append a rule; rules are tried in insertion order.
    pub fn with_rule(mut self, rule: HtmlErrorRule) -> Self {
        self.html_errors.push(rule);
        self
    }

    pub fn html_errors(&self) -> &[HtmlErrorRule] {
        &self.html_errors
    }

    /// Turn a raw response into a result. Checks run in a fixed order and
    /// the first one that applies decides the outcome.
    pub fn decode(&self, raw: &RawResponse<'_>) -> Result<ApiResponse> {
        if raw.unauthorized {
            return Err(ApiError::new(INVALID_CREDENTIALS));
        }

        if !raw.status.is_success() {
            return Err(match raw.status.canonical_reason() {
                Some(reason) => ApiError::http(reason),
                None => ApiError::http(raw.status.as_u16()),
            });
        }

        if raw.content_type.is_some_and(is_html) {
            return Err(self.html_error(raw.body));
        }

        let mut fields = parse_query(raw.body);

        if let Some(flag) = fields.get("error") {
            if first(flag) == Some("0") {
                return Ok(ApiResponse::Success);
            }
            let message = fields
                .get("details")
                .and_then(|v| first(v))
                .or_else(|| fields.get("text").and_then(|v| first(v)))
                .unwrap_or(UNKNOWN_ERROR);
            debug!(error = ?flag, message = %message, "panel reported an error");
            return Err(ApiError::new(message));
        }

        if let Some(items) = fields.remove("list[]") {
            return Ok(ApiResponse::List(items));
        }

        Ok(ApiResponse::Map(fields))
    }

    fn html_error(&self, body: &[u8]) -> ApiError {
        let page = String::from_utf8_lossy(body);
        match self
            .html_errors
            .iter()
            .find(|rule| page.contains(rule.needle.as_str()))
        {
            Some(rule) => ApiError::new(rule.message.clone()),
            None => {
                debug!(len = body.len(), "HTML response matched no known error");
                ApiError::new(UNEXPECTED_HTML)
            }
        }
    }
}

fn first(values: &[String]) -> Option<&str> {
    values.first().map(String::as_str)
}

/// True when the media type (ignoring parameters) is `text/html`.
pub fn is_html(content_type: &str) -> bool {
    content_type
        .split(';')
        .next()
        .map(|essence| essence.trim().eq_ignore_ascii_case("text/html"))
        .unwrap_or(false)
}

/// Parse a URL-encoded body into key -> values.
///
/// Repeated keys accumulate. Pairs with an empty value are skipped.
pub fn parse_query(body: &[u8]) -> QueryMap {
    let mut fields = QueryMap::new();
    for (key, value) in form_urlencoded::parse(body) {
        if value.is_empty() {
            continue;
        }
        fields.push(key, value);
    }
    fields
}
