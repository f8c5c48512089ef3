//! DirectAdmin Web API connector
//!
//! Sends one authenticated request per command and decodes the answer.
//! See <https://www.directadmin.com/api.html> for the list of commands.

use base64::{engine::general_purpose, Engine};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use reqwest::Client;
use tracing::{debug, trace};
use url::form_urlencoded;

use crate::config::ConnectionConfig;
use crate::connectors::response::{ApiResponse, HtmlErrorRule, RawResponse, ResponseDecoder, AUTH_HEADER};
use crate::error::{ApiError, Result};

/// Identifies this client to the panel.
pub const CLIENT_USER_AGENT: &str = "Rust Directadmin";

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Form-urlencode ordered pairs (`+` for spaces).
pub fn encode_pairs(pairs: &[(&str, &str)]) -> String {
    form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs)
        .finish()
}

/// Connection to a single panel.
///
/// Holds no per-call state; each `execute` is an independent round trip.
#[derive(Debug, Clone)]
pub struct ApiConnector {
    config: ConnectionConfig,
    decoder: ResponseDecoder,
    http_client: Client,
}

impl ApiConnector {
    pub fn new(config: ConnectionConfig) -> Result<Self> {
        let http_client = Client::builder().build()?;

        debug!(
            hostname = %config.hostname,
            port = config.port,
            https = config.https,
            "DirectAdmin connector initialized"
        );

        Ok(Self {
            config,
            decoder: ResponseDecoder::default(),
            http_client,
        })
    }

    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    /// Recognise another HTML error page. Rules added here are tried after
    /// the built-in ones.
    pub fn with_html_error_rule(
        mut self,
        needle: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        self.decoder = self.decoder.with_rule(HtmlErrorRule::new(needle, message));
        self
    }

    /// `{scheme}://{hostname}:{port}/{command}`
    pub fn url_for(&self, command: &str) -> String {
        format!(
            "{}://{}:{}/{}",
            self.config.scheme(),
            self.config.hostname,
            self.config.port,
            command
        )
    }

    fn request_url(&self, command: &str, get: Option<&[(&str, &str)]>) -> String {
        let url = self.url_for(command);
        match get {
            Some(query) => format!("{}?{}", url, encode_pairs(query)),
            None => url,
        }
    }

    fn build_headers(&self) -> Result<HeaderMap> {
        let credentials = format!("{}:{}", self.config.username, self.config.password);
        let basic = format!("Basic {}", general_purpose::STANDARD.encode(credentials));

        let mut auth = HeaderValue::from_str(&basic)
            .map_err(|e| ApiError::new(format!("invalid authorization header: {}", e)))?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert(USER_AGENT, HeaderValue::from_static(CLIENT_USER_AGENT));
        Ok(headers)
    }

    /// Execute an API command.
    ///
    /// `parameters` become a form-encoded POST body; without them the
    /// request is a plain GET. `get` is appended as the query string in
    /// either case.
    pub async fn execute(
        &self,
        command: &str,
        parameters: Option<&[(&str, &str)]>,
        get: Option<&[(&str, &str)]>,
    ) -> Result<ApiResponse> {
        let url = self.request_url(command, get);
        let headers = self.build_headers()?;

        let request = match parameters {
            Some(params) => {
                debug!(
                    command = %command,
                    url = %self.url_for(command),
                    fields = params.len(),
                    "sending DirectAdmin POST"
                );
                self.http_client
                    .post(&url)
                    .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
                    .body(encode_pairs(params))
            }
            None => {
                debug!(
                    command = %command,
                    url = %self.url_for(command),
                    "sending DirectAdmin GET"
                );
                self.http_client.get(&url)
            }
        };

        let response = request.headers(headers).send().await?;

        let status = response.status();
        let unauthorized = response
            .headers()
            .get(AUTH_HEADER)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.trim().eq_ignore_ascii_case("unauthorized"));
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);

        trace!(
            command = %command,
            status = %status,
            content_type = ?content_type,
            unauthorized,
            "received DirectAdmin response"
        );

        let body = response.bytes().await?;

        self.decoder.decode(&RawResponse {
            status,
            unauthorized,
            content_type: content_type.as_deref(),
            body: &body,
        })
    }
}
