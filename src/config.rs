use anyhow::{Context, Result};
use serde::Deserialize;
use std::fmt;
use std::fs;

pub const DEFAULT_HOSTNAME: &str = "localhost";
pub const DEFAULT_PORT: u16 = 2222;

fn default_hostname() -> String {
    DEFAULT_HOSTNAME.to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

/// Parameters for reaching one DirectAdmin panel.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct ConnectionConfig {
    /// Login name on the panel
    pub username: String,
    /// Password (or login key) for `username`
    pub password: String,
    /// Panel host (default: localhost)
    #[serde(default = "default_hostname")]
    pub hostname: String,
    /// Port the panel listens on (default: 2222)
    #[serde(default = "default_port")]
    pub port: u16,
    /// Talk to the panel over HTTPS instead of plain HTTP
    #[serde(default)]
    pub https: bool,
}

impl fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("hostname", &self.hostname)
            .field("port", &self.port)
            .field("https", &self.https)
            .finish()
    }
}

impl ConnectionConfig {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            hostname: default_hostname(),
            port: DEFAULT_PORT,
            https: false,
        }
    }

    pub fn hostname(mut self, hostname: impl Into<String>) -> Self {
        self.hostname = hostname.into();
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn https(mut self, https: bool) -> Self {
        self.https = https;
        self
    }

    /// URL scheme implied by the `https` flag.
    pub fn scheme(&self) -> &'static str {
        if self.https {
            "https"
        } else {
            "http"
        }
    }

    /// Load a config from a JSON file. Only `username` and `password` are required.
    pub fn from_file(path: &str) -> Result<Self> {
        let raw = fs::read_to_string(path).context("reading config file")?;
        let cfg: ConnectionConfig = serde_json::from_str(&raw).context("parsing config JSON")?;
        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = ConnectionConfig::new("admin", "secret");
        assert_eq!(config.hostname, "localhost");
        assert_eq!(config.port, 2222);
        assert!(!config.https);
        assert_eq!(config.scheme(), "http");
    }

    #[test]
    fn test_debug_hides_password() {
        let config = ConnectionConfig::new("admin", "hunter2-secret");
        let printed = format!("{:?}", config);
        assert!(printed.contains("admin"));
        assert!(printed.contains("<redacted>"));
        assert!(!printed.contains("hunter2-secret"));
    }

    #[test]
    fn test_builder_overrides() {
        let config = ConnectionConfig::new("admin", "secret")
            .hostname("panel.example.com")
            .port(2223)
            .https(true);
        assert_eq!(config.hostname, "panel.example.com");
        assert_eq!(config.port, 2223);
        assert_eq!(config.scheme(), "https");
    }

    #[test]
    fn test_config_parsing() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"{{
                "username": "reseller",
                "password": "pw",
                "hostname": "da.example.net",
                "https": true
            }}"#
        )
        .unwrap();

        let config = ConnectionConfig::from_file(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.username, "reseller");
        assert_eq!(config.password, "pw");
        assert_eq!(config.hostname, "da.example.net");
        assert_eq!(config.port, 2222);
        assert!(config.https);
    }

    #[test]
    fn test_config_missing_credentials() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"hostname": "da.example.net"}}"#).unwrap();

        let result = ConnectionConfig::from_file(file.path().to_str().unwrap());
        assert!(result.is_err());
    }

    #[test]
    fn test_config_missing_file() {
        let result = ConnectionConfig::from_file("/nonexistent/path/directadmin.json");
        assert!(result.is_err());
    }
}
