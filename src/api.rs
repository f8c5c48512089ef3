use crate::config::ConnectionConfig;
use crate::connectors::{ApiConnector, ApiResponse};
use crate::error::Result;

/// DirectAdmin API entry point.
pub struct Api {
    connector: ApiConnector,
}

impl Api {
    pub fn new(config: ConnectionConfig) -> Result<Self> {
        Ok(Self::from_connector(ApiConnector::new(config)?))
    }

    pub fn from_connector(connector: ApiConnector) -> Self {
        Self { connector }
    }

    pub fn connector(&self) -> &ApiConnector {
        &self.connector
    }

    /// Execute a command through the underlying connector.
    pub async fn execute(
        &self,
        command: &str,
        parameters: Option<&[(&str, &str)]>,
        get: Option<&[(&str, &str)]>,
    ) -> Result<ApiResponse> {
        self.connector.execute(command, parameters, get).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;

    #[tokio::test]
    async fn execute_delegates_to_connector() {
        let mut server = Server::new_async().await;
        let host = server.host_with_port();
        let (hostname, port) = host.rsplit_once(':').unwrap();

        let mock = server
            .mock("GET", "/CMD_API_SHOW_ALL_USERS")
            .with_status(200)
            .with_body("list[]=alice&list[]=bob")
            .create_async()
            .await;

        let api = Api::new(
            ConnectionConfig::new("admin", "pw")
                .hostname(hostname)
                .port(port.parse().unwrap()),
        )
        .unwrap();
        assert_eq!(api.connector().config().username, "admin");

        let users = api
            .execute("CMD_API_SHOW_ALL_USERS", None, None)
            .await
            .expect("list response");

        assert_eq!(
            users,
            ApiResponse::List(vec!["alice".to_string(), "bob".to_string()])
        );
        mock.assert_async().await;
    }
}
