use super::client::HttpClient;
use crate::config::ClientConfig;
use async_trait::async_trait;

/// [`HttpClient`] backed by a plain `reqwest::Client`.
pub struct BasicClient(reqwest::Client);

impl BasicClient {
    /// Builds a client from `config`. Certificate validation stays on unless
    /// `accept_invalid_certs` is set.
    pub fn new(config: &ClientConfig) -> reqwest::Result<Self> {
        let mut builder = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .danger_accept_invalid_certs(config.accept_invalid_certs);

        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self(builder.build()?))
    }
}

#[async_trait]
impl HttpClient for BasicClient {
    async fn execute(&self, req: reqwest::Request) -> reqwest::Result<reqwest::Response> {
        self.0.execute(req).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builds_with_defaults() {
        assert!(BasicClient::new(&ClientConfig::default()).is_ok());
    }

    #[test]
    fn test_builds_insecure_with_timeout() {
        let config = ClientConfig {
            accept_invalid_certs: true,
            request_timeout: Some(std::time::Duration::from_secs(5)),
            ..Default::default()
        };
        assert!(BasicClient::new(&config).is_ok());
    }
}
