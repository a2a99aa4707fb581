use std::time::Duration;

use anyhow::Context;
use reqwest::header::{self, HeaderMap};
use reqwest_middleware::ClientWithMiddleware;
use reqwest_tracing::TracingMiddleware;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    bearer_token: String,
}

impl HttpClientConfig {
    pub fn with_bearer_token(token: impl Into<String>) -> Self {
        Self {
            bearer_token: token.into(),
        }
    }

    pub fn new_tracing_client(&self) -> anyhow::Result<ClientWithMiddleware> {
        let mut auth_value = header::HeaderValue::from_str(&format!("Bearer {}", self.bearer_token))
            .context("Bearer token contains invalid header characters")?;
        auth_value.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, auth_value);

        //callers await requests inside their event loop
        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(reqwest_middleware::ClientBuilder::new(client)
            .with(TracingMiddleware::default())
            .build())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_client_with_bearer_token() {
        let config = HttpClientConfig::with_bearer_token("abc");

        assert!(config.new_tracing_client().is_ok());
    }

    #[test]
    fn rejects_token_with_newline() {
        let config = HttpClientConfig::with_bearer_token("abc\ndef");

        assert!(config.new_tracing_client().is_err());
    }
}
