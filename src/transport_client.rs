//! Bundled [`Transport`] implementation backed by `reqwest`.

use url::Url;

use crate::{
    transport::Transport,
    types::{FieldMap, Record},
};

/// HTTP transport over a shared `reqwest` client.
///
/// Connection pooling, TLS and timeouts follow the client's configuration;
/// pass a customized [`reqwest::Client`] to take control of those.
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        HttpTransport { client }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum HttpTransportError {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("reply is not form-encoded: {0}")]
    Decode(#[from] serde_urlencoded::de::Error),
}

impl Transport for HttpTransport {
    type Error = HttpTransportError;

    async fn post(&self, url: &Url, fields: &FieldMap) -> Result<Record<String>, Self::Error> {
        let body = self
            .client
            .post(url.clone())
            .form(fields)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        Ok(serde_urlencoded::from_str(&body)?)
    }
}
