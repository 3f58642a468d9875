//! HTTP adapter between the services and the remote catalog API.

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;
use shared::domain::{Category, ProductId};
use tracing::{debug, warn};
use url::Url;

use crate::error::{ClientError, Result};

pub use reqwest::Method;

/// One outbound call per invocation. No retries and no timeout beyond the
/// transport defaults.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn request(&self, method: Method, url: Url, body: Option<Value>) -> Result<Value>;
}

pub struct ReqwestTransport {
    http: Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::with_client(Client::new())
    }

    pub fn with_client(http: Client) -> Self {
        Self { http }
    }
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn request(&self, method: Method, url: Url, body: Option<Value>) -> Result<Value> {
        debug!(%method, %url, "catalog request");
        let mut builder = self.http.request(method.clone(), url.clone());
        if let Some(body) = &body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            warn!(%method, %url, status = status.as_u16(), "catalog request rejected");
            return Err(ClientError::Http {
                status: status.as_u16(),
                body: text,
            });
        }

        Ok(parse_body(&text))
    }
}

/// Empty bodies become `Null`; non-JSON text is kept as a string value.
pub fn parse_body(text: &str) -> Value {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Value::Null;
    }
    serde_json::from_str(trimmed).unwrap_or_else(|_| Value::String(text.to_string()))
}

pub fn decode<T: DeserializeOwned>(value: Value) -> Result<T> {
    serde_json::from_value(value).map_err(ClientError::from)
}

/// URL builder for every route of the catalog API.
#[derive(Debug, Clone)]
pub struct Endpoints {
    base: Url,
}

impl Endpoints {
    pub fn new(base: Url) -> Result<Self> {
        if base.cannot_be_a_base() {
            return Err(ClientError::Validation(format!(
                "base url cannot carry a path: {base}"
            )));
        }
        Ok(Self { base })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    pub fn categories(&self) -> Url {
        self.build(&["products", "categories"])
    }

    pub fn products(&self) -> Url {
        self.build(&["products"])
    }

    pub fn products_in(&self, category: &Category) -> Url {
        self.build(&["products", "category", category.as_str()])
    }

    pub fn product(&self, id: ProductId) -> Url {
        self.build(&["products", &id.to_string()])
    }

    pub fn users(&self) -> Url {
        self.build(&["users"])
    }

    pub fn login(&self) -> Url {
        self.build(&["auth", "login"])
    }

    fn build(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        // `new` rejects cannot-be-a-base urls, so the segments are always writable.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod tests;
