//! Transport boundary and the reqwest-backed implementation

use std::{borrow::Cow, collections::BTreeMap, sync::Arc};

use async_trait::async_trait;
use reqwest::{
    header::{HeaderMap, CONTENT_TYPE},
    Method, RequestBuilder,
};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::{
    error::{HttpError, Result},
    multipart::MultipartFile,
    settings::TransportConfig,
};

/// A completed HTTP exchange, passed back to the caller untouched
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: body.into(),
        }
    }

    /// Body as text, lossy for non-UTF-8 payloads
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_slice(&self.body)?)
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Mockable HTTP transport
///
/// Timeouts are applied by the dispatcher, so implementations should not
/// impose their own on top.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Execute a GET request
    async fn get(&self, url: &str, headers: HeaderMap) -> Result<HttpResponse>;

    /// Execute a POST request
    async fn post(&self, url: &str, headers: HeaderMap, body: Vec<u8>) -> Result<HttpResponse>;

    /// Execute a PUT request
    async fn put(&self, url: &str, headers: HeaderMap, body: Vec<u8>) -> Result<HttpResponse>;

    /// Execute a DELETE request
    async fn delete(&self, url: &str, headers: HeaderMap) -> Result<HttpResponse>;

    /// Execute a multipart/form-data POST
    async fn multipart(
        &self,
        url: &str,
        headers: HeaderMap,
        fields: &BTreeMap<String, String>,
        files: &[MultipartFile],
    ) -> Result<HttpResponse>;
}

/// Production transport backed by `reqwest`
pub struct ReqwestTransport {
    inner: reqwest::Client,
    config: TransportConfig,
}

impl ReqwestTransport {
    /// Create a new transport with configuration
    pub fn new(config: TransportConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .user_agent(&config.user_agent)
            .redirect(if config.max_redirects > 0 {
                reqwest::redirect::Policy::limited(config.max_redirects)
            } else {
                reqwest::redirect::Policy::none()
            });

        if let Some(proxy_url) = &config.proxy {
            let proxy = reqwest::Proxy::all(proxy_url)
                .map_err(|e| HttpError::InvalidProxy(e.to_string()))?;
            builder = builder.proxy(proxy);
        }

        if config.pool_enabled {
            builder = builder.pool_idle_timeout(config.pool_idle_timeout);
        } else {
            builder = builder.pool_max_idle_per_host(0);
        }

        let inner = builder
            .build()
            .map_err(|e| HttpError::BuildError(e.to_string()))?;

        Ok(Self { inner, config })
    }

    /// Create transport with default configuration
    pub fn with_defaults() -> Result<Self> {
        Self::new(TransportConfig::default())
    }

    /// Get underlying reqwest client (for advanced usage)
    pub fn inner(&self) -> &reqwest::Client {
        &self.inner
    }

    pub fn config(&self) -> &TransportConfig {
        &self.config
    }

    fn request(&self, method: Method, url: &str, headers: HeaderMap) -> Result<RequestBuilder> {
        let url = url
            .parse::<url::Url>()
            .map_err(|e| HttpError::InvalidUrl(e.to_string()))?;
        Ok(self.inner.request(method, url).headers(headers))
    }

    async fn send(request: RequestBuilder) -> Result<HttpResponse> {
        let response = request.send().await?;
        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = response.bytes().await?.to_vec();
        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get(&self, url: &str, headers: HeaderMap) -> Result<HttpResponse> {
        debug!("HTTP GET: {}", url);
        Self::send(self.request(Method::GET, url, headers)?).await
    }

    async fn post(&self, url: &str, headers: HeaderMap, body: Vec<u8>) -> Result<HttpResponse> {
        debug!("HTTP POST: {}", url);
        Self::send(self.request(Method::POST, url, headers)?.body(body)).await
    }

    async fn put(&self, url: &str, headers: HeaderMap, body: Vec<u8>) -> Result<HttpResponse> {
        debug!("HTTP PUT: {}", url);
        Self::send(self.request(Method::PUT, url, headers)?.body(body)).await
    }

    async fn delete(&self, url: &str, headers: HeaderMap) -> Result<HttpResponse> {
        debug!("HTTP DELETE: {}", url);
        Self::send(self.request(Method::DELETE, url, headers)?).await
    }

    async fn multipart(
        &self,
        url: &str,
        mut headers: HeaderMap,
        fields: &BTreeMap<String, String>,
        files: &[MultipartFile],
    ) -> Result<HttpResponse> {
        debug!("HTTP POST (multipart): {}", url);

        // reqwest writes its own multipart Content-Type with the boundary
        headers.remove(CONTENT_TYPE);

        let mut form = reqwest::multipart::Form::new();
        for (name, value) in fields {
            form = form.text(name.clone(), value.clone());
        }
        for file in files {
            form = form.part(file.field().to_string(), file.to_part()?);
        }

        Self::send(self.request(Method::POST, url, headers)?.multipart(form)).await
    }
}

/// Create a shared transport (Arc-wrapped for cloning)
pub fn shared_transport(config: TransportConfig) -> Result<Arc<dyn HttpTransport>> {
    Ok(Arc::new(ReqwestTransport::new(config)?))
}
