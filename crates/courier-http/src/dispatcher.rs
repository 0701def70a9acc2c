//! Request dispatch: headers, progress, timeout, diagnostics, retry

use std::{sync::Arc, time::Instant};

use reqwest::header::HeaderMap;
use tracing::{debug, error, warn};

use crate::{
    config::DispatchConfig,
    diagnostics::ResponseDiagnostics,
    error::{ErrorClass, HttpError, Result},
    headers,
    hooks::{HookContext, CONNECTION_ERROR_MESSAGE, GENERIC_ERROR_MESSAGE},
    progress::ProgressGuard,
    request::{Request, RequestMethod},
    store::ConfigStore,
    transport::{HttpResponse, HttpTransport},
};

/// Issues one [`Request`] against a transport using the store's configuration
pub struct RequestDispatcher {
    store: Arc<ConfigStore>,
    transport: Arc<dyn HttpTransport>,
    request: Request,
}

impl RequestDispatcher {
    pub fn new(store: Arc<ConfigStore>, transport: Arc<dyn HttpTransport>, request: Request) -> Self {
        Self {
            store,
            transport,
            request,
        }
    }

    pub fn request(&self) -> &Request {
        &self.request
    }

    /// Send the request and return the raw response
    ///
    /// Timeouts and transport errors are retried after the configured delay.
    /// Any failure that is not retried is reported through the message hook
    /// (timeouts excepted) and returned. Status codes are never treated as
    /// failures here; that is the status hook's job.
    ///
    /// Every attempt re-reads the store for headers and hooks, but the retry
    /// policy is taken once, here, and holds for the whole call.
    pub async fn send_request(&self) -> Result<HttpResponse> {
        let config = self.store.current()?;

        let result = config
            .retry()
            .execute(|attempt| self.attempt(attempt))
            .await;

        if let Err(e) = &result {
            // Report with whatever configuration is current now, the way a
            // fresh attempt would see it.
            let config = self.store.current().unwrap_or(config);
            self.report(&config, e);
        }
        result
    }

    async fn attempt(&self, attempt: u32) -> Result<HttpResponse> {
        let config = self.store.current()?;
        let progress = if self.request.show_loader() {
            ProgressGuard::begin(config.progress())
        } else {
            ProgressGuard::none()
        };

        self.request.validate()?;
        let headers = headers::assemble(&config, self.request.method())?;

        debug!(
            url = %self.request.url(),
            method = %self.request.method(),
            attempt,
            "dispatching request"
        );
        let started = Instant::now();
        let response = self.issue(&config, headers.clone()).await?;
        let elapsed = started.elapsed();
        drop(progress);

        ResponseDiagnostics::collect(
            &self.request,
            &headers,
            &response,
            elapsed,
            config.create_curl(),
        )
        .emit();

        config.notify_status(&HookContext::new(&self.request, &config, attempt), &response);
        Ok(response)
    }

    async fn issue(&self, config: &DispatchConfig, headers: HeaderMap) -> Result<HttpResponse> {
        let url = self.request.url();
        let body = || self.request.body().map(<[u8]>::to_vec).unwrap_or_default();

        let method = self.request.method();
        let call = match method {
            RequestMethod::Get => self.transport.get(url, headers),
            RequestMethod::Post => self.transport.post(url, headers, body()),
            RequestMethod::Put => self.transport.put(url, headers, body()),
            RequestMethod::Delete => self.transport.delete(url, headers),
            RequestMethod::Multipart => {
                self.transport
                    .multipart(url, headers, self.request.fields(), self.request.files())
            }
        };

        if !method.is_timed() {
            return call.await;
        }
        tokio::time::timeout(config.timeout(), call)
            .await
            .map_err(|_| HttpError::Timeout(config.timeout()))?
    }

    fn report(&self, config: &DispatchConfig, e: &HttpError) {
        match e.class() {
            ErrorClass::Configuration => {
                error!(url = %self.request.url(), "dispatch before configuration: {e}");
            }
            ErrorClass::Timeout => {
                warn!(url = %self.request.url(), "request timed out: {e}");
            }
            ErrorClass::Transport => {
                warn!(url = %self.request.url(), "request failed: {e}");
                config.show_message(CONNECTION_ERROR_MESSAGE);
            }
            ErrorClass::Other => {
                error!(url = %self.request.url(), "request error: {e}");
                config.show_message(GENERIC_ERROR_MESSAGE);
            }
        }
    }
}
