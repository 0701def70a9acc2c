//! Per-response debug logging

use std::time::Duration;

use reqwest::header::HeaderMap;
use tracing::{debug, info};

use crate::{curl, request::Request, transport::HttpResponse};

/// Status whose body is never logged
pub const SUPPRESSED_BODY_STATUS: u16 = 500;

/// What gets logged about one completed attempt
#[derive(Debug, Clone)]
pub struct ResponseDiagnostics {
    pub url: String,
    pub method: String,
    pub request_headers: Vec<(String, String)>,
    pub status: u16,
    pub elapsed_ms: u128,
    /// `None` for a 500 response
    pub body: Option<String>,
    /// Present when curl generation is enabled and applies to the method
    pub curl: Option<String>,
}

impl ResponseDiagnostics {
    pub fn collect(
        request: &Request,
        headers: &HeaderMap,
        response: &HttpResponse,
        elapsed: Duration,
        create_curl: bool,
    ) -> Self {
        let request_headers = headers
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();

        let curl = (create_curl && curl::applies_to(request.method()))
            .then(|| curl::to_curl(request, headers));

        Self {
            url: request.url().to_string(),
            method: request.method().to_string(),
            request_headers,
            status: response.status,
            elapsed_ms: elapsed.as_millis(),
            body: body_for_log(response),
            curl,
        }
    }

    /// Emit the collected entries as tracing events
    pub fn emit(&self) {
        info!(
            url = %self.url,
            method = %self.method,
            status = self.status,
            elapsed_ms = self.elapsed_ms as u64,
            "request completed"
        );
        debug!(url = %self.url, headers = ?self.request_headers, "request headers");
        if let Some(body) = &self.body {
            debug!(url = %self.url, body = %body, "response body");
        }
        if let Some(curl) = &self.curl {
            debug!(curl = %curl, "curl");
        }
    }
}

/// Body text to log, or `None` when the status suppresses it
pub fn body_for_log(response: &HttpResponse) -> Option<String> {
    (response.status != SUPPRESSED_BODY_STATUS).then(|| response.text().into_owned())
}
