//! Request header assembly

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};

use crate::{
    config::DispatchConfig,
    error::{HttpError, Result},
    request::RequestMethod,
};

pub const JSON_CONTENT_TYPE: &str = "application/json";
pub const MULTIPART_CONTENT_TYPE: &str = "multipart/form-data";

/// Build the headers for one attempt
///
/// Custom headers, when configured, replace the bearer token entirely, even
/// if a token is set. Otherwise a non-empty token becomes
/// `Authorization: Bearer <token>`. `Content-Type` is always set last and
/// overrides any custom value.
pub fn assemble(config: &DispatchConfig, method: RequestMethod) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();

    match config.custom_headers() {
        Some(custom) => {
            for (name, value) in custom {
                let name = HeaderName::from_bytes(name.as_bytes())
                    .map_err(|e| HttpError::InvalidHeader(format!("{name}: {e}")))?;
                let value = HeaderValue::from_str(value)
                    .map_err(|e| HttpError::InvalidHeader(format!("{name}: {e}")))?;
                headers.insert(name, value);
            }
        }
        None if !config.token().is_empty() => {
            let value = HeaderValue::from_str(&format!("Bearer {}", config.token()))
                .map_err(|e| HttpError::InvalidHeader(format!("{AUTHORIZATION}: {e}")))?;
            headers.insert(AUTHORIZATION, value);
        }
        None => {}
    }

    headers.insert(CONTENT_TYPE, HeaderValue::from_static(content_type(method)));
    Ok(headers)
}

pub fn content_type(method: RequestMethod) -> &'static str {
    match method {
        RequestMethod::Multipart => MULTIPART_CONTENT_TYPE,
        _ => JSON_CONTENT_TYPE,
    }
}
