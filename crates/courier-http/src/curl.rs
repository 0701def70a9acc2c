//! curl reconstruction of a request, for debug logs

use reqwest::header::HeaderMap;

use crate::request::{Request, RequestMethod};

/// Whether a curl line is produced for `method`
///
/// Only POST and PUT are reconstructed. Multipart uploads are not.
pub fn applies_to(method: RequestMethod) -> bool {
    matches!(method, RequestMethod::Post | RequestMethod::Put)
}

/// Render `request` as a single-line curl command, body (if any) as `-d`
pub fn to_curl(request: &Request, headers: &HeaderMap) -> String {
    let mut parts = vec![
        "curl".to_string(),
        "-X".to_string(),
        request.method().verb().to_string(),
        quote(request.url()),
    ];

    for (name, value) in headers {
        let value = String::from_utf8_lossy(value.as_bytes());
        parts.push("-H".to_string());
        parts.push(quote(&format!("{}: {}", name.as_str(), value)));
    }

    if let Some(body) = request.body() {
        parts.push("-d".to_string());
        parts.push(quote(&String::from_utf8_lossy(body)));
    }

    parts.join(" ")
}

/// Single-quote for a POSIX shell
fn quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}
