//! Request dispatch helper for courier
//!
//! Wraps an HTTP transport with the chores every call site repeats.
//!
//! ## Features
//!
//! - **Explicit configuration**: one `ConfigStore` per application, token refresh in place
//! - **Header policy**: bearer token or custom headers, fixed `Content-Type`
//! - **Progress hooks**: begin/end around every attempt, ended on every exit path
//! - **Fixed-delay retry**: timeouts and transport errors, optional attempt cap
//! - **Diagnostics**: structured `tracing` output and curl reconstruction
//! - **Testing support**: mockable `HttpTransport`, wiremock-friendly reqwest backend

pub mod client;
pub mod config;
pub mod curl;
pub mod diagnostics;
pub mod dispatcher;
pub mod error;
pub mod headers;
pub mod hooks;
pub mod middleware;
pub mod multipart;
pub mod progress;
pub mod request;
pub mod settings;
pub mod store;
pub mod transport;

pub use client::Courier;
pub use config::{DispatchConfig, DispatchConfigBuilder};
pub use dispatcher::RequestDispatcher;
pub use error::{ErrorClass, HttpError, Result};
pub use hooks::{HookContext, MessageHook, StatusHook};
pub use middleware::RetryPolicy;
pub use multipart::MultipartFile;
pub use progress::{ProgressGuard, ProgressIndicator};
pub use request::{Request, RequestMethod};
pub use settings::{DispatchSettings, TransportConfig};
pub use store::ConfigStore;
pub use transport::{HttpResponse, HttpTransport, ReqwestTransport};

/// Re-export commonly used types
pub use reqwest::{header, StatusCode};
