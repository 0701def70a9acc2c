//! Callbacks the calling environment plugs into the dispatcher

use std::sync::Arc;

use crate::{config::DispatchConfig, request::Request, transport::HttpResponse};

/// Shown to the user when the server cannot be reached and no retry is configured
pub const CONNECTION_ERROR_MESSAGE: &str =
    "Unable to reach the server. Please check your connection and try again.";

/// Shown to the user for any other dispatch failure
pub const GENERIC_ERROR_MESSAGE: &str = "Something went wrong. Please try again.";

/// Displays a short user-facing message (toast, snackbar, status line)
pub trait MessageHook: Send + Sync {
    fn show_message(&self, message: &str);
}

impl<F> MessageHook for F
where
    F: Fn(&str) + Send + Sync,
{
    fn show_message(&self, message: &str) {
        self(message)
    }
}

/// Observes every completed response, whatever its status code
///
/// Deciding which codes count as failures is up to the implementation.
pub trait StatusHook: Send + Sync {
    fn on_response(&self, ctx: &HookContext<'_>, response: &HttpResponse);
}

impl<F> StatusHook for F
where
    F: Fn(&HookContext<'_>, &HttpResponse) + Send + Sync,
{
    fn on_response(&self, ctx: &HookContext<'_>, response: &HttpResponse) {
        self(ctx, response)
    }
}

/// Called when a hook decides the session is no longer valid
pub type LogoutCallback = Arc<dyn Fn() + Send + Sync>;

/// What a hook can see about the call that produced the response
pub struct HookContext<'a> {
    request: &'a Request,
    config: &'a DispatchConfig,
    attempt: u32,
}

impl<'a> HookContext<'a> {
    pub(crate) fn new(request: &'a Request, config: &'a DispatchConfig, attempt: u32) -> Self {
        Self {
            request,
            config,
            attempt,
        }
    }

    pub fn request(&self) -> &Request {
        self.request
    }

    pub fn config(&self) -> &DispatchConfig {
        self.config
    }

    /// 1-based attempt number that produced the response
    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    /// Invoke the configured logout callback, if any
    pub fn logout(&self) {
        self.config.logout();
    }

    /// Show a message through the configured message hook, if any
    pub fn show_message(&self, message: &str) {
        self.config.show_message(message);
    }
}
