//! Dispatch configuration

use std::{collections::HashMap, fmt, sync::Arc, time::Duration};

use crate::{
    hooks::{HookContext, LogoutCallback, MessageHook, StatusHook},
    middleware::RetryPolicy,
    progress::ProgressIndicator,
    transport::HttpResponse,
};

/// Everything a dispatcher reads when it issues a request
///
/// Immutable once built. Token refresh goes through
/// [`DispatchConfig::with_access_token`], which yields a new value.
#[derive(Clone)]
pub struct DispatchConfig {
    token: String,
    timeout: Duration,
    retry: RetryPolicy,
    custom_headers: Option<HashMap<String, String>>,
    status_hook: Option<Arc<dyn StatusHook>>,
    progress: Option<Arc<dyn ProgressIndicator>>,
    message_hook: Option<Arc<dyn MessageHook>>,
    on_logout: Option<LogoutCallback>,
    create_curl: bool,
}

impl DispatchConfig {
    /// Start building a configuration
    pub fn builder(token: impl Into<String>, timeout: Duration) -> DispatchConfigBuilder {
        DispatchConfigBuilder {
            config: DispatchConfig {
                token: token.into(),
                timeout,
                retry: RetryPolicy::disabled(),
                custom_headers: None,
                status_hook: None,
                progress: None,
                message_hook: None,
                on_logout: None,
                create_curl: false,
            },
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn retry(&self) -> &RetryPolicy {
        &self.retry
    }

    pub fn custom_headers(&self) -> Option<&HashMap<String, String>> {
        self.custom_headers.as_ref()
    }

    pub fn progress(&self) -> Option<Arc<dyn ProgressIndicator>> {
        self.progress.clone()
    }

    pub fn create_curl(&self) -> bool {
        self.create_curl
    }

    /// Copy of this configuration with only the token replaced
    pub fn with_access_token(&self, token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            ..self.clone()
        }
    }

    /// Run the logout callback, if one is configured
    pub fn logout(&self) {
        if let Some(on_logout) = &self.on_logout {
            on_logout();
        }
    }

    /// Show a message through the message hook, if one is configured
    pub fn show_message(&self, message: &str) {
        if let Some(hook) = &self.message_hook {
            hook.show_message(message);
        }
    }

    pub(crate) fn notify_status(&self, ctx: &HookContext<'_>, response: &HttpResponse) {
        if let Some(hook) = &self.status_hook {
            hook.on_response(ctx, response);
        }
    }
}

impl fmt::Debug for DispatchConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DispatchConfig")
            .field("token", &if self.token.is_empty() { "" } else { "<redacted>" })
            .field("timeout", &self.timeout)
            .field("retry", &self.retry)
            .field("custom_headers", &self.custom_headers)
            .field("status_hook", &self.status_hook.is_some())
            .field("progress", &self.progress.is_some())
            .field("message_hook", &self.message_hook.is_some())
            .field("on_logout", &self.on_logout.is_some())
            .field("create_curl", &self.create_curl)
            .finish()
    }
}

/// Builder for [`DispatchConfig`]
pub struct DispatchConfigBuilder {
    config: DispatchConfig,
}

impl DispatchConfigBuilder {
    /// Wait `delay` and re-issue the request after a timeout or transport error
    pub fn retry_delay(mut self, delay: Duration) -> Self {
        self.config.retry = self.config.retry.with_delay(delay);
        self
    }

    /// Stop retrying after `attempts` attempts in total
    pub fn max_attempts(mut self, attempts: u32) -> Self {
        self.config.retry = self.config.retry.with_max_attempts(attempts);
        self
    }

    /// Replace the retry policy wholesale
    pub fn retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.config.retry = policy;
        self
    }

    /// Send these headers instead of the bearer token
    pub fn custom_headers(mut self, headers: HashMap<String, String>) -> Self {
        self.config.custom_headers = Some(headers);
        self
    }

    pub fn status_hook(mut self, hook: Arc<dyn StatusHook>) -> Self {
        self.config.status_hook = Some(hook);
        self
    }

    pub fn on_status<F>(self, hook: F) -> Self
    where
        F: Fn(&HookContext<'_>, &HttpResponse) + Send + Sync + 'static,
    {
        self.status_hook(Arc::new(hook))
    }

    pub fn progress(mut self, indicator: Arc<dyn ProgressIndicator>) -> Self {
        self.config.progress = Some(indicator);
        self
    }

    pub fn message_hook(mut self, hook: Arc<dyn MessageHook>) -> Self {
        self.config.message_hook = Some(hook);
        self
    }

    pub fn on_message<F>(self, hook: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.message_hook(Arc::new(hook))
    }

    pub fn on_logout<F>(mut self, callback: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.config.on_logout = Some(Arc::new(callback));
        self
    }

    /// Log a curl reconstruction of every POST/PUT request
    pub fn create_curl(mut self, enabled: bool) -> Self {
        self.config.create_curl = enabled;
        self
    }

    pub fn build(self) -> DispatchConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use parking_lot::Mutex;

    use super::*;

    #[test]
    fn test_builder_defaults() {
        let config = DispatchConfig::builder("abc", Duration::from_secs(30)).build();
        assert_eq!(config.token(), "abc");
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert!(config.retry().delay().is_none());
        assert!(config.custom_headers().is_none());
        assert!(config.progress().is_none());
        assert!(!config.create_curl());
    }

    #[test]
    fn test_builder_pattern() {
        let mut headers = HashMap::new();
        headers.insert("X-Api-Key".to_string(), "k".to_string());

        let config = DispatchConfig::builder("abc", Duration::from_secs(5))
            .retry_delay(Duration::from_millis(250))
            .max_attempts(4)
            .custom_headers(headers)
            .create_curl(true)
            .build();

        assert_eq!(config.retry().delay(), Some(Duration::from_millis(250)));
        assert_eq!(config.retry().max_attempts(), Some(4));
        assert_eq!(
            config.custom_headers().and_then(|h| h.get("X-Api-Key")),
            Some(&"k".to_string())
        );
        assert!(config.create_curl());
    }

    #[test]
    fn test_with_access_token_keeps_everything_else() {
        let logouts = Arc::new(AtomicUsize::new(0));
        let counter = logouts.clone();
        let config = DispatchConfig::builder("old", Duration::from_secs(7))
            .retry_delay(Duration::from_secs(1))
            .create_curl(true)
            .on_logout(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            })
            .build();

        let refreshed = config.with_access_token("new");
        assert_eq!(refreshed.token(), "new");
        assert_eq!(config.token(), "old");
        assert_eq!(refreshed.timeout(), Duration::from_secs(7));
        assert_eq!(refreshed.retry().delay(), Some(Duration::from_secs(1)));
        assert!(refreshed.create_curl());

        refreshed.logout();
        assert_eq!(logouts.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_show_message_without_hook_is_noop() {
        let config = DispatchConfig::builder("", Duration::from_secs(1)).build();
        config.show_message("ignored");
        config.logout();
    }

    #[test]
    fn test_show_message_reaches_hook() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let config = DispatchConfig::builder("", Duration::from_secs(1))
            .on_message(move |msg| sink.lock().push(msg.to_string()))
            .build();

        config.show_message("hello");
        assert_eq!(*seen.lock(), vec!["hello".to_string()]);
    }

    #[test]
    fn test_debug_redacts_token() {
        let config = DispatchConfig::builder("secret-token", Duration::from_secs(1)).build();
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("secret-token"));
        assert!(rendered.contains("<redacted>"));
    }
}
