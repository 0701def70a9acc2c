//! Entry point tying a configuration store to a transport

use std::sync::Arc;

use crate::{
    config::DispatchConfig,
    dispatcher::RequestDispatcher,
    error::Result,
    request::Request,
    settings::TransportConfig,
    store::ConfigStore,
    transport::{HttpResponse, HttpTransport, ReqwestTransport},
};

/// Hands out [`RequestDispatcher`]s that share one store and one transport
#[derive(Clone)]
pub struct Courier {
    store: Arc<ConfigStore>,
    transport: Arc<dyn HttpTransport>,
}

impl Courier {
    pub fn new(store: Arc<ConfigStore>, transport: Arc<dyn HttpTransport>) -> Self {
        Self { store, transport }
    }

    /// Courier over a reqwest transport built from `transport`
    pub fn with_reqwest(store: Arc<ConfigStore>, transport: TransportConfig) -> Result<Self> {
        Ok(Self::new(store, Arc::new(ReqwestTransport::new(transport)?)))
    }

    /// Courier over a default reqwest transport, initialized with `config`
    pub fn from_config(config: DispatchConfig) -> Result<Self> {
        Self::with_reqwest(
            Arc::new(ConfigStore::with_config(config)),
            TransportConfig::default(),
        )
    }

    pub fn store(&self) -> &Arc<ConfigStore> {
        &self.store
    }

    pub fn transport(&self) -> &Arc<dyn HttpTransport> {
        &self.transport
    }

    /// A dispatcher for `request`
    pub fn dispatch(&self, request: Request) -> RequestDispatcher {
        RequestDispatcher::new(self.store.clone(), self.transport.clone(), request)
    }

    /// Dispatch `request` and wait for the response
    pub async fn send(&self, request: Request) -> Result<HttpResponse> {
        self.dispatch(request).send_request().await
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::{
        dispatcher::testing::{ScriptedTransport, Step},
        error::HttpError,
    };

    #[test]
    fn test_courier_creation_with_defaults() {
        let config = DispatchConfig::builder("abc", Duration::from_secs(10)).build();
        let courier = Courier::from_config(config).unwrap();
        assert!(courier.store().is_initialized());
    }

    #[test]
    fn test_courier_with_invalid_proxy() {
        let result = Courier::with_reqwest(
            Arc::new(ConfigStore::new()),
            TransportConfig::default().with_proxy("http://[::1"),
        );
        assert!(matches!(result, Err(HttpError::InvalidProxy(_))));
    }

    #[tokio::test]
    async fn test_dispatchers_share_store_and_transport() {
        let transport = Arc::new(ScriptedTransport::new([Step::Respond(200, "ok")]));
        let store = Arc::new(ConfigStore::new());
        let courier = Courier::new(store.clone(), transport.clone());

        assert!(matches!(
            courier.send(Request::get("https://api.example.com")).await,
            Err(HttpError::NotConfigured)
        ));

        store.initialize(DispatchConfig::builder("", Duration::from_secs(1)).build());
        let dispatcher = courier.clone().dispatch(Request::get("https://api.example.com"));
        assert_eq!(dispatcher.request().url(), "https://api.example.com");

        let response = dispatcher.send_request().await.unwrap();
        assert_eq!(response.text(), "ok");
        assert_eq!(transport.call_count(), 1);
    }
}
