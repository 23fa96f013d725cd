use crate::api::{ApiClient, EnvConfig};
use leptos::prelude::*;

#[derive(Clone)]
pub(crate) struct AppState {
    pub api_client: RwSignal<ApiClient>,

    /// Read once from `window.ENV` at startup.
    pub config: EnvConfig,
}

impl AppState {
    pub fn new() -> Self {
        Self::with_config(EnvConfig::new())
    }

    pub fn with_config(config: EnvConfig) -> Self {
        Self {
            api_client: RwSignal::new(ApiClient::from_config(&config)),
            config,
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone)]
pub(crate) struct AppContext(pub AppState);
