use crate::api::HttpApi;
use crate::config::Config;
use crate::errors::ApiError;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub api: Arc<HttpApi>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self, ApiError> {
        Ok(Self {
            api: Arc::new(HttpApi::from_config(&config)?),
            config: Arc::new(config),
        })
    }
}
