use std::sync::Arc;

use config::core_config::CoreConfig;
use provider::http_client::HttpClient;
use provider::http_client::reqwest_client::ReqwestClient;
use provider::verification_request_client::VerificationRequestClient;
use provider::verification_request_client::http::HttpVerificationRequestClient;
use service::review::ReviewService;
use store::ListStore;

pub mod config;
pub mod error;
pub mod model;
pub mod normalization;
pub mod policy;
pub mod provider;
pub mod service;
pub mod store;

/// Entry point for front ends: the list store and the review controller sharing one backend client.
#[derive(Clone)]
pub struct ReviewCore {
    pub list_store: Arc<ListStore>,
    pub review_service: ReviewService,
    pub config: Arc<CoreConfig>,
}

impl ReviewCore {
    pub fn new(config: CoreConfig, http_client: Arc<dyn HttpClient>) -> Self {
        let client: Arc<dyn VerificationRequestClient> = Arc::new(HttpVerificationRequestClient::new(
            http_client,
            config.api.base_url.clone(),
            config.api.bearer_token.clone(),
        ));
        Self::with_client(config, client)
    }

    /// Uses reqwest with the configured timeout.
    pub fn with_reqwest(config: CoreConfig) -> Result<Self, provider::http_client::Error> {
        let http_client = ReqwestClient::with_timeout(config.api.timeout)?;
        Ok(Self::new(config, Arc::new(http_client)))
    }

    pub fn with_client(config: CoreConfig, client: Arc<dyn VerificationRequestClient>) -> Self {
        let list_store = Arc::new(ListStore::new(client.clone(), config.review.per_page));
        let review_service = ReviewService::new(
            list_store.clone(),
            client,
            Arc::new(config.review.clone()),
        );

        Self {
            list_store,
            review_service,
            config: Arc::new(config),
        }
    }
}
