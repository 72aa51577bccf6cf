use std::sync::Arc;

use tokio::sync::Mutex;

use crate::config::core_config::ReviewConfig;
use crate::provider::verification_request_client::VerificationRequestClient;
use crate::store::ListStore;

pub mod dto;
pub mod service;
mod session;

use session::SessionRegistry;

#[derive(Clone)]
pub struct ReviewService {
    store: Arc<ListStore>,
    client: Arc<dyn VerificationRequestClient>,
    sessions: Arc<Mutex<SessionRegistry>>,
    config: Arc<ReviewConfig>,
}

impl ReviewService {
    pub(crate) fn new(
        store: Arc<ListStore>,
        client: Arc<dyn VerificationRequestClient>,
        config: Arc<ReviewConfig>,
    ) -> Self {
        Self {
            store,
            client,
            sessions: Arc::new(Mutex::new(SessionRegistry::default())),
            config,
        }
    }
}
