pub mod config;
pub mod email;
pub mod error;
pub mod store;
pub mod types;
pub mod users;

use std::sync::Arc;

use config::Config;
use store::DocumentStore;
use users::UserRecordHandler;

/// Shared application state, built once per cold start
pub struct AppState {
    pub users: UserRecordHandler,
}

impl AppState {
    pub fn new(config: &Config, store: Arc<dyn DocumentStore>) -> Arc<Self> {
        let users = UserRecordHandler::new(store, config);
        Arc::new(Self { users })
    }
}
