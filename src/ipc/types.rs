use std::path::PathBuf;

use serde::Deserialize;

use crate::auth::{CredentialVerifier, SessionState};
use crate::config::Config;
use crate::store::RecordStore;

#[derive(Debug, Deserialize, Clone)]
pub struct Request {
    pub id: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
}

pub struct AppState {
    pub workspace: Option<PathBuf>,
    pub config: Config,
    pub store: Option<RecordStore>,
    pub session: SessionState,
    pub verifier: Box<dyn CredentialVerifier>,
}

impl AppState {
    pub fn new() -> Self {
        let config = Config::default();
        let verifier = Box::new(config.verifier());
        Self {
            workspace: None,
            config,
            store: None,
            session: SessionState::default(),
            verifier,
        }
    }
}
