use std::path::PathBuf;

use serde::Deserialize;

use crate::board::Board;
use crate::config::Config;

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
    pub board: Option<Board>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            workspace: None,
            config,
            board: None,
        }
    }
}
