use std::{collections::HashMap, fs};

use serde::Deserialize;
use shared::domain::DEFAULT_ADDRESS;
use url::Url;

use crate::error::WidgetError;

#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    pub server_url: String,
    pub command_path: String,
    pub push_path: String,
    pub template_root: String,
    pub default_address: String,
    pub push_capacity: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:8080".into(),
            command_path: "/api/command".into(),
            push_path: "/ws".into(),
            template_root: "/".into(),
            default_address: DEFAULT_ADDRESS.into(),
            push_capacity: 256,
        }
    }
}

impl SessionConfig {
    pub fn command_url(&self) -> String {
        join_url(&self.server_url, &self.command_path)
    }

    pub fn template_url(&self, template_ref: &str) -> String {
        let root = join_url(&self.server_url, &self.template_root);
        join_url(&root, template_ref)
    }

    /// Websocket URL of the push feed, derived from `server_url`.
    pub fn push_url(&self) -> Result<String, WidgetError> {
        let mut url = Url::parse(&self.server_url)
            .map_err(|_| WidgetError::InvalidServerUrl(self.server_url.clone()))?;
        let scheme = match url.scheme() {
            "http" => "ws",
            "https" => "wss",
            _ => return Err(WidgetError::InvalidServerUrl(self.server_url.clone())),
        };
        url.set_scheme(scheme)
            .map_err(|_| WidgetError::InvalidServerUrl(self.server_url.clone()))?;
        Ok(join_url(url.as_str(), &self.push_path))
    }
}

pub fn load_session_config() -> SessionConfig {
    let mut config = SessionConfig::default();

    if let Ok(raw) = fs::read_to_string("dashboard.toml") {
        if let Ok(file_cfg) = toml::from_str::<HashMap<String, toml::Value>>(&raw) {
            apply_file_values(&mut config, &file_cfg);
        }
    }

    if let Ok(v) = std::env::var("DASHBOARD_SERVER_URL") {
        config.server_url = v;
    }
    if let Ok(v) = std::env::var("APP__SERVER_URL") {
        config.server_url = v;
    }
    if let Ok(v) = std::env::var("APP__COMMAND_PATH") {
        config.command_path = v;
    }
    if let Ok(v) = std::env::var("APP__PUSH_PATH") {
        config.push_path = v;
    }
    if let Ok(v) = std::env::var("APP__PUSH_CAPACITY") {
        if let Ok(parsed) = v.parse::<usize>() {
            config.push_capacity = parsed.max(1);
        }
    }

    config
}

fn apply_file_values(config: &mut SessionConfig, file_cfg: &HashMap<String, toml::Value>) {
    let text = |key: &str| file_cfg.get(key).and_then(|v| v.as_str()).map(str::to_string);

    if let Some(v) = text("server_url") {
        config.server_url = v;
    }
    if let Some(v) = text("command_path") {
        config.command_path = v;
    }
    if let Some(v) = text("push_path") {
        config.push_path = v;
    }
    if let Some(v) = text("template_root") {
        config.template_root = v;
    }
    if let Some(v) = text("default_address") {
        config.default_address = v;
    }
    if let Some(v) = file_cfg.get("push_capacity").and_then(|v| v.as_integer()) {
        config.push_capacity = usize::try_from(v).unwrap_or(1).max(1);
    }
}

fn join_url(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    if path.is_empty() {
        return base.to_string();
    }
    format!("{base}/{path}")
}
