use std::{collections::HashMap, fs};

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub server_bind: String,
    /// Number of addresses whose latest status is kept for push queries.
    pub history_limit: usize,
    pub push_capacity: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_bind: "127.0.0.1:8080".into(),
            history_limit: 1024,
            push_capacity: 256,
        }
    }
}

pub fn load_settings() -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string("server.toml") {
        if let Ok(file_cfg) = toml::from_str::<HashMap<String, toml::Value>>(&raw) {
            apply_file_values(&mut settings, &file_cfg);
        }
    }

    if let Ok(v) = std::env::var("SERVER_BIND") {
        settings.server_bind = v;
    }
    if let Ok(v) = std::env::var("APP__BIND_ADDR") {
        settings.server_bind = v;
    }

    if let Ok(v) = std::env::var("APP__HISTORY_LIMIT") {
        if let Ok(parsed) = v.parse::<usize>() {
            settings.history_limit = parsed;
        }
    }
    if let Ok(v) = std::env::var("APP__PUSH_CAPACITY") {
        if let Ok(parsed) = v.parse::<usize>() {
            settings.push_capacity = parsed;
        }
    }

    settings
}

fn apply_file_values(settings: &mut Settings, file_cfg: &HashMap<String, toml::Value>) {
    if let Some(v) = file_cfg.get("bind_addr").and_then(toml::Value::as_str) {
        settings.server_bind = v.to_string();
    }
    if let Some(v) = file_cfg
        .get("history_limit")
        .and_then(toml::Value::as_integer)
        .and_then(|v| usize::try_from(v).ok())
    {
        settings.history_limit = v;
    }
    if let Some(v) = file_cfg
        .get("push_capacity")
        .and_then(toml::Value::as_integer)
        .and_then(|v| usize::try_from(v).ok())
    {
        settings.push_capacity = v;
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
