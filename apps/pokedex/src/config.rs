use std::{fs, path::Path};

use dex_core::{ControllerConfig, DEFAULT_API_BASE_URL, DEFAULT_NAME_INDEX_LIMIT, DEFAULT_PAGE_SIZE};
use tracing::warn;

pub const SETTINGS_FILE: &str = "pokedex.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_base_url: String,
    pub page_size: usize,
    pub cache_capacity: Option<usize>,
    pub name_index_limit: u32,
    pub startup_query: Option<String>,
    pub browse_preview: bool,
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.into(),
            page_size: DEFAULT_PAGE_SIZE,
            cache_capacity: None,
            name_index_limit: DEFAULT_NAME_INDEX_LIMIT,
            startup_query: Some("pikachu".into()),
            browse_preview: false,
            log_filter: "info".into(),
        }
    }
}

impl Settings {
    pub fn controller_config(&self) -> ControllerConfig {
        ControllerConfig {
            page_size: self.page_size,
            name_index_limit: self.name_index_limit,
            browse_preview: self.browse_preview,
            cache_capacity: self.cache_capacity,
        }
    }

    fn apply(&mut self, key: &str, value: &str) {
        let value = value.trim();
        match key {
            "api_base_url" => self.api_base_url = value.to_string(),
            "page_size" => match value.parse::<usize>() {
                Ok(parsed) if parsed > 0 => self.page_size = parsed,
                _ => warn!("config: ignoring invalid page_size={value}"),
            },
            "cache_capacity" => match value {
                "" | "0" | "unbounded" => self.cache_capacity = None,
                _ => match value.parse::<usize>() {
                    Ok(parsed) => self.cache_capacity = Some(parsed),
                    Err(_) => warn!("config: ignoring invalid cache_capacity={value}"),
                },
            },
            "name_index_limit" => match value.parse::<u32>() {
                Ok(parsed) => self.name_index_limit = parsed,
                Err(_) => warn!("config: ignoring invalid name_index_limit={value}"),
            },
            "startup_query" => {
                self.startup_query = (!value.is_empty()).then(|| value.to_string());
            }
            "browse_preview" => match parse_flag(value) {
                Some(flag) => self.browse_preview = flag,
                None => warn!("config: ignoring invalid browse_preview={value}"),
            },
            "log_filter" => self.log_filter = value.to_string(),
            other => warn!("config: ignoring unknown key {other}"),
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Environment variables checked for each key, later names winning.
const ENV_KEYS: &[(&str, &[&str])] = &[
    ("api_base_url", &["DEX_API_BASE_URL", "APP__API_BASE_URL"]),
    ("page_size", &["APP__PAGE_SIZE"]),
    ("cache_capacity", &["APP__CACHE_CAPACITY"]),
    ("name_index_limit", &["APP__NAME_INDEX_LIMIT"]),
    ("startup_query", &["APP__STARTUP_QUERY"]),
    ("browse_preview", &["APP__BROWSE_PREVIEW"]),
    ("log_filter", &["APP__LOG_FILTER"]),
];

pub fn load_settings(path: Option<&Path>) -> Settings {
    load_settings_with(path.unwrap_or(Path::new(SETTINGS_FILE)), |name| {
        std::env::var(name).ok()
    })
}

/// Defaults, then the flat key/value file at `path` if readable, then `env`.
pub fn load_settings_with(path: &Path, env: impl Fn(&str) -> Option<String>) -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string(path) {
        match toml::from_str::<toml::Table>(&raw) {
            Ok(table) => {
                for (key, value) in &table {
                    let value = match value {
                        toml::Value::String(text) => text.clone(),
                        other => other.to_string(),
                    };
                    settings.apply(key, &value);
                }
            }
            Err(err) => warn!("config: ignoring unreadable {} err={err}", path.display()),
        }
    }

    for (key, names) in ENV_KEYS {
        for name in *names {
            if let Some(value) = env(name) {
                settings.apply(key, &value);
            }
        }
    }

    settings
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
