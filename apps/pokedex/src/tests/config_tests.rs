use std::{
    collections::HashMap,
    env, fs,
    path::PathBuf,
    time::{SystemTime, UNIX_EPOCH},
};

use super::*;

fn temp_settings_file(label: &str, contents: &str) -> PathBuf {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let temp_root = env::temp_dir().join(format!("pokedex_config_{label}_{suffix}"));
    fs::create_dir_all(&temp_root).expect("temp root");
    let path = temp_root.join(SETTINGS_FILE);
    fs::write(&path, contents).expect("write settings");
    path
}

fn no_env(_: &str) -> Option<String> {
    None
}

#[test]
fn missing_file_and_env_yield_defaults() {
    let settings = load_settings_with(Path::new("/nonexistent/pokedex.toml"), no_env);
    assert_eq!(settings, Settings::default());
    assert_eq!(settings.api_base_url, "https://pokeapi.co/api/v2");
    assert_eq!(settings.startup_query.as_deref(), Some("pikachu"));
}

#[test]
fn file_values_override_defaults() {
    let path = temp_settings_file(
        "file",
        r#"
api_base_url = "http://localhost:8000/api/v2"
page_size = 12
cache_capacity = "500"
browse_preview = true
startup_query = ""
"#,
    );

    let settings = load_settings_with(&path, no_env);

    assert_eq!(settings.api_base_url, "http://localhost:8000/api/v2");
    assert_eq!(settings.page_size, 12);
    assert_eq!(settings.cache_capacity, Some(500));
    assert!(settings.browse_preview);
    assert_eq!(settings.startup_query, None);

    fs::remove_dir_all(path.parent().expect("parent")).expect("cleanup");
}

#[test]
fn env_overrides_file_and_app_prefix_wins() {
    let path = temp_settings_file("env", "page_size = 12\n");
    let env_values: HashMap<&str, &str> = [
        ("DEX_API_BASE_URL", "http://first.test"),
        ("APP__API_BASE_URL", "http://second.test"),
        ("APP__PAGE_SIZE", "30"),
        ("APP__CACHE_CAPACITY", "unbounded"),
    ]
    .into_iter()
    .collect();

    let settings = load_settings_with(&path, |name| {
        env_values.get(name).map(|value| value.to_string())
    });

    assert_eq!(settings.api_base_url, "http://second.test");
    assert_eq!(settings.page_size, 30);
    assert_eq!(settings.cache_capacity, None);

    fs::remove_dir_all(path.parent().expect("parent")).expect("cleanup");
}

#[test]
fn invalid_values_are_ignored() {
    let settings = load_settings_with(Path::new("/nonexistent/pokedex.toml"), |name| {
        match name {
            "APP__PAGE_SIZE" => Some("0".to_string()),
            "APP__NAME_INDEX_LIMIT" => Some("lots".to_string()),
            "APP__BROWSE_PREVIEW" => Some("maybe".to_string()),
            _ => None,
        }
    });
    assert_eq!(settings, Settings::default());
}

#[test]
fn unreadable_file_falls_back_to_defaults() {
    let path = temp_settings_file("broken", "this is = = not toml");
    assert_eq!(load_settings_with(&path, no_env), Settings::default());
    fs::remove_dir_all(path.parent().expect("parent")).expect("cleanup");
}

#[test]
fn controller_config_mirrors_settings() {
    let settings = Settings {
        page_size: 8,
        cache_capacity: Some(64),
        browse_preview: true,
        ..Settings::default()
    };
    let config = settings.controller_config();
    assert_eq!(config.page_size, 8);
    assert_eq!(config.cache_capacity, Some(64));
    assert!(config.browse_preview);
    assert_eq!(config.name_index_limit, 20_000);
}
