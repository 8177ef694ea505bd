//! Tests for config loading

use serial_test::serial;
use std::io::Write;
use tempfile::NamedTempFile;

use nichepulse::config::{Config, ConfigError};

const ENV_VARS: [&str; 13] = [
    "NICHEPULSE_BIND",
    "NICHEPULSE_CORS",
    "NICHEPULSE_REQUEST_LOGGING",
    "NICHEPULSE_STATIC_DIR",
    "NICHEPULSE_SEED",
    "NICHEPULSE_SNAPSHOT",
    "NICHEPULSE_LOG_LEVEL",
    "NICHEPULSE_LOG_FORMAT",
    "OPENAI_API_KEY",
    "OPENAI_BASE_URL",
    "OPENAI_MODEL",
    "OPENAI_TIMEOUT",
    "OPENAI_TEMPERATURE",
];

fn clear_env() {
    for var in ENV_VARS {
        std::env::remove_var(var);
    }
}

fn write_config(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
#[serial]
fn test_from_env_defaults() {
    clear_env();
    let config = Config::from_env().unwrap();

    assert_eq!(config.server.bind_address.to_string(), "0.0.0.0:5000");
    assert!(config.server.enable_cors);
    assert!(config.store.seed_sample_data);
    assert!(config.store.snapshot_path.is_none());
    assert!(config.openai.api_key.is_none());
    assert_eq!(config.openai.model, "gpt-4o");
}

#[test]
#[serial]
fn test_from_env_overrides() {
    clear_env();
    std::env::set_var("NICHEPULSE_BIND", "127.0.0.1:8080");
    std::env::set_var("NICHEPULSE_CORS", "false");
    std::env::set_var("NICHEPULSE_SEED", "0");
    std::env::set_var("NICHEPULSE_SNAPSHOT", "/tmp/nichepulse.json");
    std::env::set_var("OPENAI_API_KEY", "sk-env-key");
    std::env::set_var("OPENAI_MODEL", "gpt-4o-mini");
    std::env::set_var("OPENAI_TIMEOUT", "30");

    let config = Config::from_env().unwrap();
    clear_env();

    assert_eq!(config.server.bind_address.port(), 8080);
    assert!(!config.server.enable_cors);
    assert!(!config.store.seed_sample_data);
    assert_eq!(
        config.store.snapshot_path.as_deref(),
        Some(std::path::Path::new("/tmp/nichepulse.json"))
    );
    assert_eq!(config.openai.api_key.as_deref(), Some("sk-env-key"));
    assert_eq!(config.openai.model, "gpt-4o-mini");
    assert_eq!(config.openai.timeout_secs, 30);
}

#[test]
#[serial]
fn test_invalid_bind_env() {
    clear_env();
    std::env::set_var("NICHEPULSE_BIND", "localhost");
    let result = Config::from_env();
    clear_env();

    assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
}

#[test]
#[serial]
fn test_from_file() {
    clear_env();
    let file = write_config(
        r#"
        [server]
        bind_address = "127.0.0.1:7000"
        enable_cors = false

        [openai]
        api_key = "sk-file-key"
        temperature = 0.2

        [store]
        seed_sample_data = false

        [logging]
        format = "json"
        "#,
    );

    let config = Config::load(Some(file.path())).unwrap();
    assert_eq!(config.server.bind_address.port(), 7000);
    assert!(!config.server.enable_cors);
    assert_eq!(config.openai.api_key.as_deref(), Some("sk-file-key"));
    assert_eq!(config.openai.temperature, Some(0.2));
    assert!(!config.store.seed_sample_data);
    assert_eq!(config.logging.format, "json");
}

#[test]
#[serial]
fn test_file_falls_back_to_env_key() {
    clear_env();
    std::env::set_var("OPENAI_API_KEY", "sk-from-env");
    let file = write_config("[server]\nenable_request_logging = false\n");

    let config = Config::from_file(file.path()).unwrap();
    clear_env();

    assert_eq!(config.openai.api_key.as_deref(), Some("sk-from-env"));
    assert!(!config.server.enable_request_logging);
}

#[test]
#[serial]
fn test_invalid_file_values() {
    clear_env();
    let file = write_config("[logging]\nformat = \"xml\"\n");
    assert!(matches!(
        Config::load(Some(file.path())),
        Err(ConfigError::InvalidValue { .. })
    ));

    let broken = write_config("[server\nbind_address = 1");
    assert!(matches!(
        Config::from_file(broken.path()),
        Err(ConfigError::Parse { .. })
    ));

    assert!(matches!(
        Config::from_file(std::path::Path::new("/no/such/config.toml")),
        Err(ConfigError::Read { .. })
    ));
}

#[test]
#[serial]
fn test_example_config_is_valid() {
    clear_env();
    let config = Config::load(Some(std::path::Path::new("config.example.toml"))).unwrap();

    assert_eq!(config.server.bind_address.port(), 5000);
    assert_eq!(config.openai.model, "gpt-4o");
    assert!(config.store.snapshot_path.is_none());
}
