use heya::config::{AppConfig, StorageBackend};
use serial_test::serial;
use std::env;
use std::fs;

const ENDPOINT: &str = "http://localhost:8000/ask";

// Helper to clear environment variables that might interfere with tests
fn clear_env_vars() {
    unsafe {
        for key in [
            "HEYA_SERVER__PORT",
            "HEYA_SERVER__HOST",
            "HEYA_INFERENCE__ENDPOINT",
            "HEYA_STORAGE__DIR",
            "HEYA_STORAGE__KEY",
            "HEYA_STORAGE__BACKEND",
            "API_URL",
            "HOST",
            "PORT",
            "STORAGE_DIR",
            "STORAGE_BACKEND",
            "CONFIG_FILE",
        ] {
            env::remove_var(key);
        }
    }
}

fn load(args: &[&str]) -> Result<AppConfig, config::ConfigError> {
    let argv = std::iter::once("heya").chain(args.iter().copied());
    AppConfig::load_from_args(argv)
}

#[test]
#[serial]
fn test_default_config() {
    clear_env_vars();

    let config = load(&["--api-url", ENDPOINT]).expect("Failed to load config");
    assert_eq!(config.server.port, 3000);
    assert_eq!(config.server.host, "127.0.0.1");
    assert_eq!(config.storage.backend, StorageBackend::File);
    assert_eq!(config.storage.dir, "data");
    assert_eq!(config.storage.key, "chatHistory");
    assert_eq!(config.inference_settings().endpoint, ENDPOINT);
    assert_eq!(config.bind_address(), "127.0.0.1:3000");
}

#[test]
#[serial]
fn test_missing_endpoint_is_rejected() {
    clear_env_vars();

    let err = load(&[]).unwrap_err();
    assert!(err.to_string().contains("inference.endpoint is required"));
}

#[test]
#[serial]
fn test_invalid_endpoint_is_rejected() {
    clear_env_vars();

    assert!(load(&["--api-url", "not a url"]).is_err());
    assert!(load(&["--api-url", "ftp://example.com/ask"]).is_err());
}

#[test]
#[serial]
fn test_env_override() {
    clear_env_vars();
    unsafe {
        env::set_var("HEYA_SERVER__PORT", "9090");
        env::set_var("HEYA_INFERENCE__ENDPOINT", ENDPOINT);
        env::set_var("HEYA_STORAGE__BACKEND", "memory");
    }

    let config = load(&[]).expect("Failed to load config");
    assert_eq!(config.server.port, 9090);
    assert_eq!(config.inference.endpoint, ENDPOINT);
    assert_eq!(config.storage.backend, StorageBackend::Memory);

    clear_env_vars();
}

#[test]
#[serial]
fn test_api_url_env_is_accepted() {
    clear_env_vars();
    unsafe {
        env::set_var("API_URL", "https://inference.example.com/v1/ask");
    }

    let config = load(&[]).expect("Failed to load config");
    assert_eq!(config.inference.endpoint, "https://inference.example.com/v1/ask");

    clear_env_vars();
}

#[test]
#[serial]
fn test_cli_wins_over_env() {
    clear_env_vars();
    unsafe {
        env::set_var("HEYA_SERVER__PORT", "9090");
    }

    let config = load(&["--api-url", ENDPOINT, "--port", "4000", "--storage-backend", "Memory"])
        .expect("Failed to load config");
    assert_eq!(config.server.port, 4000);
    assert_eq!(config.storage.backend, StorageBackend::Memory);

    clear_env_vars();
}

#[test]
#[serial]
fn test_file_load() {
    clear_env_vars();

    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let file_path = dir.path().join("heya.yaml");
    fs::write(
        &file_path,
        r#"
server:
  port: 7070
inference:
  endpoint: "http://127.0.0.1:9000/answer"
storage:
  key: "savedChat"
"#,
    )
    .expect("Failed to write temp config");

    // Tell AppConfig to use this file via Env Var (mocking CLI arg indirectly)
    unsafe {
        env::set_var("CONFIG_FILE", &file_path);
    }

    let config = load(&[]).expect("Failed to load config from file");
    assert_eq!(config.server.port, 7070);
    assert_eq!(config.inference.endpoint, "http://127.0.0.1:9000/answer");
    assert_eq!(config.storage.key, "savedChat");

    clear_env_vars();
}

#[test]
#[serial]
fn test_explicit_missing_file_is_an_error() {
    clear_env_vars();

    let result = load(&["--config", "does-not-exist.yaml", "--api-url", ENDPOINT]);
    assert!(result.is_err());
}
