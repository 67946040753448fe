use std::fs;
use std::time::Duration;
use strato::config::{Config, ProviderMode};
use tempfile::tempdir;

fn write_config(contents: &str) -> (tempfile::TempDir, String) {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, contents).unwrap();
    (dir, path.to_string_lossy().into_owned())
}

#[test]
fn test_empty_file_yields_defaults() {
    let (_dir, path) = write_config("");
    let config = Config::from_file(&path).unwrap();
    assert_eq!(config.host, "127.0.0.1");
    assert_eq!(config.port, 8000);
    assert_eq!(config.log_level, "info");
    assert_eq!(config.auth.token_ttl, Duration::from_secs(30 * 60));
    assert_eq!(config.provider.mode, ProviderMode::Memory);
    assert!(!config.metrics.enabled);
    assert_eq!(config.metrics.port, 8878);
}

#[test]
fn test_full_config_parses() {
    let (_dir, path) = write_config(
        r#"
host = "0.0.0.0"
port = 9000
log_level = "debug"

[auth]
users_file = "people.toml"
token_ttl = "15m"

[provider]
mode = "http"
base_url = "http://provider.internal:7777"
wait_timeout = "3m"

[metrics]
enabled = true
port = 9100
"#,
    );
    let config = Config::from_file(&path).unwrap();
    assert_eq!(config.host, "0.0.0.0");
    assert_eq!(config.port, 9000);
    assert_eq!(config.auth.users_file, "people.toml");
    assert_eq!(config.auth.token_ttl, Duration::from_secs(15 * 60));
    assert_eq!(config.provider.mode, ProviderMode::Http);
    assert_eq!(
        config.provider.base_url.unwrap().as_str(),
        "http://provider.internal:7777/"
    );
    assert_eq!(config.provider.wait_timeout, Duration::from_secs(180));
    assert!(config.metrics.enabled);
    assert_eq!(config.metrics.port, 9100);
}

#[test]
fn test_http_mode_requires_base_url() {
    let (_dir, path) = write_config("[provider]\nmode = \"http\"\n");
    let err = Config::from_file(&path).unwrap_err();
    assert!(err.to_string().contains("base_url"));
}

#[test]
fn test_zero_port_is_rejected() {
    let (_dir, path) = write_config("port = 0\n");
    assert!(Config::from_file(&path).is_err());
}

#[test]
fn test_zero_token_ttl_is_rejected() {
    let (_dir, path) = write_config("[auth]\ntoken_ttl = \"0s\"\n");
    assert!(Config::from_file(&path).is_err());
}

#[test]
fn test_metrics_port_cannot_collide_with_server_port() {
    let (_dir, path) = write_config("port = 8000\n[metrics]\nenabled = true\nport = 8000\n");
    let err = Config::from_file(&path).unwrap_err();
    assert!(err.to_string().contains("metrics.port"));
}

#[test]
fn test_missing_file_reports_the_path() {
    let err = Config::from_file("/nonexistent/config.toml").unwrap_err();
    assert!(err.to_string().contains("/nonexistent/config.toml"));
}

#[test]
fn test_token_secret_is_trimmed_and_must_be_nonempty() {
    let dir = tempdir().unwrap();
    let secret_path = dir.path().join("token_secret");

    fs::write(&secret_path, "  s3cret \n").unwrap();
    let mut config = Config::default();
    config.auth.token_secret_file = secret_path.to_string_lossy().into_owned();
    assert_eq!(config.load_token_secret().unwrap(), b"s3cret");

    fs::write(&secret_path, "\n \n").unwrap();
    assert!(config.load_token_secret().is_err());
}
