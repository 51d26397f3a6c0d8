use intelplat::config::Config;
use intelplat::error::ConfigError;
use std::io::Write;
use std::time::Duration;

#[test]
fn full_config_parses() {
    let toml = r#"db_path = "sqlite:///var/lib/intelplat/platform.db"
auth_db_path = "sqlite:///var/lib/intelplat/users.db"

[assistant]
api_key = "abc"
model = "gemini-2.5-pro"
endpoint = "http://localhost:8080/v1beta/"
timeout_secs = 5
max_retries = 0
retry_delay_ms = 250
"#;
    let cfg = Config::from_toml(toml).unwrap();
    assert_eq!(cfg.auth_db_path(), "sqlite:///var/lib/intelplat/users.db");
    let assistant = cfg.assistant.unwrap();
    assert_eq!(assistant.model, "gemini-2.5-pro");
    assert_eq!(assistant.timeout(), Duration::from_secs(5));
    assert_eq!(assistant.max_retries, 0);
    assert_eq!(assistant.retry_delay_ms, 250);
}

#[test]
fn env_placeholder_is_expanded() {
    // Only read by this test.
    unsafe { std::env::set_var("INTELPLAT_TEST_GEMINI_KEY", "from-env") };
    let cfg = Config::from_toml("[assistant]\napi_key = \"$ENV{INTELPLAT_TEST_GEMINI_KEY}\"\n")
        .unwrap();
    assert_eq!(cfg.assistant.unwrap().api_key, "from-env");
}

#[test]
fn from_file_reads_placeholders_too() {
    let mut secret = tempfile::NamedTempFile::new().unwrap();
    writeln!(secret, "file-key").unwrap();
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[assistant]").unwrap();
    writeln!(file, "api_key = \"$FILE{{{}}}\"", secret.path().display()).unwrap();

    let cfg = Config::from_file(file.path().to_str().unwrap()).unwrap();
    assert_eq!(cfg.assistant.unwrap().api_key, "file-key");
}

#[test]
fn missing_secret_file_is_reported() {
    let err = Config::from_toml("[assistant]\napi_key = \"$FILE{/nonexistent/key}\"\n").unwrap_err();
    assert!(matches!(err, ConfigError::FileNotFound(path) if path == "/nonexistent/key"));
}

#[test]
fn malformed_toml_is_invalid() {
    let err = Config::from_toml("db_path = [").unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));
}

#[test]
fn zero_timeout_rejected() {
    let err = Config::from_toml("[assistant]\napi_key = \"k\"\ntimeout_secs = 0\n").unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));
}
