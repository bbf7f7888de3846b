use std::io::Write;

use serial_test::serial;

use crate::config::AppConfig;

fn clear_env() {
    for (key, _) in std::env::vars() {
        if key.starts_with(common::config::ENV_PREFIX) {
            std::env::remove_var(key);
        }
    }
}

#[test]
#[serial]
fn test_defaults() {
    clear_env();

    let config: AppConfig = common::config::parse("/tmp/does-not-exist").expect("failed to parse config");
    assert_eq!(config, AppConfig::default());
    assert_eq!(config.api.bind_address.port(), 4000);
    assert_eq!(config.redis.addresses, vec!["localhost:6379".to_string()]);
}

#[test]
#[serial]
fn test_env_overrides() {
    clear_env();

    std::env::set_var("MERI_API__BIND_ADDRESS", "127.0.0.1:5555");
    std::env::set_var("MERI_LOGGING__LEVEL", "debug");
    std::env::set_var("MERI_MEDIA__NAME", "clips");

    let config: AppConfig = common::config::parse("/tmp/does-not-exist").expect("failed to parse config");
    assert_eq!(config.api.bind_address.to_string(), "127.0.0.1:5555");
    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.media.name, "clips");

    clear_env();
}

#[test]
#[serial]
fn test_config_file() {
    clear_env();

    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let path = dir.path().join("config.toml");
    let mut file = std::fs::File::create(&path).expect("failed to create config file");
    writeln!(
        file,
        r#"
[api]
bind_address = "127.0.0.1:9999"
max_upload_size = 1024

[flights]
timeout_ms = 2500
"#
    )
    .expect("failed to write config file");

    let config: AppConfig =
        common::config::parse(path.to_str().expect("path is not utf8")).expect("failed to parse config");
    assert_eq!(config.api.bind_address.to_string(), "127.0.0.1:9999");
    assert_eq!(config.api.max_upload_size, 1024);
    assert_eq!(config.flights.timeout_ms, 2500);
    // everything else falls back to defaults
    assert_eq!(config.redis, crate::config::AppConfig::default().redis);
}

#[test]
#[serial]
fn test_env_beats_file() {
    clear_env();

    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[logging]\nlevel = \"warn\"\n").expect("failed to write config file");

    std::env::set_var("MERI_LOGGING__LEVEL", "trace");

    let config: AppConfig =
        common::config::parse(path.to_str().expect("path is not utf8")).expect("failed to parse config");
    assert_eq!(config.logging.level, "trace");

    clear_env();
}
