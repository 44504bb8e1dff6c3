use ratehub::config::{AppConfig, Env};
use serial_test::serial;
use std::env;

#[test]
fn default_config_is_safe_for_tests() {
    let config = AppConfig::default();
    assert_eq!(config.env, Env::Local);
    assert!(!config.has_smtp());
    assert_eq!(config.token_ttl_seconds, 86_400);
    assert!(!config.jwt_secret.is_empty());
}

#[test]
fn has_smtp_requires_host_and_credentials() {
    let mut config = AppConfig::default();
    config.smtp_host = Some("smtp.example.com".to_string());
    assert!(!config.has_smtp());

    config.smtp_username = Some("mailer".to_string());
    config.smtp_password = Some("hunter2".to_string());
    assert!(config.has_smtp());
}

#[test]
#[serial]
fn load_reads_local_environment() {
    // Env mutation is process-wide; #[serial] keeps these tests exclusive.
    unsafe {
        env::set_var("APP_ENV", "local");
        env::set_var("DATABASE_URL", "postgres://u:p@localhost:5432/ratehub");
        env::set_var("TOKEN_TTL_SECONDS", "3600");
        env::remove_var("JWT_SECRET");
        env::remove_var("SMTP_HOST");
    }

    let config = AppConfig::load();
    assert_eq!(config.env, Env::Local);
    assert_eq!(config.db_url, "postgres://u:p@localhost:5432/ratehub");
    assert_eq!(config.token_ttl_seconds, 3600);
    // Local falls back to the development secret when none is set.
    assert!(!config.jwt_secret.is_empty());
    assert!(!config.has_smtp());
}

#[test]
#[serial]
fn load_picks_up_smtp_settings() {
    unsafe {
        env::set_var("APP_ENV", "local");
        env::set_var("DATABASE_URL", "postgres://u:p@localhost:5432/ratehub");
        env::set_var("SMTP_HOST", "smtp.example.com");
        env::set_var("SMTP_USERNAME", "mailer");
        env::set_var("SMTP_PASSWORD", "hunter2");
        env::set_var("SMTP_PORT", "2525");
    }

    let config = AppConfig::load();
    assert!(config.has_smtp());
    assert_eq!(config.smtp_port, 2525);

    unsafe {
        env::remove_var("SMTP_HOST");
        env::remove_var("SMTP_USERNAME");
        env::remove_var("SMTP_PASSWORD");
        env::remove_var("SMTP_PORT");
    }
}
