use crate::{AppConfig, JwtConfig, VerificationConfig};
use secrecy::Secret;

#[test]
fn test_secret_redaction() {
    let secret = Secret::new("my_signing_secret".to_string());
    let debug_output = format!("{:?}", secret);
    assert!(debug_output.contains("Secret([REDACTED"));
    assert!(!debug_output.contains("my_signing_secret"));
}

#[test]
fn test_config_struct_redaction() {
    let config = JwtConfig {
        secret: Secret::new("hmac-signing-key".to_string()),
        expires_in: 3600,
        refresh_expires_in: 1_209_600,
    };
    let debug_output = format!("{:?}", config);
    assert!(!debug_output.contains("hmac-signing-key"));
    assert!(debug_output.contains("Secret([REDACTED"));
}

#[test]
fn test_verification_defaults() {
    let config = VerificationConfig::default();
    assert_eq!(config.code_ttl_minutes, 5);
    assert_eq!(config.sweep_interval_secs, 300);
}

#[test]
fn test_load_from_toml() {
    figment::Jail::expect_with(|jail| {
        jail.create_dir("config")?;
        jail.create_file(
            "config/default.toml",
            r#"
                app_name = "signet"
                app_env = "development"

                [server]
                host = "127.0.0.1"
                port = 8080

                [jwt]
                secret = "test-secret"

                [telemetry]
                log_level = "debug"

                [email]
                smtp_host = "smtp.example.com"
                smtp_port = 587
                username = "mailer@example.com"
                password = "mail-password"
                from_email = "noreply@example.com"
                from_name = "Signet"

                [[users]]
                username = "alice@example.com"
                password_hash = "$argon2id$v=19$m=19456,t=2,p=1$c2FsdHNhbHQ$AAAA"
                authorities = ["ROLE_USER"]
            "#,
        )?;

        let config = AppConfig::load("config").expect("config should load");
        assert_eq!(config.app_name, "signet");
        assert_eq!(config.server.port, 8080);
        // 未显式配置时取默认值
        assert_eq!(config.jwt.expires_in, 3600);
        assert_eq!(config.jwt.refresh_expires_in, 1_209_600);
        assert_eq!(config.verification.code_ttl_minutes, 5);
        assert_eq!(config.users.len(), 1);
        assert!(config.is_development());
        Ok(())
    });
}
