use super::*;
use crate::auth::hash_password;
use figment::Jail;

fn valid_settings() -> Settings {
    let mut settings = Settings::default();
    settings.auth.username = "bat".to_string();
    settings.auth.password_hash = hash_password("2005").unwrap();
    settings.auth.signing_secret = "a-long-signing-secret".to_string();
    settings
}

#[test]
fn test_settings_validation() {
    let settings = valid_settings();
    assert!(settings.validate().is_ok());

    let mut invalid = settings.clone();
    invalid.log_level = "loud".to_string();
    assert!(invalid.validate().is_err());

    let mut invalid = settings.clone();
    invalid.auth.username.clear();
    assert!(invalid.validate().is_err());

    let mut invalid = settings.clone();
    invalid.auth.password_hash = "2005".to_string();
    assert!(invalid.validate().is_err());

    let mut invalid = settings.clone();
    invalid.auth.signing_secret.clear();
    assert!(invalid.validate().is_err());

    let mut invalid = settings.clone();
    invalid.auth.session_ttl_secs = 0;
    assert!(invalid.validate().is_err());

    let mut invalid = settings.clone();
    invalid.auth.cookie_name = "bad name;".to_string();
    assert!(invalid.validate().is_err());

    let mut invalid = settings;
    invalid.storage.max_upload_bytes = 0;
    assert!(invalid.validate().is_err());
}

#[test]
fn test_defaults_match_deployment() {
    let settings = Settings::default();
    assert_eq!(settings.bind_addr.to_string(), "127.0.0.1:3000");
    assert_eq!(settings.auth.session_ttl_secs, 86_400);
    assert_eq!(settings.auth.cookie_name, "batcloud_token");
    assert!(settings.auth.secure_cookie);
    assert_eq!(settings.storage.max_upload_bytes, 100 * 1024 * 1024);
}

#[test]
fn test_debug_redacts_secrets() {
    let settings = valid_settings();
    let rendered = format!("{settings:?}");
    assert!(!rendered.contains("a-long-signing-secret"));
    assert!(!rendered.contains(&settings.auth.password_hash));
    assert!(rendered.contains("bat"));
}

#[test]
fn test_load_settings_layers() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "batcloud.toml",
            r#"
            log_level = "debug"

            [storage]
            root = "files"

            [auth]
            username = "from-file"
            session_ttl_secs = 3600
            "#,
        )?;
        jail.set_env("BATCLOUD_LOG_LEVEL", "warn");
        jail.set_env("BATCLOUD_AUTH__COOKIE_NAME", "sid");

        let settings = load_settings(None).map_err(|e| e.to_string())?;
        assert_eq!(settings.log_level, "warn");
        assert_eq!(settings.storage.root, PathBuf::from("files"));
        assert_eq!(settings.auth.username, "from-file");
        assert_eq!(settings.auth.session_ttl_secs, 3600);
        assert_eq!(settings.auth.cookie_name, "sid");
        Ok(())
    });
}

#[test]
fn test_load_settings_legacy_env_names() {
    Jail::expect_with(|jail| {
        jail.set_env("MY_USERNAME", "bat");
        jail.set_env("MY_PASSWORD_HASH", "$scrypt$ln=4,r=8,p=1$c2FsdHNhbHQ$aGFzaA");
        jail.set_env("JWT_SECRET", "shh");

        let settings = load_settings(None).map_err(|e| e.to_string())?;
        assert_eq!(settings.auth.username, "bat");
        assert_eq!(settings.auth.password_hash, "$scrypt$ln=4,r=8,p=1$c2FsdHNhbHQ$aGFzaA");
        assert_eq!(settings.auth.signing_secret, "shh");

        // Prefixed variables take precedence over the legacy names.
        jail.set_env("BATCLOUD_AUTH__USERNAME", "override");
        let settings = load_settings(None).map_err(|e| e.to_string())?;
        assert_eq!(settings.auth.username, "override");
        Ok(())
    });
}

#[test]
fn test_credential_env_values_stay_strings() {
    Jail::expect_with(|jail| {
        jail.set_env("MY_USERNAME", "2005");
        jail.set_env("JWT_SECRET", "0123456789");
        jail.set_env("BATCLOUD_AUTH__PASSWORD_HASH", "true");
        jail.set_env("BATCLOUD_AUTH__SESSION_TTL_SECS", "60");

        let settings = load_settings(None).map_err(|e| e.to_string())?;
        assert_eq!(settings.auth.username, "2005");
        assert_eq!(settings.auth.signing_secret, "0123456789");
        assert_eq!(settings.auth.password_hash, "true");
        assert_eq!(settings.auth.session_ttl_secs, 60);

        jail.set_env("BATCLOUD_AUTH__SIGNING_SECRET", "false");
        jail.set_env("BATCLOUD_AUTH__USERNAME", "1.5");
        let settings = load_settings(None).map_err(|e| e.to_string())?;
        assert_eq!(settings.auth.signing_secret, "false");
        assert_eq!(settings.auth.username, "1.5");
        Ok(())
    });
}

#[test]
fn test_bcrypt_hash_is_accepted() {
    let mut settings = valid_settings();
    settings.auth.password_hash =
        "$2a$05$CCCCCCCCCCCCCCCCCCCCC.E5YPO9kmyuRGyh0XouQYb4YMJKvyOeW".to_string();
    assert!(settings.validate().is_ok());

    settings.auth.password_hash = "$2a$05$tooshort".to_string();
    assert!(settings.validate().is_err());
}

#[test]
fn test_load_settings_missing_explicit_file() {
    Jail::expect_with(|_jail| {
        assert!(load_settings(Some(Path::new("nope.toml"))).is_err());
        Ok(())
    });
}

#[test]
fn test_credentials_from_settings() {
    let settings = valid_settings();
    let credentials = settings.credentials();
    assert_eq!(credentials.username(), "bat");
    assert_eq!(credentials.password_hash(), settings.auth.password_hash);
    assert_eq!(credentials.signing_secret(), b"a-long-signing-secret");
}
