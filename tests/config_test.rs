use std::{fs, path::Path};

use core_lib::config::{
    BuildConfig, ConfigError, DEFAULT_CREDENTIAL_ENV, DEFAULT_SIGNATURE, Recipients,
    parser::{load_config, load_config_str},
};
use pretty_assertions::assert_eq;
use tempfile::NamedTempFile;

// Helper function to create a temporary INI config file
fn create_temp_config(content: &str) -> NamedTempFile {
    let file = NamedTempFile::new().unwrap();
    fs::write(file.path(), content).unwrap();
    file
}

#[test]
fn test_load_config_basic() -> anyhow::Result<()> {
    let ini = r#"
[email]
server = smtp.example.com
port = 587
user = checker@example.com
default-to = team@example.com
"#;
    let file = create_temp_config(ini);
    let config = load_config(file.path())?;

    assert_eq!(config.email.server, "smtp.example.com");
    assert_eq!(config.email.port, 587);
    assert_eq!(config.email.user, "checker@example.com");
    assert!(config.email.starttls);
    assert_eq!(
        config.email.recipients,
        Recipients::DefaultTo("team@example.com".to_string())
    );
    assert_eq!(config.email.timeout, None);
    assert_eq!(config.email.credential_env, DEFAULT_CREDENTIAL_ENV);
    assert_eq!(config.email.subject_prefix, "");
    assert_eq!(config.email.signature, DEFAULT_SIGNATURE);
    assert_eq!(config.build, BuildConfig::default());
    Ok(())
}

#[test]
fn test_load_config_only_maintainers_multiline() -> anyhow::Result<()> {
    let ini = "[email]
server = smtp.example.com
port = 25
user = checker@example.com
starttls = no
only-maintainers = yes
maintainers = alice@example.com,
    bob@example.com,
    carol@example.com
default-to = ignored@example.com
";
    let config = load_config_str(ini)?;

    assert!(!config.email.starttls);
    assert_eq!(
        config.email.recipients,
        Recipients::Maintainers(vec![
            "alice@example.com".to_string(),
            "bob@example.com".to_string(),
            "carol@example.com".to_string(),
        ])
    );
    assert_eq!(
        config.email.recipients.resolve(),
        vec!["alice@example.com", "bob@example.com", "carol@example.com"]
    );
    Ok(())
}

#[test]
fn test_only_maintainers_no_uses_default_to() -> anyhow::Result<()> {
    let ini = "[email]
server = smtp.example.com
port = 25
user = checker@example.com
only-maintainers = no
maintainers = alice@example.com
default-to = team@example.com
";
    let config = load_config_str(ini)?;
    assert_eq!(config.email.recipients.resolve(), vec!["team@example.com"]);
    Ok(())
}

#[test]
fn test_load_config_build_section_and_extras() -> anyhow::Result<()> {
    let ini = "[email]
server = smtp.example.com
port = 465
user = checker@example.com
default-to = team@example.com
timeout = 30
credential-env = CHECKER_SMTP_PASSWORD
subject-prefix = [nightly]
signature = The Build Bot

[build]
configure = ./configure --enable-debug
build = make -j4
timeout = 600
";
    let config = load_config_str(ini)?;

    assert_eq!(config.email.timeout, Some(30));
    assert_eq!(config.email.credential_env, "CHECKER_SMTP_PASSWORD");
    assert_eq!(config.email.subject_prefix, "[nightly]");
    assert_eq!(config.email.signature, "The Build Bot");
    assert_eq!(config.build.configure, "./configure --enable-debug");
    assert_eq!(config.build.build, "make -j4");
    assert_eq!(config.build.timeout, Some(600));

    let steps = config.build.steps();
    assert_eq!(steps.configure.cmd, "./configure --enable-debug");
    assert_eq!(steps.build.name, "build");
    Ok(())
}

#[test]
fn test_load_config_missing_file() {
    let result = load_config(Path::new("nonexistent.ini"));
    assert!(matches!(result, Err(ConfigError::NotFound(_))));
}

#[test]
fn test_load_config_missing_section() {
    let result = load_config_str("[other]\nkey = value\n");
    assert!(matches!(result, Err(ConfigError::MissingSection("email"))));
}

#[test]
fn test_load_config_missing_required_key() {
    let ini = "[email]
server = smtp.example.com
user = checker@example.com
default-to = team@example.com
";
    let result = load_config_str(ini);
    assert!(matches!(
        result,
        Err(ConfigError::MissingKey { key: "port", .. })
    ));
}

#[test]
fn test_load_config_missing_default_to() {
    let ini = "[email]
server = smtp.example.com
port = 25
user = checker@example.com
";
    let result = load_config_str(ini);
    assert!(matches!(
        result,
        Err(ConfigError::MissingKey {
            key: "default-to",
            ..
        })
    ));
}

#[test]
fn test_load_config_only_maintainers_without_list() {
    let ini = "[email]
server = smtp.example.com
port = 25
user = checker@example.com
only-maintainers = yes
default-to = team@example.com
";
    let result = load_config_str(ini);
    assert!(matches!(
        result,
        Err(ConfigError::MissingKey {
            key: "maintainers",
            ..
        })
    ));
}

#[test]
fn test_load_config_invalid_values() {
    let bad_port = "[email]
server = smtp.example.com
port = smtp
user = checker@example.com
default-to = team@example.com
";
    assert!(matches!(
        load_config_str(bad_port),
        Err(ConfigError::InvalidValue { key: "port", .. })
    ));

    let bad_starttls = "[email]
server = smtp.example.com
port = 25
user = checker@example.com
starttls = maybe
default-to = team@example.com
";
    assert!(matches!(
        load_config_str(bad_starttls),
        Err(ConfigError::InvalidValue {
            key: "starttls",
            ..
        })
    ));
}
