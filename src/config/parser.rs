use std::path::Path;

use ini::{Ini, ParseOption, Properties};
use serde::{
    Deserialize,
    de::{
        DeserializeOwned,
        value::{Error as ValueError, MapDeserializer},
    },
};
use tracing::{debug, info};

use crate::config::{
    BuildConfig, CheckerConfig, ConfigError, DEFAULT_CREDENTIAL_ENV, DEFAULT_SIGNATURE,
    NotificationConfig, Recipients,
};

const EMAIL_SECTION: &str = "email";
const BUILD_SECTION: &str = "build";

/// Continuation lines are accepted so `maintainers` can span several lines.
fn parse_options() -> ParseOption {
    ParseOption {
        enabled_indented_mutiline_value: true,
        ..ParseOption::default()
    }
}

pub fn load_config(path: &Path) -> Result<CheckerConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound(path.to_path_buf()));
    }

    info!("Loading config file: {}", path.display());
    let ini = Ini::load_from_file_opt(path, parse_options()).map_err(|e| {
        ConfigError::Unreadable {
            path: path.to_path_buf(),
            reason: e.to_string(),
        }
    })?;

    dump_config(&ini);
    config_from_ini(&ini)
}

pub fn load_config_str(content: &str) -> Result<CheckerConfig, ConfigError> {
    let ini = Ini::load_from_str_opt(content, parse_options()).map_err(|e| {
        ConfigError::Unreadable {
            path: "<memory>".into(),
            reason: e.to_string(),
        }
    })?;
    config_from_ini(&ini)
}

fn dump_config(ini: &Ini) {
    for (section, props) in ini.iter() {
        let Some(section) = section else { continue };
        debug!("[{section}]");
        for (key, value) in props.iter() {
            debug!("   {key} : {value}");
        }
    }
}

/// Raw `[email]` keys. Absent keys deserialize to empty strings and are
/// validated afterwards.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
struct EmailSection {
    server: String,
    port: String,
    user: String,
    starttls: String,
    only_maintainers: String,
    maintainers: String,
    default_to: String,
    timeout: String,
    credential_env: String,
    subject_prefix: String,
    signature: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct BuildSection {
    configure: String,
    build: String,
    timeout: String,
}

fn section<T: DeserializeOwned>(props: &Properties, name: &'static str) -> Result<T, ConfigError> {
    T::deserialize(MapDeserializer::<_, ValueError>::new(props.iter())).map_err(|e| {
        ConfigError::Malformed {
            section: name,
            reason: e.to_string(),
        }
    })
}

fn config_from_ini(ini: &Ini) -> Result<CheckerConfig, ConfigError> {
    let email = ini
        .section(Some(EMAIL_SECTION))
        .ok_or(ConfigError::MissingSection(EMAIL_SECTION))?;

    let build = match ini.section(Some(BUILD_SECTION)) {
        Some(props) => parse_build(section(props, BUILD_SECTION)?)?,
        None => BuildConfig::default(),
    };

    Ok(CheckerConfig {
        email: parse_email(section(email, EMAIL_SECTION)?)?,
        build,
    })
}

fn parse_email(raw: EmailSection) -> Result<NotificationConfig, ConfigError> {
    let server = required(&raw.server, "server")?.to_string();
    let port_raw = required(&raw.port, "port")?;
    let port = port_raw
        .parse::<u16>()
        .map_err(|e| ConfigError::InvalidValue {
            key: "port",
            value: port_raw.to_string(),
            reason: e.to_string(),
        })?;
    let user = required(&raw.user, "user")?.to_string();

    let starttls = parse_yes_no("starttls", &raw.starttls, true)?;
    let only_maintainers = parse_yes_no("only-maintainers", &raw.only_maintainers, false)?;

    let recipients = if only_maintainers {
        let list = parse_address_list(required(&raw.maintainers, "maintainers")?);
        if list.is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "maintainers",
                value: String::new(),
                reason: "no address listed".to_string(),
            });
        }
        Recipients::Maintainers(list)
    } else {
        Recipients::DefaultTo(required(&raw.default_to, "default-to")?.to_string())
    };

    Ok(NotificationConfig {
        server,
        port,
        user,
        starttls,
        recipients,
        timeout: optional_secs(&raw.timeout, "timeout")?,
        credential_env: or_default(&raw.credential_env, DEFAULT_CREDENTIAL_ENV),
        subject_prefix: raw.subject_prefix.trim().to_string(),
        signature: or_default(&raw.signature, DEFAULT_SIGNATURE),
    })
}

fn parse_build(raw: BuildSection) -> Result<BuildConfig, ConfigError> {
    let defaults = BuildConfig::default();
    Ok(BuildConfig {
        configure: or_default(&raw.configure, &defaults.configure),
        build: or_default(&raw.build, &defaults.build),
        timeout: optional_secs(&raw.timeout, "timeout")?,
    })
}

fn required<'a>(value: &'a str, key: &'static str) -> Result<&'a str, ConfigError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ConfigError::MissingKey {
            section: EMAIL_SECTION,
            key,
        });
    }
    Ok(value)
}

fn or_default(value: &str, default: &str) -> String {
    match value.trim() {
        "" => default.to_string(),
        v => v.to_string(),
    }
}

fn optional_secs(raw: &str, key: &'static str) -> Result<Option<u64>, ConfigError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    raw.parse::<u64>()
        .map(Some)
        .map_err(|e| ConfigError::InvalidValue {
            key,
            value: raw.to_string(),
            reason: e.to_string(),
        })
}

/// An empty value falls back to `default`.
fn parse_yes_no(key: &'static str, value: &str, default: bool) -> Result<bool, ConfigError> {
    match value.trim() {
        "" => Ok(default),
        "yes" => Ok(true),
        "no" => Ok(false),
        other => Err(ConfigError::InvalidValue {
            key,
            value: other.to_string(),
            reason: "expected `yes` or `no`".to_string(),
        }),
    }
}

/// Addresses may be separated by commas, newlines or both.
pub fn parse_address_list(raw: &str) -> Vec<String> {
    raw.split([',', '\n'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
