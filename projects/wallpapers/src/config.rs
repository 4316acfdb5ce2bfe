//! Settings come from an env file (default `.env`) merged under the process
//! environment. A missing file with missing keys gets a template written in
//! its place so the operator can fill it in and restart.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use interfaces_bing_image_archive::index::DEFAULT_BASE_URL;
use thiserror::Error;
use utils_trace::TraceFormat;

use crate::endpoints::envelope::ErrorStatusPolicy;
use crate::regions::RegionRegistry;

pub const DEFAULT_ENV_FILE: &str = ".env";

pub const TEMPLATE: &str = "\
# Database
DB_HOST=
DB_PORT=
DB_USER=
DB_PASSWORD=
DB_NAME=
# API
API_HOST=
API_PORT=
# Optional
# REGIONS=en-us,zh-cn,ja-jp,de-de,en-gb,es-es,pt-br,en-au,en-ca,fr-fr,en-in,it-it
# ARCHIVE_BASE_URL=https://www.bing.com
# API_ERROR_STATUS=uniform
# LOG_LEVEL=info
# LOG_FORMAT=compact
";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("ReadEnvFile: {path}: {source}")]
    ReadEnvFile {
        path: PathBuf,
        source: dotenvy::Error,
    },
    #[error("WriteTemplate: {path}: {source}")]
    WriteTemplate {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("ConfigMissing: wrote a template to {path}, fill it in and restart")]
    TemplateWritten { path: PathBuf },
    #[error("ConfigMissing: {key} is not set")]
    MissingKey { key: &'static str },
    #[error("InvalidValue: {key}={value}: {reason}")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseSettings {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub name: String,
}

impl DatabaseSettings {
    /// libpq keyword/value connection string, so passwords need no URL escaping.
    pub fn connection_string(&self) -> String {
        format!(
            "host={} port={} user={} password={} dbname={}",
            quote(&self.host),
            self.port,
            quote(&self.user),
            quote(&self.password),
            quote(&self.name),
        )
    }
}

fn quote(value: &str) -> String {
    format!("'{}'", value.replace('\\', "\\\\").replace('\'', "\\'"))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiSettings {
    pub host: String,
    pub port: u16,
}

impl ApiSettings {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub database: DatabaseSettings,
    pub api: Option<ApiSettings>,
    pub regions: RegionRegistry,
    pub archive_base_url: String,
    pub error_status: ErrorStatusPolicy,
    pub log_level: String,
    pub log_format: TraceFormat,
}

impl Settings {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        Self::load_from(path, process_env())
    }

    /// Like [`Settings::load`], with `env` standing in for the process environment.
    pub fn load_from<I>(path: &Path, env: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut vars = HashMap::new();
        let file_exists = path.exists();
        if file_exists {
            let entries = dotenvy::from_path_iter(path).map_err(|source| ConfigError::ReadEnvFile {
                path: path.to_path_buf(),
                source,
            })?;
            for entry in entries {
                let (key, value) = entry.map_err(|source| ConfigError::ReadEnvFile {
                    path: path.to_path_buf(),
                    source,
                })?;
                vars.insert(key, value);
            }
        }
        vars.extend(env);

        match Self::from_vars(&vars) {
            Err(ConfigError::MissingKey { .. }) if !file_exists => {
                std::fs::write(path, TEMPLATE).map_err(|source| ConfigError::WriteTemplate {
                    path: path.to_path_buf(),
                    source,
                })?;
                Err(ConfigError::TemplateWritten { path: path.to_path_buf() })
            }
            other => other,
        }
    }

    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let lookup = |key: &'static str| {
            vars.get(key)
                .map(|value| value.trim())
                .filter(|value| !value.is_empty())
        };
        let required = |key: &'static str| lookup(key).ok_or(ConfigError::MissingKey { key });

        let database = DatabaseSettings {
            host: required("DB_HOST")?.to_string(),
            port: parse_port("DB_PORT", required("DB_PORT")?)?,
            user: required("DB_USER")?.to_string(),
            password: required("DB_PASSWORD")?.to_string(),
            name: required("DB_NAME")?.to_string(),
        };

        let api = match (lookup("API_HOST"), lookup("API_PORT")) {
            (None, None) => None,
            (Some(host), Some(port)) => Some(ApiSettings {
                host: host.to_string(),
                port: parse_port("API_PORT", port)?,
            }),
            (None, Some(_)) => return Err(ConfigError::MissingKey { key: "API_HOST" }),
            (Some(_), None) => return Err(ConfigError::MissingKey { key: "API_PORT" }),
        };

        let regions = match lookup("REGIONS") {
            Some(value) => {
                RegionRegistry::parse_list(value).map_err(|err| invalid("REGIONS", value, err))?
            }
            None => RegionRegistry::default(),
        };

        let error_status = match lookup("API_ERROR_STATUS") {
            Some(value) => value
                .parse::<ErrorStatusPolicy>()
                .map_err(|err| invalid("API_ERROR_STATUS", value, err))?,
            None => ErrorStatusPolicy::default(),
        };

        let log_format = match lookup("LOG_FORMAT") {
            Some(value) => value
                .parse::<TraceFormat>()
                .map_err(|err| invalid("LOG_FORMAT", value, err))?,
            None => TraceFormat::default(),
        };

        Ok(Self {
            database,
            api,
            regions,
            archive_base_url: lookup("ARCHIVE_BASE_URL").unwrap_or(DEFAULT_BASE_URL).to_string(),
            error_status,
            log_level: lookup("LOG_LEVEL").unwrap_or("info").to_string(),
            log_format,
        })
    }

    /// The API binary cannot start without a bind address.
    pub fn require_api(&self) -> Result<&ApiSettings, ConfigError> {
        self.api.as_ref().ok_or(ConfigError::MissingKey { key: "API_HOST" })
    }
}

/// Process environment minus entries that are not valid UTF-8; none of our
/// keys can be spelled that way.
fn process_env() -> impl Iterator<Item = (String, String)> {
    std::env::vars_os()
        .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)))
}

fn parse_port(key: &'static str, value: &str) -> Result<u16, ConfigError> {
    value.parse::<u16>().map_err(|err| invalid(key, value, err))
}

fn invalid(key: &'static str, value: &str, reason: impl std::fmt::Display) -> ConfigError {
    ConfigError::InvalidValue {
        key,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}
