use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// Keys accepted by [`AppConfig::lookup`]
pub const CONFIG_KEYS: &[&str] = &[
    "port",
    "search_url",
    "search_parameters",
    "max_results",
    "db_name",
    "log_file",
    "log_level",
    "show_messages",
    "refresh_db",
    "request_timeout_secs",
];

/// A single search query parameter value.
///
/// Lists are sent as `key=v1+v2`, which is how the search API expects
/// multiple qualifiers in one parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Integer(i64),
    Boolean(bool),
    Text(String),
    List(Vec<String>),
}

impl ParamValue {
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            ParamValue::Integer(n) => Some(*n),
            ParamValue::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    fn to_toml(&self) -> toml::Value {
        match self {
            ParamValue::Integer(n) => toml::Value::Integer(*n),
            ParamValue::Boolean(b) => toml::Value::Boolean(*b),
            ParamValue::Text(s) => toml::Value::String(s.clone()),
            ParamValue::List(items) => toml::Value::Array(
                items.iter().cloned().map(toml::Value::String).collect(),
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub port: u16,
    pub search_url: String,
    pub max_results: u32,
    pub db_name: PathBuf,
    /// `""` in the file means no log file; logs then go to stderr
    #[serde(with = "optional_path")]
    pub log_file: Option<PathBuf>,
    pub log_level: String,
    pub show_messages: bool,
    pub refresh_db: bool,
    pub request_timeout_secs: u64,
    // Tables go last so the TOML writer emits plain keys first
    pub search_parameters: BTreeMap<String, ParamValue>,
}

impl Default for AppConfig {
    fn default() -> Self {
        let mut search_parameters = BTreeMap::new();
        search_parameters.insert(
            "q".to_string(),
            ParamValue::List(vec!["is:public".to_string(), "language:python".to_string()]),
        );
        search_parameters.insert("sort".to_string(), ParamValue::Text("stars".to_string()));
        search_parameters.insert("order".to_string(), ParamValue::Text("desc".to_string()));
        search_parameters.insert("per_page".to_string(), ParamValue::Integer(100));

        Self {
            port: 5000,
            search_url: "https://api.github.com/search/repositories".to_string(),
            max_results: 1000,
            db_name: PathBuf::from("repo_data.db"),
            log_file: Some(PathBuf::from("repo_list.log")),
            log_level: "info".to_string(),
            show_messages: true,
            refresh_db: true,
            request_timeout_secs: 30,
            search_parameters,
        }
    }
}

impl AppConfig {
    /// Load the config file at `path`, falling back to defaults when it does not exist
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);
        if !path.exists() {
            tracing::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&path)?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Page size as configured in `search_parameters.per_page`
    pub fn per_page(&self) -> Option<i64> {
        self.search_parameters.get("per_page").and_then(ParamValue::as_integer)
    }

    /// Look up a single setting by name
    pub fn lookup(&self, key: &str) -> Result<toml::Value> {
        let value = match key {
            "port" => toml::Value::Integer(i64::from(self.port)),
            "search_url" => toml::Value::String(self.search_url.clone()),
            "search_parameters" => toml::Value::Table(
                self.search_parameters
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_toml()))
                    .collect(),
            ),
            "max_results" => toml::Value::Integer(i64::from(self.max_results)),
            "db_name" => toml::Value::String(self.db_name.display().to_string()),
            "log_file" => toml::Value::String(
                self.log_file
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default(),
            ),
            "log_level" => toml::Value::String(self.log_level.clone()),
            "show_messages" => toml::Value::Boolean(self.show_messages),
            "refresh_db" => toml::Value::Boolean(self.refresh_db),
            "request_timeout_secs" => {
                toml::Value::Integer(i64::try_from(self.request_timeout_secs).unwrap_or(i64::MAX))
            }
            other => return Err(Error::UnknownConfigKey(other.to_string())),
        };
        Ok(value)
    }
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from("repocache.toml")
}

pub fn write_config(path: &Path, config: &AppConfig, force: bool) -> Result<()> {
    if path.exists() && !force {
        return Err(Error::InvalidConfig(format!(
            "config already exists at {} (use --force to overwrite)",
            path.display()
        )));
    }

    let contents = toml::to_string_pretty(config)?;
    std::fs::write(path, contents)?;
    Ok(())
}

/// Create the directory a file will live in, if it is missing
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

/// TOML has no null, so an absent path is written and read as an empty string
mod optional_path {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::path::PathBuf;

    pub fn serialize<S: Serializer>(value: &Option<PathBuf>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(path) => serializer.collect_str(&path.display()),
            None => serializer.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<PathBuf>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        if raw.trim().is_empty() {
            Ok(None)
        } else {
            Ok(Some(PathBuf::from(raw)))
        }
    }
}
