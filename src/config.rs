use crate::error::{CatalogError, Result};
use crate::flags::ConfiguredFlags;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_ENV: &str = "PLAN_CATALOG_CONFIG";
pub const BIND_ENV: &str = "PLAN_CATALOG_BIND";
pub const DB_ENV: &str = "PLAN_CATALOG_DB";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub flags: ConfiguredFlags,
    #[serde(default)]
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> String {
    "0.0.0.0:3000".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        DatabaseConfig {
            path: default_db_path(),
        }
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from("plan-catalog.db")
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub format: LogFormat,
    /// EnvFilter directives; RUST_LOG takes precedence when set
    pub filter: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(default)]
    pub tokens: Vec<ApiToken>,
}

/// A bearer token accepted by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiToken {
    pub token: String,
    /// User id the token authenticates as
    pub subject: String,
    #[serde(default)]
    pub scopes: Vec<String>,
}

impl AppConfig {
    /// Load configuration.
    ///
    /// Source order: explicit path, then `PLAN_CATALOG_CONFIG`, then built-in
    /// defaults. Environment overrides are applied last.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from));

        let mut config = match path {
            Some(path) => Self::from_file(&path)?,
            None => AppConfig::default(),
        };

        config.apply_env_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            CatalogError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| CatalogError::Config(e.to_string()))
    }

    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(bind) = lookup(BIND_ENV).filter(|v| !v.trim().is_empty()) {
            self.server.bind = bind;
        }

        if let Some(path) = lookup(DB_ENV).filter(|v| !v.trim().is_empty()) {
            self.database.path = PathBuf::from(path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flags::{FeatureFlagEvaluator, RequestContext, BILLING_PLANS_UPGRADE};
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_toml("").unwrap();

        assert_eq!(config.server.bind, "0.0.0.0:3000");
        assert_eq!(config.database.path, PathBuf::from("plan-catalog.db"));
        assert_eq!(config.logging.format, LogFormat::Compact);
        assert!(config.auth.tokens.is_empty());
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_full_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
[server]
bind = "127.0.0.1:8080"

[database]
path = "/var/lib/plans/tax.db"

[logging]
format = "json"
filter = "plan_catalog=debug"

[flags]
billing-plans-upgrade = true

[[auth.tokens]]
token = "secret"
subject = "user-1"
scopes = ["web"]
"#
        )
        .unwrap();
        file.flush().unwrap();

        let config = AppConfig::from_file(file.path()).unwrap();

        assert_eq!(config.server.bind, "127.0.0.1:8080");
        assert_eq!(config.database.path, PathBuf::from("/var/lib/plans/tax.db"));
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.logging.filter.as_deref(), Some("plan_catalog=debug"));
        assert!(config.flags.is_enabled(BILLING_PLANS_UPGRADE, &RequestContext::anonymous()));
        assert_eq!(config.auth.tokens.len(), 1);
        assert_eq!(config.auth.tokens[0].scopes, vec!["web".to_string()]);
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let result = AppConfig::from_file(Path::new("/definitely/not/here.toml"));
        assert!(matches!(result, Err(CatalogError::Config(_))));
    }

    #[test]
    fn test_malformed_toml_is_config_error() {
        let result = AppConfig::from_toml("[server\nbind = 1");
        assert!(matches!(result, Err(CatalogError::Config(_))));
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [(BIND_ENV, "127.0.0.1:9000"), (DB_ENV, "/tmp/x.db")]
            .into_iter()
            .collect();

        let mut config = AppConfig::default();
        config.apply_env_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.server.bind, "127.0.0.1:9000");
        assert_eq!(config.database.path, PathBuf::from("/tmp/x.db"));

        // Blank values are ignored
        let mut untouched = AppConfig::default();
        untouched.apply_env_overrides(|_| Some("  ".to_string()));
        assert_eq!(untouched, AppConfig::default());
    }
}
