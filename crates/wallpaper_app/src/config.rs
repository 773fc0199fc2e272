//! RON configuration for the `wallpaper` binary.
//!
//! ```ron
//! (
//!     storage: "",
//!     collections: ["wallpapers", "wallpaper"],
//!     mode: Search(queries: ["1920x1080", "2560x1440"]),
//!     credentials: (
//!         client_id: "...",
//!         client_secret: "...",
//!         username: "...",
//!         password: "...",
//!     ),
//! )
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use wallpaper_core::{FetchMode, DEFAULT_PAGE_LIMIT};
use wallpaper_engine::{user_agent_for, ApiSettings, Credentials, FetchSettings};

/// Directory created under the storage root.
pub const HOME_DIR_NAME: &str = "wallpaper-server";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config {path:?}: {message}")]
    Parse { path: PathBuf, message: String },
    #[error("invalid config: {0}")]
    Invalid(String),
    #[error("no home directory found; set `storage` in the config")]
    NoHome,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub enum ModeConfig {
    #[default]
    Browse,
    Search { queries: Vec<String> },
}

#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct CredentialsConfig {
    pub client_id: String,
    pub client_secret: String,
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for CredentialsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialsConfig")
            .field("client_id", &self.client_id)
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub auth_base: String,
    pub oauth_base: String,
    /// Empty means `wallpaper_server/0.1 by /u/<credentials.username>`.
    pub user_agent: String,
    pub page_limit: usize,
}

impl Default for ApiConfig {
    fn default() -> Self {
        let defaults = ApiSettings::default();
        Self {
            auth_base: defaults.auth_base,
            oauth_base: defaults.oauth_base,
            user_agent: String::new(),
            page_limit: DEFAULT_PAGE_LIMIT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DownloadConfig {
    pub concurrency: usize,
    pub append_extension: bool,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub max_bytes: u64,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        let defaults = FetchSettings::default();
        Self {
            concurrency: 8,
            append_extension: false,
            connect_timeout_secs: defaults.connect_timeout.as_secs(),
            request_timeout_secs: defaults.request_timeout.as_secs(),
            max_bytes: defaults.max_bytes,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub storage: String,
    pub collections: Vec<String>,
    #[serde(default)]
    pub mode: ModeConfig,
    pub credentials: CredentialsConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub download: DownloadConfig,
    #[serde(default = "default_fetch_concurrency")]
    pub fetch_concurrency: usize,
}

fn default_fetch_concurrency() -> usize {
    4
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::parse(&text).map_err(|err| match err {
            ConfigError::Parse { message, .. } => ConfigError::Parse {
                path: path.to_path_buf(),
                message,
            },
            other => other,
        })?;
        Ok(config)
    }

    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = ron::from_str(text).map_err(|err| ConfigError::Parse {
            path: PathBuf::new(),
            message: err.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.collections.is_empty() {
            return Err(ConfigError::Invalid("no collections configured".into()));
        }
        if let Some(bad) = self.collections.iter().find(|name| !is_valid_collection(name)) {
            return Err(ConfigError::Invalid(format!(
                "collection name {bad:?} cannot be used as a directory"
            )));
        }
        if let ModeConfig::Search { queries } = &self.mode {
            if queries.iter().all(|query| query.trim().is_empty()) {
                return Err(ConfigError::Invalid("search mode needs at least one query".into()));
            }
        }
        if self.api.page_limit == 0 {
            return Err(ConfigError::Invalid("page_limit must be positive".into()));
        }
        Ok(())
    }

    /// Working home: `<storage or user home>/wallpaper-server`.
    pub fn home(&self) -> Result<PathBuf, ConfigError> {
        let root = if self.storage.trim().is_empty() {
            dirs::home_dir().ok_or(ConfigError::NoHome)?
        } else {
            PathBuf::from(&self.storage)
        };
        Ok(root.join(HOME_DIR_NAME))
    }

    /// One fetch mode per pipeline invocation, in configured order.
    pub fn fetch_modes(&self) -> Vec<FetchMode> {
        match &self.mode {
            ModeConfig::Browse => vec![FetchMode::Browse],
            ModeConfig::Search { queries } => queries
                .iter()
                .map(|query| query.trim())
                .filter(|query| !query.is_empty())
                .map(|query| FetchMode::Search {
                    query: query.to_string(),
                })
                .collect(),
        }
    }

    pub fn credentials(&self) -> Credentials {
        Credentials {
            client_id: self.credentials.client_id.clone(),
            client_secret: self.credentials.client_secret.clone(),
            username: self.credentials.username.clone(),
            password: self.credentials.password.clone(),
        }
    }

    /// Configured `User-Agent`, or one naming the account owner.
    pub fn user_agent(&self) -> String {
        let configured = self.api.user_agent.trim();
        if configured.is_empty() {
            user_agent_for(&self.credentials.username)
        } else {
            configured.to_string()
        }
    }

    pub fn api_settings(&self) -> ApiSettings {
        ApiSettings {
            auth_base: self.api.auth_base.clone(),
            oauth_base: self.api.oauth_base.clone(),
            user_agent: self.user_agent(),
            page_limit: self.api.page_limit,
        }
    }

    pub fn fetch_settings(&self) -> FetchSettings {
        FetchSettings {
            connect_timeout: Duration::from_secs(self.download.connect_timeout_secs),
            request_timeout: Duration::from_secs(self.download.request_timeout_secs),
            max_bytes: self.download.max_bytes,
            user_agent: Some(self.user_agent()),
            ..FetchSettings::default()
        }
    }
}

fn is_valid_collection(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\'])
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"(
        collections: ["wallpapers"],
        credentials: (client_id: "id", client_secret: "secret", username: "u", password: "p"),
    )"#;

    #[test]
    fn minimal_config_uses_defaults() {
        let config = AppConfig::parse(MINIMAL).unwrap();
        assert_eq!(config.mode, ModeConfig::Browse);
        assert_eq!(config.fetch_modes(), vec![FetchMode::Browse]);
        assert_eq!(config.api.page_limit, 100);
        assert_eq!(config.api.oauth_base, "https://oauth.reddit.com");
        assert_eq!(config.download.concurrency, 8);
        assert!(!config.download.append_extension);
        assert_eq!(config.fetch_concurrency, 4);
    }

    #[test]
    fn search_mode_yields_one_fetch_mode_per_query() {
        let config = AppConfig::parse(
            r#"(
                storage: "/data",
                collections: ["wallpapers", "wallpaper"],
                mode: Search(queries: ["1920x1080", " ", "2560x1440"]),
                credentials: (client_id: "id", client_secret: "secret", username: "u", password: "p"),
                download: (concurrency: 2, append_extension: true),
            )"#,
        )
        .unwrap();

        assert_eq!(
            config.fetch_modes(),
            vec![
                FetchMode::Search {
                    query: "1920x1080".to_string()
                },
                FetchMode::Search {
                    query: "2560x1440".to_string()
                },
            ]
        );
        assert_eq!(config.home().unwrap(), PathBuf::from("/data/wallpaper-server"));
        assert_eq!(config.download.concurrency, 2);
        assert_eq!(config.download.request_timeout_secs, 60);
    }

    #[test]
    fn invalid_configs_are_rejected() {
        let empty = MINIMAL.replace(r#"["wallpapers"]"#, "[]");
        assert!(matches!(AppConfig::parse(&empty), Err(ConfigError::Invalid(_))));

        let traversal = MINIMAL.replace("wallpapers", "../etc");
        assert!(matches!(AppConfig::parse(&traversal), Err(ConfigError::Invalid(_))));

        let no_query = MINIMAL.replace(
            "collections:",
            "mode: Search(queries: []),\n        collections:",
        );
        assert!(matches!(AppConfig::parse(&no_query), Err(ConfigError::Invalid(_))));

        assert!(matches!(
            AppConfig::parse("(collections: [\"a\"])"),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn user_agent_names_the_account_owner_by_default() {
        let config = AppConfig::parse(MINIMAL).unwrap();
        assert_eq!(config.user_agent(), "wallpaper_server/0.1 by /u/u");
        assert_eq!(config.api_settings().user_agent, "wallpaper_server/0.1 by /u/u");
        assert_eq!(
            config.fetch_settings().user_agent.as_deref(),
            Some("wallpaper_server/0.1 by /u/u")
        );

        let custom = MINIMAL.replace(
            "collections:",
            "api: (user_agent: \"desktop-sync/2.0 by /u/owner\"),\n        collections:",
        );
        let config = AppConfig::parse(&custom).unwrap();
        assert_eq!(config.api_settings().user_agent, "desktop-sync/2.0 by /u/owner");
    }

    #[test]
    fn credentials_are_redacted_in_debug_output() {
        let config = AppConfig::parse(MINIMAL).unwrap();
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("secret"));
    }
}
