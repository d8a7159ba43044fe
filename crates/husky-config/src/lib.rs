//! Configuration management for Husky.
//!
//! All configuration comes from the process environment. Required keys are
//! checked together, so a single diagnostic names every missing key rather
//! than failing on the first one.
//!
//! CLI settings can be applied after loading via [`CliSettings`].
//!
//! ## Keys
//!
//! Required:
//! - `TRELLO_APP_KEY`, `TRELLO_TOKEN` - content provider credentials
//! - `SITE_NAME` - site display name
//! - `SITE_MODE` - `multi` or the type of a single page module
//!
//! Optional:
//! - `PAGE_LIST` - list whose cards become pages (absent: no card pages)
//! - `BLOG_LIST`, `TIMELINE_LIST` - lists backing the built-in modules
//! - `OWNER_NAME`, `OWNER_LINK`
//! - `CUSTOM_CSS_URL`, `CUSTOM_JS_URL`, `CUSTOM_BRAND_URL`,
//!   `CUSTOM_TIMELINE_MARKER_URL`
//! - `HUSKY_ENV` - `development` disables the content cache; `NODE_ENV` is
//!   read when `HUSKY_ENV` is unset
//! - `HOST`, `PORT`, `TRELLO_API_URL`
//! - `TEMPLATES_DIR`, `STATIC_DIR`, `DIST_DIR`
//!
//! Empty values are treated the same as unset ones.

use std::path::PathBuf;

/// Keys that must be present for the server to start.
pub const REQUIRED_KEYS: [&str; 4] = ["TRELLO_APP_KEY", "TRELLO_TOKEN", "SITE_NAME", "SITE_MODE"];

/// Default Trello REST API base URL.
const DEFAULT_TRELLO_API_URL: &str = "https://api.trello.com/1";

/// CLI settings that override environment values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override server host.
    pub host: Option<String>,
    /// Override server port.
    pub port: Option<u16>,
    /// Override development mode.
    pub dev_mode: Option<bool>,
    /// Override templates directory.
    pub templates_dir: Option<PathBuf>,
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server configuration.
    pub server: ServerConfig,
    /// Content provider configuration.
    pub trello: TrelloConfig,
    /// Site presentation configuration.
    pub site: SiteConfig,
    /// Lists backing the built-in page modules.
    pub modules: ModulesConfig,
    /// Asset and template directories.
    pub paths: PathsConfig,
    /// Development mode: every content read bypasses the cache.
    pub dev_mode: bool,
}

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 3000,
        }
    }
}

/// Trello credentials and endpoint.
#[derive(Debug, Clone)]
pub struct TrelloConfig {
    /// REST API base URL.
    pub base_url: String,
    /// Application key.
    pub app_key: String,
    /// User token.
    pub token: String,
}

/// Site presentation configuration.
#[derive(Debug, Clone, Default)]
pub struct SiteConfig {
    /// Site display name.
    pub name: String,
    /// Raw site mode (`multi` or a module type), validated against the
    /// module registry at startup.
    pub mode: String,
    /// Owner display name.
    pub owner_name: Option<String>,
    /// Owner link.
    pub owner_link: Option<String>,
    /// List whose cards are served as pages.
    pub page_list: Option<String>,
    /// Optional branding overrides.
    pub custom: CustomAssets,
}

/// URLs of custom assets injected into every rendered page.
#[derive(Debug, Clone, Default)]
pub struct CustomAssets {
    /// Extra stylesheet.
    pub css: Option<String>,
    /// Extra script.
    pub js: Option<String>,
    /// Brand image.
    pub brand: Option<String>,
    /// Timeline marker image.
    pub timeline_marker: Option<String>,
}

/// Lists backing the built-in page modules.
#[derive(Debug, Clone, Default)]
pub struct ModulesConfig {
    /// Blog posts list.
    pub blog_list: Option<String>,
    /// Timeline entries list.
    pub timeline_list: Option<String>,
}

/// Asset and template directories.
#[derive(Debug, Clone)]
pub struct PathsConfig {
    /// Directory containing `<name>.html` templates.
    pub templates_dir: PathBuf,
    /// Directory served under `/static`.
    pub static_dir: PathBuf,
    /// Directory served under `/dist` (bundled front-end assets).
    pub dist_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            templates_dir: PathBuf::from("templates"),
            static_dir: PathBuf::from("static"),
            dist_dir: PathBuf::from("dist"),
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// One or more required keys are unset.
    #[error("Missing configuration: {}", quote_keys(.0))]
    Missing(Vec<String>),
    /// A key is set to a value that cannot be used.
    #[error("Invalid configuration for '{key}': {message}")]
    InvalidValue {
        /// Environment key.
        key: String,
        /// What is wrong with the value.
        message: String,
    },
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
}

/// Format keys as `'A', 'B'`.
fn quote_keys(keys: &[String]) -> String {
    keys.iter()
        .map(|key| format!("'{key}'"))
        .collect::<Vec<_>>()
        .join(", ")
}

impl Config {
    /// Load configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Missing`] listing every unset required key,
    /// or another variant if a value is malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Missing`] listing every unset required key,
    /// or another variant if a value is malformed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.is_empty());

        let missing: Vec<String> = REQUIRED_KEYS
            .into_iter()
            .filter(|&key| get(key).is_none())
            .map(str::to_owned)
            .collect();
        if !missing.is_empty() {
            return Err(ConfigError::Missing(missing));
        }

        let defaults = ServerConfig::default();
        let port = match get("PORT") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::InvalidValue {
                key: "PORT".to_owned(),
                message: format!("'{raw}' is not a valid port number"),
            })?,
            None => defaults.port,
        };

        let default_paths = PathsConfig::default();
        let path_or = |key: &str, default: PathBuf| get(key).map_or(default, PathBuf::from);

        let config = Self {
            server: ServerConfig {
                host: get("HOST").unwrap_or(defaults.host),
                port,
            },
            trello: TrelloConfig {
                base_url: get("TRELLO_API_URL")
                    .unwrap_or_else(|| DEFAULT_TRELLO_API_URL.to_owned()),
                app_key: get("TRELLO_APP_KEY").unwrap_or_default(),
                token: get("TRELLO_TOKEN").unwrap_or_default(),
            },
            site: SiteConfig {
                name: get("SITE_NAME").unwrap_or_default(),
                mode: get("SITE_MODE").unwrap_or_default(),
                owner_name: get("OWNER_NAME"),
                owner_link: get("OWNER_LINK"),
                page_list: get("PAGE_LIST"),
                custom: CustomAssets {
                    css: get("CUSTOM_CSS_URL"),
                    js: get("CUSTOM_JS_URL"),
                    brand: get("CUSTOM_BRAND_URL"),
                    timeline_marker: get("CUSTOM_TIMELINE_MARKER_URL"),
                },
            },
            modules: ModulesConfig {
                blog_list: get("BLOG_LIST"),
                timeline_list: get("TIMELINE_LIST"),
            },
            paths: PathsConfig {
                templates_dir: path_or("TEMPLATES_DIR", default_paths.templates_dir),
                static_dir: path_or("STATIC_DIR", default_paths.static_dir),
                dist_dir: path_or("DIST_DIR", default_paths.dist_dir),
            },
            dev_mode: get("HUSKY_ENV")
                .or_else(|| get("NODE_ENV"))
                .is_some_and(|env| env == "development"),
        };

        config.validate()?;
        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    pub fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(host) = &settings.host {
            self.server.host.clone_from(host);
        }
        if let Some(port) = settings.port {
            self.server.port = port;
        }
        if let Some(dev_mode) = settings.dev_mode {
            self.dev_mode = dev_mode;
        }
        if let Some(templates_dir) = &settings.templates_dir {
            self.paths.templates_dir.clone_from(templates_dir);
        }
    }

    /// Validate the loaded configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.server.host, "HOST")?;
        if self.server.port == 0 {
            return Err(ConfigError::Validation("PORT cannot be 0".to_owned()));
        }
        require_http_url(&self.trello.base_url, "TRELLO_API_URL")?;
        Ok(())
    }
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require a URL field to use http:// or https:// scheme.
fn require_http_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    Ok(())
}
