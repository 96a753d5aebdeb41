//! Configuration for the docship pipeline.
//!
//! Parses `docship.toml` with serde, auto-discovering the file in parent
//! directories, and owns the ordered version registry (see [`registry`]).
//! CLI flags can override loaded values via [`CliSettings`].
//!
//! The registry and the config are constructed once at CLI startup and
//! passed by reference into every component; no component re-reads either.

mod registry;

pub use registry::{VersionEntry, VersionRegistry};

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "docship.toml";

/// Registry filename used when the config does not name one.
const DEFAULT_REGISTRY: &str = "versions.json";

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override the public site URL prefix.
    pub url_prefix: Option<String>,
    /// Override the search engine base URL.
    pub search_url: Option<String>,
    /// Override the search index name.
    pub index: Option<String>,
    /// Override the version registry path.
    pub registry: Option<PathBuf>,
}

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Published-site configuration.
    pub site: SiteConfig,
    /// Search engine configuration.
    pub search: SearchConfig,
    /// Deploy-gate configuration (environment variable names).
    pub deploy: DeployConfig,
    /// Version registry path as written in TOML (relative to the config).
    registry: Option<String>,

    /// Resolved registry path (set after loading).
    #[serde(skip)]
    pub registry_path: PathBuf,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Published-site configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Public URL prefix of the published site (absolute redirect mode).
    pub url_prefix: String,
    /// URL of the documentation repository (clone and publish target).
    pub repo_url: Option<String>,
    /// Branch the merged site is published to.
    pub hosting_branch: String,
    /// Branch that gates deployment.
    pub main_branch: String,
    /// Branch-name prefix identifying versions of the current major series.
    pub series_prefix: String,
    /// Files in the hosting working tree that a publish never removes.
    pub protected_files: Vec<String>,
    /// Historical slug kept alive with redirect pages (e.g. "en/latest").
    pub legacy_slug: Option<String>,
    /// Slug the legacy slug redirects to (e.g. "1").
    pub legacy_target: Option<String>,
    /// Bare-major alias of the first registry entry (e.g. "2" for "2.0").
    pub major_alias: Option<String>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            url_prefix: "http://localhost:8000".to_owned(),
            repo_url: None,
            hosting_branch: "gh-pages".to_owned(),
            main_branch: "master".to_owned(),
            series_prefix: "release/2".to_owned(),
            protected_files: vec![".git".to_owned(), "CNAME".to_owned()],
            legacy_slug: None,
            legacy_target: None,
            major_alias: None,
        }
    }
}

/// Search engine configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Search engine base URL.
    pub base_url: String,
    /// Index name documents are loaded into.
    pub index: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:9200".to_owned(),
            index: "docs".to_owned(),
        }
    }
}

/// Deploy-gate configuration: which environment variables gate publishing.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DeployConfig {
    /// Variable holding the branch the CI build runs for.
    pub branch_var: String,
    /// Variable that is `"false"` for non-pull-request builds.
    pub pull_request_var: String,
    /// Variable holding the publish credential.
    pub token_var: String,
}

impl Default for DeployConfig {
    fn default() -> Self {
        Self {
            branch_var: "BRANCH_NAME".to_owned(),
            pull_request_var: "PULL_REQUEST".to_owned(),
            token_var: "DEPLOY_TOKEN".to_owned(),
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// JSON parsing error (version registry).
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    /// Validation error.
    #[error("configuration error: {0}")]
    Validation(String),
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

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file. Otherwise,
    /// searches for `docship.toml` in the current directory and parents.
    /// CLI settings are applied after loading and path resolution.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicit `config_path` doesn't exist or
    /// parsing/validation fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        Ok(config)
    }

    /// Load the version registry named by this configuration.
    pub fn load_registry(&self) -> Result<VersionRegistry, ConfigError> {
        VersionRegistry::load(&self.registry_path)
    }

    /// Repository URL, required by the sources and deploy commands.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` when `site.repo_url` is unset.
    pub fn require_repo_url(&self) -> Result<&str, ConfigError> {
        let url = self.site.repo_url.as_deref().ok_or_else(|| {
            ConfigError::Validation("site.repo_url required in config".to_owned())
        })?;
        require_http_url(url, "site.repo_url")?;
        Ok(url)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(url_prefix) = &settings.url_prefix {
            self.site.url_prefix.clone_from(url_prefix);
        }
        if let Some(search_url) = &settings.search_url {
            self.search.base_url.clone_from(search_url);
        }
        if let Some(index) = &settings.index {
            self.search.index.clone_from(index);
        }
        if let Some(registry) = &settings.registry {
            self.registry_path.clone_from(registry);
        }
    }

    /// Search for the config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        Self {
            site: SiteConfig::default(),
            search: SearchConfig::default(),
            deploy: DeployConfig::default(),
            registry: None,
            registry_path: base.join(DEFAULT_REGISTRY),
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.registry_path = config_dir.join(config.registry.as_deref().unwrap_or(DEFAULT_REGISTRY));
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.site.url_prefix, "site.url_prefix")?;
        require_http_url(&self.site.url_prefix, "site.url_prefix")?;
        require_non_empty(&self.site.hosting_branch, "site.hosting_branch")?;
        require_non_empty(&self.site.main_branch, "site.main_branch")?;

        require_non_empty(&self.search.base_url, "search.base_url")?;
        require_http_url(&self.search.base_url, "search.base_url")?;
        require_non_empty(&self.search.index, "search.index")?;

        require_non_empty(&self.deploy.branch_var, "deploy.branch_var")?;
        require_non_empty(&self.deploy.pull_request_var, "deploy.pull_request_var")?;
        require_non_empty(&self.deploy.token_var, "deploy.token_var")?;

        Ok(())
    }
}
