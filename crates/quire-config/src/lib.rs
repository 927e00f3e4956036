//! Configuration management for Quire.
//!
//! Parses `quire.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! Embedding applications can apply [`ConfigOverrides`] during load.
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `site.base_url`
//! - `api.endpoint`
//! - `api.token`

mod expand;

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct ConfigOverrides {
    /// Override API endpoint.
    pub endpoint: Option<String>,
    /// Override API token.
    pub token: Option<String>,
    /// Override published site URL.
    pub base_url: Option<String>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "quire.toml";

/// Default API endpoint.
const DEFAULT_ENDPOINT: &str = "https://api.quire.dev/v1";

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Site identity (optional section, required for API access).
    pub site: Option<SiteConfig>,
    /// API client configuration.
    pub api: ApiConfig,
    /// Rendering configuration.
    pub render: RenderConfig,

    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Site identity and published location.
#[derive(Debug, Deserialize)]
pub struct SiteConfig {
    /// Organization identifier.
    pub org_id: String,
    /// Site identifier.
    pub site_id: String,
    /// Site-space the site is currently browsed in.
    #[serde(default)]
    pub site_space_id: Option<String>,
    /// Absolute URL the site is published under.
    pub base_url: String,
}

impl SiteConfig {
    /// Validate that all required fields are properly set.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any field is empty or has invalid format.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.org_id, "site.org_id")?;
        require_non_empty(&self.site_id, "site.site_id")?;
        if let Some(ref site_space_id) = self.site_space_id {
            require_non_empty(site_space_id, "site.site_space_id")?;
        }
        require_non_empty(&self.base_url, "site.base_url")?;
        require_http_url(&self.base_url, "site.base_url")?;
        Ok(())
    }
}

/// API client configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// API base URL.
    pub endpoint: String,
    /// Bearer token.
    pub token: Option<String>,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_owned(),
            token: None,
            timeout_secs: 30,
        }
    }
}

/// Rendering configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// CSS class applied to the rendered answer body.
    pub answer_style: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            answer_style: "space-y-5".to_owned(),
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`api.token`").
        field: String,
        /// Error message (e.g., "${`QUIRE_TOKEN`} not set").
        message: String,
    },
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
    /// Load configuration from file with optional overrides.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `quire.toml` in current directory and parents.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails,
    /// or the result does not validate.
    pub fn load(
        config_path: Option<&Path>,
        overrides: Option<&ConfigOverrides>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default()
        };

        if let Some(overrides) = overrides {
            config.apply_overrides(overrides);
            config.validate()?;
        }

        Ok(config)
    }

    /// Get validated site configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if the section is missing or invalid.
    pub fn require_site(&self) -> Result<&SiteConfig, ConfigError> {
        let site = self
            .site
            .as_ref()
            .ok_or_else(|| ConfigError::Validation("[site] section required in config".into()))?;
        site.validate()?;
        Ok(site)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(ref site) = self.site {
            site.validate()?;
        }
        self.validate_api()?;
        Ok(())
    }

    /// Validate API configuration.
    fn validate_api(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.api.endpoint, "api.endpoint")?;
        require_http_url(&self.api.endpoint, "api.endpoint")?;
        if let Some(ref token) = self.api.token {
            require_non_empty(token, "api.token")?;
        }
        if self.api.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "api.timeout_secs must be greater than 0".to_owned(),
            ));
        }
        Ok(())
    }

    /// Apply overrides to the configuration.
    fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(endpoint) = &overrides.endpoint {
            self.api.endpoint.clone_from(endpoint);
        }
        if let Some(token) = &overrides.token {
            self.api.token = Some(token.clone());
        }
        if let Some(base_url) = &overrides.base_url
            && let Some(ref mut site) = self.site
        {
            site.base_url.clone_from(base_url);
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let current = std::env::current_dir().ok()?;
        Self::discover_from(&current)
    }

    /// Search for config file starting at `start` and walking up.
    fn discover_from(start: &Path) -> Option<PathBuf> {
        let mut current = start.to_path_buf();
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

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        config.expand_env_vars()?;
        config.config_path = Some(path.to_path_buf());
        config.validate()?;

        Ok(config)
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        if let Some(ref mut site) = self.site {
            site.base_url = expand::expand_env(&site.base_url, "site.base_url")?;
        }

        self.api.endpoint = expand::expand_env(&self.api.endpoint, "api.endpoint")?;
        if let Some(ref token) = self.api.token {
            self.api.token = Some(expand::expand_env(token, "api.token")?);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const SITE_TOML: &str = r#"
[site]
org_id = "org-1"
site_id = "site-1"
base_url = "https://docs.example.com"
"#;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert!(config.site.is_none());
        assert_eq!(config.api.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.api.timeout_secs, 30);
        assert!(config.api.token.is_none());
        assert_eq!(config.render.answer_style, "space-y-5");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_minimal_config() {
        let config: Config = toml::from_str("").unwrap();

        assert!(config.site.is_none());
        assert_eq!(config.api.endpoint, DEFAULT_ENDPOINT);
    }

    #[test]
    fn test_parse_site_config() {
        let config: Config = toml::from_str(SITE_TOML).unwrap();

        let site = config.require_site().unwrap();
        assert_eq!(site.org_id, "org-1");
        assert_eq!(site.site_id, "site-1");
        assert!(site.site_space_id.is_none());
        assert_eq!(site.base_url, "https://docs.example.com");
    }

    #[test]
    fn test_parse_api_and_render_config() {
        let toml = r#"
[api]
endpoint = "https://api.example.com/v1"
token = "token123"
timeout_secs = 5

[render]
answer_style = "answer"
"#;
        let config: Config = toml::from_str(toml).unwrap();

        assert_eq!(config.api.endpoint, "https://api.example.com/v1");
        assert_eq!(config.api.token.as_deref(), Some("token123"));
        assert_eq!(config.api.timeout_secs, 5);
        assert_eq!(config.render.answer_style, "answer");
    }

    #[test]
    fn test_require_site_missing_section() {
        let config = Config::default();

        let err = config.require_site().unwrap_err();

        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("[site]"));
    }

    #[test]
    fn test_validate_rejects_non_http_base_url() {
        let toml = r#"
[site]
org_id = "org-1"
site_id = "site-1"
base_url = "docs.example.com"
"#;
        let config: Config = toml::from_str(toml).unwrap();

        let err = config.validate().unwrap_err();

        assert!(err.to_string().contains("site.base_url"));
    }

    #[test]
    fn test_validate_rejects_empty_org() {
        let toml = r#"
[site]
org_id = ""
site_id = "site-1"
base_url = "https://docs.example.com"
"#;
        let config: Config = toml::from_str(toml).unwrap();

        let err = config.validate().unwrap_err();

        assert!(err.to_string().contains("site.org_id cannot be empty"));
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let config: Config = toml::from_str("[api]\ntimeout_secs = 0\n").unwrap();

        let err = config.validate().unwrap_err();

        assert!(err.to_string().contains("api.timeout_secs"));
    }

    #[test]
    fn test_apply_overrides() {
        let mut config: Config = toml::from_str(SITE_TOML).unwrap();
        let overrides = ConfigOverrides {
            endpoint: Some("http://localhost:8080".to_owned()),
            token: Some("override".to_owned()),
            base_url: Some("http://localhost:3000".to_owned()),
        };

        config.apply_overrides(&overrides);

        assert_eq!(config.api.endpoint, "http://localhost:8080");
        assert_eq!(config.api.token.as_deref(), Some("override"));
        assert_eq!(
            config.site.as_ref().unwrap().base_url,
            "http://localhost:3000"
        );
    }

    #[test]
    fn test_apply_overrides_keeps_unset_fields() {
        let mut config = Config::default();

        config.apply_overrides(&ConfigOverrides::default());

        assert_eq!(config.api.endpoint, DEFAULT_ENDPOINT);
        assert!(config.site.is_none());
    }

    #[test]
    fn test_load_explicit_missing_file() {
        let result = Config::load(Some(Path::new("/nonexistent/quire.toml")), None);

        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_load_from_file_expands_env() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(
            &path,
            r#"
[site]
org_id = "org-1"
site_id = "site-1"
base_url = "https://docs.example.com"

[api]
token = "${QUIRE_CONFIG_TEST_TOKEN:-fallback}"
"#,
        )
        .unwrap();

        let config = Config::load(Some(&path), None).unwrap();

        assert_eq!(config.api.token.as_deref(), Some("fallback"));
        assert_eq!(config.config_path, Some(path));
    }

    #[test]
    fn test_load_invalid_file_fails_validation() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "[api]\nendpoint = \"ftp://example.com\"\n").unwrap();

        let result = Config::load(Some(&path), None);

        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_discover_from_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a/b");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(dir.path().join(CONFIG_FILENAME), SITE_TOML).unwrap();

        let discovered = Config::discover_from(&nested);

        assert_eq!(discovered, Some(dir.path().join(CONFIG_FILENAME)));
    }
}
