use crate::error::{CvError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Default config file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "cv-gen.toml";

/// Program configuration
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// CV owner's first name, used to recognise the owner in author lists
    pub owner_first_name: String,
    /// CV owner's last name
    pub owner_last_name: String,
    /// Institution reported for students without one
    pub default_institution: String,
    /// How many years back CCV output reaches (0 = everything)
    pub ccv_years: i32,
    /// How many years back collaborators are collected
    pub collaborator_years: i32,
    // --- URL checking ---
    pub user_agent: String,
    pub skip_url_prefixes: Vec<String>,
    pub request_timeout_secs: u64,
    /// Log level used when RUST_LOG is not set
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            owner_first_name: "David".to_string(),
            owner_last_name: "Lie".to_string(),
            default_institution: "University of Toronto".to_string(),
            ccv_years: 6,
            collaborator_years: 2,
            user_agent: "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_9_3) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/35.0.1916.47 Safari/537.36".to_string(),
            skip_url_prefixes: vec![
                "mailto".to_string(),
                "https://www.linkedin.com".to_string(),
            ],
            request_timeout_secs: 30,
            log_level: "warn".to_string(),
        }
    }
}

impl Config {
    /// Loads the config file (explicit path, `$CV_GEN_CONFIG`, or `cv-gen.toml` when present)
    /// and applies environment overrides on top.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let from_env = std::env::var("CV_GEN_CONFIG").ok().map(PathBuf::from);
        let base = match explicit.map(Path::to_path_buf).or(from_env) {
            Some(path) => Self::from_file(&path)?,
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    Self::from_file(default_path)?
                } else {
                    Self::default()
                }
            }
        };
        Ok(base.with_env_overrides())
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| CvError::io(path, e))?;
        Self::from_toml_str(&content)
            .map_err(|e| CvError::Config(format!("{}: {}", path.display(), e)))
    }

    pub fn from_toml_str(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    fn with_env_overrides(self) -> Self {
        Self {
            owner_first_name: std::env::var("CV_OWNER_FIRST_NAME").unwrap_or(self.owner_first_name),
            owner_last_name: std::env::var("CV_OWNER_LAST_NAME").unwrap_or(self.owner_last_name),
            default_institution: std::env::var("CV_DEFAULT_INSTITUTION").unwrap_or(self.default_institution),
            ccv_years: std::env::var("CV_CCV_YEARS").ok().and_then(|v| v.parse().ok()).unwrap_or(self.ccv_years),
            collaborator_years: std::env::var("CV_COLLABORATOR_YEARS").ok().and_then(|v| v.parse().ok()).unwrap_or(self.collaborator_years),
            user_agent: std::env::var("CV_USER_AGENT").unwrap_or(self.user_agent),
            request_timeout_secs: std::env::var("CV_REQUEST_TIMEOUT_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(self.request_timeout_secs),
            ..self
        }
    }

    /// "First Last" form of the owner's name
    pub fn owner_name(&self) -> String {
        format!("{} {}", self.owner_first_name, self.owner_last_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = Config::from_toml_str(
            r#"
            owner_first_name = "Ada"
            owner_last_name = "Lovelace"
            ccv_years = 0
            "#,
        )
        .unwrap();
        assert_eq!(config.owner_name(), "Ada Lovelace");
        assert_eq!(config.ccv_years, 0);
        assert_eq!(config.collaborator_years, 2);
        assert_eq!(config.default_institution, "University of Toronto");
        assert_eq!(config.skip_url_prefixes.len(), 2);
    }

    #[test]
    fn bad_toml_is_rejected() {
        assert!(Config::from_toml_str("ccv_years = \"six\"").is_err());
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let err = Config::from_file(Path::new("/nonexistent/cv-gen.toml")).unwrap_err();
        assert!(matches!(err, CvError::Io { .. }));
    }
}
