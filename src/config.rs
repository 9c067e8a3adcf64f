//! Settings for the CLI and MCP binaries.
//!
//! Credentials live in `<config_dir>/clickup-tools/config.yaml`:
//!
//! ```yaml
//! api_token: pk_...
//! workspace_id: "12345678"
//! ```
//!
//! `CLICKUP_API_TOKEN` and `CLICKUP_WORKSPACE_ID` override the file.

use crate::client::Credentials;
use crate::error::Result;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Directory under the platform config dir.
pub const CONFIG_DIR: &str = "clickup-tools";

/// Settings file name.
pub const CONFIG_FILE: &str = "config.yaml";

/// Environment variable overriding the API token.
pub const TOKEN_ENV: &str = "CLICKUP_API_TOKEN";

/// Environment variable overriding the default workspace.
pub const WORKSPACE_ENV: &str = "CLICKUP_WORKSPACE_ID";

/// Integration settings.
#[derive(Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Settings {
    /// Personal API token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_token: Option<String>,

    /// Default workspace (team) ID. An unquoted number is accepted.
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "scalar_string")]
    pub workspace_id: Option<String>,
}

fn scalar_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<serde_yaml::Value>::deserialize(deserializer)? {
        None | Some(serde_yaml::Value::Null) => Ok(None),
        Some(serde_yaml::Value::String(s)) => Ok(Some(s)),
        Some(serde_yaml::Value::Number(n)) => Ok(Some(n.to_string())),
        Some(_) => Err(D::Error::custom("expected a string or number")),
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("api_token", &self.api_token.as_ref().map(|_| "<redacted>"))
            .field("workspace_id", &self.workspace_id)
            .finish()
    }
}

impl Settings {
    /// The default settings file, if the platform has a config dir.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(CONFIG_DIR).join(CONFIG_FILE))
    }

    /// Load settings from `path` (or the default location) and apply
    /// environment overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let settings = match path.map(Path::to_path_buf).or_else(Self::default_path) {
            Some(path) => Self::load_from(&path)?,
            None => Self::default(),
        };
        Ok(settings.with_env())
    }

    /// Load settings from a file. A missing file yields empty settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no settings file");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let settings: Self = serde_yaml::from_str(&content)?;
        Ok(settings)
    }

    /// Save settings to a file, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Apply `CLICKUP_API_TOKEN` / `CLICKUP_WORKSPACE_ID`.
    #[must_use]
    pub fn with_env(self) -> Self {
        self.with_overrides(std::env::var(TOKEN_ENV).ok(), std::env::var(WORKSPACE_ENV).ok())
    }

    /// Replace fields with non-empty override values.
    #[must_use]
    pub fn with_overrides(mut self, api_token: Option<String>, workspace_id: Option<String>) -> Self {
        if let Some(token) = api_token.filter(|t| !t.is_empty()) {
            self.api_token = Some(token);
        }
        if let Some(workspace) = workspace_id.filter(|w| !w.is_empty()) {
            self.workspace_id = Some(workspace);
        }
        self
    }

    /// Credentials for the client. Missing values become empty.
    #[must_use]
    pub fn credentials(&self) -> Credentials {
        Credentials::new(self.api_token.clone().unwrap_or_default(), self.workspace_id.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use tempfile::TempDir;

    fn settings_path(dir: &TempDir) -> PathBuf {
        dir.path().join(CONFIG_DIR).join(CONFIG_FILE)
    }

    #[test]
    fn test_settings_default() {
        let settings = Settings::default();
        assert!(settings.api_token.is_none());
        assert!(settings.workspace_id.is_none());
        assert_eq!(settings.credentials(), Credentials::default());
    }

    #[test]
    fn test_load_missing_file() {
        let dir = TempDir::new().unwrap();
        let settings = Settings::load_from(&settings_path(&dir)).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = settings_path(&dir);
        let settings =
            Settings { api_token: Some("pk_1".to_string()), workspace_id: Some("999".to_string()) };
        settings.save_to(&path).unwrap();

        assert_eq!(Settings::load_from(&path).unwrap(), settings);
    }

    #[test]
    fn test_yaml_format() {
        let dir = TempDir::new().unwrap();
        let path = settings_path(&dir);
        Settings { api_token: Some("pk_1".to_string()), workspace_id: None }.save_to(&path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("api_token: pk_1"));
        assert!(!content.contains("workspace_id"));
    }

    #[test]
    fn test_unquoted_workspace_id() {
        let dir = TempDir::new().unwrap();
        let path = settings_path(&dir);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "api_token: pk_1\nworkspace_id: 12345678\n").unwrap();

        let settings = Settings::load_from(&path).unwrap();
        assert_eq!(settings.workspace_id.as_deref(), Some("12345678"));
    }

    #[test]
    fn test_malformed_file() {
        let dir = TempDir::new().unwrap();
        let path = settings_path(&dir);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "workspace_id: [1, 2]\n").unwrap();

        let err = Settings::load_from(&path).unwrap_err();
        assert!(matches!(err, Error::Yaml(_)));
    }

    #[test]
    fn test_empty_file_is_default() {
        let dir = TempDir::new().unwrap();
        let path = settings_path(&dir);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "\n").unwrap();

        assert_eq!(Settings::load_from(&path).unwrap(), Settings::default());
    }

    #[test]
    fn test_overrides_skip_empty_values() {
        let settings = Settings { api_token: Some("pk_file".to_string()), workspace_id: None }
            .with_overrides(Some(String::new()), Some("42".to_string()));
        assert_eq!(settings.api_token.as_deref(), Some("pk_file"));
        assert_eq!(settings.workspace_id.as_deref(), Some("42"));
    }

    #[serial_test::serial]
    #[test]
    fn test_env_overrides_file() {
        let dir = TempDir::new().unwrap();
        let path = settings_path(&dir);
        Settings { api_token: Some("pk_file".to_string()), workspace_id: Some("1".to_string()) }
            .save_to(&path)
            .unwrap();

        std::env::set_var(TOKEN_ENV, "pk_env");
        std::env::remove_var(WORKSPACE_ENV);
        let settings = Settings::load(Some(&path));
        std::env::remove_var(TOKEN_ENV);

        let settings = settings.unwrap();
        assert_eq!(settings.api_token.as_deref(), Some("pk_env"));
        assert_eq!(settings.workspace_id.as_deref(), Some("1"));
        assert_eq!(settings.credentials(), Credentials::new("pk_env", Some("1")));
    }

    #[test]
    fn test_debug_redacts_token() {
        let settings = Settings { api_token: Some("pk_secret".to_string()), workspace_id: None };
        assert!(!format!("{settings:?}").contains("pk_secret"));
    }
}
