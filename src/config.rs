use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing::warn;

const CONFIG_DIR: &str = ".club-payment-report";
const CONFIG_FILE: &str = "config.json";

/// Saved upstream credentials. The club id is always persisted; the bearer
/// token only when the user explicitly asks, since it grants full account
/// access until it expires.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Credentials {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bearer_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub club_id: Option<String>,
}

/// On-disk configuration at `$HOME/.club-payment-report/config.json`.
pub struct Config {
    path: PathBuf,
}

impl Config {
    pub fn new() -> Result<Self> {
        let home = std::env::var_os("HOME").context("HOME is not set")?;

        Ok(Self {
            path: PathBuf::from(home).join(CONFIG_DIR).join(CONFIG_FILE),
        })
    }

    /// Uses an explicit file path instead of the home directory default.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Loads saved credentials. A missing or unreadable file loads as empty
    /// with a warning rather than failing the run.
    pub fn load(&self) -> Credentials {
        if !self.path.exists() {
            return Credentials::default();
        }

        match fs::read_to_string(&self.path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(credentials) => credentials,
                Err(error) => {
                    warn!("Could not parse config file {}: {error}", self.path.display());
                    Credentials::default()
                }
            },
            Err(error) => {
                warn!("Could not read config file {}: {error}", self.path.display());
                Credentials::default()
            }
        }
    }

    /// Persists credentials, dropping the bearer token unless `save_token`
    /// is set. The file is created owner-readable only.
    pub fn save(&self, credentials: &Credentials, save_token: bool) -> Result<()> {
        let mut to_save = credentials.clone();
        if !save_token {
            to_save.bearer_token = None;
        }

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("could not create config directory {}", parent.display()))?;
        }

        let contents = serde_json::to_string_pretty(&to_save)?;
        fs::write(&self.path, contents)
            .with_context(|| format!("could not write config file {}", self.path.display()))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&self.path, fs::Permissions::from_mode(0o600))?;
        }

        Ok(())
    }

    /// Deletes the config file. Returns whether anything existed to delete.
    pub fn reset(&self) -> Result<bool> {
        if !self.path.exists() {
            return Ok(false);
        }

        fs::remove_file(&self.path)
            .with_context(|| format!("could not remove config file {}", self.path.display()))?;

        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::{Config, Credentials};
    use anyhow::Result;
    use tempfile::TempDir;

    #[test]
    fn test_config_load_defaults_when_file_is_missing_or_corrupt() -> Result<()> {
        let dir = TempDir::new()?;
        let config = Config::at(dir.path().join("config.json"));

        let credentials = config.load();
        assert!(credentials.bearer_token.is_none());
        assert!(credentials.club_id.is_none());

        std::fs::write(dir.path().join("config.json"), "{not json")?;
        let credentials = config.load();
        assert!(credentials.club_id.is_none());

        Ok(())
    }

    #[test]
    fn test_config_save_persists_club_id_but_not_token_by_default() -> Result<()> {
        let dir = TempDir::new()?;
        let config = Config::at(dir.path().join("nested").join("config.json"));

        let credentials = Credentials {
            bearer_token: Some("secret".to_string()),
            club_id: Some("club-1".to_string()),
        };

        config.save(&credentials, false)?;
        let loaded = config.load();
        assert_eq!(loaded.club_id.as_deref(), Some("club-1"));
        assert!(loaded.bearer_token.is_none());

        config.save(&credentials, true)?;
        let loaded = config.load();
        assert_eq!(loaded.bearer_token.as_deref(), Some("secret"));

        Ok(())
    }

    #[test]
    fn test_config_reset_reports_whether_file_existed() -> Result<()> {
        let dir = TempDir::new()?;
        let config = Config::at(dir.path().join("config.json"));

        assert!(!config.reset()?);

        config.save(&Credentials::default(), false)?;
        assert!(config.reset()?);
        assert!(!config.reset()?);

        Ok(())
    }
}
