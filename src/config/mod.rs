//! Credential storage for SnapShell
//!
//! A credential is either absent (anonymous) or fully populated: a bearer
//! token plus the API base URL that issued it. It is written wholesale by
//! `snapshell login`, deleted wholesale by `snapshell logout`, and read-only
//! everywhere else. The file is not locked; concurrent invocations racing a
//! login are last-writer-wins.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Stored credential: bearer token plus the issuing API base URL
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// CLI bearer token issued by the snapshot service
    pub token: String,

    /// API base URL the token was issued for
    pub api_url: String,
}

impl AuthConfig {
    /// Get the default credential file path (`~/.snapshell/config.json`)
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or(ConfigError::NoHomeDir)?;
        Ok(home.join(".snapshell").join("config.json"))
    }

    /// Resolve the credential path, preferring an explicit override
    pub fn resolve_path(override_path: Option<&str>) -> Result<PathBuf> {
        match override_path {
            Some(p) => Ok(PathBuf::from(p)),
            None => Self::default_path(),
        }
    }

    /// Load the stored credential, or `None` when no file exists.
    ///
    /// A malformed file is an error: it means a credential file exists but
    /// cannot be trusted, which the user should know about rather than
    /// silently posting anonymously.
    pub fn load(override_path: Option<&str>) -> Result<Option<Self>> {
        let path = Self::resolve_path(override_path)?;
        Self::load_from(&path)
    }

    /// Load a credential from a specific path
    pub fn load_from(path: &Path) -> Result<Option<Self>> {
        let contents = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source: e,
                }
                .into());
            }
        };

        let config: AuthConfig =
            serde_json::from_str(&contents).map_err(|e| ConfigError::Malformed {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;

        if config.token.is_empty() || config.api_url.is_empty() {
            return Err(ConfigError::Malformed {
                path: path.to_path_buf(),
                reason: "token and api_url must both be non-empty".to_string(),
            }
            .into());
        }

        Ok(Some(config))
    }

    /// Save the credential, overwriting any existing one
    pub fn save(&self, override_path: Option<&str>) -> Result<PathBuf> {
        let path = Self::resolve_path(override_path)?;
        self.save_to(&path)?;
        Ok(path)
    }

    /// Save the credential to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let write_err = |e: std::io::Error| ConfigError::Write {
            path: path.to_path_buf(),
            source: e,
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(write_err)?;
        }

        // Pretty-printed so the file stays hand-inspectable
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents).map_err(write_err)?;

        // Token file is a secret: owner-only on Unix
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = std::fs::metadata(path).map_err(write_err)?.permissions();
            perms.set_mode(0o600);
            std::fs::set_permissions(path, perms).map_err(write_err)?;
        }

        Ok(())
    }

    /// Delete the stored credential. Missing file is a success.
    pub fn delete(override_path: Option<&str>) -> Result<PathBuf> {
        let path = Self::resolve_path(override_path)?;
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(path),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(path),
            Err(e) => Err(ConfigError::Write {
                path: path.clone(),
                source: e,
            }
            .into()),
        }
    }
}
