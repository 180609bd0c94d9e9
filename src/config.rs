use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::authorize::ClientCredentials;

pub const DEFAULT_CONFIG_PATH: &str = "spanalyze.config";
pub const DOTENV_PATH: &str = ".env";

const CLIENT_ID_VAR: &str = "SPOTIFY_CLIENT_ID";
const CLIENT_SECRET_VAR: &str = "SPOTIFY_CLIENT_SECRET";
const LASTFM_CLIENT_ID_VAR: &str = "LASTFM_CLIENT_ID";
/// Accepted in place of `LASTFM_CLIENT_ID`.
const LASTFM_API_KEY_VAR: &str = "LASTFM_API_KEY";

/// On-disk JSON form. Every field may be left out and supplied through the
/// environment instead.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct SpanalyzeConfigFile {
    client_id: Option<String>,
    client_secret: Option<String>,
    lastfm_api_key: Option<String>,
}

#[derive(Debug, Clone)]
pub struct SpanalyzeConfig {
    client_id: String,
    client_secret: String,
    lastfm_api_key: String,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid config file: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid .env file: {0}")]
    Dotenv(#[from] dotenvy::Error),
    #[error("Missing {field}; set it in the config file or via {env_var}.")]
    MissingCredential {
        field: &'static str,
        env_var: &'static str,
    },
}

impl SpanalyzeConfigFile {
    /// Reads the config file; a missing file yields an empty config.
    pub fn read(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!("No config file at {}, using environment only", path.display());
                Ok(SpanalyzeConfigFile::default())
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Overrides fields with the values `lookup` returns for the credential
    /// environment variables.
    pub fn with_env(self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let lookup = |var: &str| lookup(var).filter(|value| !value.trim().is_empty());
        SpanalyzeConfigFile {
            client_id: lookup(CLIENT_ID_VAR).or(self.client_id),
            client_secret: lookup(CLIENT_SECRET_VAR).or(self.client_secret),
            lastfm_api_key: lookup(LASTFM_CLIENT_ID_VAR)
                .or_else(|| lookup(LASTFM_API_KEY_VAR))
                .or(self.lastfm_api_key),
        }
    }
}

impl TryFrom<SpanalyzeConfigFile> for SpanalyzeConfig {
    type Error = ConfigError;

    fn try_from(file_config: SpanalyzeConfigFile) -> Result<Self, Self::Error> {
        let required = |value: Option<String>, field, env_var| {
            value.ok_or(ConfigError::MissingCredential { field, env_var })
        };
        Ok(SpanalyzeConfig {
            client_id: required(file_config.client_id, "client_id", CLIENT_ID_VAR)?,
            client_secret: required(
                file_config.client_secret,
                "client_secret",
                CLIENT_SECRET_VAR,
            )?,
            lastfm_api_key: required(
                file_config.lastfm_api_key,
                "lastfm_api_key",
                LASTFM_CLIENT_ID_VAR,
            )?,
        })
    }
}

/// Reads `KEY=value` pairs from a dotenv file without touching the process
/// environment. A missing file yields no pairs.
pub fn read_dotenv(path: &Path) -> Result<HashMap<String, String>, ConfigError> {
    let iter = match dotenvy::from_path_iter(path) {
        Ok(iter) => iter,
        Err(err) if err.not_found() => return Ok(HashMap::new()),
        Err(err) => return Err(err.into()),
    };
    let vars = iter.collect::<Result<HashMap<_, _>, _>>()?;
    debug!("Read {} variables from {}", vars.len(), path.display());
    Ok(vars)
}

impl SpanalyzeConfig {
    /// Merges the config file, the `.env` file in the working directory and
    /// the process environment. The process environment wins over `.env`,
    /// which wins over the config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let dotenv = read_dotenv(Path::new(DOTENV_PATH))?;
        SpanalyzeConfigFile::read(path)?
            .with_env(|var| std::env::var(var).ok().or_else(|| dotenv.get(var).cloned()))
            .try_into()
    }

    pub fn client_credentials(&self) -> ClientCredentials {
        ClientCredentials::new(self.client_id.as_str(), self.client_secret.as_str())
    }

    pub fn lastfm_api_key(&self) -> &str {
        &self.lastfm_api_key
    }
}
