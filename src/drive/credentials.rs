use crate::config::DriveConfig;
use crate::error::{Result, UploadError};
use serde::Deserialize;
use std::fmt;
use std::path::PathBuf;

/// Where the service account key comes from, decided once at start-up.
#[derive(Clone, PartialEq, Eq)]
pub enum CredentialSource {
    /// JSON blob handed over through an environment variable.
    Inline { var: String, json: Option<String> },
    File(PathBuf),
}

// Keeps the key material out of logs.
impl fmt::Debug for CredentialSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialSource::Inline { var, json } => f
                .debug_struct("Inline")
                .field("var", var)
                .field("present", &json.is_some())
                .finish(),
            CredentialSource::File(path) => f.debug_tuple("File").field(path).finish(),
        }
    }
}

#[derive(Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

impl CredentialSource {
    pub fn resolve(config: &DriveConfig) -> Self {
        let automated = std::env::var(&config.automation_flag)
            .map(|value| value == "true")
            .unwrap_or(false);
        Self::select(config, automated, std::env::var(&config.key_env).ok())
    }

    fn select(config: &DriveConfig, automated: bool, json: Option<String>) -> Self {
        if automated {
            CredentialSource::Inline {
                var: config.key_env.clone(),
                json,
            }
        } else {
            CredentialSource::File(PathBuf::from(&config.key_file))
        }
    }

    pub fn describe(&self) -> String {
        match self {
            CredentialSource::Inline { var, .. } => format!("environment variable {}", var),
            CredentialSource::File(path) => format!("key file {}", path.display()),
        }
    }

    pub fn load(&self) -> Result<ServiceAccountKey> {
        let json = match self {
            CredentialSource::Inline { var, json } => json
                .clone()
                .ok_or_else(|| UploadError::Credentials(format!("{} is not set", var)))?,
            CredentialSource::File(path) => std::fs::read_to_string(path).map_err(|e| {
                UploadError::Credentials(format!("cannot read {}: {}", path.display(), e))
            })?,
        };

        let key: ServiceAccountKey = serde_json::from_str(&json)
            .map_err(|e| UploadError::Credentials(format!("malformed key: {}", e)))?;
        if key.client_email.is_empty() || key.private_key.is_empty() {
            return Err(UploadError::Credentials(
                "client_email and private_key are required".to_string(),
            )
            .into());
        }
        Ok(key)
    }
}

fn default_token_uri() -> String {
    "https://oauth2.googleapis.com/token".to_string()
}
