//! Provider settings resolution
//!
//! `token`, `host` and `scheme` are looked up in this order, first hit wins:
//!
//! 1. the provider configuration block
//! 2. environment variables `LEASEWEB_TOKEN`, `LEASEWEB_HOST`, `LEASEWEB_SCHEME`
//! 3. the credentials file: `LEASEWEB_CONFIG_PATH`, or
//!    `<config dir>/leaseweb/credentials.yaml`
//!
//! Empty strings count as unset at every level.

pub mod error;

pub use error::*;

use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const ENV_TOKEN: &str = "LEASEWEB_TOKEN";
pub const ENV_HOST: &str = "LEASEWEB_HOST";
pub const ENV_SCHEME: &str = "LEASEWEB_SCHEME";
pub const ENV_CONFIG_PATH: &str = "LEASEWEB_CONFIG_PATH";

pub const DEFAULT_SCHEME: &str = "https";

/// Settings from one source; every field is optional
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Settings {
    pub token: Option<String>,
    pub host: Option<String>,
    pub scheme: Option<String>,
}

impl Settings {
    /// Fill fields unset here from `other`.
    pub fn or(self, other: Settings) -> Settings {
        Settings {
            token: non_empty(self.token).or(non_empty(other.token)),
            host: non_empty(self.host).or(non_empty(other.host)),
            scheme: non_empty(self.scheme).or(non_empty(other.scheme)),
        }
    }

    pub fn from_env() -> Settings {
        Settings {
            token: std::env::var(ENV_TOKEN).ok(),
            host: std::env::var(ENV_HOST).ok(),
            scheme: std::env::var(ENV_SCHEME).ok(),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Fully resolved provider settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    pub token: String,
    /// `None` keeps the SDK default host.
    pub host: Option<String>,
    pub scheme: String,
}

/// Location of the credentials file, if one is configured or the default
/// exists.
pub fn credentials_path() -> Result<Option<PathBuf>> {
    if let Some(path) = non_empty(std::env::var(ENV_CONFIG_PATH).ok()) {
        let path = PathBuf::from(path);
        if !path.exists() {
            return Err(ConfigError::CredentialsFileNotFound(path));
        }
        return Ok(Some(path));
    }

    Ok(dirs::config_dir()
        .map(|dir| dir.join("leaseweb").join("credentials.yaml"))
        .filter(|path| path.exists()))
}

pub fn load_credentials_file(path: &Path) -> Result<Settings> {
    let content = std::fs::read_to_string(path)?;
    if content.trim().is_empty() {
        return Ok(Settings::default());
    }
    serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Resolve explicit settings against the environment and credentials file.
pub fn resolve(explicit: Settings) -> Result<ProviderConfig> {
    let mut settings = explicit.or(Settings::from_env());

    if settings.token.is_none() || settings.host.is_none() || settings.scheme.is_none() {
        if let Some(path) = credentials_path()? {
            debug!(path = %path.display(), "Reading credentials file");
            settings = settings.or(load_credentials_file(&path)?);
        }
    }

    let token = settings.token.ok_or(ConfigError::MissingToken)?;
    let scheme = settings
        .scheme
        .unwrap_or_else(|| DEFAULT_SCHEME.to_string());
    if scheme != "http" && scheme != "https" {
        return Err(ConfigError::InvalidScheme(scheme));
    }

    Ok(ProviderConfig {
        token,
        host: settings.host,
        scheme,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::fs;

    const NO_ENV: [(&str, Option<&str>); 4] = [
        (ENV_TOKEN, None),
        (ENV_HOST, None),
        (ENV_SCHEME, None),
        (ENV_CONFIG_PATH, None),
    ];

    fn explicit(token: &str) -> Settings {
        Settings {
            token: Some(token.to_string()),
            ..Default::default()
        }
    }

    #[test]
    #[serial]
    fn test_explicit_wins() {
        temp_env::with_vars(
            [
                (ENV_TOKEN, Some("from-env")),
                (ENV_HOST, Some("env.example.com")),
                (ENV_SCHEME, None),
                (ENV_CONFIG_PATH, None),
            ],
            || {
                let config = resolve(explicit("from-block")).unwrap();
                assert_eq!(config.token, "from-block");
                assert_eq!(config.host.as_deref(), Some("env.example.com"));
                assert_eq!(config.scheme, "https");
            },
        );
    }

    #[test]
    #[serial]
    fn test_env_fallback() {
        temp_env::with_vars(
            [
                (ENV_TOKEN, Some("from-env")),
                (ENV_HOST, None),
                (ENV_SCHEME, Some("http")),
                (ENV_CONFIG_PATH, None),
            ],
            || {
                let config = resolve(Settings {
                    token: Some(String::new()),
                    ..Default::default()
                })
                .unwrap();
                assert_eq!(config.token, "from-env");
                assert_eq!(config.scheme, "http");
            },
        );
    }

    #[test]
    #[serial]
    fn test_credentials_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("credentials.yaml");
        fs::write(
            &path,
            "token: from-file\nhost: localhost:8080\nscheme: http\n",
        )
        .unwrap();

        temp_env::with_vars(
            [
                (ENV_TOKEN, None),
                (ENV_HOST, None),
                (ENV_SCHEME, None),
                (ENV_CONFIG_PATH, path.to_str()),
            ],
            || {
                let config = resolve(Settings::default()).unwrap();
                assert_eq!(config.token, "from-file");
                assert_eq!(config.host.as_deref(), Some("localhost:8080"));
                assert_eq!(config.scheme, "http");
            },
        );
    }

    #[test]
    #[serial]
    fn test_missing_credentials_file_is_error() {
        temp_env::with_vars(
            [
                (ENV_TOKEN, None),
                (ENV_HOST, None),
                (ENV_SCHEME, None),
                (
                    ENV_CONFIG_PATH,
                    Some("/nonexistent/leaseweb/credentials.yaml"),
                ),
            ],
            || {
                assert!(matches!(
                    resolve(Settings::default()),
                    Err(ConfigError::CredentialsFileNotFound(_))
                ));
            },
        );
    }

    #[test]
    #[serial]
    fn test_invalid_yaml() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("credentials.yaml");
        fs::write(&path, "token: [unclosed").unwrap();

        temp_env::with_vars(
            [
                (ENV_TOKEN, None),
                (ENV_HOST, None),
                (ENV_SCHEME, None),
                (ENV_CONFIG_PATH, path.to_str()),
            ],
            || {
                assert!(matches!(
                    resolve(Settings::default()),
                    Err(ConfigError::Parse { .. })
                ));
            },
        );
    }

    #[test]
    #[serial]
    fn test_invalid_scheme() {
        temp_env::with_vars(NO_ENV, || {
            let result = resolve(Settings {
                scheme: Some("ftp".to_string()),
                ..explicit("token")
            });
            assert!(matches!(result, Err(ConfigError::InvalidScheme(s)) if s == "ftp"));
        });
    }

    #[test]
    fn test_settings_or() {
        let merged = Settings {
            token: Some("a".to_string()),
            host: Some(String::new()),
            scheme: None,
        }
        .or(Settings {
            token: Some("b".to_string()),
            host: Some("h".to_string()),
            scheme: Some("http".to_string()),
        });
        assert_eq!(merged.token.as_deref(), Some("a"));
        assert_eq!(merged.host.as_deref(), Some("h"));
        assert_eq!(merged.scheme.as_deref(), Some("http"));
    }
}
