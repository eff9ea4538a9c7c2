use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error(
        "API token is not set. Set `token` in the provider block, \
        the LEASEWEB_TOKEN environment variable, or `token` in the credentials file"
    )]
    MissingToken,

    #[error("Invalid scheme {0:?}: must be \"http\" or \"https\"")]
    InvalidScheme(String),

    #[error("Credentials file not found: {}", .0.display())]
    CredentialsFileNotFound(PathBuf),

    #[error("Failed to parse credentials file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
