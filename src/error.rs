use crate::http;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("missing required settings: {}", .missing.join(", "))]
    Configuration { missing: Vec<String> },
    #[error("invalid setting {name}: {reason}")]
    InvalidSetting { name: String, reason: String },
    #[error("cannot read config file {}", .path.display())]
    ConfigFile {
        path: PathBuf,
        #[source]
        cause: anyhow::Error,
    },
    #[error("cannot build http client")]
    Client(#[source] http::Error),
    #[error("cannot list {entity} from the source: {cause}")]
    SourceUnavailable {
        entity: &'static str,
        #[source]
        cause: http::Error,
    },
}
