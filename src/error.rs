use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Failure taxonomy for the install engine. The core stays typed so
/// callers can report per-package outcomes; CLI code wraps these in
/// `anyhow` at the boundary.
#[derive(Debug, Error)]
pub enum Error {
    #[error("GET {url}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("registry returned HTTP {status} for {url}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("malformed registry metadata for {name}")]
    Metadata {
        name: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("no '{tag}' dist-tag published")]
    MissingDistTag { tag: String },

    #[error("invalid version range '{requirement}'")]
    InvalidRange {
        requirement: String,
        #[source]
        source: semver::Error,
    },

    #[error("no published version satisfies '{requirement}'")]
    NoMatchingVersion { requirement: String },

    #[error("version {version} not present in registry metadata")]
    VersionNotFound { version: String },

    #[error("unpack {url}")]
    Archive {
        url: String,
        #[source]
        source: std::io::Error,
    },

    #[error("install {name}@{requirement} failed")]
    Install {
        name: String,
        requirement: String,
        #[source]
        source: Box<Error>,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
