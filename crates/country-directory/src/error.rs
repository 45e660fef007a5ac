use std::path::PathBuf;

/// Failures reported by the country data collaborators.
///
/// The directory controller never returns these to its caller; they are
/// logged and turned into an empty result set or a closed selection.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected status {status} from {url}")]
    Status { status: u16, url: String },

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("GraphQL error: {0}")]
    Graphql(String),
}

pub type SourceResult<T> = std::result::Result<T, SourceError>;

#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error in {}: {}", .path.display(), .message)]
    Config { path: PathBuf, message: String },

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("directory controller stopped")]
    Stopped,

    #[error("HTTP client error: {0}")]
    Client(String),
}

pub type Result<T> = std::result::Result<T, DirectoryError>;
