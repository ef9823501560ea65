use thiserror::Error;

#[derive(Error, Debug)]
pub enum AssetSplitError {
    #[error("IO operation failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Games directory does not exist: {path}")]
    MissingDirectory { path: String },

    #[error("Document not found: {path}")]
    MissingDocument { path: String },

    #[error("Failed to read {path}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {path}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Document has no {marker} marker: {path}")]
    MissingMarker { path: String, marker: &'static str },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Operation was cancelled by user")]
    Cancelled,
}

pub trait UserFriendlyError {
    fn user_message(&self) -> String;
    fn suggestion(&self) -> Option<String>;
}

impl UserFriendlyError for AssetSplitError {
    fn user_message(&self) -> String {
        match self {
            AssetSplitError::MissingDirectory { path } => {
                format!("Directory does not exist: {}", path)
            }
            AssetSplitError::MissingDocument { path } => {
                format!("Document does not exist: {}", path)
            }
            AssetSplitError::Read { path, source } => {
                format!("Failed to read {}: {}", path, source)
            }
            AssetSplitError::Write { path, source } => {
                format!("Failed to write {}: {}", path, source)
            }
            AssetSplitError::MissingMarker { path, marker } => {
                format!("No {} marker found in {}", marker, path)
            }
            AssetSplitError::Config { message } => {
                format!("Configuration error: {}", message)
            }
            AssetSplitError::Cancelled => "Operation was cancelled by user".to_string(),
            _ => self.to_string(),
        }
    }

    fn suggestion(&self) -> Option<String> {
        match self {
            AssetSplitError::MissingDirectory { .. } => Some(
                "Pass the directory that contains the game folders, e.g. `assetsplit separate ./games`.".to_string(),
            ),
            AssetSplitError::Read { .. } => Some(
                "Check that the document is readable and encoded as UTF-8.".to_string(),
            ),
            AssetSplitError::Write { .. } => Some(
                "Ensure you have write permission for the game directory. Re-running is safe: asset files are rewritten identically.".to_string(),
            ),
            AssetSplitError::MissingMarker { .. } => Some(
                "Only complete HTML5 documents with </head> and </body> are supported; the document was left untouched.".to_string(),
            ),
            AssetSplitError::Config { .. } => Some(
                "Check your configuration file syntax, or regenerate one with `assetsplit generate-config`.".to_string(),
            ),
            _ => None,
        }
    }
}

impl From<toml::de::Error> for AssetSplitError {
    fn from(error: toml::de::Error) -> Self {
        AssetSplitError::Config {
            message: error.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AssetSplitError>;
