use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ShopError {
    #[error("Dataset unavailable at {}: {reason}", path.display())]
    DatasetUnavailable { path: PathBuf, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid {control} selection: {value}")]
    InvalidSelection { control: String, value: String },

    #[error("Unknown view: {0} (run `shoptrends views` for the list)")]
    UnknownView(String),

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, ShopError>;
