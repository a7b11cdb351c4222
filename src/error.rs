//! Error type shared by the catalog, store, session and submission layers.
//!
//! The matching core (`matcher`, `recommend`) never fails and does not use it.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HubError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Home directory not found")]
    NoHomeDir,

    #[error("Failed to read {path}: {source}")]
    FileRead { path: PathBuf, source: io::Error },

    #[error("Failed to parse {path}: {message}")]
    FileParse { path: PathBuf, message: String },

    #[error("Stored value for '{key}' has an unexpected shape: {message}")]
    StoreFormat { key: String, message: String },

    #[error("Duplicate {section} entry id '{id}'")]
    DuplicateEntryId { section: &'static str, id: String },

    #[error("Rule table needs at least one fallback recommendation")]
    EmptyFallback,

    #[error("请输入账号和密码")]
    MissingCredentials,

    #[error("密码长度至少为 {min} 位")]
    PasswordTooShort { min: usize },

    #[error("Not logged in; run `khub login` or pass --no-login")]
    LoginRequired,

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Not a valid http(s) URL: {0}")]
    InvalidUrl(String),
}

pub type HubResult<T> = Result<T, HubError>;
