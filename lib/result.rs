use std::path::PathBuf;

use thiserror::Error;

use crate::github::GithubError;

#[derive(Debug, Error)]
pub enum NightlyError {
    #[error("file not found: {0}")]
    FileNotFound(PathBuf),
    #[error("file has no usable name: {0}")]
    InvalidFileName(PathBuf),
    #[error("invalid file pattern: {0}")]
    Pattern(#[from] glob::PatternError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("GitHub error: {0}")]
    GitHub(#[from] GithubError),
}

pub type NightlyResult<T> = Result<T, NightlyError>;
