use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GithubError {
    #[error("failed to build client - invalid header value: {0}")]
    ReqwestHeader(#[from] reqwest::header::InvalidHeaderValue),
    #[error("reqwest error: {0}")]
    Reqwest(#[from] reqwest::Error),
    #[error("reqwest middleware error: {0}")]
    ReqwestMiddleware(#[from] reqwest_middleware::Error),
    #[error("invalid upload url: {0}")]
    InvalidUploadUrl(#[from] url::ParseError),
    #[error(
        "failed to upload release asset '{name}' - received status code {status}\n{message}\n{errors}"
    )]
    AssetUploadRejected {
        name: String,
        status: StatusCode,
        message: String,
        errors: String,
    },
}

pub type GithubResult<T> = Result<T, GithubError>;
