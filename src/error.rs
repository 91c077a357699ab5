use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("HTTP error: {0}")]
    Http(#[from] rquest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    #[error("Timestamp error: {0}")]
    Timestamp(#[from] chrono::ParseError),

    #[error("Missing credential: {0}")]
    MissingCredential(&'static str),

    #[error("Rate limit exceeded")]
    RateLimit,

    #[error("Unexpected status {status} from {url}: {body}")]
    Status {
        status: u16,
        url: String,
        body: String,
    },

    #[error("Unexpected payload: {0}")]
    UnexpectedPayload(String),

    #[error("Workflow error: {0}")]
    Workflow(String),

    #[error("Upload error: {0}")]
    Upload(String),
}

impl Error {
    /// Only throttling and transient upstream failures are worth another attempt.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::RateLimit => true,
            Error::Status { status, .. } => matches!(status, 500 | 502 | 503 | 504),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(code: u16) -> Error {
        Error::Status {
            status: code,
            url: "https://api.example.test".to_string(),
            body: String::new(),
        }
    }

    #[test]
    fn retries_only_throttling_and_server_errors() {
        assert!(Error::RateLimit.is_retryable());
        for code in [500, 502, 503, 504] {
            assert!(status(code).is_retryable(), "{code} should be retried");
        }
        for code in [400, 401, 403, 404, 501] {
            assert!(!status(code).is_retryable(), "{code} should not be retried");
        }
        assert!(!Error::MissingCredential("coze_api_token").is_retryable());
        assert!(!Error::UnexpectedPayload("no data".into()).is_retryable());
    }
}
