#[derive(thiserror::Error, Debug)]
pub enum IntelError {
    #[error("network error: {0}")]
    Network(String),
    #[error("timeout")]
    Timeout,
    #[error("upstream returned status {status}: {url}")]
    Http { status: u16, url: String },
    #[error("decode error from {url}: {message}")]
    Decode { url: String, message: String },
    #[error("config error: {0}")]
    Config(String),
    #[error("unknown error")]
    Unknown,
}

impl From<reqwest::Error> for IntelError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            IntelError::Timeout
        } else if err.is_connect() {
            IntelError::Network(err.to_string())
        } else if err.is_status() {
            IntelError::Http {
                status: err.status().map(|s| s.as_u16()).unwrap_or(0),
                url: err.url().map(|u| u.to_string()).unwrap_or_default(),
            }
        } else if err.is_decode() {
            IntelError::Decode {
                url: err.url().map(|u| u.to_string()).unwrap_or_default(),
                message: err.to_string(),
            }
        } else {
            IntelError::Unknown
        }
    }
}
