use thiserror::Error;

#[derive(Error, Debug)]
pub enum CourseError {
    #[error("Failed to fetch courses: {0}")]
    Request(#[from] reqwest::Error),

    #[error("HTTP error {status}: {url}")]
    Status { status: u16, url: String },

    #[error("Failed to decode course list: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to install log subscriber: {0}")]
    Logging(#[from] tracing_subscriber::util::TryInitError),
}

impl CourseError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CourseError>;
