use thiserror::Error;

pub const NOT_IMPLEMENTED_MESSAGE: &str = "Image generation is not implemented yet.";

/// Failures surfaced to the user. `Display` is the single-line message shown
/// in the page.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Network(String),

    #[error("{detail}")]
    Server { status: u16, detail: String },

    #[error("{}", NOT_IMPLEMENTED_MESSAGE)]
    NotImplemented,

    #[error("{0}")]
    Playback(String),
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::Network(err.to_string())
    }
}
