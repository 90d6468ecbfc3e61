use thiserror::Error;

#[derive(Error, Debug)]
pub enum RelayError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("Chat log error: {0}")]
    ChatLog(String),

    #[error("Dispatch error: {0}")]
    Dispatch(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

pub type Result<T> = std::result::Result<T, RelayError>;
