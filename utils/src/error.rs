use std::sync::PoisonError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

type BoxedSource = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("{0}")]
    Message(String),

    #[error("{message}: {source}")]
    WithSource {
        message: String,
        #[source]
        source: BoxedSource,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Logger error: {0}")]
    Logger(#[from] log::SetLoggerError),

    #[error("Configuration lock poisoned")]
    LockPoisoned,
}

impl Error {
    pub fn new(message: impl Into<String>) -> Self {
        Error::Message(message.into())
    }

    /// 附带底层错误来源
    pub fn with_source(message: impl Into<String>, source: BoxedSource) -> Self {
        Error::WithSource {
            message: message.into(),
            source,
        }
    }
}

impl<T> From<PoisonError<T>> for Error {
    fn from(_: PoisonError<T>) -> Self {
        Error::LockPoisoned
    }
}
