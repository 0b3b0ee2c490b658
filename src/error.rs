use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Store error: {0}")]
    Store(#[from] rusqlite::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid period '{0}'. Examples: 1d, 12h, \"7 day\"")]
    InvalidPeriod(String),

    #[error("Timestamp out of range: {0}")]
    TimestampRange(i64),

    #[error("Malformed reading at line {line}: {reason}")]
    MalformedReading { line: usize, reason: String },
}

pub type Result<T> = std::result::Result<T, Error>;

pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL_ERROR: i32 = 1;
    pub const INVALID_ARGUMENTS: i32 = 2;
    pub const STORE_ERROR: i32 = 3;
    pub const BAD_INPUT: i32 = 4;
}

impl Error {
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Store(_) => exit_code::STORE_ERROR,
            Error::InvalidArgument(_) | Error::InvalidPeriod(_) => exit_code::INVALID_ARGUMENTS,
            Error::MalformedReading { .. } => exit_code::BAD_INPUT,
            _ => exit_code::GENERAL_ERROR,
        }
    }
}
