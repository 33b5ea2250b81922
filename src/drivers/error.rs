// Modem driver error type

use crate::protocol::CodecError;
use crate::report::ReportError;
use crate::serial::SerialError;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModemError {
    #[error("Serial communication error: {0}")]
    Serial(String),

    #[error("Timeout waiting for modem after {0:?}")]
    Timeout(Duration),

    #[error("Invalid report: {0}")]
    Report(#[from] ReportError),

    #[error("Cannot encode message: {0}")]
    Codec(#[from] CodecError),
}

impl From<SerialError> for ModemError {
    fn from(err: SerialError) -> Self {
        match err {
            SerialError::Timeout(after) => ModemError::Timeout(after),
            other => ModemError::Serial(other.to_string()),
        }
    }
}

pub type ModemResult<T> = std::result::Result<T, ModemError>;
