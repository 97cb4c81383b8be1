//! Error types for the CSV handlers

use hello_gateway_sdk::HandlerError;
use thiserror::Error;

/// Errors raised while configuring, reading or writing CSV
#[derive(Error, Debug)]
pub enum CsvError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Could not read from CSV file. The file path was empty.")]
    ReadPathEmpty,

    #[error("Could not read from CSV file=[{file}], cause=[{cause}].")]
    FileRead { file: String, cause: String },

    #[error("Could not read CSV payload, cause=[{0}].")]
    PayloadRead(String),

    #[error("Could not write to CSV file. The file path was empty.")]
    WritePathEmpty,

    #[error("Could not write to CSV file=[{file}], cause=[{cause}].")]
    FileWrite { file: String, cause: String },

    #[error("Could not write CSV into message payload, cause=[{0}].")]
    PayloadWrite(String),

    #[error("The payload must contain a list, but type=[{0}] was given.")]
    PayloadType(String),
}

impl From<CsvError> for HandlerError {
    fn from(err: CsvError) -> Self {
        match err {
            CsvError::FileRead { .. } | CsvError::FileWrite { .. } => {
                HandlerError::Internal(err.to_string())
            }
            _ => HandlerError::BadRequest(err.to_string()),
        }
    }
}
