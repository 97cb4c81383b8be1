//! CSV handlers
//!
//! `csv_read` parses the CSV carried in the message payload and answers with
//! JSON; `csv_write` takes a JSON list in the payload and answers with CSV.
//! Both are configured per message through query parameters.
use hello_gateway_sdk::prelude::*;
use serde_json::Value;

pub mod error;
pub mod format;
pub mod read;
pub mod write;

pub use error::CsvError;
pub use format::CsvFormat;
pub use read::{CsvAttributes, CsvRead, CsvReadSettings, CsvRecord, CsvRows};
pub use write::{CsvWrite, CsvWriteSettings};

/// Parses the payload as CSV.
///
/// Query parameters: `format`, `delimiter`, `trim`, `firstRecordAsHeader`.
/// Returns a JSON array of objects keyed by column name when the first record
/// is the header, or a JSON array of string arrays otherwise.
pub fn csv_read(_ctx: &Context, message: &Message) -> Result<String, HandlerError> {
    let settings = CsvReadSettings::from_query(&message.attributes().query_params)?;
    let rows = CsvRead::new(settings).read_payload(message.payload.as_deref().unwrap_or_default())?;
    Ok(serde_json::to_string(&rows)?)
}

/// Renders a JSON list payload as CSV.
///
/// Query parameters: `format`, `delimiter`, `includeHeaders`, `headers`.
/// List items may be arrays, objects or scalars. An absent or blank payload
/// writes only the header record.
pub fn csv_write(_ctx: &Context, message: &Message) -> Result<String, HandlerError> {
    let settings = CsvWriteSettings::from_query(&message.attributes().query_params)?;
    let writer = CsvWrite::new(settings)?;

    let data = message
        .payload
        .as_deref()
        .filter(|payload| !payload.trim().is_empty())
        .map(serde_json::from_str::<Value>)
        .transpose()
        .map_err(|e| CsvError::PayloadWrite(e.to_string()))?;

    Ok(writer.write_to_payload(data.as_ref())?)
}
