//! Reading CSV text into plain rows or header-keyed records

use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::HashMap;
use std::fs::File;
use std::io;
use std::path::Path;
use std::sync::Arc;

use crate::error::CsvError;
use crate::format::{parse_flag, parse_format_settings, CsvFormat, Dialect};

/// Settings for [`CsvRead`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CsvReadSettings {
    pub format: CsvFormat,
    /// Overrides the format's delimiter
    pub delimiter: Option<u8>,
    /// Strip surrounding whitespace from every field
    pub trim: bool,
    /// Use the first record as column names
    pub first_record_as_header: bool,
}

impl CsvReadSettings {
    /// Settings from query parameters: `format`, `delimiter`, `trim`,
    /// `firstRecordAsHeader`
    pub fn from_query(query: &HashMap<String, String>) -> Result<Self, CsvError> {
        let (format, delimiter) = parse_format_settings(query)?;
        Ok(Self {
            format,
            delimiter,
            trim: parse_flag(query, "trim")?,
            first_record_as_header: parse_flag(query, "firstRecordAsHeader")?,
        })
    }
}

/// One data record, addressable by column name.
///
/// Serializes as a JSON object in column order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvRecord {
    headers: Arc<[String]>,
    values: Vec<String>,
}

impl CsvRecord {
    /// Value of the named column; `None` for an unknown column or a short record
    pub fn get(&self, header: &str) -> Option<&str> {
        self.headers
            .iter()
            .position(|h| h == header)
            .and_then(|index| self.values.get(index))
            .map(String::as_str)
    }

    pub fn contains_key(&self, header: &str) -> bool {
        self.headers.iter().any(|h| h == header)
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }
}

impl Serialize for CsvRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.headers.len().min(self.values.len())))?;
        for (header, value) in self.headers.iter().zip(&self.values) {
            map.serialize_entry(header, value)?;
        }
        map.end()
    }
}

/// Parsed CSV: header-keyed records, or plain rows when there is no header
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(untagged)]
pub enum CsvRows {
    Records(Vec<CsvRecord>),
    Rows(Vec<Vec<String>>),
}

impl CsvRows {
    pub fn len(&self) -> usize {
        match self {
            CsvRows::Records(records) => records.len(),
            CsvRows::Rows(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Metadata about where CSV came from or went to
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CsvAttributes {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
}

impl CsvAttributes {
    pub(crate) fn for_file(path: &Path) -> Self {
        Self {
            file_name: Some(path.display().to_string()),
        }
    }
}

/// CSV reader configured once and reused across messages
#[derive(Debug, Clone)]
pub struct CsvRead {
    settings: CsvReadSettings,
    dialect: Dialect,
}

impl CsvRead {
    pub fn new(settings: CsvReadSettings) -> Self {
        let dialect = settings.format.dialect().with_delimiter(settings.delimiter);
        Self { settings, dialect }
    }

    /// Parse CSV carried in a message payload
    pub fn read_payload(&self, payload: &str) -> Result<CsvRows, CsvError> {
        self.read_from(payload.as_bytes())
            .map_err(|e| CsvError::PayloadRead(e.to_string()))
    }

    /// Parse a CSV file, reporting the file name alongside the rows
    pub fn read_file(&self, path: &Path) -> Result<(CsvRows, CsvAttributes), CsvError> {
        if path.as_os_str().is_empty() {
            return Err(CsvError::ReadPathEmpty);
        }

        let file_error = |cause: String| CsvError::FileRead {
            file: path.display().to_string(),
            cause,
        };
        let file = File::open(path).map_err(|e| file_error(e.to_string()))?;
        let rows = self.read_from(file).map_err(|e| file_error(e.to_string()))?;

        tracing::debug!(file = %path.display(), rows = rows.len(), "Read CSV file");
        Ok((rows, CsvAttributes::for_file(path)))
    }

    fn read_from<R: io::Read>(&self, input: R) -> Result<CsvRows, csv::Error> {
        let mut reader = self
            .dialect
            .reader_builder(self.settings.first_record_as_header, self.settings.trim)
            .from_reader(input);

        if !self.settings.first_record_as_header {
            let rows = reader
                .records()
                .map(|record| record.map(|r| r.iter().map(str::to_string).collect()))
                .collect::<Result<Vec<_>, _>>()?;
            return Ok(CsvRows::Rows(rows));
        }

        let headers: Arc<[String]> = reader.headers()?.iter().map(str::to_string).collect();
        let records = reader
            .records()
            .map(|record| {
                record.map(|r| CsvRecord {
                    headers: Arc::clone(&headers),
                    values: r.iter().map(str::to_string).collect(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(CsvRows::Records(records))
    }
}
