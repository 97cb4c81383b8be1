//! Writing JSON rows out as CSV text

use serde_json::Value;
use std::collections::HashMap;
use std::fs::File;
use std::io;
use std::path::Path;

use crate::error::CsvError;
use crate::format::{parse_flag, parse_format_settings, CsvFormat, Dialect};
use crate::read::CsvAttributes;

/// Settings for [`CsvWrite`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CsvWriteSettings {
    pub format: CsvFormat,
    /// Overrides the format's delimiter
    pub delimiter: Option<u8>,
    /// Emit `headers` as the first record
    pub include_headers: bool,
    /// Column names; also selects and orders the values of object rows
    pub headers: Option<Vec<String>>,
}

impl CsvWriteSettings {
    /// Settings from query parameters: `format`, `delimiter`, `includeHeaders`,
    /// and `headers` as a comma-separated list
    pub fn from_query(query: &HashMap<String, String>) -> Result<Self, CsvError> {
        let (format, delimiter) = parse_format_settings(query)?;
        Ok(Self {
            format,
            delimiter,
            include_headers: parse_flag(query, "includeHeaders")?,
            headers: query.get("headers").map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|h| !h.is_empty())
                    .map(str::to_string)
                    .collect()
            }),
        })
    }
}

/// CSV writer configured once and reused across messages
#[derive(Debug, Clone)]
pub struct CsvWrite {
    settings: CsvWriteSettings,
    dialect: Dialect,
}

impl CsvWrite {
    /// Validate settings; including headers requires a non-empty header list
    pub fn new(settings: CsvWriteSettings) -> Result<Self, CsvError> {
        if settings.include_headers {
            match &settings.headers {
                None => {
                    return Err(CsvError::Config(
                        "header list must be defined and not be empty".into(),
                    ))
                }
                Some(headers) if headers.is_empty() => {
                    return Err(CsvError::Config("header list must not be empty".into()))
                }
                Some(_) => {}
            }
        }

        let dialect = settings.format.dialect().with_delimiter(settings.delimiter);
        Ok(Self { settings, dialect })
    }

    /// Render rows as CSV text. `None` or JSON `null` writes only the header
    /// record, if any.
    pub fn write_to_payload(&self, data: Option<&Value>) -> Result<String, CsvError> {
        let records = self.records(data)?;
        let bytes = self
            .write_records(Vec::new(), &records)
            .map_err(CsvError::PayloadWrite)?;
        String::from_utf8(bytes).map_err(|e| CsvError::PayloadWrite(e.to_string()))
    }

    /// Write rows to a file, replacing its contents
    pub fn write_to_file(&self, data: Option<&Value>, path: &Path) -> Result<CsvAttributes, CsvError> {
        if path.as_os_str().is_empty() {
            return Err(CsvError::WritePathEmpty);
        }

        let records = self.records(data)?;
        let file_error = |cause: String| CsvError::FileWrite {
            file: path.display().to_string(),
            cause,
        };
        let file = File::create(path).map_err(|e| file_error(e.to_string()))?;
        self.write_records(file, &records).map_err(file_error)?;

        tracing::debug!(file = %path.display(), records = records.len(), "Wrote CSV file");
        Ok(CsvAttributes::for_file(path))
    }

    fn header_row(&self) -> Option<&[String]> {
        if self.settings.include_headers {
            self.settings.headers.as_deref()
        } else {
            None
        }
    }

    fn records(&self, data: Option<&Value>) -> Result<Vec<Vec<String>>, CsvError> {
        let mut records: Vec<Vec<String>> = self.header_row().map(<[String]>::to_vec).into_iter().collect();

        let items = match data {
            None | Some(Value::Null) => return Ok(records),
            Some(Value::Array(items)) => items,
            Some(other) => return Err(CsvError::PayloadType(json_type_name(other).to_string())),
        };

        records.extend(items.iter().map(|item| self.record(item)));
        Ok(records)
    }

    fn record(&self, item: &Value) -> Vec<String> {
        match item {
            Value::Array(values) => values.iter().map(|v| self.cell(v)).collect(),
            Value::Object(map) => match self.header_row() {
                Some(headers) => headers
                    .iter()
                    .map(|h| self.cell(map.get(h).unwrap_or(&Value::Null)))
                    .collect(),
                None => map.values().map(|v| self.cell(v)).collect(),
            },
            scalar => vec![self.cell(scalar)],
        }
    }

    fn cell(&self, value: &Value) -> String {
        match value {
            Value::Null => self.dialect.null_string.unwrap_or_default().to_string(),
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }

    fn write_records<W: io::Write>(&self, out: W, records: &[Vec<String>]) -> Result<W, String> {
        let mut writer = self.dialect.writer_builder().from_writer(out);
        for record in records {
            writer.write_record(record).map_err(|e| e.to_string())?;
        }
        writer.into_inner().map_err(|e| e.error().to_string())
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
