//! CSV format presets and their reader/writer settings

use csv::{QuoteStyle, ReaderBuilder, Terminator, Trim, WriterBuilder};
use std::collections::HashMap;
use std::str::FromStr;

use crate::error::CsvError;

/// Named CSV dialects understood by both handlers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CsvFormat {
    #[default]
    Default,
    Excel,
    InformixUnload,
    InformixUnloadCsv,
    MongoDbCsv,
    MongoDbTsv,
    MySql,
    Oracle,
    PostgreSqlCsv,
    PostgreSqlText,
    Rfc4180,
}

/// Low-level settings a format resolves to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dialect {
    pub delimiter: u8,
    /// `None` disables quoting entirely
    pub quote: Option<u8>,
    /// Escape byte; equal to `quote` means doubled quotes
    pub escape: Option<u8>,
    /// `\r\n` record separator when writing, `\n` otherwise
    pub crlf: bool,
    pub trim: bool,
    /// Text written for JSON `null` cells
    pub null_string: Option<&'static str>,
}

impl CsvFormat {
    pub fn dialect(self) -> Dialect {
        let base = Dialect {
            delimiter: b',',
            quote: Some(b'"'),
            escape: None,
            crlf: true,
            trim: false,
            null_string: None,
        };

        match self {
            CsvFormat::Default | CsvFormat::Excel | CsvFormat::Rfc4180 => base,
            CsvFormat::InformixUnload => Dialect {
                delimiter: b'|',
                escape: Some(b'\\'),
                crlf: false,
                ..base
            },
            CsvFormat::InformixUnloadCsv => Dialect { crlf: false, ..base },
            CsvFormat::MongoDbCsv => Dialect {
                escape: Some(b'"'),
                ..base
            },
            CsvFormat::MongoDbTsv => Dialect {
                delimiter: b'\t',
                escape: Some(b'"'),
                ..base
            },
            CsvFormat::MySql => Dialect {
                delimiter: b'\t',
                quote: None,
                escape: Some(b'\\'),
                crlf: false,
                null_string: Some("\\N"),
                ..base
            },
            CsvFormat::Oracle => Dialect {
                escape: Some(b'\\'),
                crlf: false,
                trim: true,
                null_string: Some("\\N"),
                ..base
            },
            CsvFormat::PostgreSqlCsv => Dialect {
                crlf: false,
                null_string: Some(""),
                ..base
            },
            CsvFormat::PostgreSqlText => Dialect {
                delimiter: b'\t',
                quote: None,
                escape: Some(b'\\'),
                crlf: false,
                null_string: Some("\\N"),
                ..base
            },
        }
    }
}

impl FromStr for CsvFormat {
    type Err = CsvError;

    /// Accepts preset names case-insensitively, with `-` or `_` separators
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase().replace('-', "_");
        match normalized.as_str() {
            "DEFAULT" => Ok(CsvFormat::Default),
            "EXCEL" => Ok(CsvFormat::Excel),
            "INFORMIX_UNLOAD" => Ok(CsvFormat::InformixUnload),
            "INFORMIX_UNLOAD_CSV" => Ok(CsvFormat::InformixUnloadCsv),
            "MONGODB_CSV" => Ok(CsvFormat::MongoDbCsv),
            "MONGODB_TSV" => Ok(CsvFormat::MongoDbTsv),
            "MYSQL" => Ok(CsvFormat::MySql),
            "ORACLE" => Ok(CsvFormat::Oracle),
            "POSTGRESQL_CSV" => Ok(CsvFormat::PostgreSqlCsv),
            "POSTGRESQL_TEXT" => Ok(CsvFormat::PostgreSqlText),
            "RFC4180" => Ok(CsvFormat::Rfc4180),
            _ => Err(CsvError::Config(format!("Unknown CSV format: {}", s))),
        }
    }
}

/// Parse a delimiter setting; it must be exactly one ASCII character
pub fn parse_delimiter(raw: &str) -> Result<u8, CsvError> {
    let mut chars = raw.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii() => Ok(c as u8),
        (Some(_), None) => Err(CsvError::Config("Delimiter must be an ASCII char".into())),
        _ => Err(CsvError::Config("Delimiter must be a single char".into())),
    }
}

/// Read a boolean query setting; absent means `false`
pub(crate) fn parse_flag(query: &HashMap<String, String>, key: &str) -> Result<bool, CsvError> {
    match query.get(key).map(|v| v.trim()) {
        None => Ok(false),
        Some(v) if v.eq_ignore_ascii_case("true") => Ok(true),
        Some(v) if v.eq_ignore_ascii_case("false") => Ok(false),
        Some(v) => Err(CsvError::Config(format!("{} must be true or false, got {}", key, v))),
    }
}

/// Read the `format` and `delimiter` query settings shared by both handlers
pub(crate) fn parse_format_settings(
    query: &HashMap<String, String>,
) -> Result<(CsvFormat, Option<u8>), CsvError> {
    let format = query
        .get("format")
        .map(|f| f.parse::<CsvFormat>())
        .transpose()?
        .unwrap_or_default();
    let delimiter = query.get("delimiter").map(|d| parse_delimiter(d)).transpose()?;
    Ok((format, delimiter))
}

impl Dialect {
    /// Replace the preset delimiter when one is configured
    pub fn with_delimiter(self, delimiter: Option<u8>) -> Self {
        match delimiter {
            Some(delimiter) => Dialect { delimiter, ..self },
            None => self,
        }
    }

    fn separate_escape(&self) -> Option<u8> {
        self.escape.filter(|escape| Some(*escape) != self.quote)
    }

    pub fn reader_builder(&self, has_headers: bool, trim: bool) -> ReaderBuilder {
        let mut builder = ReaderBuilder::new();
        builder
            .delimiter(self.delimiter)
            .has_headers(has_headers)
            .flexible(true)
            .trim(if trim || self.trim { Trim::All } else { Trim::None });

        match self.quote {
            Some(quote) => {
                builder.quote(quote);
            }
            None => {
                builder.quoting(false);
            }
        }
        if let Some(escape) = self.separate_escape() {
            builder.escape(Some(escape)).double_quote(false);
        }

        builder
    }

    pub fn writer_builder(&self) -> WriterBuilder {
        let mut builder = WriterBuilder::new();
        builder
            .delimiter(self.delimiter)
            .flexible(true)
            .terminator(if self.crlf {
                Terminator::CRLF
            } else {
                Terminator::Any(b'\n')
            });

        match self.quote {
            Some(quote) => {
                builder.quote(quote).quote_style(QuoteStyle::Necessary);
            }
            None => {
                builder.quote_style(QuoteStyle::Never);
            }
        }
        if let Some(escape) = self.separate_escape() {
            builder.escape(escape).double_quote(false);
        }

        builder
    }
}
