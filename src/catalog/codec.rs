//! CSV codec for the catalog file.
//!
//! One row per record, no header, fields in this order:
//!
//! - `path`: file path (quoted by the CSV writer when it contains `,` or `"`)
//! - `size`: size in bytes (decimal)
//! - `hash`: content digest (hex)
//!
//! Search terms are never written; they are rebuilt from `path` on load.
//!
//! Decoding is tolerant per row: a row with the wrong number of fields or an
//! unparseable size is reported as a [`MalformedRow`] and skipped. Only a
//! failure of the CSV layer itself (I/O, invalid UTF-8) is an error.
//!
//! # Example
//!
//! ```
//! use dupecat::catalog::codec::{decode, encode};
//! use dupecat::catalog::Record;
//!
//! let records = vec![Record::new("/a/x.txt", 3, "abc")];
//! let mut buffer = Vec::new();
//! encode(&mut buffer, &records).unwrap();
//!
//! let decoded = decode(buffer.as_slice()).unwrap();
//! assert_eq!(decoded.rows[0].path, "/a/x.txt");
//! assert!(decoded.malformed.is_empty());
//! ```

use std::io;

use thiserror::Error;

use super::Record;

const FIELD_COUNT: usize = 3;

/// Errors that make the whole catalog file unreadable.
#[derive(Debug, Error)]
pub enum CodecError {
    /// I/O or structural error from the CSV layer.
    #[error("unable to parse catalog as CSV: {0}")]
    Csv(#[from] csv::Error),

    /// I/O error while flushing encoded output.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// A decoded `(path, size, hash)` triple.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct RecordRow {
    pub path: String,
    pub size: u64,
    pub hash: String,
}

impl From<&Record> for RecordRow {
    fn from(record: &Record) -> Self {
        Self {
            path: record.path.clone(),
            size: record.size,
            hash: record.hash.clone(),
        }
    }
}

/// A row that could not be turned into a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedRow {
    /// 1-based line number in the catalog file, when known.
    pub line: Option<u64>,
    /// Raw fields as read.
    pub fields: Vec<String>,
    /// Why the row was rejected.
    pub reason: String,
}

impl std::fmt::Display for MalformedRow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.line {
            Some(line) => write!(f, "line {}: {} (raw: {:?})", line, self.reason, self.fields),
            None => write!(f, "{} (raw: {:?})", self.reason, self.fields),
        }
    }
}

/// Output of [`decode`].
#[derive(Debug, Clone, Default)]
pub struct Decoded {
    pub rows: Vec<RecordRow>,
    pub malformed: Vec<MalformedRow>,
}

/// Decode catalog rows from a reader.
///
/// # Errors
///
/// Returns [`CodecError::Csv`] if the input is not readable as CSV.
pub fn decode<R: io::Read>(reader: R) -> Result<Decoded, CodecError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut decoded = Decoded::default();

    for result in csv_reader.records() {
        let raw = result?;
        let line = raw.position().map(csv::Position::line);
        let fields: Vec<String> = raw.iter().map(str::to_string).collect();

        if fields.len() != FIELD_COUNT {
            decoded.malformed.push(MalformedRow {
                line,
                reason: format!("expected {} fields, found {}", FIELD_COUNT, fields.len()),
                fields,
            });
            continue;
        }

        match fields[1].trim().parse::<u64>() {
            Ok(size) => decoded.rows.push(RecordRow {
                path: fields[0].clone(),
                size,
                hash: fields[2].clone(),
            }),
            Err(e) => decoded.malformed.push(MalformedRow {
                line,
                reason: format!("unable to parse size {:?}: {}", fields[1], e),
                fields,
            }),
        }
    }

    Ok(decoded)
}

/// Encode records as catalog rows.
///
/// # Errors
///
/// Returns [`CodecError`] if writing fails.
pub fn encode<'a, W, I>(writer: W, records: I) -> Result<(), CodecError>
where
    W: io::Write,
    I: IntoIterator<Item = &'a Record>,
{
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    for record in records {
        csv_writer.write_record([
            record.path.as_str(),
            record.size.to_string().as_str(),
            record.hash.as_str(),
        ])?;
    }

    csv_writer.flush()?;
    Ok(())
}
