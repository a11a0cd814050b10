//! Delimited-text decoding for uploaded address lists.
//!
//! Reads a header row, locates the key column, then yields one [`CsvRow`] per
//! record. Field splitting follows RFC 4180: a field that starts with the
//! quote character is quoted, a doubled quote inside it is a literal quote,
//! and it may span lines. Surrounding whitespace is trimmed and blank lines
//! are skipped. Bytes that are not valid UTF-8 are replaced with U+FFFD.
//!
//! Rows with a stray quote or a field count that differs from the header come
//! back as [`IngestError::Malformed`], which the ingestion loop skips; decoding
//! resumes on the next line. I/O errors end the stream.

use std::borrow::Cow;
use std::io::BufRead;

use log::debug;

use crate::ingest::config::IngestConfig;
use crate::ingest::{IngestError, MalformedRecord};

const BOM: char = '\u{feff}';

/// One decoded record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvRow {
    /// 1-based line on which the record starts.
    pub line: usize,
    pub fields: Vec<String>,
}

impl CsvRow {
    pub fn get(&self, index: usize) -> Option<&str> {
        self.fields.get(index).map(String::as_str)
    }
}

/// Streaming record reader over any [`BufRead`].
#[derive(Debug)]
pub struct CsvRecords<R> {
    reader: R,
    delimiter: char,
    quote: char,
    header: Vec<String>,
    column: usize,
    line: usize,
    raw: Vec<u8>,
    buf: String,
    done: bool,
}

impl<R: BufRead> CsvRecords<R> {
    /// Reads the header row and locates `config.column`.
    ///
    /// If the header names the column more than once, the last occurrence is
    /// the key column.
    ///
    /// # Errors
    ///
    /// - [`IngestError::Config`] for an invalid configuration
    /// - [`IngestError::EmptyInput`] if there is no header row
    /// - [`IngestError::MissingColumn`] if the header lacks the key column
    /// - [`IngestError::Io`] if reading fails
    ///
    /// # Example
    ///
    /// ```
    /// use rankkit::ingest::{CsvRecords, IngestConfig};
    ///
    /// let data = "name,email\nAnn,ann@a.com\n\"Bo, Jr\",bo@b.com\n";
    /// let mut rows = CsvRecords::new(data.as_bytes(), &IngestConfig::default()).unwrap();
    /// assert_eq!(rows.column_index(), 1);
    ///
    /// let second = rows.nth(1).unwrap().unwrap();
    /// assert_eq!(second.fields, vec!["Bo, Jr", "bo@b.com"]);
    /// ```
    pub fn new(reader: R, config: &IngestConfig) -> Result<Self, IngestError> {
        config.validate()?;
        let mut records = Self {
            reader,
            delimiter: config.delimiter,
            quote: config.quote,
            header: Vec::new(),
            column: 0,
            line: 0,
            raw: Vec::new(),
            buf: String::new(),
            done: false,
        };

        let header = match records.next_record() {
            Some(Ok(row)) => row.fields,
            Some(Err(IngestError::Malformed { source, .. })) => {
                return Err(IngestError::Header { source });
            }
            Some(Err(err)) => return Err(err),
            None => return Err(IngestError::EmptyInput),
        };
        records.column = header
            .iter()
            .rposition(|name| name == &config.column)
            .ok_or_else(|| IngestError::MissingColumn {
                column: config.column.clone(),
            })?;
        records.header = header;
        Ok(records)
    }

    pub fn header(&self) -> &[String] {
        &self.header
    }

    /// Position of the key column in every row.
    pub fn column_index(&self) -> usize {
        self.column
    }

    /// Number of physical lines consumed so far.
    pub fn lines_read(&self) -> usize {
        self.line
    }

    fn read_line(&mut self) -> Result<bool, IngestError> {
        self.raw.clear();
        let read = self
            .reader
            .read_until(b'\n', &mut self.raw)
            .map_err(|source| IngestError::Io {
                source,
                operation: format!("read line {}", self.line + 1),
            })?;
        if read == 0 {
            return Ok(false);
        }
        self.line += 1;
        while matches!(self.raw.last(), Some(b'\n' | b'\r')) {
            self.raw.pop();
        }

        self.buf.clear();
        let text = String::from_utf8_lossy(&self.raw);
        if let Cow::Owned(_) = text {
            debug!("line {}: replaced invalid UTF-8", self.line);
        }
        self.buf.push_str(&text);
        if self.line == 1 && self.buf.starts_with(BOM) {
            self.buf.drain(..BOM.len_utf8());
        }
        Ok(true)
    }

    /// Reads the next record, joining lines while a quoted field is open.
    fn next_record(&mut self) -> Option<Result<CsvRow, IngestError>> {
        if self.done {
            return None;
        }
        loop {
            match self.read_line() {
                Ok(true) => {}
                Ok(false) => {
                    self.done = true;
                    return None;
                }
                Err(err) => {
                    self.done = true;
                    return Some(Err(err));
                }
            }
            if self.buf.trim().is_empty() {
                continue;
            }

            let start = self.line;
            let mut text = std::mem::take(&mut self.buf);
            loop {
                match split_fields(&text, self.delimiter, self.quote) {
                    Ok(Some(fields)) => {
                        return Some(Ok(CsvRow {
                            line: start,
                            fields,
                        }));
                    }
                    Ok(None) => {}
                    Err(source) => {
                        return Some(Err(IngestError::Malformed {
                            line: start,
                            source,
                        }));
                    }
                }
                match self.read_line() {
                    Ok(true) => {
                        text.push('\n');
                        text.push_str(&self.buf);
                    }
                    Ok(false) => {
                        self.done = true;
                        return Some(Err(IngestError::Malformed {
                            line: start,
                            source: MalformedRecord::UnterminatedQuote,
                        }));
                    }
                    Err(err) => {
                        self.done = true;
                        return Some(Err(err));
                    }
                }
            }
        }
    }
}

impl<R: BufRead> Iterator for CsvRecords<R> {
    type Item = Result<CsvRow, IngestError>;

    fn next(&mut self) -> Option<Self::Item> {
        let row = match self.next_record()? {
            Ok(row) => row,
            Err(err) => return Some(Err(err)),
        };
        if row.fields.len() != self.header.len() {
            return Some(Err(IngestError::Malformed {
                line: row.line,
                source: MalformedRecord::FieldCount {
                    expected: self.header.len(),
                    found: row.fields.len(),
                },
            }));
        }
        Some(Ok(row))
    }
}

/// Splits one record into trimmed fields.
///
/// Returns `Ok(None)` if a quoted field is still open at the end of `text`.
/// A quote inside an unquoted field, or text after a closing quote, is
/// [`MalformedRecord::BareQuote`].
pub fn split_fields(
    text: &str,
    delimiter: char,
    quote: char,
) -> Result<Option<Vec<String>>, MalformedRecord> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut closed = false;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            if c != quote {
                current.push(c);
            } else if chars.peek() == Some(&quote) {
                current.push(quote);
                chars.next();
            } else {
                in_quotes = false;
                closed = true;
            }
        } else if c == delimiter {
            fields.push(current.trim().to_string());
            current.clear();
            closed = false;
        } else if closed {
            if !c.is_whitespace() {
                return Err(MalformedRecord::BareQuote {
                    field: fields.len() + 1,
                });
            }
        } else if c == quote {
            if !current.trim().is_empty() {
                return Err(MalformedRecord::BareQuote {
                    field: fields.len() + 1,
                });
            }
            current.clear();
            in_quotes = true;
        } else {
            current.push(c);
        }
    }

    if in_quotes {
        return Ok(None);
    }
    fields.push(current.trim().to_string());
    Ok(Some(fields))
}
