//! Streaming reader for delimited Iris text files.

use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;

use csv::{ErrorKind, ReaderBuilder, StringRecord, StringRecordsIntoIter, Trim};
use log::{debug, info};

use super::record::IrisRecord;
use super::schema::{FEATURE_COUNT, Schema};
use crate::error::{PipelineError, Result};

/// Converts `separator` to the single byte the CSV reader splits on.
pub(crate) fn separator_byte(separator: char) -> Result<u8> {
    if !separator.is_ascii() || separator == '\n' || separator == '\r' {
        return Err(PipelineError::Config(format!(
            "separator must be a single ASCII character other than a line break, got {separator:?}"
        )));
    }
    Ok(separator as u8)
}

/// Single-pass iterator over the records of a delimited source.
///
/// Blank lines are skipped. Each item is either a record or the error that
/// stopped the read; callers that want fail-fast behaviour stop at the first
/// `Err` (see [`load_records`]).
pub struct RecordReader<R> {
    records: StringRecordsIntoIter<R>,
    schema: Schema,
    separator: char,
    source_name: String,
}

impl<R: io::Read> RecordReader<R> {
    pub fn new(reader: R, schema: Schema, separator: char) -> Result<Self> {
        let records = ReaderBuilder::new()
            .has_headers(false)
            .delimiter(separator_byte(separator)?)
            .trim(Trim::All)
            .quoting(false)
            .flexible(true)
            .from_reader(reader)
            .into_records();
        Ok(RecordReader {
            records,
            schema,
            separator,
            source_name: "<reader>".to_string(),
        })
    }

    /// Name reported in I/O errors, usually the file path.
    pub fn with_source_name(mut self, name: impl Into<String>) -> Self {
        self.source_name = name.into();
        self
    }

    fn parse_record(&self, record: &StringRecord) -> Result<IrisRecord> {
        let line = line_of(record);
        if record.len() != self.schema.field_count() {
            return Err(PipelineError::parse(
                line,
                format!(
                    "expected {} fields separated by {:?}, found {}",
                    self.schema.field_count(),
                    self.separator,
                    record.len()
                ),
            ));
        }

        let mut values = [0.0f32; FEATURE_COUNT];
        for (slot, &index) in values.iter_mut().zip(self.schema.feature_indices()) {
            *slot = self.parse_float(&record[index], index, line)?;
        }

        let label = &record[self.schema.label_index()];
        if label.is_empty() {
            return Err(PipelineError::parse(line, "label is empty"));
        }

        let [sepal_length, sepal_width, petal_length, petal_width] = values;
        Ok(IrisRecord::new(sepal_length, sepal_width, petal_length, petal_width, label))
    }

    fn parse_float(&self, raw: &str, index: usize, line: usize) -> Result<f32> {
        let value: f32 = raw.parse().map_err(|_| {
            PipelineError::parse(
                line,
                format!("{} value {raw:?} is not a number", self.schema.column_name(index)),
            )
        })?;
        if !value.is_finite() {
            return Err(PipelineError::parse(
                line,
                format!("{} value {raw:?} is not finite", self.schema.column_name(index)),
            ));
        }
        Ok(value)
    }

    fn convert_error(&self, err: csv::Error) -> PipelineError {
        let line = err.position().map_or(0, |pos| pos.line() as usize);
        let reason = err.to_string();
        match err.into_kind() {
            ErrorKind::Io(source) => PipelineError::Io {
                path: self.source_name.clone(),
                source,
            },
            ErrorKind::Utf8 { pos, .. } => PipelineError::parse(
                pos.map_or(line, |pos| pos.line() as usize),
                "line is not valid UTF-8",
            ),
            _ => PipelineError::parse(line, reason),
        }
    }
}

/// 1-based physical line on which `record` starts.
fn line_of(record: &StringRecord) -> usize {
    record.position().map_or(0, |pos| pos.line() as usize)
}

/// A line holding only whitespace comes back as one empty field.
fn is_blank(record: &StringRecord) -> bool {
    record.len() == 1 && record[0].is_empty()
}

impl<R: io::Read> Iterator for RecordReader<R> {
    type Item = Result<IrisRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let record = match self.records.next()? {
                Ok(record) => record,
                Err(err) => return Some(Err(self.convert_error(err))),
            };
            if is_blank(&record) {
                continue;
            }
            return Some(self.parse_record(&record));
        }
    }
}

/// Opens `path` for streaming. The file is closed when the reader is dropped.
pub fn open_records(
    path: impl AsRef<Path>,
    schema: Schema,
    separator: char,
) -> Result<RecordReader<BufReader<File>>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| PipelineError::Io {
        path: path.display().to_string(),
        source,
    })?;
    debug!("opened dataset {}", path.display());
    Ok(RecordReader::new(BufReader::new(file), schema, separator)?
        .with_source_name(path.display().to_string()))
}

/// Reads every record of `path`, aborting on the first malformed line.
pub fn load_records(path: impl AsRef<Path>, schema: Schema, separator: char) -> Result<Vec<IrisRecord>> {
    let path = path.as_ref();
    let records = open_records(path, schema, separator)?.collect::<Result<Vec<_>>>()?;
    info!("loaded {} records from {}", records.len(), path.display());
    Ok(records)
}
