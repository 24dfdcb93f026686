//! Parquet files read through the row-oriented record API

use std::fs::File;
use std::path::{Path, PathBuf};

use chrono::DateTime;
use parquet::file::reader::SerializedFileReader;
use parquet::record::reader::RowIter;
use parquet::record::{Field, Row};

use super::{stop_after_error, Records, RowSource, SourceResult};
use crate::error::SourceError;
use crate::value::Value;

/// A Parquet file whose rows are validated one by one.
///
/// Text columns surface as [`Value::Bytes`] and timestamp columns as
/// [`Value::Timestamp`], the way the producing service writes them.
#[derive(Debug, Clone)]
pub struct ParquetFile {
    path: PathBuf,
}

impl ParquetFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RowSource for ParquetFile {
    fn rows(&self) -> SourceResult<Records<'_, Value>> {
        let file = File::open(&self.path).map_err(|source| SourceError::Open {
            path: self.path.clone(),
            source,
        })?;
        let reader = SerializedFileReader::new(file)?;
        Ok(Box::new(
            stop_after_error(RowIter::from_file_into(Box::new(reader)))
                .map(|row| row.map_err(SourceError::from).and_then(|row| row_to_value(&row))),
        ))
    }
}

fn row_to_value(row: &Row) -> SourceResult<Value> {
    let columns = row
        .get_column_iter()
        .map(|(name, field)| Ok((name.clone(), field_to_value(field)?)))
        .collect::<SourceResult<Vec<_>>>()?;
    Ok(Value::map(columns))
}

fn field_to_value(field: &Field) -> SourceResult<Value> {
    let value = match field {
        Field::Null => Value::Null,
        Field::Bool(b) => Value::Bool(*b),
        Field::Byte(i) => Value::Int(i128::from(*i)),
        Field::Short(i) => Value::Int(i128::from(*i)),
        Field::Int(i) => Value::Int(i128::from(*i)),
        Field::Long(i) => Value::Int(i128::from(*i)),
        Field::UByte(i) => Value::Int(i128::from(*i)),
        Field::UShort(i) => Value::Int(i128::from(*i)),
        Field::UInt(i) => Value::Int(i128::from(*i)),
        Field::ULong(i) => Value::Int(i128::from(*i)),
        Field::Float(x) => Value::Float(f64::from(*x)),
        Field::Double(x) => Value::Float(*x),
        Field::Str(s) => Value::Bytes(s.as_bytes().to_vec()),
        Field::Bytes(b) => Value::Bytes(b.data().to_vec()),
        Field::TimestampMillis(ms) => {
            timestamp(ms.div_euclid(1_000), ms.rem_euclid(1_000) * 1_000_000)?
        }
        Field::TimestampMicros(us) => {
            timestamp(us.div_euclid(1_000_000), us.rem_euclid(1_000_000) * 1_000)?
        }
        Field::Group(row) => row_to_value(row)?,
        Field::ListInternal(list) => Value::List(
            list.elements()
                .iter()
                .map(field_to_value)
                .collect::<SourceResult<_>>()?,
        ),
        Field::MapInternal(map) => Value::map(
            map.entries()
                .iter()
                .map(|(key, value)| Ok((map_key(key), field_to_value(value)?)))
                .collect::<SourceResult<Vec<_>>>()?,
        ),
        other => Value::Str(other.to_string()),
    };
    Ok(value)
}

fn timestamp(secs: i64, nanos: i64) -> SourceResult<Value> {
    u32::try_from(nanos)
        .ok()
        .and_then(|subsec| DateTime::from_timestamp(secs, subsec))
        .map(|dt| Value::Timestamp(dt.naive_utc()))
        .ok_or_else(|| {
            SourceError::Decode(format!("timestamp {}s {}ns is out of range", secs, nanos))
        })
}

fn map_key(key: &Field) -> String {
    match key {
        Field::Str(s) => s.clone(),
        other => other.to_string(),
    }
}
