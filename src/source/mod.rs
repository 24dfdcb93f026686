//! Record sources
//!
//! A source either fails as a whole (it could not be opened) or yields its
//! records one by one, where each record may fail on its own.

#[cfg(feature = "parquet")]
mod columnar;

use std::fs::{self, File};
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use crate::error::SourceError;
use crate::value::Value;

#[cfg(feature = "parquet")]
pub use columnar::ParquetFile;

pub type SourceResult<T> = std::result::Result<T, SourceError>;

/// Iterator over the records of an opened source
pub type Records<'a, T> = Box<dyn Iterator<Item = SourceResult<T>> + 'a>;

/// A source holding exactly one JSON document
pub trait DocumentSource {
    fn read_document(&self) -> SourceResult<String>;
}

/// A source of newline separated JSON documents
pub trait LineSource {
    fn lines(&self) -> SourceResult<Records<'_, String>>;
}

/// A source of rows that are already decoded
pub trait RowSource {
    fn rows(&self) -> SourceResult<Records<'_, Value>>;
}

/// A file on disk
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn open_error(&self, source: std::io::Error) -> SourceError {
        SourceError::Open {
            path: self.path.clone(),
            source,
        }
    }
}

impl DocumentSource for FileSource {
    fn read_document(&self) -> SourceResult<String> {
        fs::read_to_string(&self.path).map_err(|e| self.open_error(e))
    }
}

impl LineSource for FileSource {
    fn lines(&self) -> SourceResult<Records<'_, String>> {
        let file = File::open(&self.path).map_err(|e| self.open_error(e))?;
        // opening a directory succeeds, reading it does not
        let metadata = file.metadata().map_err(|e| self.open_error(e))?;
        if metadata.is_dir() {
            return Err(self.open_error(io::Error::other("is a directory")));
        }
        Ok(Box::new(
            stop_after_error(BufReader::new(file).lines()).map(|line| line.map_err(SourceError::from)),
        ))
    }
}

/// End the iteration after the first failed read; a reader that failed
/// once keeps failing.
pub(crate) fn stop_after_error<T, E>(
    records: impl Iterator<Item = Result<T, E>>,
) -> impl Iterator<Item = Result<T, E>> {
    let mut failed = false;
    records.map_while(move |record| {
        if failed {
            return None;
        }
        failed = record.is_err();
        Some(record)
    })
}

/// In-memory text, one document per line in line mode
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    text: String,
}

impl MemorySource {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl DocumentSource for MemorySource {
    fn read_document(&self) -> SourceResult<String> {
        Ok(self.text.clone())
    }
}

impl LineSource for MemorySource {
    fn lines(&self) -> SourceResult<Records<'_, String>> {
        Ok(Box::new(self.text.lines().map(|line| Ok(line.to_string()))))
    }
}

/// Pre-decoded rows held in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryRows {
    rows: Vec<Value>,
}

impl MemoryRows {
    pub fn new(rows: Vec<Value>) -> Self {
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl FromIterator<Value> for MemoryRows {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl RowSource for MemoryRows {
    fn rows(&self) -> SourceResult<Records<'_, Value>> {
        Ok(Box::new(self.rows.iter().cloned().map(Ok)))
    }
}
