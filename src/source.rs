use super::{
    config::PaginatorConfig,
    errors::SourceError,
    model::Record,
    result::SourceResult,
};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Supplies the raw ordered records a paginator indexes.
///
/// `load` is called at most once per paginator, on first access. Header or
/// metadata rows must already be dropped from the returned sequence.
pub trait RecordSource {
    type Item: Send + Sync + 'static;

    fn load(&self) -> SourceResult<Vec<Self::Item>>;

    // Human readable origin, used in logs
    fn describe(&self) -> String;

    /// Whether a loaded item holds a position without being data.
    ///
    /// Page scans step over vacant items the same way they step over
    /// deleted positions, but vacant items still count toward the index size.
    fn is_vacant(&self, _item: &Self::Item) -> bool {
        false
    }
}


// CsvSource

#[derive(Debug, Clone)]
pub struct CsvSource {
    path: PathBuf,
    delimiter: u8,
    has_header: bool,
}

impl CsvSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            delimiter: b',',
            has_header: true,
        }
    }

    pub fn from_config(config: &PaginatorConfig) -> Self {
        Self {
            path: config.data_file.clone(),
            delimiter: config.delimiter,
            has_header: config.has_header,
        }
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn with_header(mut self, has_header: bool) -> Self {
        self.has_header = has_header;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn path_display(&self) -> String {
        self.path.display().to_string()
    }
}

impl RecordSource for CsvSource {
    type Item = Record;

    fn load(&self) -> SourceResult<Vec<Record>> {
        let bytes = fs::read(&self.path).map_err(|err| SourceError::Open {
            path: self.path_display(),
            reason: err.to_string(),
        })?;

        // Rows may differ in width, like a plain csv reader allows.
        // The header is dropped below so blank lines before it count too.
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(false)
            .flexible(true)
            .from_reader(bytes.as_slice());

        let mut records = Vec::new();
        let mut row = csv::StringRecord::new();
        loop {
            let start = reader.position().byte() as usize;
            let more = reader.read_record(&mut row).map_err(|err| SourceError::Parse {
                path: self.path_display(),
                line: err.position().map(|pos| pos.line()).unwrap_or(0),
                reason: err.to_string(),
            })?;
            // The reader skips blank lines, each one still owns a position
            records.extend((0..blank_lines(&bytes, start)).map(|_| Record::default()));
            if !more {
                break;
            }
            records.push(Record::new(row.iter().map(str::to_string).collect()));
        }

        if self.has_header && !records.is_empty() {
            records.remove(0);
        }
        Ok(records)
    }

    fn is_vacant(&self, item: &Record) -> bool {
        item.is_empty()
    }

    fn describe(&self) -> String {
        format!("csv:{}", self.path_display())
    }
}


// Counts the empty lines in the run of line terminators at `start`.
// \r\n is one terminator. A terminator the reader left behind for the
// previous record is not a blank line.
fn blank_lines(bytes: &[u8], start: usize) -> usize {
    let terminator_len = |pos: usize| match bytes.get(pos) {
        Some(b'\r') if bytes.get(pos + 1) == Some(&b'\n') => 2,
        Some(b'\r') | Some(b'\n') => 1,
        _ => 0,
    };

    let mut pos = start;
    if start > 0 {
        match bytes[start - 1] {
            b'\n' => {}
            b'\r' => {
                if bytes.get(start) == Some(&b'\n') {
                    pos += 1;
                }
            }
            _ => pos += terminator_len(pos),
        }
    }

    let mut count = 0;
    loop {
        let len = terminator_len(pos);
        if len == 0 {
            return count;
        }
        count += 1;
        pos += len;
    }
}


// VecSource

#[derive(Debug, Clone, Default)]
pub struct VecSource<T> {
    items: Vec<T>,
}

impl<T> VecSource<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self { items }
    }
}

impl<T> From<Vec<T>> for VecSource<T> {
    fn from(items: Vec<T>) -> Self {
        Self::new(items)
    }
}

impl<T> RecordSource for VecSource<T>
where
    T: Clone + Send + Sync + 'static,
{
    type Item = T;

    fn load(&self) -> SourceResult<Vec<T>> {
        Ok(self.items.clone())
    }

    fn describe(&self) -> String {
        format!("memory:{} items", self.items.len())
    }
}
