use super::{
    errors::GlobalError,
    paginator::Paginator,
    result::GlobalResult,
    source::RecordSource,
};
use std::path::{Path, PathBuf};

pub const DEFAULT_DATA_FILE: &str = "Popular_Baby_Names.csv";
pub const DEFAULT_PAGE_SIZE: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginatorConfig {
    pub data_file: PathBuf,
    pub delimiter: u8,
    pub has_header: bool,
    pub default_page_size: usize,
}

impl Default for PaginatorConfig {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            delimiter: b',',
            has_header: true,
            default_page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PaginatorConfig {
    pub fn new<P: AsRef<Path>>(data_file: P) -> Self {
        Self {
            data_file: data_file.as_ref().to_path_buf(),
            ..Self::default()
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

    pub fn with_default_page_size(mut self, page_size: usize) -> Self {
        self.default_page_size = page_size;
        self
    }

    pub fn validate(&self) -> GlobalResult<()> {
        if self.default_page_size == 0 {
            return Err(GlobalError::InvalidConfig {
                reason: "default_page_size must be at least 1".to_string(),
            });
        }
        if self.delimiter == b'"' || self.delimiter == b'\n' || self.delimiter == b'\r' {
            return Err(GlobalError::InvalidConfig {
                reason: format!("delimiter {:?} is reserved", self.delimiter as char),
            });
        }
        Ok(())
    }
}


// Builder

pub struct PaginatorBuilder<S>
where
    S: RecordSource,
{
    source: Option<S>,
    default_page_size: usize,
}

impl<S> PaginatorBuilder<S>
where
    S: RecordSource,
{
    pub fn new() -> Self {
        Self {
            source: None,
            default_page_size: DEFAULT_PAGE_SIZE,
        }
    }

    pub fn with_source(mut self, source: S) -> Self {
        self.source = Some(source);
        self
    }

    pub fn with_default_page_size(mut self, page_size: usize) -> Self {
        self.default_page_size = page_size;
        self
    }

    pub fn build(self) -> GlobalResult<Paginator<S>> {
        let source = self.source.ok_or_else(|| GlobalError::InvalidConfig {
            reason: "record source must be provided via with_source()".to_string(),
        })?;
        if self.default_page_size == 0 {
            return Err(GlobalError::InvalidConfig {
                reason: "default_page_size must be at least 1".to_string(),
            });
        }
        Ok(Paginator::with_default_page_size(source, self.default_page_size))
    }
}

impl<S> Default for PaginatorBuilder<S>
where
    S: RecordSource,
{
    fn default() -> Self {
        Self::new()
    }
}
