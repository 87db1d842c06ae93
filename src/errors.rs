use thiserror::Error;

#[derive(Debug,Clone,PartialEq,Eq,Error)]
pub enum SourceError {
    #[error("can not open record source '{path}': {reason}")]
    Open{
        path: String,
        reason: String,
    },
    #[error("can not parse record source '{path}' at line {line}: {reason}")]
    Parse{
        path: String,
        line: u64,
        reason: String,
    },
}

#[derive(Debug,Clone,PartialEq,Eq,Error)]
pub enum ArgumentError {
    #[error("index must be non-negative, got {index}")]
    NegativeIndex{
        index: i64,
    },
    #[error("index {index} is out of range, valid range is [0, {size})")]
    IndexOutOfRange{
        index: i64,
        size: usize,
    },
    #[error("page_size must be at least 1, got {page_size}")]
    PageSizeTooSmall{
        page_size: i64,
    },
}

#[derive(Debug,Clone,PartialEq,Eq,Error)]
pub enum GlobalError {
    #[error("record source unavailable: {0}")]
    SourceUnavailable(#[from] SourceError),
    #[error("invalid argument: {0}")]
    InvalidArgument(#[from] ArgumentError),
    #[error(
        "index exhausted: page at {index} with size {page_size} collected only {collected} records before cursor {cursor} ran past the last position"
    )]
    IndexExhausted{
        index: usize,
        page_size: usize,
        collected: usize,
        cursor: usize,
    },
    #[error("invalid paginator config: {reason}")]
    InvalidConfig{
        reason: String,
    },
}

impl GlobalError {
    pub fn is_source_unavailable(&self) -> bool {
        matches!(self, Self::SourceUnavailable(_))
    }

    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }

    pub fn is_index_exhausted(&self) -> bool {
        matches!(self, Self::IndexExhausted { .. })
    }
}
