use super::errors::{
    GlobalError,
    SourceError,
};

pub type SourceResult<T> = Result<T,SourceError>;
pub type GlobalResult<T> = Result<T,GlobalError>;
