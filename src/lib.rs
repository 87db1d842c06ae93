pub mod config;
pub mod errors;
pub mod result;
pub mod index;
pub mod model;
pub mod paginator;
pub mod source;

pub use config::{
    PaginatorBuilder,
    PaginatorConfig,
};
pub use errors::{
    ArgumentError,
    GlobalError,
    SourceError,
};
pub use index::{
    IndexSnapshot,
    PositionalIndex,
};
pub use model::{
    IndexStats,
    PageResult,
    Record,
};
pub use paginator::Paginator;
pub use source::{
    CsvSource,
    RecordSource,
    VecSource,
};
