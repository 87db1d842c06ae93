pub mod storage;

pub use storage::{
    IndexSnapshot,
    PositionalIndex,
};

// Below this many records the index is keyed on the calling thread
pub const PARALLEL_BUILD_THRESHOLD: usize = 50_000;
