use super::{
    config::{
        PaginatorBuilder,
        PaginatorConfig,
        DEFAULT_PAGE_SIZE,
    },
    errors::{
        ArgumentError,
        GlobalError,
    },
    index::PositionalIndex,
    model::{
        IndexStats,
        PageResult,
    },
    result::GlobalResult,
    source::{
        CsvSource,
        RecordSource,
    },
};
use parking_lot::Mutex;
use std::sync::{
    Arc,
    OnceLock,
};
use tracing::{debug, trace, warn};


// Paginator

/// Deletion-resilient hypermedia paginator.
///
/// Records are loaded from the source on first use and indexed by their
/// original position. Positions removed from the index later are skipped
/// by page queries, so every successful page holds exactly `page_size`
/// records and `next_index` tells the caller where to resume.
pub struct Paginator<S>
where
    S: RecordSource,
{
    source: S,
    default_page_size: usize,
    records: OnceLock<Arc<Vec<Arc<S::Item>>>>,
    index: OnceLock<PositionalIndex<S::Item>>,
    // Held only while the first load/build runs
    records_lock: Mutex<()>,
    index_lock: Mutex<()>,
}

impl Paginator<CsvSource> {
    pub fn from_config(config: &PaginatorConfig) -> GlobalResult<Self> {
        config.validate()?;
        Ok(Self::with_default_page_size(
            CsvSource::from_config(config),
            config.default_page_size,
        ))
    }
}

impl<S> Paginator<S>
where
    S: RecordSource,
{
    // Constructors

    pub fn new(source: S) -> Self {
        Self::with_default_page_size(source, DEFAULT_PAGE_SIZE)
    }

    pub(crate) fn with_default_page_size(source: S, default_page_size: usize) -> Self {
        Self {
            source,
            default_page_size,
            records: OnceLock::new(),
            index: OnceLock::new(),
            records_lock: Mutex::new(()),
            index_lock: Mutex::new(()),
        }
    }

    pub fn builder() -> PaginatorBuilder<S> {
        PaginatorBuilder::new()
    }

    // Cached data

    /// Full record sequence, loaded from the source on the first call.
    ///
    /// A failed load caches nothing, so a later call tries the source again.
    pub fn records(&self) -> GlobalResult<Arc<Vec<Arc<S::Item>>>> {
        if let Some(records) = self.records.get() {
            return Ok(Arc::clone(records));
        }
        let _guard = self.records_lock.lock();
        // Another thread may have finished the load while we waited
        if let Some(records) = self.records.get() {
            return Ok(Arc::clone(records));
        }

        let loaded = self.source.load().inspect_err(|err| {
            warn!(source = %self.source.describe(), error = %err, "record load failed");
        })?;
        let records: Arc<Vec<Arc<S::Item>>> = Arc::new(loaded.into_iter().map(Arc::new).collect());
        debug!(source = %self.source.describe(), rows = records.len(), "records loaded");

        let _ = self.records.set(Arc::clone(&records));
        Ok(records)
    }

    /// Position -> record map over `records()`, built on the first call.
    pub fn positional_index(&self) -> GlobalResult<&PositionalIndex<S::Item>> {
        if let Some(index) = self.index.get() {
            return Ok(index);
        }
        let _guard = self.index_lock.lock();
        if let Some(index) = self.index.get() {
            return Ok(index);
        }

        let records = self.records()?;
        let built = PositionalIndex::from_records(&records);
        debug!(positions = built.total_positions(), "positional index built");

        Ok(self.index.get_or_init(|| built))
    }

    pub fn is_loaded(&self) -> bool {
        self.records.get().is_some()
    }

    pub fn is_indexed(&self) -> bool {
        self.index.get().is_some()
    }

    // Page queries

    /// Collects `page_size` records starting at position `index`, stepping
    /// over deleted positions and positions the source marks vacant.
    ///
    /// `index` must fall in `[0, n)` where `n` is the number of positions
    /// still present. Fails with `IndexExhausted` when the scan passes the
    /// last present position before the page is full.
    pub fn get_page(&self, index: i64, page_size: i64) -> GlobalResult<PageResult<S::Item>> {
        if page_size < 1 {
            return Err(ArgumentError::PageSizeTooSmall { page_size }.into());
        }
        if index < 0 {
            return Err(ArgumentError::NegativeIndex { index }.into());
        }

        // One snapshot per query, a concurrent delete can not tear the page
        let snapshot = self.positional_index()?.snapshot();
        let size = snapshot.len();
        let start = usize::try_from(index)
            .ok()
            .filter(|start| *start < size)
            .ok_or(ArgumentError::IndexOutOfRange { index, size })?;
        let page_size = usize::try_from(page_size).unwrap_or(usize::MAX);

        let mut data = Vec::with_capacity(page_size.min(size));
        let mut cursor = start;
        while data.len() < page_size {
            let Some((position, item)) = snapshot.next_entry(cursor) else {
                warn!(
                    index = start,
                    page_size,
                    collected = data.len(),
                    cursor,
                    last_position = ?snapshot.last_position(),
                    "index exhausted before page was filled"
                );
                return Err(GlobalError::IndexExhausted {
                    index: start,
                    page_size,
                    collected: data.len(),
                    cursor,
                });
            };
            cursor = position + 1;
            if !self.source.is_vacant(item) {
                data.push(Arc::clone(item));
            }
        }

        trace!(index = start, page_size, next_index = cursor, "page collected");
        Ok(PageResult {
            index: start,
            data,
            page_size,
            next_index: cursor,
        })
    }

    // get_page with the configured default size
    pub fn page(&self, index: i64) -> GlobalResult<PageResult<S::Item>> {
        self.get_page(index, i64::try_from(self.default_page_size).unwrap_or(i64::MAX))
    }

    pub fn default_page_size(&self) -> usize {
        self.default_page_size
    }

    pub fn index_stats(&self) -> GlobalResult<IndexStats> {
        Ok(self.positional_index()?.stats())
    }

    pub fn source(&self) -> &S {
        &self.source
    }
}
