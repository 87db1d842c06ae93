use serde::Serialize;
use std::sync::Arc;

// One parsed row of the source data. Fields keep source order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(transparent)]
pub struct Record {
    fields: Vec<String>,
}

impl Record {
    pub fn new(fields: Vec<String>) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn get(&self, column: usize) -> Option<&str> {
        self.fields.get(column).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn into_fields(self) -> Vec<String> {
        self.fields
    }
}

impl From<Vec<String>> for Record {
    fn from(fields: Vec<String>) -> Self {
        Self::new(fields)
    }
}

impl From<Vec<&str>> for Record {
    fn from(fields: Vec<&str>) -> Self {
        Self::new(fields.into_iter().map(str::to_string).collect())
    }
}

/// One page of a hypermedia index query.
///
/// `next_index` is where the following page should start. It may point past
/// the last present position, so check it before reusing it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageResult<T> {
    pub index: usize,
    pub data: Vec<Arc<T>>,
    pub page_size: usize,
    pub next_index: usize,
}

impl<T> PageResult<T> {
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    // Number of absent positions the scan stepped over
    pub fn skipped(&self) -> usize {
        (self.next_index - self.index).saturating_sub(self.data.len())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexStats {
    pub total_positions: usize,
    pub present_positions: usize,
    pub deleted_positions: usize,
    pub first_position: Option<usize>,
    pub last_position: Option<usize>,
}

impl IndexStats {
    pub fn is_dense(&self) -> bool {
        self.deleted_positions == 0
    }

    pub fn deletion_ratio(&self) -> f64 {
        if self.total_positions == 0 {
            return 0.0;
        }
        self.deleted_positions as f64 / self.total_positions as f64
    }
}
