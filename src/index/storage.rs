use super::PARALLEL_BUILD_THRESHOLD;
use crate::model::IndexStats;
use arc_swap::ArcSwap;
use rayon::prelude::*;
use std::{
    collections::BTreeMap,
    ops::RangeBounds,
    sync::Arc,
};


// PositionalIndex - original position -> record

// Ключи это исходные позиции записей, а не текущие слоты.
// Удаление оставляет дыру, соседние позиции не сдвигаются.
// Каждое изменение публикует новую карту целиком, поэтому
// читатель всегда видит согласованный снимок.
pub struct PositionalIndex<T>
where
    T: Send + Sync,
{
    positions: ArcSwap<BTreeMap<usize, Arc<T>>>,
    total_positions: usize,
}

impl<T> PositionalIndex<T>
where
    T: Send + Sync + 'static,
{
    // Dense build: record i lands on position i
    pub fn from_records(items: &[Arc<T>]) -> Self {
        let positions: BTreeMap<usize, Arc<T>> = if items.len() < PARALLEL_BUILD_THRESHOLD {
            items
                .iter()
                .enumerate()
                .map(|(position, item)| (position, Arc::clone(item)))
                .collect()
        } else {
            items
                .par_iter()
                .with_min_len(10_000)
                .enumerate()
                .map(|(position, item)| (position, Arc::clone(item)))
                .collect()
        };
        Self {
            positions: ArcSwap::from_pointee(positions),
            total_positions: items.len(),
        }
    }

    pub fn snapshot(&self) -> IndexSnapshot<T> {
        IndexSnapshot {
            positions: self.positions.load_full(),
        }
    }

    pub fn get(&self, position: usize) -> Option<Arc<T>> {
        self.positions.load().get(&position).cloned()
    }

    #[inline]
    pub fn contains(&self, position: usize) -> bool {
        self.positions.load().contains_key(&position)
    }

    // Number of present positions
    #[inline]
    pub fn len(&self) -> usize {
        self.positions.load().len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.load().is_empty()
    }

    // Number of positions assigned at build time, deleted ones included
    #[inline]
    pub fn total_positions(&self) -> usize {
        self.total_positions
    }

    pub fn first_position(&self) -> Option<usize> {
        self.positions.load().keys().next().copied()
    }

    pub fn last_position(&self) -> Option<usize> {
        self.positions.load().keys().next_back().copied()
    }

    pub fn next_present(&self, from: usize) -> Option<usize> {
        self.snapshot().next_present(from)
    }

    pub fn positions(&self) -> Vec<usize> {
        self.positions.load().keys().copied().collect()
    }

    pub fn range_items<R>(&self, range: R) -> Vec<Arc<T>>
    where
        R: RangeBounds<usize>,
    {
        self.positions
            .load()
            .range(range)
            .map(|(_, item)| Arc::clone(item))
            .collect()
    }

    // Out-of-band deletion. The paginator never calls this itself.
    pub fn delete(&self, position: usize) -> Option<Arc<T>> {
        if !self.contains(position) {
            return None;
        }
        let previous = self.positions.rcu(|current| {
            let mut next = BTreeMap::clone(current);
            next.remove(&position);
            next
        });
        previous.get(&position).cloned()
    }

    // Returns how many of the given positions were present
    pub fn delete_many(&self, positions: &[usize]) -> usize {
        if positions.is_empty() {
            return 0;
        }
        let previous = self.positions.rcu(|current| {
            let mut next = BTreeMap::clone(current);
            for position in positions {
                next.remove(position);
            }
            next
        });
        let mut unique = positions.to_vec();
        unique.sort_unstable();
        unique.dedup();
        unique
            .iter()
            .filter(|position| previous.contains_key(*position))
            .count()
    }

    pub fn stats(&self) -> IndexStats {
        let guard = self.positions.load();
        let present_positions = guard.len();
        IndexStats {
            total_positions: self.total_positions,
            present_positions,
            deleted_positions: self.total_positions.saturating_sub(present_positions),
            first_position: guard.keys().next().copied(),
            last_position: guard.keys().next_back().copied(),
        }
    }
}


// IndexSnapshot - frozen view used by one page scan

pub struct IndexSnapshot<T> {
    positions: Arc<BTreeMap<usize, Arc<T>>>,
}

impl<T> Clone for IndexSnapshot<T> {
    fn clone(&self) -> Self {
        Self {
            positions: Arc::clone(&self.positions),
        }
    }
}

impl<T> IndexSnapshot<T> {
    #[inline]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn get(&self, position: usize) -> Option<&Arc<T>> {
        self.positions.get(&position)
    }

    // Smallest present position >= from. None once past the last key.
    #[inline]
    pub fn next_present(&self, from: usize) -> Option<usize> {
        self.positions.range(from..).next().map(|(position, _)| *position)
    }

    // Same walk as next_present, also handing back the record
    #[inline]
    pub fn next_entry(&self, from: usize) -> Option<(usize, &Arc<T>)> {
        self.positions.range(from..).next().map(|(position, item)| (*position, item))
    }

    pub fn last_position(&self) -> Option<usize> {
        self.positions.keys().next_back().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &Arc<T>)> {
        self.positions.iter().map(|(position, item)| (*position, item))
    }
}


#[cfg(test)]
mod unit_tests {
    use super::*;
    use std::thread;

    fn letters() -> Vec<Arc<&'static str>> {
        ["a", "b", "c", "d", "e"].into_iter().map(Arc::new).collect()
    }

    #[test]
    fn test_dense_build_keys_match_sequence() {
        let index = PositionalIndex::from_records(&letters());
        assert_eq!(index.len(), 5);
        assert_eq!(index.positions(), vec![0, 1, 2, 3, 4]);
        assert_eq!(index.get(3).as_deref(), Some(&"d"));
        assert!(index.stats().is_dense());
    }

    #[test]
    fn test_parallel_build_same_as_sequential() {
        let items: Vec<Arc<usize>> = (0..PARALLEL_BUILD_THRESHOLD + 17).map(Arc::new).collect();
        let index = PositionalIndex::from_records(&items);
        assert_eq!(index.len(), items.len());
        assert_eq!(index.last_position(), Some(items.len() - 1));
        assert!(index.snapshot().iter().all(|(position, item)| position == **item));
    }

    #[test]
    fn test_delete_leaves_gap_without_shifting() {
        let index = PositionalIndex::from_records(&letters());
        assert_eq!(index.delete(2).as_deref(), Some(&"c"));
        assert_eq!(index.delete(2), None);
        assert_eq!(index.get(3).as_deref(), Some(&"d"));
        assert_eq!(index.next_present(2), Some(3));
        assert_eq!(index.total_positions(), 5);

        let stats = index.stats();
        assert_eq!(stats.present_positions, 4);
        assert_eq!(stats.deleted_positions, 1);
        assert!((stats.deletion_ratio() - 0.2).abs() < f64::EPSILON);
    }

    #[test]
    fn test_delete_many_counts_present_only() {
        let index = PositionalIndex::from_records(&letters());
        assert_eq!(index.delete_many(&[0, 0, 4, 9]), 2);
        assert_eq!(index.first_position(), Some(1));
        assert_eq!(index.last_position(), Some(3));
        assert_eq!(index.snapshot().last_position(), Some(3));
        assert_eq!(index.next_present(4), None);
    }

    #[test]
    fn test_snapshot_unaffected_by_later_delete() {
        let index = PositionalIndex::from_records(&letters());
        let before = index.snapshot();
        index.delete(1);
        assert_eq!(before.len(), 5);
        assert!(before.get(1).is_some());
        assert_eq!(index.snapshot().len(), 4);
    }

    #[test]
    fn test_concurrent_deletes_all_applied() {
        let items: Vec<Arc<usize>> = (0..1000).map(Arc::new).collect();
        let index = Arc::new(PositionalIndex::from_records(&items));

        let handles: Vec<_> = (0..4)
            .map(|worker| {
                let index = Arc::clone(&index);
                thread::spawn(move || {
                    for position in (worker..1000).step_by(4).filter(|p| p % 2 == 0) {
                        index.delete(position);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(index.len(), 500);
        assert!(index.positions().iter().all(|p| p % 2 == 1));
    }
}
