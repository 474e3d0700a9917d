// std imports
use std::cmp::Ordering;
use std::collections::BinaryHeap;

// 3rd party imports
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Heap entry, ordered so the worst entry is on top of the heap
struct FilterEntry<T> {
    score: f64,
    insertion: usize,
    item: T,
}

impl<T> FilterEntry<T> {
    /// Greater means worse: lower score, or same score and inserted later
    fn worse_cmp(&self, other: &Self) -> Ordering {
        other
            .score
            .total_cmp(&self.score)
            .then(self.insertion.cmp(&other.insertion))
    }
}

impl<T> PartialEq for FilterEntry<T> {
    fn eq(&self, other: &Self) -> bool {
        self.worse_cmp(other) == Ordering::Equal
    }
}

impl<T> Eq for FilterEntry<T> {}

impl<T> PartialOrd for FilterEntry<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for FilterEntry<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.worse_cmp(other)
    }
}

/// Keeps the K best items by score in memory bounded by K.
/// Ties are resolved in favour of the earlier inserted item.
///
pub struct TopKFilter<T> {
    capacity: usize,
    heap: BinaryHeap<FilterEntry<T>>,
    insertions: usize,
}

impl<T> TopKFilter<T> {
    /// Creates a new filter
    ///
    /// # Arguments
    /// * `capacity` - K, 0 keeps nothing
    ///
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            heap: BinaryHeap::with_capacity(capacity.min(1 << 16) + 1),
            insertions: 0,
        }
    }

    /// Offers an item. Returns true if the item is retained (for now).
    ///
    /// # Arguments
    /// * `score` - Preliminary score
    /// * `item` - Item
    ///
    pub fn push(&mut self, score: f64, item: T) -> bool {
        let entry = FilterEntry {
            score,
            insertion: self.insertions,
            item,
        };
        self.insertions += 1;
        if self.capacity == 0 {
            return false;
        }
        if self.heap.len() < self.capacity {
            self.heap.push(entry);
            return true;
        }
        match self.heap.peek() {
            // the new entry is inserted later, so it only wins with a strictly higher score
            Some(worst) if entry.score > worst.score => {
                self.heap.pop();
                self.heap.push(entry);
                true
            }
            _ => false,
        }
    }

    /// Number of offered items
    pub fn get_insertions(&self) -> usize {
        self.insertions
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Returns the retained items with their scores, best first, ties in insertion order
    ///
    pub fn into_sorted_vec(self) -> Vec<(f64, T)> {
        // ascending by "worse" is best first
        let mut entries = self.heap.into_vec();
        entries.sort();
        entries
            .into_iter()
            .map(|entry| (entry.score, entry.item))
            .collect()
    }

    /// Returns the retained items with their scores in insertion order
    ///
    pub fn into_insertion_ordered_vec(self) -> Vec<(f64, T)> {
        let mut entries = self.heap.into_vec();
        entries.sort_by_key(|entry| entry.insertion);
        entries
            .into_iter()
            .map(|entry| (entry.score, entry.item))
            .collect()
    }
}

/// Uniform random sample of at most `capacity` items from a stream of unknown length
/// (reservoir sampling). Memory is bounded by the capacity.
///
pub struct ReservoirSample<T> {
    capacity: usize,
    items: Vec<T>,
    seen: usize,
    rng: StdRng,
}

impl<T> ReservoirSample<T> {
    /// Creates a new sample
    ///
    /// # Arguments
    /// * `capacity` - Maximum sample size
    /// * `seed` - Seed, equal seeds and streams give equal samples
    ///
    pub fn new(capacity: usize, seed: u64) -> Self {
        Self {
            capacity,
            items: Vec::with_capacity(capacity.min(1 << 16)),
            seen: 0,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Offers an item. Returns true if the item is part of the sample (for now).
    ///
    pub fn push(&mut self, item: T) -> bool {
        self.seen += 1;
        if self.capacity == 0 {
            return false;
        }
        if self.items.len() < self.capacity {
            self.items.push(item);
            return true;
        }
        let idx = self.rng.gen_range(0..self.seen);
        if idx < self.capacity {
            self.items[idx] = item;
            return true;
        }
        false
    }

    /// Number of offered items
    pub fn get_seen(&self) -> usize {
        self.seen
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn into_vec(self) -> Vec<T> {
        self.items
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_against_brute_force() {
        let mut rng = StdRng::seed_from_u64(11);
        for capacity in [0, 1, 5, 20, 200] {
            // coarse scores to force ties
            let scores: Vec<f64> = (0..150).map(|_| rng.gen_range(0..30) as f64 / 2.0).collect();
            let mut filter = TopKFilter::new(capacity);
            for (idx, score) in scores.iter().enumerate() {
                filter.push(*score, idx);
            }
            assert!(filter.len() <= capacity);

            let mut expected: Vec<(f64, usize)> =
                scores.iter().copied().enumerate().map(|(idx, score)| (score, idx)).collect();
            // stable sort keeps insertion order for ties
            expected.sort_by(|a, b| b.0.total_cmp(&a.0));
            expected.truncate(capacity);

            assert_eq!(filter.into_sorted_vec(), expected);
        }
    }

    #[test]
    fn test_zero_capacity() {
        let mut filter = TopKFilter::new(0);
        assert!(!filter.push(1.0, "a"));
        assert!(filter.is_empty());
        assert_eq!(filter.get_insertions(), 1);
    }

    #[test]
    fn test_insertion_ordered() {
        let mut filter = TopKFilter::new(3);
        for (item, score) in [("a", 1.0), ("b", 4.0), ("c", 2.0), ("d", 3.0), ("e", 0.5)] {
            filter.push(score, item);
        }
        assert_eq!(
            filter.into_insertion_ordered_vec(),
            vec![(4.0, "b"), (2.0, "c"), (3.0, "d")]
        );
    }

    #[test]
    fn test_reservoir_keeps_short_streams() {
        let mut sample = ReservoirSample::new(10, 3);
        for item in 0..7 {
            assert!(sample.push(item));
        }
        assert_eq!(sample.get_seen(), 7);
        assert_eq!(sample.into_vec(), (0..7).collect::<Vec<_>>());

        let mut empty = ReservoirSample::new(0, 3);
        assert!(!empty.push(1));
        assert!(empty.is_empty());
    }

    #[test]
    fn test_reservoir_is_bounded_and_uniform() {
        let mut counts = vec![0usize; 100];
        for seed in 0..2000 {
            let mut sample = ReservoirSample::new(10, seed);
            for item in 0..100 {
                sample.push(item);
            }
            assert_eq!(sample.len(), 10);
            assert_eq!(sample.get_seen(), 100);
            let items = sample.into_vec();
            let mut unique = items.clone();
            unique.sort();
            unique.dedup();
            assert_eq!(unique.len(), 10);
            for item in items {
                counts[item] += 1;
            }
        }
        // each item is expected 200 times
        assert!(counts.iter().all(|count| (120..=280).contains(count)));
    }

    #[test]
    fn test_reservoir_is_seeded() {
        let sample = |seed: u64| {
            let mut sample = ReservoirSample::new(5, seed);
            for item in 0..50 {
                sample.push(item);
            }
            sample.into_vec()
        };
        assert_eq!(sample(42), sample(42));
    }
}
