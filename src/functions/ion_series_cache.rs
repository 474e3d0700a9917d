// std imports
use std::collections::HashMap;
use std::sync::{Arc, OnceLock, RwLock};

// 3rd party imports
use metrics::counter;
use tracing::debug;

// internal imports
use crate::entities::ion_series::IonSeries;

/// Metric name for cache hits
pub const ION_SERIES_CACHE_HITS_METRIC: &str = "macpepsearch_ion_series_cache_hits";
/// Metric name for cache misses
pub const ION_SERIES_CACHE_MISSES_METRIC: &str = "macpepsearch_ion_series_cache_misses";

/// Key of a cached ion series
///
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct IonSeriesKey {
    pub peptide_idx: usize,
    pub charge: u8,
    pub is_decoy: bool,
}

impl IonSeriesKey {
    pub fn new(peptide_idx: usize, charge: u8, is_decoy: bool) -> Self {
        Self {
            peptide_idx,
            charge,
            is_decoy,
        }
    }
}

type CacheSlot = Arc<OnceLock<Option<Arc<IonSeries>>>>;

/// Read through cache for ion series shared between worker threads.
/// Each key is constructed at most once, entries are never replaced.
/// Peptides without a predictable series are cached as None.
///
#[derive(Default)]
pub struct IonSeriesCache {
    slots: RwLock<HashMap<IonSeriesKey, CacheSlot>>,
}

impl IonSeriesCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the slot for the key, inserting an empty one if missing
    fn get_slot(&self, key: IonSeriesKey) -> CacheSlot {
        // entries are only inserted, a poisoned map is still consistent
        if let Some(slot) = self
            .slots
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(&key)
        {
            return slot.clone();
        }
        self.slots
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .entry(key)
            .or_default()
            .clone()
    }

    /// Returns the cached ion series for the key or builds it with `build`.
    /// Concurrent callers for the same key wait for the first construction.
    ///
    /// # Arguments
    /// * `key` - Cache key
    /// * `build` - Constructs the ion series, None if it cannot be predicted
    ///
    pub fn get_or_insert_with<F>(&self, key: IonSeriesKey, build: F) -> Option<Arc<IonSeries>>
    where
        F: FnOnce() -> Option<IonSeries>,
    {
        let slot = self.get_slot(key);
        let mut is_miss = false;
        let ion_series = slot
            .get_or_init(|| {
                is_miss = true;
                build().map(Arc::new)
            })
            .clone();
        if is_miss {
            counter!(ION_SERIES_CACHE_MISSES_METRIC).increment(1);
        } else {
            counter!(ION_SERIES_CACHE_HITS_METRIC).increment(1);
        }
        ion_series
    }

    /// Number of keys in the cache
    pub fn len(&self) -> usize {
        self.slots
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops all entries
    pub fn clear(&self) {
        let mut slots = self
            .slots
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        debug!("Dropping {} cached ion series", slots.len());
        slots.clear();
    }
}

#[cfg(test)]
mod test {
    // std imports
    use std::sync::atomic::{AtomicUsize, Ordering};

    // internal imports
    use super::*;
    use crate::chemistry::mass_basis::MassBasis;

    #[test]
    fn test_at_most_once_construction() {
        let cache = Arc::new(IonSeriesCache::new());
        let constructions = Arc::new(AtomicUsize::new(0));
        let thread_handles: Vec<std::thread::JoinHandle<Vec<Arc<IonSeries>>>> = (0..8)
            .map(|_| {
                let thread_cache = cache.clone();
                let thread_constructions = constructions.clone();
                std::thread::spawn(move || {
                    (0..20)
                        .map(|idx| {
                            thread_cache
                                .get_or_insert_with(IonSeriesKey::new(idx % 4, 2, false), || {
                                    thread_constructions.fetch_add(1, Ordering::SeqCst);
                                    IonSeries::predict("PEPTIDEK", None, 2, MassBasis::Monoisotopic)
                                })
                                .unwrap()
                        })
                        .collect()
                })
            })
            .collect();
        let results: Vec<Vec<Arc<IonSeries>>> = thread_handles
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .collect();
        assert_eq!(constructions.load(Ordering::SeqCst), 4);
        assert_eq!(cache.len(), 4);
        // all threads share the same instance per key
        for thread_results in results.iter() {
            for (idx, ion_series) in thread_results.iter().enumerate() {
                assert!(Arc::ptr_eq(ion_series, &results[0][idx]));
            }
        }
    }

    #[test]
    fn test_keys_and_clear() {
        let cache = IonSeriesCache::new();
        let target = cache
            .get_or_insert_with(IonSeriesKey::new(0, 2, false), || {
                IonSeries::predict("PEPTIDEK", None, 2, MassBasis::Monoisotopic)
            })
            .unwrap();
        // decoy flag is part of the key
        let decoy = cache
            .get_or_insert_with(IonSeriesKey::new(0, 2, true), || {
                IonSeries::predict("PEDITPEK", None, 2, MassBasis::Monoisotopic)
            })
            .unwrap();
        assert!(!Arc::ptr_eq(&target, &decoy));
        // unpredictable series are cached as well
        assert!(cache
            .get_or_insert_with(IonSeriesKey::new(1, 2, false), || None)
            .is_none());
        assert_eq!(cache.len(), 3);
        cache.clear();
        assert!(cache.is_empty());
    }
}
