// std imports
use std::sync::{
    atomic::{AtomicBool, AtomicUsize, Ordering},
    Arc,
};

// 3rd party imports
use crossbeam_queue::ArrayQueue;
use indicatif::ProgressStyle;
use metrics::counter;
use tracing::{debug, info, info_span, warn, Span};
use tracing_indicatif::span_ext::IndicatifSpanExt;

// internal imports
use crate::entities::spectrum::Spectrum;
use crate::errors::search_error::SearchError;
use crate::errors::search_worker_pool_error::SearchWorkerPoolError;
use crate::functions::search::{SearchUnitResult, UnitSearch};

/// Metric name for processed units
pub const SEARCHED_UNITS_METRIC: &str = "macpepsearch_searched_units";
/// Metric name for units which could not be completed
pub const PARTIAL_UNITS_METRIC: &str = "macpepsearch_partial_units";

/// Outcome of a single spectrum/charge unit
///
pub enum SearchUnitOutcome<C> {
    Completed(SearchUnitResult<C>),
    /// Unit failed with a recoverable error
    Partial {
        spectrum: Arc<Spectrum>,
        charge: u8,
        reason: String,
    },
}

impl<C> SearchUnitOutcome<C> {
    /// True if the unit was not searched or its results are incomplete
    pub fn is_partial(&self) -> bool {
        match self {
            Self::Completed(result) => result.is_partial(),
            Self::Partial { .. } => true,
        }
    }
}

/// Unit index, spectrum and charge
type SearchUnit = (usize, Arc<Spectrum>, u8);

type ThreadResult<C> = Result<Vec<(usize, SearchUnitOutcome<C>)>, SearchError>;

/// Runs a unit search for each spectrum and charge on a fixed number of threads
///
pub struct SearchWorkerPool;

impl SearchWorkerPool {
    /// Searches every charge of every spectrum. Outcomes are returned in input order.
    ///
    /// Recoverable errors are recorded as partial outcomes, any other error stops all threads
    /// and is returned. Setting the stop flag from outside aborts the search after the
    /// currently processed units.
    ///
    /// # Arguments
    /// * `search` - Unit search shared by all threads
    /// * `spectra` - Spectra to search
    /// * `num_threads` - Number of threads
    /// * `stop_flag` - Flag to abort the search
    ///
    pub fn run<C>(
        search: Arc<dyn UnitSearch<C>>,
        spectra: Vec<Arc<Spectrum>>,
        num_threads: usize,
        stop_flag: Arc<AtomicBool>,
    ) -> Result<Vec<SearchUnitOutcome<C>>, SearchWorkerPoolError>
    where
        C: Send + Sync + 'static,
    {
        if num_threads == 0 {
            return Err(SearchWorkerPoolError::NoThreads);
        }

        let units: Vec<SearchUnit> = spectra
            .into_iter()
            .flat_map(|spectrum| {
                spectrum
                    .get_charges()
                    .to_vec()
                    .into_iter()
                    .map(move |charge| (spectrum.clone(), charge))
            })
            .enumerate()
            .map(|(unit_idx, (spectrum, charge))| (unit_idx, spectrum, charge))
            .collect();
        let total_units = units.len();

        let unit_queue = Arc::new(ArrayQueue::new(total_units.max(1)));
        for unit in units.into_iter() {
            if let Err((_, spectrum, charge)) = unit_queue.push(unit) {
                return Err(SearchWorkerPoolError::UnitQueueFull(
                    spectrum.get_id().to_string(),
                    charge,
                ));
            }
        }

        info!("Searching {} units on {} threads", total_units, num_threads);
        let progress_span = info_span!("searching");
        progress_span.pb_set_style(&ProgressStyle::default_bar());
        progress_span.pb_set_length(total_units as u64);
        let progress_span_enter = progress_span.enter();

        let processed_units = Arc::new(AtomicUsize::new(0));

        let thread_handles: Vec<std::thread::JoinHandle<ThreadResult<C>>> = (0..num_threads)
            .map(|thread_id| {
                let search = search.clone();
                let unit_queue = unit_queue.clone();
                let processed_units = processed_units.clone();
                let stop_flag = stop_flag.clone();
                let progress_span = progress_span.clone();
                std::thread::spawn(move || {
                    Self::work(
                        thread_id,
                        search,
                        unit_queue,
                        processed_units,
                        stop_flag,
                        progress_span,
                    )
                })
            })
            .collect();

        let mut outcomes: Vec<(usize, SearchUnitOutcome<C>)> = Vec::with_capacity(total_units);
        let mut first_error: Option<SearchWorkerPoolError> = None;
        for (thread_id, handle) in thread_handles.into_iter().enumerate() {
            match handle.join() {
                Ok(Ok(thread_outcomes)) => outcomes.extend(thread_outcomes),
                Ok(Err(err)) => {
                    if first_error.is_none() {
                        first_error = Some(SearchWorkerPoolError::SearchThreadError(thread_id, err));
                    }
                }
                Err(err) => {
                    if first_error.is_none() {
                        first_error = Some(SearchWorkerPoolError::SearchThreadPanicError(err));
                    }
                }
            }
        }

        std::mem::drop(progress_span_enter);
        std::mem::drop(progress_span);

        if let Some(err) = first_error {
            return Err(err);
        }
        if !unit_queue.is_empty() {
            return Err(SearchWorkerPoolError::Aborted);
        }

        debug!(
            "Processed {} of {} units",
            processed_units.load(Ordering::Relaxed),
            total_units
        );
        outcomes.sort_by_key(|(unit_idx, _)| *unit_idx);
        Ok(outcomes.into_iter().map(|(_, outcome)| outcome).collect())
    }

    fn work<C>(
        thread_id: usize,
        search: Arc<dyn UnitSearch<C>>,
        unit_queue: Arc<ArrayQueue<SearchUnit>>,
        processed_units: Arc<AtomicUsize>,
        stop_flag: Arc<AtomicBool>,
        progress_span: Span,
    ) -> ThreadResult<C> {
        let mut outcomes = Vec::new();
        loop {
            if stop_flag.load(Ordering::Relaxed) {
                break;
            }
            let (unit_idx, spectrum, charge) = match unit_queue.pop() {
                Some(unit) => unit,
                None => break,
            };
            let outcome = match search.search_unit(spectrum.clone(), charge) {
                Ok(result) => SearchUnitOutcome::Completed(result),
                Err(err) if err.is_recoverable() => {
                    warn!(
                        "Spectrum {} with charge {} is incomplete: {}",
                        spectrum.get_id(),
                        charge,
                        err
                    );
                    SearchUnitOutcome::Partial {
                        spectrum,
                        charge,
                        reason: err.to_string(),
                    }
                }
                Err(err) => {
                    stop_flag.store(true, Ordering::Relaxed);
                    return Err(err);
                }
            };
            if outcome.is_partial() {
                counter!(PARTIAL_UNITS_METRIC).increment(1);
            }
            counter!(SEARCHED_UNITS_METRIC).increment(1);
            outcomes.push((unit_idx, outcome));
            processed_units.fetch_add(1, Ordering::Relaxed);
            progress_span.pb_inc(1);
        }
        debug!("Thread {} finished", thread_id);
        Ok(outcomes)
    }
}
