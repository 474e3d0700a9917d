// std imports
use std::any::Any;

// 3rd party imports
use thiserror::Error;

// internal imports
use crate::errors::search_error::SearchError;

/// Errors which might occur while processing search units in parallel
#[derive(Error, Debug)]
pub enum SearchWorkerPoolError {
    #[error("Number of threads must be greater than 0")]
    NoThreads,
    #[error("Search thread {0} failed: {1}")]
    SearchThreadError(usize, SearchError),
    #[error("Search thread panicked with: {0:?}")]
    SearchThreadPanicError(Box<dyn Any + Send + 'static>),
    #[error("Failed to push unit for spectrum {0} with charge {1} into queue")]
    UnitQueueFull(String, u8),
    #[error("Search was aborted")]
    Aborted,
}
