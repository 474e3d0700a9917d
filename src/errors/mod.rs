/// Errors of candidate generation, search and calibration
pub mod search_error;
/// Errors of the search worker pool
pub mod search_worker_pool_error;
