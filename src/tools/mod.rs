/// Additional functions based on the crate `fancy_regex`
pub mod fancy_regex;
/// Additional macros, e.g. for easy creation of collections
#[macro_use]
pub mod macros;
/// Threaded search over spectrum/charge units
pub mod search_worker_pool;
