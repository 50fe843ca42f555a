//! Cache tools.
//!
//! - `cache_clear`: drop cached searches and delete stored icon files

pub mod clear;

pub use clear::{CacheClearOutput, clear_impl};
