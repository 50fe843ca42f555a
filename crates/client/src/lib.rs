//! Client side of svgl.
//!
//! This crate provides the SVGL HTTP client, the rate limiter and debounce
//! scheduler that gate it, the on-disk derived-asset store and the
//! [`IconSearch`] orchestrator tying them together.

pub mod api;
pub mod assets;
pub mod debounce;
pub mod limiter;
pub mod search;

pub use api::{ApiError, AssetSource, IconApi, SvglClient, SvglConfig};
pub use assets::{AssetPaths, DerivedAssetStore};
pub use debounce::Debouncer;
pub use limiter::{RateLimitConfig, RateLimiter};
pub use search::IconSearch;
