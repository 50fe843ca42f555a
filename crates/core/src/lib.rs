//! Core types and shared functionality for svgl.
//!
//! This crate provides:
//! - In-memory result cache with expiry
//! - Unified error types
//! - Configuration structures
//! - Icon and result data model

pub mod cache;
pub mod config;
pub mod error;
pub mod model;

pub use cache::{CacheEntry, CacheLifetime, ExpiringCache};
pub use config::{AppConfig, ConfigError, SearchSettings};
pub use error::Error;
pub use model::{EntryKind, Item, ResultEntry, ResultSet, Theme, Variant};
