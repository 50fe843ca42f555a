//! MCP tool implementations.
//!
//! This module contains all tools exposed by the svgl server.

pub mod cache;
pub mod icon_copy;
pub mod icon_search;
