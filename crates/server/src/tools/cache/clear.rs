//! cache_clear tool implementation.
//!
//! Drops every cached search result and deletes the stored icon files.

use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use svgl_client::IconSearch;
use svgl_core::Error;

/// Output from the cache_clear tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CacheClearOutput {
    /// Number of SVG files deleted.
    pub deleted: usize,
    /// Directory that was cleared.
    pub cache_dir: String,
}

/// Implementation of the cache_clear tool.
pub async fn clear_impl(search: &IconSearch) -> Result<CallToolResult, McpError> {
    let deleted = search.clear_cache().await?;

    let output = CacheClearOutput { deleted, cache_dir: search.cache_dir().display().to_string() };
    let json = serde_json::to_string_pretty(&output)
        .map_err(|e| Error::InvalidInput(format!("Failed to serialize output: {e}")))?;

    Ok(CallToolResult::success(vec![Content::text(json)]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::testing::{output_of, test_search};

    #[tokio::test]
    async fn test_clear_after_search() {
        let (search, dir) = test_search();
        search.query("git").await;

        let output: CacheClearOutput = output_of(&clear_impl(&search).await.unwrap());

        assert_eq!(output.deleted, 6);
        assert_eq!(output.cache_dir, dir.path().display().to_string());
        assert!(search.copy_content(1, svgl_core::Theme::Light).await.is_err());
    }

    #[tokio::test]
    async fn test_clear_empty() {
        let (search, _dir) = test_search();

        let output: CacheClearOutput = output_of(&clear_impl(&search).await.unwrap());
        assert_eq!(output.deleted, 0);
    }
}
