//! icon_search tool implementation.
//!
//! Runs one query through the coalescing pipeline and returns its entries.

use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use svgl_client::IconSearch;
use svgl_core::{Error, ResultEntry};

/// Input parameters for the icon_search tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct IconSearchParams {
    /// Brand or product name to look up (e.g. "github"). Blank returns a prompt entry.
    #[serde(default)]
    pub query: String,
}

/// Output structure for the icon_search tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct IconSearchOutput {
    /// The query as received.
    pub query: String,
    /// Result entries: two per icon (light, dark), or a single informational entry.
    pub entries: Vec<ResultEntry>,
}

/// Implementation of the icon_search tool.
pub async fn search_impl(search: &IconSearch, params: IconSearchParams) -> Result<CallToolResult, McpError> {
    let entries = search.query(&params.query).await;

    let output = IconSearchOutput { query: params.query, entries };
    let json = serde_json::to_string_pretty(&output)
        .map_err(|e| Error::InvalidInput(format!("Failed to serialize output: {e}")))?;

    Ok(CallToolResult::success(vec![Content::text(json)]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::testing::{output_of, test_search};
    use svgl_core::EntryKind;

    #[tokio::test]
    async fn test_search_returns_entries() {
        let (search, _dir) = test_search();

        let params = IconSearchParams { query: "git".into() };
        let output: IconSearchOutput = output_of(&search_impl(&search, params).await.unwrap());

        assert_eq!(output.query, "git");
        assert_eq!(output.entries.len(), 4);
        assert_eq!(output.entries[0].title, "Git (light)");
        assert_eq!(output.entries[3].title, "GitHub (dark)");
    }

    #[tokio::test]
    async fn test_blank_query_is_prompt() {
        let (search, _dir) = test_search();

        let output: IconSearchOutput = output_of(&search_impl(&search, IconSearchParams::default()).await.unwrap());

        assert_eq!(output.entries.len(), 1);
        assert_eq!(output.entries[0].kind, EntryKind::Prompt);
    }

    #[tokio::test]
    async fn test_unknown_icon_is_no_results() {
        let (search, _dir) = test_search();

        let params = IconSearchParams { query: "zzz".into() };
        let output: IconSearchOutput = output_of(&search_impl(&search, params).await.unwrap());

        assert_eq!(output.entries.len(), 1);
        assert_eq!(output.entries[0].kind, EntryKind::NoResults);
    }
}
