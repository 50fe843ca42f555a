//! icon_copy tool implementation.
//!
//! Returns the raw SVG text of a previously resolved icon, which is what the
//! host puts on the clipboard.

use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use svgl_client::IconSearch;
use svgl_core::{Error, Theme};

/// Parameters for the icon_copy tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct IconCopyParams {
    /// Icon id from an icon_search entry.
    pub id: u64,
    /// Variant to copy: "light" or "dark".
    pub theme: Theme,
}

/// Output from the icon_copy tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct IconCopyOutput {
    pub id: u64,
    pub theme: Theme,
    /// Raw SVG markup, without any injected background.
    pub svg: String,
}

/// Implementation of the icon_copy tool.
pub async fn copy_impl(search: &IconSearch, params: IconCopyParams) -> Result<CallToolResult, McpError> {
    let svg = search.copy_content(params.id, params.theme).await?;

    let output = IconCopyOutput { id: params.id, theme: params.theme, svg };
    let json = serde_json::to_string_pretty(&output)
        .map_err(|e| Error::InvalidInput(format!("Failed to serialize output: {e}")))?;

    Ok(CallToolResult::success(vec![Content::text(json)]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::testing::{SVG, output_of, test_search};

    #[tokio::test]
    async fn test_copy_after_search() {
        let (search, _dir) = test_search();
        search.query("git").await;

        let params = IconCopyParams { id: 2, theme: Theme::Dark };
        let output: IconCopyOutput = output_of(&copy_impl(&search, params).await.unwrap());

        assert_eq!(output.svg, SVG);
        assert!(!output.svg.contains("<rect"));
    }

    #[tokio::test]
    async fn test_copy_unknown_icon() {
        let (search, _dir) = test_search();

        let params = IconCopyParams { id: 42, theme: Theme::Light };
        let err = copy_impl(&search, params).await.unwrap_err();
        assert_eq!(err.code.0, -32001);
    }

    #[test]
    fn test_params_parse_theme() {
        let params: IconCopyParams = serde_json::from_str(r#"{"id": 1, "theme": "dark"}"#).unwrap();
        assert_eq!(params.theme, Theme::Dark);
        assert!(serde_json::from_str::<IconCopyParams>(r#"{"id": 1, "theme": "sepia"}"#).is_err());
    }
}
