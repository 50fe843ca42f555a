//! Search API response types and normalization.
//!
//! The API describes each icon's assets with a `route` that is either a bare
//! URL (one file for both themes) or an object with separate `light` and
//! `dark` URLs. Both shapes decode into the same `RouteUrls`.

use serde::Deserialize;
use svgl_core::Item;

use super::ApiError;

/// Raw icon entry from the search API.
#[derive(Debug, Deserialize)]
pub struct ApiItem {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub category: Category,
    pub route: AssetRoute,
    #[serde(default)]
    pub url: String,
}

/// Asset route as sent by the API.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum AssetRoute {
    Single(String),
    Themed { light: String, dark: String },
}

/// Normalized light/dark asset URLs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteUrls {
    pub light: String,
    pub dark: String,
}

impl AssetRoute {
    pub fn urls(&self) -> RouteUrls {
        match self {
            AssetRoute::Single(url) => RouteUrls { light: url.clone(), dark: url.clone() },
            AssetRoute::Themed { light, dark } => RouteUrls { light: light.clone(), dark: dark.clone() },
        }
    }
}

/// Category as sent by the API: a single name or a list of names.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Category {
    One(String),
    Many(Vec<String>),
}

impl Default for Category {
    fn default() -> Self {
        Category::One(String::new())
    }
}

impl Category {
    fn joined(self) -> String {
        match self {
            Category::One(name) => name,
            Category::Many(names) => names.join(", "),
        }
    }
}

impl From<ApiItem> for Item {
    fn from(raw: ApiItem) -> Self {
        let RouteUrls { light, dark } = raw.route.urls();
        Item {
            id: raw.id,
            title: raw.title,
            category: raw.category.joined(),
            url: raw.url,
            light_asset_url: light,
            dark_asset_url: dark,
        }
    }
}

/// Decode a search response body into normalized items, preserving order.
pub fn decode_items(body: &[u8]) -> Result<Vec<Item>, ApiError> {
    let raw: Vec<ApiItem> = serde_json::from_slice(body).map_err(|e| ApiError::Parse(e.to_string()))?;
    Ok(raw.into_iter().map(Item::from).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE_JSON: &str = r#"[
        {
            "id": 12,
            "title": "GitHub",
            "category": "Software",
            "route": {
                "light": "https://svgl.app/library/github_light.svg",
                "dark": "https://svgl.app/library/github_dark.svg"
            },
            "wordmark": {
                "light": "https://svgl.app/library/github_wordmark_light.svg",
                "dark": "https://svgl.app/library/github_wordmark_dark.svg"
            },
            "url": "https://github.com",
            "brandUrl": "https://brand.github.com"
        },
        {
            "id": 31,
            "title": "Git",
            "category": ["Software", "Devtool"],
            "route": "https://svgl.app/library/git.svg",
            "url": "https://git-scm.com"
        }
    ]"#;

    #[test]
    fn test_bare_string_route() {
        let route: AssetRoute = serde_json::from_str(r#""https://x/icon.svg""#).unwrap();
        assert_eq!(
            route.urls(),
            RouteUrls { light: "https://x/icon.svg".to_string(), dark: "https://x/icon.svg".to_string() }
        );
    }

    #[test]
    fn test_object_route() {
        let route: AssetRoute = serde_json::from_str(r#"{"light": "https://x/l.svg", "dark": "https://x/d.svg"}"#).unwrap();
        assert_eq!(route.urls().light, "https://x/l.svg");
        assert_eq!(route.urls().dark, "https://x/d.svg");
    }

    #[test]
    fn test_decode_items_preserves_order() {
        let items = decode_items(FIXTURE_JSON.as_bytes()).unwrap();
        assert_eq!(items.len(), 2);

        let first = &items[0];
        assert_eq!(first.id, 12);
        assert_eq!(first.title, "GitHub");
        assert_eq!(first.category, "Software");
        assert_eq!(first.light_asset_url, "https://svgl.app/library/github_light.svg");
        assert_eq!(first.dark_asset_url, "https://svgl.app/library/github_dark.svg");

        let second = &items[1];
        assert_eq!(second.id, 31);
        assert_eq!(second.category, "Software, Devtool");
        assert_eq!(second.light_asset_url, second.dark_asset_url);
    }

    #[test]
    fn test_empty_array() {
        let items = decode_items(b"[]").unwrap();
        assert!(items.is_empty());
    }

    #[test]
    fn test_malformed_body() {
        let result = decode_items(b"<html>oops</html>");
        assert!(matches!(result, Err(ApiError::Parse(_))));

        let result = decode_items(br#"{"error": "not found"}"#);
        assert!(matches!(result, Err(ApiError::Parse(_))));
    }

    #[test]
    fn test_route_missing_dark_is_rejected() {
        let result = decode_items(br#"[{"id": 1, "title": "X", "route": {"light": "https://x/l.svg"}}]"#);
        assert!(result.is_err());
    }
}
