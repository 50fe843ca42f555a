//! Icon and result types shared by the client and the server.

use std::path::{Path, PathBuf};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::Error;

/// One icon as returned by the search API, after normalization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Item {
    pub id: u64,
    pub title: String,
    pub category: String,
    pub url: String,
    pub light_asset_url: String,
    pub dark_asset_url: String,
}

impl Item {
    /// Remote URL backing the given stored variant.
    pub fn asset_url(&self, variant: Variant) -> &str {
        match variant {
            Variant::Light => &self.light_asset_url,
            Variant::DarkRaw | Variant::DarkTransformed => &self.dark_asset_url,
        }
    }
}

/// Color scheme an icon entry is shown for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    /// Stored variant whose bytes are copied to the clipboard.
    pub fn raw_variant(self) -> Variant {
        match self {
            Theme::Light => Variant::Light,
            Theme::Dark => Variant::DarkRaw,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

impl std::str::FromStr for Theme {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(Error::InvalidInput(format!("unknown theme: {other}"))),
        }
    }
}

/// A file kept in the derived-asset store for one item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variant {
    /// Light icon, stored verbatim.
    Light,
    /// Dark icon, stored verbatim.
    DarkRaw,
    /// Dark icon with the optional background injected.
    DarkTransformed,
}

impl Variant {
    /// Suffix used in the on-disk file name.
    pub fn file_suffix(self) -> &'static str {
        match self {
            Variant::Light => "light",
            Variant::DarkRaw => "dark_raw",
            Variant::DarkTransformed => "dark",
        }
    }
}

/// Result set handed back to the host for one query.
pub type ResultSet = Vec<ResultEntry>;

/// What a result entry represents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EntryKind {
    /// A resolved icon; invoking it copies the file at `copy_path`.
    Icon { item_id: u64, theme: Theme, copy_path: PathBuf },
    /// Prompt shown for an empty query.
    Prompt,
    /// The API returned no icons.
    NoResults,
    /// The rate limit rejected the search.
    RateLimited,
    /// The search failed.
    Error {
        #[serde(skip_serializing_if = "Option::is_none")]
        status: Option<u16>,
    },
}

/// One row of the result list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ResultEntry {
    pub title: String,
    pub subtitle: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon_path: Option<PathBuf>,
    #[serde(flatten)]
    pub kind: EntryKind,
}

impl ResultEntry {
    pub fn icon(item: &Item, theme: Theme, icon_path: PathBuf, copy_path: PathBuf) -> Self {
        Self {
            title: format!("{} ({})", item.title, theme.as_str()),
            subtitle: item.url.clone(),
            icon_path: Some(icon_path),
            kind: EntryKind::Icon { item_id: item.id, theme, copy_path },
        }
    }

    pub fn prompt() -> Self {
        Self {
            title: "Search SVGL icons".into(),
            subtitle: "Type a brand or product name, e.g. \"github\"".into(),
            icon_path: None,
            kind: EntryKind::Prompt,
        }
    }

    pub fn no_results(term: &str) -> Self {
        Self {
            title: "No icons found".into(),
            subtitle: format!("Nothing matched \"{term}\""),
            icon_path: None,
            kind: EntryKind::NoResults,
        }
    }

    /// Build the synthetic entry surfaced for a failed query.
    ///
    /// Returns `None` for cancellation, which resolves to an empty result set.
    pub fn from_error(err: &Error) -> Option<Self> {
        let (title, subtitle, kind) = match err {
            Error::Canceled => return None,
            Error::RateLimitExceeded => (
                "Too many searches".to_string(),
                "Rate limit reached, try again later".to_string(),
                EntryKind::RateLimited,
            ),
            Error::HttpStatus { status, reason } => (
                "Search failed".to_string(),
                format!("HTTP {status} ({reason})"),
                EntryKind::Error { status: Some(*status) },
            ),
            Error::Network(msg) => {
                ("Search failed".to_string(), format!("Network error: {msg}"), EntryKind::Error { status: None })
            }
            Error::Parse(msg) => (
                "Search failed".to_string(),
                format!("Unexpected response from the API: {msg}"),
                EntryKind::Error { status: None },
            ),
            other => ("Search failed".to_string(), other.to_string(), EntryKind::Error { status: None }),
        };

        Some(Self { title, subtitle, icon_path: None, kind })
    }

    /// Path whose contents the host copies when the entry is invoked.
    pub fn copy_path(&self) -> Option<&Path> {
        match &self.kind {
            EntryKind::Icon { copy_path, .. } => Some(copy_path),
            _ => None,
        }
    }

    pub fn is_icon(&self) -> bool {
        matches!(self.kind, EntryKind::Icon { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item() -> Item {
        Item {
            id: 7,
            title: "GitHub".into(),
            category: "Software".into(),
            url: "https://github.com".into(),
            light_asset_url: "https://svgl.app/library/github_light.svg".into(),
            dark_asset_url: "https://svgl.app/library/github_dark.svg".into(),
        }
    }

    #[test]
    fn test_icon_entry() {
        let entry = ResultEntry::icon(&item(), Theme::Dark, "/tmp/7_dark.svg".into(), "/tmp/7_dark_raw.svg".into());
        assert_eq!(entry.title, "GitHub (dark)");
        assert_eq!(entry.subtitle, "https://github.com");
        assert_eq!(entry.icon_path.as_deref(), Some(Path::new("/tmp/7_dark.svg")));
        assert_eq!(entry.copy_path(), Some(Path::new("/tmp/7_dark_raw.svg")));
        assert!(entry.is_icon());
    }

    #[test]
    fn test_asset_url_per_variant() {
        let item = item();
        assert!(item.asset_url(Variant::Light).ends_with("github_light.svg"));
        assert!(item.asset_url(Variant::DarkRaw).ends_with("github_dark.svg"));
        assert!(item.asset_url(Variant::DarkTransformed).ends_with("github_dark.svg"));
    }

    #[test]
    fn test_theme_variants() {
        assert_eq!(Theme::Light.raw_variant(), Variant::Light);
        assert_eq!(Theme::Dark.raw_variant(), Variant::DarkRaw);
        assert_eq!("Dark".parse::<Theme>().unwrap(), Theme::Dark);
        assert!("sepia".parse::<Theme>().is_err());
    }

    #[test]
    fn test_error_entries() {
        let entry = ResultEntry::from_error(&Error::HttpStatus { status: 503, reason: "Service Unavailable".into() })
            .unwrap();
        assert_eq!(entry.subtitle, "HTTP 503 (Service Unavailable)");
        assert_eq!(entry.kind, EntryKind::Error { status: Some(503) });

        let entry = ResultEntry::from_error(&Error::RateLimitExceeded).unwrap();
        assert_eq!(entry.kind, EntryKind::RateLimited);

        assert!(ResultEntry::from_error(&Error::Canceled).is_none());
    }

    #[test]
    fn test_entry_serialization_is_tagged() {
        let json = serde_json::to_value(ResultEntry::prompt()).unwrap();
        assert_eq!(json["type"], "prompt");
        assert!(json.get("icon_path").is_none());

        let entry = ResultEntry::icon(&item(), Theme::Light, "/c/7_light.svg".into(), "/c/7_light.svg".into());
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["type"], "icon");
        assert_eq!(json["theme"], "light");
        assert_eq!(json["item_id"], 7);
    }
}
