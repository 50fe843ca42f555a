//! Search request building and validation.

use serde::Serialize;
use url::Url;

use super::ApiError;

/// Query parameters for `GET /?search=<term>`.
#[derive(Debug, Clone, Serialize, Default, PartialEq, Eq)]
pub struct SearchRequest {
    pub search: String,
}

impl SearchRequest {
    pub fn new(term: &str) -> Self {
        Self { search: term.trim().to_string() }
    }

    /// Validate the search term.
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.search.is_empty() {
            return Err(ApiError::InvalidQuery("query cannot be empty".to_string()));
        }

        Ok(())
    }

    /// Build the request URL against `base`, percent-encoding the term.
    pub fn to_url(&self, base: &Url) -> Url {
        let mut url = base.clone();
        url.query_pairs_mut().clear().append_pair("search", &self.search);
        url
    }
}
