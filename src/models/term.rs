//! Search term suggestions

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::parse::required_str;
use crate::error::GiphyResult;

/// A suggested search term
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TermSuggestion {
    /// Suggested term
    pub term: String,
}

impl TermSuggestion {
    /// Map `{"name": "..."}`
    pub fn from_json(json: &Value) -> GiphyResult<Self> {
        Ok(Self {
            term: required_str(json, "name", "term suggestion")?,
        })
    }
}
