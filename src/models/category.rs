//! Browse categories

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::media::Media;
use super::parse::{opt_object, required_str};
use super::RequestKind;
use crate::error::{GiphyError, GiphyResult};
use crate::MediaType;

/// A top-level category or a subcategory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    /// Display name
    pub name: String,
    /// URL-safe name
    pub name_encoded: String,
    /// Path used to request this category's content
    /// (`name_encoded` or `parent/name_encoded`)
    pub encoded_path: String,
    /// Representative GIF
    pub gif: Option<Media>,
    /// Subcategories, when the listing embeds them
    pub subcategories: Vec<Category>,
}

impl Category {
    /// Map one category.
    ///
    /// `parent` is the encoded path of the enclosing category. It is required
    /// for subcategory listings and ignored for top-level listings.
    pub fn from_json(json: &Value, kind: RequestKind, parent: Option<&str>) -> GiphyResult<Self> {
        let name = required_str(json, "name", "category")?;
        let name_encoded = required_str(json, "name_encoded", "category")?;
        let gif = opt_object(json, "gif")
            .map(|g| Media::from_json(g, kind, MediaType::Gif))
            .transpose()?;

        match kind {
            RequestKind::SubCategories => {
                let parent = parent.ok_or_else(|| {
                    GiphyError::Mapping("a root category is required to map subcategories".into())
                })?;
                Ok(Self {
                    encoded_path: format!("{parent}/{name_encoded}"),
                    name,
                    name_encoded,
                    gif,
                    subcategories: Vec::new(),
                })
            }
            _ => {
                let subcategories = json
                    .get("subcategories")
                    .and_then(Value::as_array)
                    .map(|items| {
                        items
                            .iter()
                            .map(|sub| {
                                Category::from_json(sub, RequestKind::SubCategories, Some(&name_encoded))
                            })
                            .collect::<GiphyResult<Vec<_>>>()
                    })
                    .transpose()?
                    .unwrap_or_default();
                Ok(Self {
                    encoded_path: name_encoded.clone(),
                    name,
                    name_encoded,
                    gif,
                    subcategories,
                })
            }
        }
    }
}
