//! GIFs and stickers

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::str::FromStr;

use super::images::Images;
use super::parse::{opt_bool, opt_date, opt_object, opt_string, required_str, string_list};
use super::user::User;
use super::RequestKind;
use crate::error::GiphyResult;
use crate::{MediaType, Rating};

/// A GIF or sticker. Two media are equal when their ids are.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[allow(missing_docs)]
pub struct Media {
    pub id: String,
    pub url: String,
    pub media_type: MediaType,
    pub rating: Option<Rating>,
    pub caption: Option<String>,
    pub slug: Option<String>,
    pub import_date: Option<NaiveDateTime>,
    pub trending_date: Option<NaiveDateTime>,
    pub create_date: Option<NaiveDateTime>,
    pub update_date: Option<NaiveDateTime>,
    pub indexable: Option<String>,
    pub content: Option<String>,
    pub bitly: Option<String>,
    pub bitly_gif: Option<String>,
    pub embed: Option<String>,
    pub source: Option<String>,
    pub source_tld: Option<String>,
    pub source_post_url: Option<String>,
    pub tags: Vec<String>,
    pub featured_tags: Vec<String>,
    pub is_hidden: Option<bool>,
    pub is_removed: Option<bool>,
    pub is_community: Option<bool>,
    pub is_anonymous: Option<bool>,
    pub is_featured: Option<bool>,
    pub is_realtime: Option<bool>,
    pub is_indexable: Option<bool>,
    pub is_sticker: Option<bool>,
    pub user: Option<User>,
    pub images: Option<Images>,
}

impl Media {
    /// Map one media object. `id` and `url` are required.
    ///
    /// The random endpoint may return renditions flattened into the media
    /// object itself; those are picked up when no `images` object is present.
    pub fn from_json(json: &Value, kind: RequestKind, media_type: MediaType) -> GiphyResult<Self> {
        let id = required_str(json, "id", "media")?;
        let url = required_str(json, "url", "media")?;

        let user = opt_object(json, "user").map(User::from_json).transpose()?;

        let images = match opt_object(json, "images") {
            Some(images) => Some(Images::from_json(images, &id)),
            None if kind == RequestKind::Random => Some(Images::from_flattened(json, &id)),
            None => None,
        };

        Ok(Self {
            rating: opt_string(json, "rating").and_then(|r| Rating::from_str(&r).ok()),
            caption: opt_string(json, "caption"),
            slug: opt_string(json, "slug"),
            import_date: opt_date(json, "import_datetime"),
            trending_date: opt_date(json, "trending_datetime"),
            create_date: opt_date(json, "create_datetime"),
            update_date: opt_date(json, "update_datetime"),
            indexable: opt_string(json, "indexable"),
            content: opt_string(json, "content"),
            bitly: opt_string(json, "bitly"),
            bitly_gif: opt_string(json, "bitly_gif"),
            embed: opt_string(json, "embed"),
            source: opt_string(json, "source"),
            source_tld: opt_string(json, "source_tld"),
            source_post_url: opt_string(json, "source_post_url"),
            tags: string_list(json, "tags"),
            featured_tags: string_list(json, "featured_tags"),
            is_hidden: opt_bool(json, "is_hidden"),
            is_removed: opt_bool(json, "is_removed"),
            is_community: opt_bool(json, "is_community"),
            is_anonymous: opt_bool(json, "is_anonymous"),
            is_featured: opt_bool(json, "is_featured"),
            is_realtime: opt_bool(json, "is_realtime"),
            is_indexable: opt_bool(json, "is_indexable"),
            is_sticker: opt_bool(json, "is_sticker"),
            media_type,
            user,
            images,
            id,
            url,
        })
    }
}

impl PartialEq for Media {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Media {}

impl std::hash::Hash for Media {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
