//! Uploader / channel owner profiles

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::parse::{opt_bool, opt_string, opt_u64, required_str};
use crate::error::GiphyResult;

/// Public profile of a GIPHY user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub struct User {
    pub username: String,
    pub id: Option<u64>,
    pub is_public: Option<bool>,
    pub suppress_chrome: Option<bool>,
    pub name: Option<String>,
    pub display_name: Option<String>,
    pub user_description: Option<String>,
    pub attribution_display_name: Option<String>,
    pub twitter: Option<String>,
    pub twitter_url: Option<String>,
    pub facebook_url: Option<String>,
    pub instagram_url: Option<String>,
    pub website_url: Option<String>,
    pub website_display_url: Option<String>,
    pub tumblr_url: Option<String>,
    pub avatar_url: Option<String>,
    pub banner_url: Option<String>,
    pub profile_url: Option<String>,
}

impl User {
    /// Map a `user` object; `username` is required
    pub fn from_json(json: &Value) -> GiphyResult<Self> {
        Ok(Self {
            username: required_str(json, "username", "user")?,
            id: opt_u64(json, "id"),
            is_public: opt_bool(json, "is_public"),
            suppress_chrome: opt_bool(json, "suppress_chrome"),
            name: opt_string(json, "name"),
            display_name: opt_string(json, "display_name"),
            user_description: opt_string(json, "user_description"),
            attribution_display_name: opt_string(json, "attribution_display_name"),
            twitter: opt_string(json, "twitter"),
            twitter_url: opt_string(json, "twitter_url"),
            facebook_url: opt_string(json, "facebook_url"),
            instagram_url: opt_string(json, "instagram_url"),
            website_url: opt_string(json, "website_url"),
            website_display_url: opt_string(json, "website_display_url"),
            tumblr_url: opt_string(json, "tumblr_url"),
            avatar_url: opt_string(json, "avatar_url"),
            banner_url: opt_string(json, "banner_url"),
            profile_url: opt_string(json, "profile_url"),
        })
    }
}
