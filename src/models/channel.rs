//! Channels (sticker packs)

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::media::Media;
use super::parse::{opt_object, opt_string, opt_u64};
use super::user::User;
use super::RequestKind;
use crate::error::{GiphyError, GiphyResult};
use crate::MediaType;

/// Tag attached to a channel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub struct ChannelTag {
    pub id: Option<u64>,
    pub channel: Option<u64>,
    pub tag: Option<String>,
    pub rank: Option<i64>,
}

impl ChannelTag {
    /// Map one tag object; every field is optional
    pub fn from_json(json: &Value) -> Self {
        Self {
            id: opt_u64(json, "id"),
            channel: opt_u64(json, "channel"),
            tag: opt_string(json, "tag"),
            rank: json.get("rank").and_then(Value::as_i64),
        }
    }
}

/// A channel, such as a sticker pack
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub struct Channel {
    pub id: u64,
    pub slug: Option<String>,
    pub display_name: Option<String>,
    pub short_display_name: Option<String>,
    pub channel_type: Option<String>,
    pub content_type: Option<String>,
    pub description: Option<String>,
    pub banner_image: Option<String>,
    pub featured_gif: Option<Media>,
    pub user: Option<User>,
    pub tags: Vec<ChannelTag>,
    /// Parent channels, root first
    pub ancestors: Vec<Channel>,
}

impl Channel {
    /// Map one channel; `id` is required
    pub fn from_json(json: &Value, kind: RequestKind) -> GiphyResult<Self> {
        let id = json
            .get("id")
            .and_then(Value::as_u64)
            .ok_or_else(|| GiphyError::Mapping("couldn't map channel: missing `id`".into()))?;

        let featured_gif = opt_object(json, "featured_gif")
            .map(|g| Media::from_json(g, kind, MediaType::Gif))
            .transpose()?;
        let user = opt_object(json, "user").map(User::from_json).transpose()?;
        let ancestors = json
            .get("ancestors")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .map(|a| Channel::from_json(a, kind))
                    .collect::<GiphyResult<Vec<_>>>()
            })
            .transpose()?
            .unwrap_or_default();
        let tags = json
            .get("tags")
            .and_then(Value::as_array)
            .map(|items| items.iter().map(ChannelTag::from_json).collect())
            .unwrap_or_default();

        Ok(Self {
            id,
            slug: opt_string(json, "slug"),
            display_name: opt_string(json, "display_name"),
            short_display_name: opt_string(json, "short_display_name"),
            channel_type: opt_string(json, "type"),
            content_type: opt_string(json, "content_type"),
            description: opt_string(json, "description"),
            banner_image: opt_string(json, "banner_image"),
            featured_gif,
            user,
            tags,
            ancestors,
        })
    }
}
