//! Renditions of a media item

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use super::parse::{opt_string, opt_u32, opt_u64};
use crate::Rendition;

/// One rendition (size/format variant) of a media item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    /// Id of the owning media item
    pub media_id: String,
    /// Which rendition this is
    pub rendition: Rendition,
    /// GIF URL
    pub url: Option<String>,
    /// Still-frame URL
    pub still_url: Option<String>,
    /// GIF size in bytes
    pub size: Option<u64>,
    /// Width in pixels
    pub width: Option<u32>,
    /// Height in pixels
    pub height: Option<u32>,
    /// Frame count
    pub frames: Option<u32>,
    /// WebP URL
    pub webp_url: Option<String>,
    /// WebP size in bytes
    pub webp_size: Option<u64>,
    /// MP4 URL
    pub mp4_url: Option<String>,
    /// MP4 size in bytes
    pub mp4_size: Option<u64>,
}

impl Image {
    fn empty(media_id: &str, rendition: Rendition) -> Self {
        Self {
            media_id: media_id.to_string(),
            rendition,
            url: None,
            still_url: None,
            size: None,
            width: None,
            height: None,
            frames: None,
            webp_url: None,
            webp_size: None,
            mp4_url: None,
            mp4_size: None,
        }
    }

    /// Map one rendition object
    pub fn from_json(json: &Value, media_id: &str, rendition: Rendition) -> Self {
        Self {
            url: opt_string(json, "url"),
            still_url: opt_string(json, "still_url"),
            size: opt_u64(json, "size"),
            width: opt_u32(json, "width"),
            height: opt_u32(json, "height"),
            frames: opt_u32(json, "frames"),
            webp_url: opt_string(json, "webp_url"),
            webp_size: opt_u64(json, "webp_size"),
            mp4_url: opt_string(json, "mp4_url"),
            mp4_size: opt_u64(json, "mp4_size"),
            ..Self::empty(media_id, rendition)
        }
    }
}

/// All renditions of a media item, keyed by rendition
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Images {
    /// Id of the owning media item
    pub media_id: String,
    renditions: BTreeMap<Rendition, Image>,
}

impl Images {
    /// Map an `images` object; unknown keys are ignored
    pub fn from_json(json: &Value, media_id: &str) -> Self {
        let renditions = Rendition::ALL
            .iter()
            .filter_map(|r| {
                json.get(r.key())
                    .filter(|v| v.is_object())
                    .map(|v| (*r, Image::from_json(v, media_id, *r)))
            })
            .collect();
        Self {
            media_id: media_id.to_string(),
            renditions,
        }
    }

    /// Map the flattened rendition keys the random endpoint returns
    /// (`image_url`, `fixed_height_small_url`, ...)
    pub fn from_flattened(json: &Value, media_id: &str) -> Self {
        let mut renditions = BTreeMap::new();

        let original = Image {
            url: opt_string(json, "image_url").or_else(|| opt_string(json, "image_original_url")),
            width: opt_u32(json, "image_width"),
            height: opt_u32(json, "image_height"),
            frames: opt_u32(json, "image_frames"),
            mp4_url: opt_string(json, "image_mp4_url"),
            ..Image::empty(media_id, Rendition::Original)
        };
        if original.url.is_some() {
            renditions.insert(Rendition::Original, original);
        }

        for rendition in [
            Rendition::FixedHeightDownsampled,
            Rendition::FixedWidthDownsampled,
            Rendition::FixedHeightSmall,
            Rendition::FixedWidthSmall,
            Rendition::FixedHeightSmallStill,
            Rendition::FixedWidthSmallStill,
        ] {
            let prefix = rendition.key();
            let Some(url) = opt_string(json, &format!("{prefix}_url")) else {
                continue;
            };
            let image = Image {
                url: Some(url),
                width: opt_u32(json, &format!("{prefix}_width")),
                height: opt_u32(json, &format!("{prefix}_height")),
                ..Image::empty(media_id, rendition)
            };
            renditions.insert(rendition, image);
        }

        Self {
            media_id: media_id.to_string(),
            renditions,
        }
    }

    /// Rendition by kind
    pub fn get(&self, rendition: Rendition) -> Option<&Image> {
        self.renditions.get(&rendition)
    }

    /// The original rendition
    pub fn original(&self) -> Option<&Image> {
        self.get(Rendition::Original)
    }

    /// Every present rendition in declaration order
    pub fn iter(&self) -> impl Iterator<Item = &Image> {
        self.renditions.values()
    }

    /// Number of present renditions
    pub fn len(&self) -> usize {
        self.renditions.len()
    }

    /// No renditions present
    pub fn is_empty(&self) -> bool {
        self.renditions.is_empty()
    }
}
