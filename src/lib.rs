//! # GIPHY Client Library
//!
//! An async client SDK for the GIPHY media-search HTTP API: search, trending,
//! translate, random, category browsing, sticker-pack channels and term
//! suggestions.
//!
//! ## Features
//!
//! - **Paginated Request Engine**: a stateful request object per logical query that
//!   tracks offsets, de-duplicates in-flight calls, retries transient failures with
//!   quadratic backoff and notifies observers of every state change
//! - **Bounded Transport**: all calls share one worker pool capping concurrent requests
//! - **Envelope Decoding**: every response is checked for the mandatory `meta` block
//! - **Typed Models**: media, renditions, users, categories, channels, term suggestions
//!
//! ## Quick Start
//!
//! ```no_run
//! use giphy_client::client::QueryOptions;
//! use giphy_client::{ClientConfig, GiphyClient, MediaType, RequestEvent};
//! use futures_util::StreamExt;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = GiphyClient::new(ClientConfig::new("my-api-key"))?;
//!
//! let request = client.search("cats", QueryOptions::default().media(MediaType::Sticker));
//! let mut updates = request.subscribe();
//! request.trigger_next_page(false);
//!
//! if let Some(update) = updates.next().await {
//!     match update.event {
//!         RequestEvent::Page(page) => println!("{} results", page.items.len()),
//!         RequestEvent::Failed(e) => eprintln!("failed: {e}"),
//!         RequestEvent::Reset => {}
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - [`endpoint`] - Immutable request descriptors and the API route table
//! - [`transport`] - HTTP execution behind a bounded worker pool
//! - [`response`] - Envelope decoding and decoded pages
//! - [`request`] - The paginated, retrying request engine
//! - [`models`] - Mapping of decoded JSON into typed records
//! - [`client`] - One façade method per API operation
//! - [`config`] - Client configuration
//! - [`metrics`] - Prometheus metrics
//! - [`cli`] - The `giphy` command-line front-end

#![warn(missing_docs)]
#![warn(clippy::all)]

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// CLI command implementations
pub mod cli;

/// Endpoint façade
pub mod client;

/// Client configuration
pub mod config;

/// Request descriptors and routes
pub mod endpoint;

/// Error types and failure classification
pub mod error;

/// Metrics emission
pub mod metrics;

/// Domain model mapping
pub mod models;

/// Paginated request engine
pub mod request;

/// Envelope decoding
pub mod response;

/// HTTP transport
pub mod transport;

pub use client::GiphyClient;
pub use config::ClientConfig;
pub use error::{FailureKind, GiphyError, GiphyResult};
pub use request::{PaginatedRequest, RequestEvent, RequestSnapshot, RequestUpdate};
pub use response::{Envelope, Page, Pagination};

/// Kind of media an endpoint serves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    /// Animated GIF
    #[default]
    Gif,
    /// Sticker (transparent background)
    Sticker,
}

impl MediaType {
    /// Path prefix used by the API (`gifs` or `stickers`)
    pub fn path_prefix(&self) -> &'static str {
        match self {
            MediaType::Gif => "gifs",
            MediaType::Sticker => "stickers",
        }
    }
}

impl std::fmt::Display for MediaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            MediaType::Gif => "gif",
            MediaType::Sticker => "sticker",
        };
        write!(f, "{s}")
    }
}

impl FromStr for MediaType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "gif" => Ok(MediaType::Gif),
            "sticker" => Ok(MediaType::Sticker),
            _ => Err(format!("Invalid media type: {s}")),
        }
    }
}

/// Content rating filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Rating {
    /// Suitable for all ages
    #[serde(rename = "y")]
    Y,
    /// General audiences
    #[serde(rename = "g")]
    G,
    /// Parental guidance suggested
    #[serde(rename = "pg")]
    PG,
    /// Parents strongly cautioned
    #[serde(rename = "pg-13")]
    PG13,
    /// Restricted
    #[default]
    #[serde(rename = "r")]
    R,
    /// Not safe for work
    #[serde(rename = "nsfw")]
    Nsfw,
    /// No rating assigned
    #[serde(rename = "unrated")]
    Unrated,
}

impl std::fmt::Display for Rating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Rating::Y => "y",
            Rating::G => "g",
            Rating::PG => "pg",
            Rating::PG13 => "pg-13",
            Rating::R => "r",
            Rating::Nsfw => "nsfw",
            Rating::Unrated => "unrated",
        };
        write!(f, "{s}")
    }
}

impl FromStr for Rating {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "y" => Ok(Rating::Y),
            "g" => Ok(Rating::G),
            "pg" => Ok(Rating::PG),
            "pg-13" => Ok(Rating::PG13),
            "r" => Ok(Rating::R),
            "nsfw" => Ok(Rating::Nsfw),
            "unrated" => Ok(Rating::Unrated),
            _ => Err(format!("Invalid rating: {s}")),
        }
    }
}

/// Language used for search and translate queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[allow(missing_docs)]
pub enum Language {
    #[default]
    English,
    Spanish,
    Portuguese,
    Indonesian,
    French,
    Arabic,
    Turkish,
    Thai,
    Vietnamese,
    German,
    Italian,
    Japanese,
    ChineseSimplified,
    ChineseTraditional,
    Russian,
    Korean,
    Polish,
    Dutch,
    Romanian,
    Hungarian,
    Swedish,
    Czech,
    Hindi,
    Bengali,
    Danish,
    Farsi,
    Filipino,
    Finnish,
    Hebrew,
    Malay,
    Norwegian,
    Ukrainian,
}

impl Language {
    const CODES: [(Language, &'static str); 32] = [
        (Language::English, "en"),
        (Language::Spanish, "es"),
        (Language::Portuguese, "pt"),
        (Language::Indonesian, "id"),
        (Language::French, "fr"),
        (Language::Arabic, "ar"),
        (Language::Turkish, "tr"),
        (Language::Thai, "th"),
        (Language::Vietnamese, "vi"),
        (Language::German, "de"),
        (Language::Italian, "it"),
        (Language::Japanese, "ja"),
        (Language::ChineseSimplified, "zh-cn"),
        (Language::ChineseTraditional, "zh-tw"),
        (Language::Russian, "ru"),
        (Language::Korean, "ko"),
        (Language::Polish, "pl"),
        (Language::Dutch, "nl"),
        (Language::Romanian, "ro"),
        (Language::Hungarian, "hu"),
        (Language::Swedish, "sv"),
        (Language::Czech, "cs"),
        (Language::Hindi, "hi"),
        (Language::Bengali, "bn"),
        (Language::Danish, "da"),
        (Language::Farsi, "fa"),
        (Language::Filipino, "tl"),
        (Language::Finnish, "fi"),
        (Language::Hebrew, "iw"),
        (Language::Malay, "ms"),
        (Language::Norwegian, "no"),
        (Language::Ukrainian, "uk"),
    ];

    /// Two-letter (or regional) language code sent as the `lang` parameter
    pub fn code(&self) -> &'static str {
        Self::CODES
            .iter()
            .find(|(lang, _)| lang == self)
            .map(|(_, code)| *code)
            .unwrap_or("en")
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.to_lowercase();
        Self::CODES
            .iter()
            .find(|(_, code)| *code == needle)
            .map(|(lang, _)| *lang)
            .ok_or_else(|| format!("Invalid language code: {s}"))
    }
}

/// Rendition of a media item (size/format variant)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[allow(missing_docs)]
pub enum Rendition {
    Original,
    OriginalStill,
    Preview,
    Looping,
    FixedHeight,
    FixedHeightStill,
    FixedHeightDownsampled,
    FixedHeightSmall,
    FixedHeightSmallStill,
    FixedWidth,
    FixedWidthStill,
    FixedWidthDownsampled,
    FixedWidthSmall,
    FixedWidthSmallStill,
    Downsized,
    DownsizedSmall,
    DownsizedMedium,
    DownsizedLarge,
    DownsizedStill,
}

impl Rendition {
    /// Every rendition, in the order the API documents them
    pub const ALL: [Rendition; 19] = [
        Rendition::Original,
        Rendition::OriginalStill,
        Rendition::Preview,
        Rendition::Looping,
        Rendition::FixedHeight,
        Rendition::FixedHeightStill,
        Rendition::FixedHeightDownsampled,
        Rendition::FixedHeightSmall,
        Rendition::FixedHeightSmallStill,
        Rendition::FixedWidth,
        Rendition::FixedWidthStill,
        Rendition::FixedWidthDownsampled,
        Rendition::FixedWidthSmall,
        Rendition::FixedWidthSmallStill,
        Rendition::Downsized,
        Rendition::DownsizedSmall,
        Rendition::DownsizedMedium,
        Rendition::DownsizedLarge,
        Rendition::DownsizedStill,
    ];

    /// JSON key of this rendition inside an `images` object
    pub fn key(&self) -> &'static str {
        match self {
            Rendition::Original => "original",
            Rendition::OriginalStill => "original_still",
            Rendition::Preview => "preview",
            Rendition::Looping => "looping",
            Rendition::FixedHeight => "fixed_height",
            Rendition::FixedHeightStill => "fixed_height_still",
            Rendition::FixedHeightDownsampled => "fixed_height_downsampled",
            Rendition::FixedHeightSmall => "fixed_height_small",
            Rendition::FixedHeightSmallStill => "fixed_height_small_still",
            Rendition::FixedWidth => "fixed_width",
            Rendition::FixedWidthStill => "fixed_width_still",
            Rendition::FixedWidthDownsampled => "fixed_width_downsampled",
            Rendition::FixedWidthSmall => "fixed_width_small",
            Rendition::FixedWidthSmallStill => "fixed_width_small_still",
            Rendition::Downsized => "downsized",
            Rendition::DownsizedSmall => "downsized_small",
            Rendition::DownsizedMedium => "downsized_medium",
            Rendition::DownsizedLarge => "downsized_large",
            Rendition::DownsizedStill => "downsized_still",
        }
    }
}

impl std::fmt::Display for Rendition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

impl FromStr for Rendition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Rendition::ALL
            .iter()
            .find(|r| r.key() == s)
            .copied()
            .ok_or_else(|| format!("Invalid rendition: {s}"))
    }
}
