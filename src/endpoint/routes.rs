//! API route table
//!
//! One constructor per API operation. Each returns an [`Endpoint`] template;
//! list routes leave `offset`/`limit` to the pagination engine, which
//! substitutes them per page.

use super::{encode_path_segment, Endpoint};
use crate::{Language, MediaType, Rating};

/// Production API root
pub const DEFAULT_BASE_URL: &str = "https://api.giphy.com/v1/";

/// Channel id of the sticker-packs root
pub const STICKERS_ROOT_CHANNEL_ID: u64 = 3143;

/// `{gifs|stickers}/search?q=...`
pub fn search(media: MediaType, query: &str, rating: Rating, lang: Language) -> Endpoint {
    Endpoint::get(format!("{}/search", media.path_prefix()))
        .with_query("q", query)
        .with_query("rating", rating)
        .with_query("lang", lang)
}

/// `{gifs|stickers}/trending`
pub fn trending(media: MediaType, rating: Rating) -> Endpoint {
    Endpoint::get(format!("{}/trending", media.path_prefix())).with_query("rating", rating)
}

/// `{gifs|stickers}/translate?s=...`
pub fn translate(media: MediaType, term: &str, rating: Rating, lang: Language) -> Endpoint {
    Endpoint::get(format!("{}/translate", media.path_prefix()))
        .with_query("s", term)
        .with_query("rating", rating)
        .with_query("lang", lang)
}

/// `{gifs|stickers}/random?tag=...`; an empty tag is omitted
pub fn random(media: MediaType, tag: &str, rating: Rating) -> Endpoint {
    let tag = Some(tag).filter(|t| !t.is_empty());
    Endpoint::get(format!("{}/random", media.path_prefix()))
        .with_optional_query("tag", tag)
        .with_query("rating", rating)
}

/// `gifs/{id}`
pub fn gif_by_id(id: &str) -> Endpoint {
    Endpoint::get(format!("gifs/{}", encode_path_segment(id)))
}

/// `gifs?ids=a,b,c`
pub fn gifs_by_ids<S: AsRef<str>>(ids: &[S]) -> Endpoint {
    let joined = ids.iter().map(|s| s.as_ref()).collect::<Vec<_>>().join(",");
    Endpoint::get("gifs").with_query("ids", joined)
}

/// `{gifs|stickers}/categories`
pub fn categories(media: MediaType) -> Endpoint {
    Endpoint::get(format!("{}/categories", media.path_prefix()))
}

/// `{gifs|stickers}/categories/{category}`
pub fn subcategories(media: MediaType, category: &str) -> Endpoint {
    Endpoint::get(format!(
        "{}/categories/{}",
        media.path_prefix(),
        encode_path_segment(category)
    ))
}

/// `{gifs|stickers}/categories/{category}/{subcategory}`
pub fn category_content(
    media: MediaType,
    category: &str,
    subcategory: &str,
    rating: Rating,
    lang: Language,
) -> Endpoint {
    Endpoint::get(format!(
        "{}/categories/{}/{}",
        media.path_prefix(),
        encode_path_segment(category),
        encode_path_segment(subcategory)
    ))
    .with_query("rating", rating)
    .with_query("lang", lang)
}

/// `queries/suggest/{term}`
pub fn term_suggestions(term: &str) -> Endpoint {
    Endpoint::get(format!("queries/suggest/{}", encode_path_segment(term)))
}

/// `stickers/packs/{id}`
pub fn channel(id: u64) -> Endpoint {
    Endpoint::get(format!("stickers/packs/{id}"))
}

/// `stickers/packs/{id}/children`
pub fn channel_children(id: u64) -> Endpoint {
    Endpoint::get(format!("stickers/packs/{id}/children"))
}

/// `stickers/packs/{id}/stickers`
pub fn channel_content(id: u64) -> Endpoint {
    Endpoint::get(format!("stickers/packs/{id}/stickers"))
}
