//! Domain model mapping
//!
//! Stateless conversion of decoded response bodies into typed records. Each
//! model exposes a `from_json` mapper; the functions here map whole response
//! bodies (`data` + `pagination`) into [`Page`]s or single records and are the
//! decode steps the client wires onto its requests.

pub mod category;
pub mod channel;
pub mod images;
pub mod media;
pub mod parse;
pub mod term;
pub mod user;

pub use category::Category;
pub use channel::{Channel, ChannelTag};
pub use images::{Image, Images};
pub use media::Media;
pub use term::TermSuggestion;
pub use user::User;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{GiphyError, GiphyResult};
use crate::response::{Envelope, Page, Pagination};
use crate::MediaType;

/// Operation a response came from; disambiguates response shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[allow(missing_docs)]
pub enum RequestKind {
    Search,
    Trending,
    Translate,
    Random,
    Get,
    GetAll,
    TermSuggestions,
    Categories,
    SubCategories,
    CategoryContent,
    Channel,
    ChannelChildren,
    ChannelContent,
}

fn data_array<'a>(root: &'a Value, kind: RequestKind) -> GiphyResult<&'a Vec<Value>> {
    root.get("data")
        .and_then(Value::as_array)
        .ok_or_else(|| GiphyError::MissingData(format!("expected a `data` array for {kind:?}")))
}

fn data_object(root: &Value, kind: RequestKind) -> GiphyResult<&Value> {
    root.get("data")
        .filter(|v| v.is_object())
        .ok_or_else(|| GiphyError::MissingData(format!("expected a `data` object for {kind:?}")))
}

/// `pagination` block if present, otherwise one synthesized from the item count
fn page_info(root: &Value, count: usize, offset: u32) -> GiphyResult<Pagination> {
    match root.get("pagination") {
        Some(p) if p.is_object() => Pagination::from_json(p),
        _ => Ok(Pagination::synthesized(count, offset)),
    }
}

fn map_page<T, F>(
    root: &Value,
    meta: &Envelope,
    kind: RequestKind,
    offset: u32,
    map: F,
) -> GiphyResult<Page<T>>
where
    F: Fn(&Value) -> GiphyResult<T>,
{
    let items = data_array(root, kind)?
        .iter()
        .map(map)
        .collect::<GiphyResult<Vec<_>>>()?;
    let pagination = page_info(root, items.len(), offset)?;
    Ok(Page {
        items,
        pagination,
        meta: meta.clone(),
    })
}

/// Page of media (search, trending, ids, category content, channel content)
pub fn media_page(
    root: &Value,
    meta: &Envelope,
    kind: RequestKind,
    media_type: MediaType,
    offset: u32,
) -> GiphyResult<Page<Media>> {
    map_page(root, meta, kind, offset, |item| {
        Media::from_json(item, kind, media_type)
    })
}

/// Single media item (translate, random, get by id)
pub fn single_media(root: &Value, kind: RequestKind, media_type: MediaType) -> GiphyResult<Media> {
    Media::from_json(data_object(root, kind)?, kind, media_type)
}

/// Page of categories; `parent` is the enclosing category's encoded path for
/// subcategory listings
pub fn category_page(
    root: &Value,
    meta: &Envelope,
    kind: RequestKind,
    parent: Option<&str>,
    offset: u32,
) -> GiphyResult<Page<Category>> {
    map_page(root, meta, kind, offset, |item| Category::from_json(item, kind, parent))
}

/// Page of term suggestions
pub fn term_page(root: &Value, meta: &Envelope, offset: u32) -> GiphyResult<Page<TermSuggestion>> {
    map_page(
        root,
        meta,
        RequestKind::TermSuggestions,
        offset,
        TermSuggestion::from_json,
    )
}

/// Page of channels (channel children)
pub fn channel_page(
    root: &Value,
    meta: &Envelope,
    kind: RequestKind,
    offset: u32,
) -> GiphyResult<Page<Channel>> {
    map_page(root, meta, kind, offset, |item| Channel::from_json(item, kind))
}

/// Single channel
pub fn single_channel(root: &Value) -> GiphyResult<Channel> {
    Channel::from_json(data_object(root, RequestKind::Channel)?, RequestKind::Channel)
}
