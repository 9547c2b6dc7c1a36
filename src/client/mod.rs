//! Endpoint façade
//!
//! [`GiphyClient`] has one method per API operation. List operations return a
//! [`PaginatedRequest`] that the caller drives; detail operations (translate,
//! random, get by id, channel) are one-shot async calls without retries.

use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

use crate::config::ClientConfig;
use crate::endpoint::{encode_path_segment, routes, Endpoint};
use crate::error::{GiphyError, GiphyResult};
use crate::models::{self, Category, Channel, Media, RequestKind, TermSuggestion};
use crate::request::{CallContext, Cursor, PaginatedRequest};
use crate::response::{Envelope, Page};
use crate::transport::{HttpTransport, Transport, WorkerPool};
use crate::{Language, MediaType, Rating};

/// Domain parameters shared by the operations. Fields an operation has no use
/// for are ignored (for example `lang` on trending).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct QueryOptions {
    /// GIFs or stickers
    pub media: MediaType,
    /// Content rating filter
    pub rating: Rating,
    /// Query language
    pub lang: Language,
    /// Offset of the first page
    pub offset: u32,
    /// Page size; the client's configured page size when `None`
    pub limit: Option<u32>,
}

impl QueryOptions {
    /// Set the media type
    pub fn media(mut self, media: MediaType) -> Self {
        self.media = media;
        self
    }

    /// Set the rating filter
    pub fn rating(mut self, rating: Rating) -> Self {
        self.rating = rating;
        self
    }

    /// Set the language
    pub fn lang(mut self, lang: Language) -> Self {
        self.lang = lang;
        self
    }

    /// Set the starting offset
    pub fn offset(mut self, offset: u32) -> Self {
        self.offset = offset;
        self
    }

    /// Set the page size
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Client for the GIPHY API
#[derive(Debug, Clone)]
pub struct GiphyClient {
    config: ClientConfig,
    ctx: CallContext,
}

impl GiphyClient {
    /// Client over HTTP, with a worker pool sized from `config`
    pub fn new(config: ClientConfig) -> GiphyResult<Self> {
        let pool = WorkerPool::new(config.max_concurrent_requests);
        let transport = HttpTransport::new(pool, config.timeout)?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    /// Client over a caller-supplied transport
    pub fn with_transport(config: ClientConfig, transport: Arc<dyn Transport>) -> Self {
        let ctx = CallContext::new(&config, transport);
        Self { config, ctx }
    }

    /// Active configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn cursor(&self, options: &QueryOptions) -> Cursor {
        Cursor::new(options.limit.unwrap_or(self.config.page_size), options.offset)
    }

    fn paginate<T, F>(&self, endpoint: Endpoint, cursor: Cursor, decode: F) -> PaginatedRequest<T>
    where
        T: Clone + Send + Sync + 'static,
        F: Fn(&Value, &Envelope, u32) -> GiphyResult<Page<T>> + Send + Sync + 'static,
    {
        PaginatedRequest::new(self.ctx.clone(), endpoint, cursor, decode)
    }

    fn media_request(
        &self,
        endpoint: Endpoint,
        kind: RequestKind,
        media: MediaType,
        cursor: Cursor,
    ) -> PaginatedRequest<Media> {
        self.paginate(endpoint, cursor, move |root, meta, offset| {
            models::media_page(root, meta, kind, media, offset)
        })
    }

    async fn fetch_one<T, F>(&self, endpoint: Endpoint, map: F) -> GiphyResult<T>
    where
        F: FnOnce(&Value) -> GiphyResult<T>,
    {
        let (_, root) = self.ctx.execute(&endpoint, None).await?;
        map(&root).inspect_err(|e| debug!(path = endpoint.path(), error = %e, "mapping failed"))
    }

    /// Search GIFs or stickers
    pub fn search(&self, query: &str, options: QueryOptions) -> PaginatedRequest<Media> {
        let endpoint = routes::search(options.media, query, options.rating, options.lang);
        self.media_request(endpoint, RequestKind::Search, options.media, self.cursor(&options))
    }

    /// Currently trending GIFs or stickers
    pub fn trending(&self, options: QueryOptions) -> PaginatedRequest<Media> {
        let endpoint = routes::trending(options.media, options.rating);
        self.media_request(endpoint, RequestKind::Trending, options.media, self.cursor(&options))
    }

    /// Look up several GIFs at once. All ids are fetched as a single page.
    pub fn gifs_by_ids<S: AsRef<str>>(&self, ids: &[S]) -> GiphyResult<PaginatedRequest<Media>> {
        if ids.is_empty() {
            return Err(GiphyError::InvalidArgument("at least one id is required".into()));
        }
        let cursor = Cursor::new(ids.len() as u32, 0);
        Ok(self.media_request(routes::gifs_by_ids(ids), RequestKind::GetAll, MediaType::Gif, cursor))
    }

    /// Top-level categories
    pub fn categories(&self, options: QueryOptions) -> PaginatedRequest<Category> {
        self.paginate(
            routes::categories(options.media),
            self.cursor(&options),
            |root, meta, offset| models::category_page(root, meta, RequestKind::Categories, None, offset),
        )
    }

    /// Subcategories of `category`
    pub fn subcategories(&self, category: &str, options: QueryOptions) -> PaginatedRequest<Category> {
        let parent = encode_path_segment(category);
        self.paginate(
            routes::subcategories(options.media, category),
            self.cursor(&options),
            move |root, meta, offset| {
                models::category_page(root, meta, RequestKind::SubCategories, Some(&parent), offset)
            },
        )
    }

    /// Content of `category/subcategory`
    pub fn category_content(
        &self,
        category: &str,
        subcategory: &str,
        options: QueryOptions,
    ) -> PaginatedRequest<Media> {
        let endpoint = routes::category_content(
            options.media,
            category,
            subcategory,
            options.rating,
            options.lang,
        );
        self.media_request(
            endpoint,
            RequestKind::CategoryContent,
            options.media,
            self.cursor(&options),
        )
    }

    /// Search terms related to `term`
    pub fn term_suggestions(&self, term: &str) -> PaginatedRequest<TermSuggestion> {
        let cursor = Cursor::new(self.config.page_size, 0);
        self.paginate(routes::term_suggestions(term), cursor, |root, meta, offset| {
            models::term_page(root, meta, offset)
        })
    }

    /// Child channels of channel `id`
    pub fn channel_children(&self, id: u64, options: QueryOptions) -> PaginatedRequest<Channel> {
        self.paginate(
            routes::channel_children(id),
            self.cursor(&options),
            |root, meta, offset| models::channel_page(root, meta, RequestKind::ChannelChildren, offset),
        )
    }

    /// Stickers in channel `id`
    pub fn channel_content(&self, id: u64, options: QueryOptions) -> PaginatedRequest<Media> {
        self.media_request(
            routes::channel_content(id),
            RequestKind::ChannelContent,
            MediaType::Sticker,
            self.cursor(&options),
        )
    }

    /// Translate a phrase into a single GIF or sticker
    pub async fn translate(&self, term: &str, options: QueryOptions) -> GiphyResult<Media> {
        let endpoint = routes::translate(options.media, term, options.rating, options.lang);
        self.fetch_one(endpoint, |root| {
            models::single_media(root, RequestKind::Translate, options.media)
        })
        .await
    }

    /// A random GIF or sticker, optionally limited to `tag` (empty for any)
    pub async fn random(&self, tag: &str, options: QueryOptions) -> GiphyResult<Media> {
        let endpoint = routes::random(options.media, tag, options.rating);
        self.fetch_one(endpoint, |root| {
            models::single_media(root, RequestKind::Random, options.media)
        })
        .await
    }

    /// A single GIF by id
    pub async fn gif_by_id(&self, id: &str) -> GiphyResult<Media> {
        if id.trim().is_empty() {
            return Err(GiphyError::InvalidArgument("id must not be empty".into()));
        }
        self.fetch_one(routes::gif_by_id(id), |root| {
            models::single_media(root, RequestKind::Get, MediaType::Gif)
        })
        .await
    }

    /// A single channel by id
    pub async fn channel(&self, id: u64) -> GiphyResult<Channel> {
        self.fetch_one(routes::channel(id), models::single_channel).await
    }
}
