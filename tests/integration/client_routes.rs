//! End-to-end client calls against a local mock API

use axum::extract::{Path, Query};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::get;
use axum::{Json, Router};
use futures_util::StreamExt;
use giphy_client::client::QueryOptions;
use giphy_client::models::{Category, Channel, Media, TermSuggestion};
use giphy_client::{ClientConfig, GiphyClient, MediaType, PaginatedRequest, Rendition};
use serde_json::{json, Value};
use std::collections::HashMap;

use crate::support::{media_json, meta, spawn_server};

type Params = Query<HashMap<String, String>>;

fn page_of(data: Vec<Value>, total: usize, offset: usize) -> Json<Value> {
    Json(json!({
        "data": data,
        "pagination": {"total_count": total, "count": data.len(), "offset": offset},
        "meta": meta(200, "OK")
    }))
}

fn param(params: &HashMap<String, String>, name: &str) -> usize {
    params.get(name).and_then(|v| v.parse().ok()).unwrap_or(0)
}

async fn search(Query(params): Params, headers: HeaderMap) -> (StatusCode, Json<Value>) {
    if params.get("api_key").map(String::as_str) != Some("test-key") {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"message": "Invalid authentication credentials"})),
        );
    }
    assert!(headers
        .get("user-agent")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ua| ua.starts_with("giphy-client/")));

    let total = if params.get("q").map(String::as_str) == Some("cats") { 4 } else { 0 };
    let offset = param(&params, "offset");
    let limit = param(&params, "limit");
    let data = (offset..total.min(offset + limit))
        .map(|i| media_json(&format!("cat-{i}")))
        .collect();
    (StatusCode::OK, page_of(data, total, offset))
}

async fn sticker_trending(Query(params): Params) -> Json<Value> {
    let offset = param(&params, "offset");
    let data = (0..param(&params, "limit"))
        .map(|i| media_json(&format!("sticker-{}", offset + i)))
        .collect();
    page_of(data, 1000, offset)
}

async fn translate(Query(params): Params) -> Json<Value> {
    let term = params.get("s").cloned().unwrap_or_default();
    Json(json!({"data": media_json(&format!("translated-{term}")), "meta": meta(200, "OK")}))
}

async fn random(Query(params): Params) -> Json<Value> {
    let tag = params.get("tag").cloned().unwrap_or_else(|| "any".into());
    Json(json!({
        "data": {
            "type": "gif",
            "id": format!("random-{tag}"),
            "url": "https://giphy.com/gifs/random",
            "image_url": "https://media.giphy.com/random.gif",
            "image_original_url": "https://media.giphy.com/random.gif",
            "image_width": "320",
            "image_height": "240",
            "fixed_height_downsampled_url": "https://media.giphy.com/random-fhd.gif",
            "fixed_height_downsampled_width": "266",
            "fixed_height_downsampled_height": "200"
        },
        "meta": meta(200, "OK")
    }))
}

async fn by_id(Path(id): Path<String>) -> (StatusCode, Json<Value>) {
    if id == "missing" {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({"data": [], "meta": meta(404, "Not Found")})),
        );
    }
    (StatusCode::OK, Json(json!({"data": media_json(&id), "meta": meta(200, "OK")})))
}

async fn by_ids(Query(params): Params) -> Json<Value> {
    let ids = params.get("ids").cloned().unwrap_or_default();
    let data: Vec<Value> = ids.split(',').map(media_json).collect();
    let total = data.len();
    page_of(data, total, 0)
}

async fn categories() -> Json<Value> {
    page_of(
        vec![json!({
            "name": "Actions",
            "name_encoded": "actions",
            "gif": media_json("action-gif"),
            "subcategories": [{"name": "Cooking", "name_encoded": "cooking"}]
        })],
        1,
        0,
    )
}

async fn subcategories(Path(category): Path<String>) -> Json<Value> {
    page_of(
        vec![
            json!({"name": "Cooking", "name_encoded": "cooking"}),
            json!({"name": "Dancing", "name_encoded": format!("{category}-dancing")}),
        ],
        2,
        0,
    )
}

async fn category_content(Path((category, sub)): Path<(String, String)>) -> Json<Value> {
    page_of(vec![media_json(&format!("{category}-{sub}-1"))], 1, 0)
}

async fn suggest(Path(term): Path<String>) -> Json<Value> {
    Json(json!({
        "data": [{"name": format!("{term}s")}, {"name": format!("{term} memes")}],
        "meta": meta(200, "OK")
    }))
}

fn channel_json(id: u64) -> Value {
    json!({
        "id": id,
        "slug": format!("pack-{id}"),
        "display_name": format!("Pack {id}"),
        "type": "community",
        "content_type": "sticker",
        "tags": [{"id": 1, "channel": id, "tag": "fun", "rank": 0}],
        "ancestors": [{"id": 3143, "slug": "stickers"}]
    })
}

async fn channel(Path(id): Path<u64>) -> Json<Value> {
    Json(json!({"data": channel_json(id), "meta": meta(200, "OK")}))
}

async fn channel_children(Path(id): Path<u64>) -> Json<Value> {
    page_of(vec![channel_json(id * 10 + 1), channel_json(id * 10 + 2)], 2, 0)
}

async fn channel_stickers(Path(id): Path<u64>) -> Json<Value> {
    page_of(vec![media_json(&format!("pack-{id}-sticker"))], 1, 0)
}

fn router() -> Router {
    Router::new()
        .route("/v1/gifs", get(by_ids))
        .route("/v1/gifs/search", get(search))
        .route("/v1/stickers/trending", get(sticker_trending))
        .route("/v1/gifs/translate", get(translate))
        .route("/v1/gifs/random", get(random))
        .route("/v1/gifs/categories", get(categories))
        .route("/v1/gifs/categories/{category}", get(subcategories))
        .route("/v1/gifs/categories/{category}/{sub}", get(category_content))
        .route("/v1/gifs/{id}", get(by_id))
        .route("/v1/queries/suggest/{term}", get(suggest))
        .route("/v1/stickers/packs/{id}", get(channel))
        .route("/v1/stickers/packs/{id}/children", get(channel_children))
        .route("/v1/stickers/packs/{id}/stickers", get(channel_stickers))
}

async fn client() -> GiphyClient {
    let base_url = spawn_server(router()).await;
    let config = ClientConfig::new("test-key").with_base_url(base_url);
    GiphyClient::new(config).unwrap()
}

async fn first_page<T>(request: &PaginatedRequest<T>) -> giphy_client::RequestUpdate<T>
where
    T: Clone + Send + Sync + 'static,
{
    let mut updates = request.subscribe();
    assert!(request.trigger_next_page(false));
    updates.next().await.unwrap()
}

#[tokio::test]
async fn test_search_walks_to_exhaustion() {
    let client = client().await;
    let request = client.search("cats", QueryOptions::default().limit(4));

    let update = first_page(&request).await;
    let page = update.page().unwrap();
    assert_eq!(page.items.len(), 4);
    assert_eq!(page.pagination.count, 4);
    assert_eq!(page.meta.status, 200);
    assert_eq!(update.snapshot.next_offset(), 4);
    assert!(!request.trigger_next_page(false));
}

#[tokio::test]
async fn test_search_in_two_pages() {
    let client = client().await;
    let request = client.search("cats", QueryOptions::default().limit(3));
    let mut updates = request.subscribe();

    request.trigger_next_page(false);
    let first: Vec<Media> = updates.next().await.unwrap().page().unwrap().items.clone();
    assert!(request.trigger_next_page(false));
    let update = updates.next().await.unwrap();
    let second = &update.page().unwrap().items;

    assert_eq!(first.len(), 3);
    assert_eq!(second.len(), 1);
    assert_eq!(second[0].id, "cat-3");
    assert_eq!(update.snapshot.next_offset(), 6);
    assert!(!request.trigger_next_page(false));
}

#[tokio::test]
async fn test_sticker_trending_uses_sticker_route() {
    let client = client().await;
    let request = client.trending(QueryOptions::default().media(MediaType::Sticker).limit(2));
    let update = first_page(&request).await;
    let items = &update.page().unwrap().items;
    assert_eq!(items[0].id, "sticker-0");
    assert_eq!(items[0].media_type, MediaType::Sticker);
}

#[tokio::test]
async fn test_translate_returns_single_media() {
    let client = client().await;
    let media = client.translate("hello world", QueryOptions::default()).await.unwrap();
    assert_eq!(media.id, "translated-hello world");
    assert!(media.images.unwrap().original().is_some());
}

#[tokio::test]
async fn test_random_maps_flattened_renditions() {
    let client = client().await;
    let media = client.random("dogs", QueryOptions::default()).await.unwrap();
    assert_eq!(media.id, "random-dogs");
    let images = media.images.unwrap();
    assert_eq!(
        images.original().unwrap().url.as_deref(),
        Some("https://media.giphy.com/random.gif")
    );
    assert_eq!(images.get(Rendition::FixedHeightDownsampled).unwrap().height, Some(200));

    let any = client.random("", QueryOptions::default()).await.unwrap();
    assert_eq!(any.id, "random-any");
}

#[tokio::test]
async fn test_gif_by_id_and_ids() {
    let client = client().await;
    assert_eq!(client.gif_by_id("abc123").await.unwrap().id, "abc123");

    let request = client.gifs_by_ids(&["a", "b", "c"]).unwrap();
    let update = first_page(&request).await;
    let ids: Vec<&str> = update.page().unwrap().items.iter().map(|m| m.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b", "c"]);
    assert!(update.snapshot.is_exhausted());
}

#[tokio::test]
async fn test_category_tree() {
    let client = client().await;

    let update = first_page(&client.categories(QueryOptions::default())).await;
    let categories: &Vec<Category> = &update.page().unwrap().items;
    assert_eq!(categories[0].encoded_path, "actions");
    assert_eq!(categories[0].subcategories[0].encoded_path, "actions/cooking");
    assert_eq!(categories[0].gif.as_ref().unwrap().id, "action-gif");

    let request = client.subcategories("actions", QueryOptions::default());
    let update = first_page(&request).await;
    let paths: Vec<&str> = update
        .page()
        .unwrap()
        .items
        .iter()
        .map(|c| c.encoded_path.as_str())
        .collect();
    assert_eq!(paths, vec!["actions/cooking", "actions/actions-dancing"]);

    let request = client.category_content("actions", "cooking", QueryOptions::default());
    let update = first_page(&request).await;
    assert_eq!(update.page().unwrap().items[0].id, "actions-cooking-1");
}

#[tokio::test]
async fn test_term_suggestions_without_pagination() {
    let client = client().await;
    let request = client.term_suggestions("cat");
    let update = first_page(&request).await;
    let terms: Vec<TermSuggestion> = update.page().unwrap().items.clone();
    assert_eq!(terms[0].term, "cats");
    assert_eq!(update.page().unwrap().pagination.total_count, 2);
    assert!(update.snapshot.is_exhausted());
}

#[tokio::test]
async fn test_channels() {
    let client = client().await;

    let channel: Channel = client.channel(3143).await.unwrap();
    assert_eq!(channel.id, 3143);
    assert_eq!(channel.channel_type.as_deref(), Some("community"));
    assert_eq!(channel.tags[0].tag.as_deref(), Some("fun"));
    assert_eq!(channel.ancestors[0].id, 3143);

    let update = first_page(&client.channel_children(7, QueryOptions::default())).await;
    let ids: Vec<u64> = update.page().unwrap().items.iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![71, 72]);

    let update = first_page(&client.channel_content(7, QueryOptions::default())).await;
    let sticker = &update.page().unwrap().items[0];
    assert_eq!(sticker.id, "pack-7-sticker");
    assert_eq!(sticker.media_type, MediaType::Sticker);
}
