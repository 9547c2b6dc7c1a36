//! `giphy` command-line interface

use clap::{Args, Parser, Subcommand};
use futures_util::StreamExt;
use serde::Serialize;
use std::net::SocketAddr;
use std::time::Duration;
use tracing::{info, warn};

use super::CliError;
use crate::client::{GiphyClient, QueryOptions};
use crate::config::{ClientConfig, ENV_API_KEY};
use crate::endpoint::routes::STICKERS_ROOT_CHANNEL_ID;
use crate::request::{PaginatedRequest, RequestEvent};
use crate::{Language, MediaType, Rating};

/// Top-level arguments
#[derive(Parser, Debug)]
#[command(name = "giphy")]
#[command(about = "Search and browse GIPHY from the command line", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,

    /// API key
    #[arg(long, global = true, env = "GIPHY_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Override the API base URL
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Per-call timeout in seconds
    #[arg(long, global = true)]
    pub timeout_secs: Option<u64>,

    /// Give up after this many consecutive transient failures
    #[arg(long, global = true, default_value = "3")]
    pub max_retries: u32,

    /// Serve Prometheus metrics on this address (e.g. 127.0.0.1:9090)
    #[arg(long, global = true)]
    pub metrics_addr: Option<SocketAddr>,
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Search GIFs or stickers
    Search {
        /// Search query
        query: String,
        #[command(flatten)]
        list: ListArgs,
    },
    /// Trending GIFs or stickers
    Trending {
        #[command(flatten)]
        list: ListArgs,
    },
    /// Translate a phrase into one GIF or sticker
    Translate {
        /// Phrase to translate
        term: String,
        #[command(flatten)]
        list: ListArgs,
    },
    /// A random GIF or sticker
    Random {
        /// Limit to this tag
        tag: Option<String>,
        #[command(flatten)]
        list: ListArgs,
    },
    /// GIFs by id
    Get {
        /// One or more ids
        #[arg(required = true, num_args = 1..)]
        ids: Vec<String>,
    },
    /// Categories, subcategories, or the content of a subcategory
    Categories {
        /// Category to list subcategories of
        category: Option<String>,
        /// Subcategory to list content of
        subcategory: Option<String>,
        #[command(flatten)]
        list: ListArgs,
    },
    /// Term suggestions
    Suggest {
        /// Term to get suggestions for
        term: String,
    },
    /// A sticker-pack channel
    Channel {
        /// Channel id
        #[arg(default_value_t = STICKERS_ROOT_CHANNEL_ID)]
        id: u64,
        /// List child channels
        #[arg(long, conflicts_with = "content")]
        children: bool,
        /// List stickers in the channel
        #[arg(long)]
        content: bool,
        #[command(flatten)]
        list: ListArgs,
    },
}

/// Query and paging arguments shared by the list commands
#[derive(Args, Debug, Clone)]
pub struct ListArgs {
    /// Search stickers instead of GIFs
    #[arg(long)]
    pub stickers: bool,

    /// Content rating (y, g, pg, pg-13, r, nsfw, unrated)
    #[arg(long, default_value = "r")]
    pub rating: Rating,

    /// Language code
    #[arg(long, default_value = "en")]
    pub lang: Language,

    /// Page size
    #[arg(long)]
    pub limit: Option<u32>,

    /// Offset of the first page
    #[arg(long, default_value = "0")]
    pub offset: u32,

    /// Number of pages to fetch
    #[arg(long, default_value = "1", value_parser = clap::value_parser!(u32).range(1..))]
    pub pages: u32,
}

impl ListArgs {
    /// Query options for the client
    pub fn options(&self) -> QueryOptions {
        let media = if self.stickers {
            MediaType::Sticker
        } else {
            MediaType::Gif
        };
        let options = QueryOptions::default()
            .media(media)
            .rating(self.rating)
            .lang(self.lang)
            .offset(self.offset);
        match self.limit {
            Some(limit) => options.limit(limit),
            None => options,
        }
    }
}

impl Cli {
    /// Build the client configuration from flags and `GIPHY_*` variables
    pub fn client_config(&self) -> Result<ClientConfig, CliError> {
        let mut config = ClientConfig::from_lookup(|name| {
            if name == ENV_API_KEY {
                self.api_key.clone()
            } else {
                std::env::var(name).ok()
            }
        })?;
        if let Some(base_url) = &self.base_url {
            config.base_url = base_url.clone();
        }
        if let Some(secs) = self.timeout_secs {
            config.timeout = Duration::from_secs(secs);
        }
        Ok(config)
    }

    /// Run the selected command against `client`, printing JSON to stdout
    pub async fn execute(&self, client: &GiphyClient) -> Result<(), CliError> {
        let retries = self.max_retries;
        match &self.command {
            Commands::Search { query, list } => {
                let request = client.search(query, list.options());
                print_json(&collect_pages(&request, list.pages, retries).await?)
            }
            Commands::Trending { list } => {
                let request = client.trending(list.options());
                print_json(&collect_pages(&request, list.pages, retries).await?)
            }
            Commands::Translate { term, list } => {
                print_json(&client.translate(term, list.options()).await?)
            }
            Commands::Random { tag, list } => {
                let tag = tag.as_deref().unwrap_or_default();
                print_json(&client.random(tag, list.options()).await?)
            }
            Commands::Get { ids } => match ids.as_slice() {
                [id] => print_json(&client.gif_by_id(id).await?),
                _ => {
                    let request = client.gifs_by_ids(ids.as_slice())?;
                    print_json(&collect_pages(&request, 1, retries).await?)
                }
            },
            Commands::Categories {
                category,
                subcategory,
                list,
            } => match (category, subcategory) {
                (None, _) => {
                    let request = client.categories(list.options());
                    print_json(&collect_pages(&request, list.pages, retries).await?)
                }
                (Some(category), None) => {
                    let request = client.subcategories(category, list.options());
                    print_json(&collect_pages(&request, list.pages, retries).await?)
                }
                (Some(category), Some(subcategory)) => {
                    let request = client.category_content(category, subcategory, list.options());
                    print_json(&collect_pages(&request, list.pages, retries).await?)
                }
            },
            Commands::Suggest { term } => {
                if term.trim().is_empty() {
                    return Err(CliError::InvalidArgument("term must not be empty".into()));
                }
                let request = client.term_suggestions(term);
                print_json(&collect_pages(&request, 1, retries).await?)
            }
            Commands::Channel {
                id,
                children,
                content,
                list,
            } => {
                if *children {
                    let request = client.channel_children(*id, list.options());
                    print_json(&collect_pages(&request, list.pages, retries).await?)
                } else if *content {
                    let request = client.channel_content(*id, list.options());
                    print_json(&collect_pages(&request, list.pages, retries).await?)
                } else {
                    print_json(&client.channel(*id).await?)
                }
            }
        }
    }
}

/// Drive `request` for up to `pages` pages and return every item in order.
///
/// Transient failures are left to the request's own retry schedule until more
/// than `max_retries` have happened in a row; permanent failures return at once.
pub async fn collect_pages<T>(
    request: &PaginatedRequest<T>,
    pages: u32,
    max_retries: u32,
) -> Result<Vec<T>, CliError>
where
    T: Clone + Send + Sync + 'static,
{
    let mut updates = request.subscribe();
    let mut items = Vec::new();
    let mut fetched = 0;

    if !request.trigger_next_page(false) {
        return Ok(items);
    }

    while let Some(update) = updates.next().await {
        match update.event {
            RequestEvent::Page(page) => {
                fetched += 1;
                info!(
                    count = page.items.len(),
                    next_offset = update.snapshot.next_offset(),
                    total = update.snapshot.cursor.total_result_count,
                    "page fetched"
                );
                items.extend(page.items);
                if fetched >= pages || !request.trigger_next_page(false) {
                    break;
                }
            }
            RequestEvent::Failed(err) => {
                if !update.snapshot.is_retry_scheduled() {
                    return Err(err.into());
                }
                if update.snapshot.retry_count > max_retries {
                    request.cancel();
                    return Err(CliError::RetriesExhausted {
                        retries: max_retries,
                        last_error: err,
                    });
                }
                warn!(
                    retry_count = update.snapshot.retry_count,
                    delay_ms = update.snapshot.next_retry_delay.map(|d| d.as_millis() as u64),
                    "{err}, retrying"
                );
            }
            RequestEvent::Reset => {}
        }
    }

    Ok(items)
}

fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
