//! Guild Wars 2 API client with in-memory caching.
//!
//! This module provides a [`Gw2Api`] client for the public v2 API. It
//! handles chunked bulk fetches (the API pages at 200 ids per request),
//! timeout management, and in-memory caching of the static item/recipe
//! payloads.
//!
//! Every fetch is fail-soft: a network error or non-success status logs
//! a warning and yields the default/empty value. The analysis core
//! treats a missing payload as an unpriced item, never as a fault, and
//! nothing in this crate retries.

use std::sync::Arc;
use std::time::Duration;

use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::error::Result;
use crate::model::{Item, Recipe};
use crate::{codec, ident};

/// Upstream pagination limit for `?ids=` bulk endpoints.
pub const CHUNK_SIZE: usize = 200;

/// In-flight bulk requests at a time.
const FETCH_CONCURRENCY: usize = 4;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Item payload from `/v2/items`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiItem {
    pub id: u32,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub flags: Vec<String>,
    #[serde(default)]
    pub vendor_value: Option<i64>,
}

impl ApiItem {
    /// Map the wire payload onto the catalog item shape. Bound items
    /// are the ones flagged soulbound or account-bound; `NoSell` items
    /// have no vendor value no matter what the payload claims.
    pub fn into_item(self) -> Item {
        let bound = self
            .flags
            .iter()
            .any(|f| f == "SoulbindOnAcquire" || f == "AccountBound");
        let no_sell = self.flags.iter().any(|f| f == "NoSell");
        Item {
            id: self.id,
            name: self.name,
            vendor_cost: None,
            karma_cost: None,
            vendor_value: if no_sell {
                0
            } else {
                self.vendor_value.unwrap_or(0)
            },
            bound,
            tp_cost: None,
            tp_value: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ApiIngredient {
    pub item_id: u32,
    pub count: u32,
}

/// Recipe payload from `/v2/recipes`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiRecipe {
    pub id: u32,
    pub output_item_id: u32,
    pub output_item_count: u32,
    #[serde(default)]
    pub flags: Vec<String>,
    #[serde(default)]
    pub ingredients: Vec<ApiIngredient>,
}

impl ApiRecipe {
    pub fn into_recipe(self) -> Recipe {
        let needs_recipe = self.flags.iter().any(|f| f == "LearnedFromItem");
        let ingredients: Vec<_> = self
            .ingredients
            .iter()
            .map(|i| crate::model::Ingredient::new(i.item_id, i.count))
            .collect();
        Recipe {
            game_id: self.id,
            unique_id: ident::recipe_uid(self.id),
            is_altered: false,
            needs_recipe,
            output_item: self.output_item_id,
            output_quantity: self.output_item_count,
            ingredients: codec::aggregate(&ingredients),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PriceLevel {
    pub unit_price: i64,
}

/// Commerce payload from `/v2/commerce/prices`. `buys` are standing buy
/// orders, `sells` are standing sell listings: you buy instantly from
/// `sells` and sell instantly to `buys`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiPrice {
    pub id: u32,
    #[serde(default)]
    pub buys: Option<PriceLevel>,
    #[serde(default)]
    pub sells: Option<PriceLevel>,
}

impl ApiPrice {
    /// Instant-buy unit cost, if anyone is selling.
    pub fn buy_cost(&self) -> Option<i64> {
        self.sells.map(|p| p.unit_price)
    }

    /// Instant-sell unit value, if anyone is buying.
    pub fn sell_value(&self) -> Option<i64> {
        self.buys.map(|p| p.unit_price)
    }
}

/// GW2 API client with in-memory caching for the static payloads.
#[derive(Clone)]
pub struct Gw2Api {
    client: reqwest::Client,
    base: Arc<String>,
    item_cache: moka::future::Cache<u32, ApiItem>,
    recipe_cache: moka::future::Cache<u32, ApiRecipe>,
}

impl Gw2Api {
    pub fn new(base: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .pool_idle_timeout(Duration::from_secs(90)) // HTTP keep-alive standard
            .pool_max_idle_per_host(10) // reuse connections across chunked fetches
            .user_agent(format!("flip/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        // Items and recipes are static game data; prices are not cached.
        let item_cache = moka::future::Cache::new(50_000);
        let recipe_cache = moka::future::Cache::new(20_000);

        Ok(Self {
            client,
            base: Arc::new(base.trim_end_matches('/').to_string()),
            item_cache,
            recipe_cache,
        })
    }

    /// GET a JSON payload, substituting the default value on any
    /// failure. This is the only recovery the client performs.
    async fn get_default<T>(&self, url: String) -> T
    where
        T: DeserializeOwned + Default,
    {
        let response = match self.client.get(&url).send().await {
            Ok(r) => r,
            Err(e) => {
                warn!(url, error = %e, "API request failed");
                return T::default();
            }
        };
        if !response.status().is_success() {
            warn!(url, status = %response.status(), "API returned error status");
            return T::default();
        }
        match response.json::<T>().await {
            Ok(v) => v,
            Err(e) => {
                warn!(url, error = %e, "failed to decode API payload");
                T::default()
            }
        }
    }

    /// All known item ids.
    pub async fn all_item_ids(&self) -> Vec<u32> {
        self.get_default(format!("{}/items", self.base)).await
    }

    /// All known recipe ids.
    pub async fn all_recipe_ids(&self) -> Vec<u32> {
        self.get_default(format!("{}/recipes", self.base)).await
    }

    /// Recipe ids producing `item_id`.
    pub async fn recipes_for_output(&self, item_id: u32) -> Vec<u32> {
        self.get_default(format!("{}/recipes/search?output={item_id}", self.base))
            .await
    }

    /// Recipe ids consuming `item_id`.
    pub async fn recipes_using(&self, item_id: u32) -> Vec<u32> {
        self.get_default(format!("{}/recipes/search?input={item_id}", self.base))
            .await
    }

    /// Bulk-fetch item payloads, chunked at the pagination limit.
    /// Missing ids are simply absent from the result.
    pub async fn items(&self, ids: &[u32]) -> Vec<ApiItem> {
        let (mut found, misses) = self.split_cached(&self.item_cache, ids).await;
        let fetched = self.fetch_chunked::<ApiItem>("items", &misses).await;
        for item in &fetched {
            self.item_cache.insert(item.id, item.clone()).await;
        }
        found.extend(fetched);
        found
    }

    /// Bulk-fetch recipe payloads, chunked at the pagination limit.
    pub async fn recipes(&self, ids: &[u32]) -> Vec<ApiRecipe> {
        let (mut found, misses) = self.split_cached(&self.recipe_cache, ids).await;
        let fetched = self.fetch_chunked::<ApiRecipe>("recipes", &misses).await;
        for recipe in &fetched {
            self.recipe_cache.insert(recipe.id, recipe.clone()).await;
        }
        found.extend(fetched);
        found
    }

    /// Bulk-fetch current market prices. Never cached; price data goes
    /// stale in minutes.
    pub async fn prices(&self, ids: &[u32]) -> Vec<ApiPrice> {
        self.fetch_chunked::<ApiPrice>("commerce/prices", ids).await
    }

    async fn split_cached<T: Clone + Send + Sync + 'static>(
        &self,
        cache: &moka::future::Cache<u32, T>,
        ids: &[u32],
    ) -> (Vec<T>, Vec<u32>) {
        let mut found = Vec::new();
        let mut misses = Vec::new();
        for &id in ids {
            match cache.get(&id).await {
                Some(hit) => found.push(hit),
                None => misses.push(id),
            }
        }
        (found, misses)
    }

    async fn fetch_chunked<T>(&self, endpoint: &str, ids: &[u32]) -> Vec<T>
    where
        T: DeserializeOwned + Default + Send + 'static,
    {
        let urls: Vec<String> = ids
            .chunks(CHUNK_SIZE)
            .map(|chunk| {
                let ids_param = chunk
                    .iter()
                    .map(|id| id.to_string())
                    .collect::<Vec<_>>()
                    .join(",");
                format!("{}/{endpoint}?ids={ids_param}", self.base)
            })
            .collect();

        stream::iter(urls)
            .map(|url| self.get_default::<Vec<T>>(url))
            .buffered(FETCH_CONCURRENCY)
            .collect::<Vec<Vec<T>>>()
            .await
            .into_iter()
            .flatten()
            .collect()
    }
}
