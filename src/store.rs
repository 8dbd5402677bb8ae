//! The catalog: a typed repository over items and recipes with a JSON
//! snapshot on disk.
//!
//! This replaces ad-hoc queries with exactly the operations the
//! analysis needs: item lookup, recipe lookup by unique id, by output
//! item, and by consumed item, plus the derived best-price view. The
//! snapshot lives in the user cache directory and is the only
//! persistence this crate has.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::codec;
use crate::error::{FlipError, Result};
use crate::model::{AcquireMethod, Cost, Item, Recipe};

/// Persisted recipe record. Ingredients travel as the canonical encoded
/// string, which doubles as the content-dedup key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeRow {
    pub game_id: u32,
    pub is_altered: bool,
    pub unique_id: u64,
    pub needs_recipe: bool,
    pub output_item: u32,
    pub output_quantity: u32,
    pub component_string: String,
}

impl RecipeRow {
    pub fn from_recipe(recipe: &Recipe) -> Self {
        Self {
            game_id: recipe.game_id,
            is_altered: recipe.is_altered,
            unique_id: recipe.unique_id,
            needs_recipe: recipe.needs_recipe,
            output_item: recipe.output_item,
            output_quantity: recipe.output_quantity,
            component_string: codec::encode(&recipe.ingredients),
        }
    }

    /// Decode back into a recipe. A malformed component string is fatal:
    /// it means the snapshot was corrupted or written by broken code,
    /// and silently truncating it would poison every later analysis.
    pub fn into_recipe(self) -> Result<Recipe> {
        let ingredients = codec::decode(&self.component_string)?;
        Ok(Recipe {
            game_id: self.game_id,
            unique_id: self.unique_id,
            is_altered: self.is_altered,
            needs_recipe: self.needs_recipe,
            output_item: self.output_item,
            output_quantity: self.output_quantity,
            ingredients,
        })
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Snapshot {
    saved_at: DateTime<Utc>,
    items: Vec<Item>,
    recipes: Vec<RecipeRow>,
}

/// In-memory catalog of items and recipes.
#[derive(Debug, Default)]
pub struct Catalog {
    items: HashMap<u32, Item>,
    recipes: HashMap<u64, Recipe>,
    by_output: HashMap<u32, Vec<u64>>,
    encoded: HashMap<u64, String>,
    encoded_set: HashSet<String>,
    saved_at: Option<DateTime<Utc>>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    // ------------------------------------------------------------------
    // Items
    // ------------------------------------------------------------------

    /// Insert or replace an item.
    pub fn insert_item(&mut self, item: Item) {
        self.items.insert(item.id, item);
    }

    pub fn item(&self, id: u32) -> Option<&Item> {
        self.items.get(&id)
    }

    pub fn items(&self, ids: &[u32]) -> Vec<&Item> {
        ids.iter().filter_map(|id| self.items.get(id)).collect()
    }

    pub fn item_ids(&self) -> Vec<u32> {
        let mut ids: Vec<u32> = self.items.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    pub fn all_items(&self) -> impl Iterator<Item = &Item> {
        self.items.values()
    }

    /// Apply fresh market prices to an item. Missing sides clear the
    /// previous value; a delisted item must not keep a stale price.
    pub fn apply_market_price(&mut self, id: u32, buy_cost: Option<i64>, sell_value: Option<i64>) {
        if let Some(item) = self.items.get_mut(&id) {
            item.tp_cost = buy_cost;
            item.tp_value = sell_value;
        }
    }

    /// Set the vendor and karma purchase channels for an item.
    pub fn apply_vendor_price(&mut self, id: u32, vendor_cost: Option<i64>, karma_cost: Option<f64>) {
        if let Some(item) = self.items.get_mut(&id) {
            if vendor_cost.is_some() {
                item.vendor_cost = vendor_cost;
            }
            if karma_cost.is_some() {
                item.karma_cost = karma_cost;
            }
        }
    }

    // ------------------------------------------------------------------
    // Recipes
    // ------------------------------------------------------------------

    /// Insert a recipe. Returns `Ok(false)` without inserting when the
    /// unique id or the encoded ingredient content already exists;
    /// duplicate derivations are skipped, not errors. Shape violations
    /// are errors: they mean an upstream invariant broke.
    pub fn insert_recipe(&mut self, recipe: Recipe) -> Result<bool> {
        recipe.validate().map_err(|reason| FlipError::InvalidRecipe {
            unique_id: recipe.unique_id,
            reason,
        })?;

        if self.recipes.contains_key(&recipe.unique_id) {
            debug!(unique_id = recipe.unique_id, "duplicate recipe id, skipping");
            return Ok(false);
        }
        let encoded = codec::encode(&recipe.ingredients);
        if self.encoded_set.contains(&encoded) {
            debug!(unique_id = recipe.unique_id, "duplicate recipe content, skipping");
            return Ok(false);
        }

        self.by_output
            .entry(recipe.output_item)
            .or_default()
            .push(recipe.unique_id);
        self.encoded.insert(recipe.unique_id, encoded.clone());
        self.encoded_set.insert(encoded);
        self.recipes.insert(recipe.unique_id, recipe);
        Ok(true)
    }

    pub fn recipe(&self, unique_id: u64) -> Option<&Recipe> {
        self.recipes.get(&unique_id)
    }

    pub fn recipes(&self) -> impl Iterator<Item = &Recipe> {
        self.recipes.values()
    }

    pub fn recipe_count(&self) -> usize {
        self.recipes.len()
    }

    pub fn altered_count(&self) -> usize {
        self.recipes.values().filter(|r| r.is_altered).count()
    }

    pub fn has_recipe(&self, unique_id: u64) -> bool {
        self.recipes.contains_key(&unique_id)
    }

    pub fn has_encoding(&self, encoded: &str) -> bool {
        self.encoded_set.contains(encoded)
    }

    /// Canonical encoded ingredient string for a stored recipe.
    pub fn encoding(&self, unique_id: u64) -> Option<&str> {
        self.encoded.get(&unique_id).map(String::as_str)
    }

    /// Unique ids of recipes producing `item_id`.
    pub fn recipes_by_output(&self, item_id: u32) -> &[u64] {
        self.by_output
            .get(&item_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Unique ids of recipes consuming `item_id`, found by scanning the
    /// encoded strings for the item's bracketed token.
    pub fn recipes_by_input(&self, item_id: u32) -> Vec<u64> {
        let token = codec::output_token(item_id);
        let mut ids: Vec<u64> = self
            .encoded
            .iter()
            .filter(|(_, encoded)| encoded.contains(&token))
            .map(|(uid, _)| *uid)
            .collect();
        ids.sort_unstable();
        ids
    }

    /// All stored variants (base and derived) of one game recipe.
    pub fn game_recipe_variants(&self, game_id: u32) -> Vec<&Recipe> {
        let mut variants: Vec<&Recipe> = self
            .recipes
            .values()
            .filter(|r| r.game_id == game_id)
            .collect();
        variants.sort_by_key(|r| r.unique_id);
        variants
    }

    // ------------------------------------------------------------------
    // Pricing view
    // ------------------------------------------------------------------

    /// Cheapest way to buy one unit of an item outright: the minimum of
    /// the market, vendor, and coin-converted karma channels. Ties
    /// resolve market < vendor < karma. An unknown item or one with no
    /// priced channel is (`None`, `Unavailable`).
    pub fn best_price(&self, item_id: u32, karma_per_coin: f64) -> (AcquireMethod, Cost) {
        let Some(item) = self.items.get(&item_id) else {
            return (AcquireMethod::None, Cost::Unavailable);
        };

        let market = item
            .tp_cost
            .map(|c| Cost::coin(c as f64))
            .unwrap_or(Cost::Unavailable);
        let vendor = item
            .vendor_cost
            .map(|c| Cost::coin(c as f64))
            .unwrap_or(Cost::Unavailable);
        let karma = item
            .karma_cost
            .map(|k| Cost::coin(k / karma_per_coin))
            .unwrap_or(Cost::Unavailable);

        let mut best = (AcquireMethod::Market, market);
        if vendor.cheaper_than(best.1) {
            best = (AcquireMethod::Vendor, vendor);
        }
        if karma.cheaper_than(best.1) {
            best = (AcquireMethod::Karma, karma);
        }
        if best.1.is_available() {
            best
        } else {
            (AcquireMethod::None, Cost::Unavailable)
        }
    }

    // ------------------------------------------------------------------
    // Persistence
    // ------------------------------------------------------------------

    pub fn saved_at(&self) -> Option<DateTime<Utc>> {
        self.saved_at
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut recipes: Vec<RecipeRow> = self.recipes.values().map(RecipeRow::from_recipe).collect();
        recipes.sort_by_key(|r| r.unique_id);
        let mut items: Vec<Item> = self.items.values().cloned().collect();
        items.sort_by_key(|i| i.id);
        let snapshot = Snapshot {
            saved_at: Utc::now(),
            items,
            recipes,
        };
        let json = serde_json::to_string(&snapshot)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let snapshot: Snapshot = serde_json::from_str(&content)?;
        let mut catalog = Catalog::new();
        catalog.saved_at = Some(snapshot.saved_at);
        for item in snapshot.items {
            catalog.insert_item(item);
        }
        for row in snapshot.recipes {
            catalog.insert_recipe(row.into_recipe()?)?;
        }
        Ok(catalog)
    }
}

/// Get the cache directory (~/.cache/craftflip/ or equivalent)
pub fn cache_dir() -> PathBuf {
    if let Some(cache_home) = std::env::var_os("XDG_CACHE_HOME") {
        PathBuf::from(cache_home).join("craftflip")
    } else if let Some(home) = std::env::var_os("HOME") {
        PathBuf::from(home).join(".cache/craftflip")
    } else {
        PathBuf::from(".cache/craftflip")
    }
}

pub fn snapshot_path() -> PathBuf {
    cache_dir().join("catalog.json")
}

/// Load the default snapshot, or `None` when no snapshot exists yet.
pub fn load_default() -> Result<Option<Catalog>> {
    let path = snapshot_path();
    if !path.exists() {
        return Ok(None);
    }
    Catalog::load(&path).map(Some)
}

/// Delete the snapshot, if any.
pub fn clear_snapshot() -> Result<()> {
    let path = snapshot_path();
    if path.exists() {
        std::fs::remove_file(&path)?;
    }
    Ok(())
}
