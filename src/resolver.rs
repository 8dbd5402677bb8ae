//! Recursive cheapest-acquisition-cost resolution.
//!
//! For any item the resolver answers: what does one unit cost, buying
//! or crafting, whichever is cheaper? Crafting recurses into the
//! ingredients; a cycle guard keeps self-referential recipe chains from
//! looping by falling back to the buy channels for the repeated item.
//!
//! The resolver owns the run-scoped memo. Results are memoized per item
//! id for the whole run; prices changing underneath it is handled by an
//! explicit [`CostResolver::reset`], never by implicit invalidation.

use std::collections::{HashMap, HashSet};

use crate::coin::format_cost;
use crate::model::{AcquireMethod, Cost};
use crate::store::Catalog;

#[derive(Debug, Clone)]
pub struct IngredientCost {
    pub item_id: u32,
    pub count: u32,
    pub unit_cost: Cost,
}

/// How the resolved cost is achieved.
#[derive(Debug, Clone)]
pub enum CostSource {
    /// Buy outright through the stated channel.
    Buy(AcquireMethod),
    /// Craft with this recipe; `inputs` carries the resolved unit cost
    /// of every ingredient for one execution of the recipe.
    Craft {
        recipe_uid: u64,
        inputs: Vec<IngredientCost>,
    },
    /// No priced channel and no craftable recipe.
    Unavailable,
}

#[derive(Debug, Clone)]
pub struct Resolution {
    /// Per-unit acquisition cost.
    pub cost: Cost,
    pub source: CostSource,
}

pub struct CostResolver<'a> {
    catalog: &'a Catalog,
    karma_per_coin: f64,
    memo: HashMap<u32, Resolution>,
}

impl<'a> CostResolver<'a> {
    pub fn new(catalog: &'a Catalog, karma_per_coin: f64) -> Self {
        Self {
            catalog,
            karma_per_coin,
            memo: HashMap::new(),
        }
    }

    /// Cheapest per-unit cost of acquiring `item_id`.
    pub fn unit_cost(&mut self, item_id: u32) -> Resolution {
        self.resolve(item_id, &HashSet::new())
    }

    /// Drop all memoized results. Call after the underlying prices
    /// change; nothing invalidates the memo implicitly.
    pub fn reset(&mut self) {
        self.memo.clear();
    }

    fn resolve(&mut self, item_id: u32, in_progress: &HashSet<u32>) -> Resolution {
        if let Some(hit) = self.memo.get(&item_id) {
            return hit.clone();
        }

        let (method, base_cost) = self.catalog.best_price(item_id, self.karma_per_coin);
        let mut best = Resolution {
            cost: base_cost,
            source: if base_cost.is_available() {
                CostSource::Buy(method)
            } else {
                CostSource::Unavailable
            },
        };

        // An item already being resolved higher up the tree cannot be
        // crafted on this branch; that is the cycle break. The buy
        // channels alone stand for it here.
        if !in_progress.contains(&item_id) {
            let mut extended = in_progress.clone();
            extended.insert(item_id);

            let producing: Vec<u64> = self.catalog.recipes_by_output(item_id).to_vec();
            for uid in producing {
                let Some(recipe) = self.catalog.recipe(uid) else {
                    continue;
                };
                let ingredients = recipe.ingredients.clone();
                let output_quantity = recipe.output_quantity;

                let mut total = Cost::coin(0.0);
                let mut inputs = Vec::with_capacity(ingredients.len());
                for ing in &ingredients {
                    let child = self.resolve(ing.item_id, &extended);
                    total = total.saturating_add(child.cost.scale(ing.count));
                    inputs.push(IngredientCost {
                        item_id: ing.item_id,
                        count: ing.count,
                        unit_cost: child.cost,
                    });
                }

                let per_unit = total.per_unit(output_quantity);
                // Strictly cheaper only: on a tie, buying wins (fewer
                // steps for the same coin).
                if per_unit.cheaper_than(best.cost) {
                    best = Resolution {
                        cost: per_unit,
                        source: CostSource::Craft {
                            recipe_uid: uid,
                            inputs,
                        },
                    };
                }
            }
        }

        self.memo.insert(item_id, best.clone());
        best
    }

    /// Human-readable acquisition tree for an item, one line per node.
    /// Follows memoized craft chains; a visited set keeps mutually
    /// crafting items from recursing forever.
    pub fn breakdown(&mut self, item_id: u32) -> Vec<String> {
        let mut lines = Vec::new();
        let mut visited = HashSet::new();
        self.breakdown_into(item_id, 1, 0, &mut visited, &mut lines);
        lines
    }

    fn breakdown_into(
        &mut self,
        item_id: u32,
        count: u32,
        depth: usize,
        visited: &mut HashSet<u32>,
        lines: &mut Vec<String>,
    ) {
        let resolution = self.unit_cost(item_id);
        let name = self
            .catalog
            .item(item_id)
            .map(|i| i.name.clone())
            .unwrap_or_else(|| format!("item {item_id}"));
        let indent = "  ".repeat(depth);
        let total = format_cost(resolution.cost.scale(count));

        match resolution.source {
            CostSource::Buy(method) => {
                lines.push(format!("{indent}{count} {name}: buy at {method} for {total}"));
            }
            CostSource::Unavailable => {
                lines.push(format!("{indent}{count} {name}: unavailable"));
            }
            CostSource::Craft { recipe_uid, inputs } => {
                lines.push(format!(
                    "{indent}{count} {name}: craft (recipe {recipe_uid}) for {total}"
                ));
                if !visited.insert(item_id) {
                    return;
                }
                for input in inputs {
                    self.breakdown_into(input.item_id, input.count, depth + 1, visited, lines);
                }
                visited.remove(&item_id);
            }
        }
    }
}
