//! Core data model: items, recipes, ingredient multisets, and costs.
//!
//! Prices are integer copper (100 copper = 1 silver, 100 silver = 1 gold).
//! Channels an item cannot be acquired through are `None`, never zero, so
//! an unpriced item can never look free.

use serde::{Deserialize, Serialize};

/// A tradeable (or not) game item with its acquisition channels.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    pub id: u32,
    pub name: String,
    /// Coin cost when bought from a vendor, if any vendor sells it.
    #[serde(default)]
    pub vendor_cost: Option<i64>,
    /// Karma cost when bought from a karma vendor. Karma is not coin;
    /// conversion happens at pricing time via the configured rate.
    #[serde(default)]
    pub karma_cost: Option<f64>,
    /// Coin received when sold to any vendor (0 for NoSell items).
    #[serde(default)]
    pub vendor_value: i64,
    /// Bound items cannot be listed on or bought from the market.
    #[serde(default)]
    pub bound: bool,
    /// Instant-buy unit price on the market.
    #[serde(default)]
    pub tp_cost: Option<i64>,
    /// Instant-sell unit price on the market.
    #[serde(default)]
    pub tp_value: Option<i64>,
}

impl Item {
    /// A bare item with no pricing data at all.
    pub fn unpriced(id: u32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            vendor_cost: None,
            karma_cost: None,
            vendor_value: 0,
            bound: false,
            tp_cost: None,
            tp_value: None,
        }
    }
}

/// One entry of an ingredient multiset. `count` is always > 0 and item
/// ids are never repeated within a multiset; aggregation happens in the
/// codec before anything else sees the data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    pub item_id: u32,
    pub count: u32,
}

impl Ingredient {
    pub fn new(item_id: u32, count: u32) -> Self {
        Self { item_id, count }
    }
}

/// A crafting recipe. `unique_id` is the primary key; `game_id` repeats
/// across discipline variants and across derived alternates of the same
/// source recipe.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipe {
    pub game_id: u32,
    pub unique_id: u64,
    /// True for recipes synthesized by the deriver, false for base
    /// recipes taken from the catalog.
    pub is_altered: bool,
    /// The recipe sheet must be learned from an item first.
    pub needs_recipe: bool,
    pub output_item: u32,
    pub output_quantity: u32,
    pub ingredients: Vec<Ingredient>,
}

impl Recipe {
    /// Shape invariants every recipe must satisfy before it enters the
    /// catalog: positive quantities and no self-referential output.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.output_quantity == 0 {
            return Err("output quantity is zero".into());
        }
        if self.ingredients.is_empty() {
            return Err("no ingredients".into());
        }
        for ing in &self.ingredients {
            if ing.count == 0 {
                return Err(format!("zero count for ingredient {}", ing.item_id));
            }
            if ing.item_id == self.output_item {
                return Err("recipe consumes its own output".into());
            }
        }
        Ok(())
    }
}

/// How an item is cheapest to acquire without crafting. The declaration
/// order is the tie-break order: market beats vendor beats karma on
/// equal cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AcquireMethod {
    Market,
    Vendor,
    Karma,
    None,
}

impl std::fmt::Display for AcquireMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            AcquireMethod::Market => "market",
            AcquireMethod::Vendor => "vendor",
            AcquireMethod::Karma => "karma",
            AcquireMethod::None => "none",
        };
        f.write_str(s)
    }
}

/// A coin amount that may be unknowable. `Unavailable` is absorbing in
/// arithmetic and always loses a minimum against a finite cost, so an
/// unpriceable branch can never masquerade as cheap.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Cost {
    Coin(f64),
    Unavailable,
}

impl Cost {
    pub fn coin(value: f64) -> Self {
        Cost::Coin(value)
    }

    pub fn is_available(self) -> bool {
        matches!(self, Cost::Coin(_))
    }

    /// The coin value, if there is one.
    pub fn value(self) -> Option<f64> {
        match self {
            Cost::Coin(v) => Some(v),
            Cost::Unavailable => None,
        }
    }

    /// Minimum of two costs. `Unavailable` never wins against a finite
    /// cost; on an exact tie the receiver wins, which is what lets the
    /// caller encode a preference order by comparison sequence.
    pub fn min(self, other: Cost) -> Cost {
        match (self, other) {
            (Cost::Coin(a), Cost::Coin(b)) => {
                if b < a {
                    other
                } else {
                    self
                }
            }
            (Cost::Coin(_), Cost::Unavailable) => self,
            (Cost::Unavailable, _) => other,
        }
    }

    /// True if `self` is strictly cheaper than `other`.
    pub fn cheaper_than(self, other: Cost) -> bool {
        match (self, other) {
            (Cost::Coin(a), Cost::Coin(b)) => a < b,
            (Cost::Coin(_), Cost::Unavailable) => true,
            (Cost::Unavailable, _) => false,
        }
    }

    pub fn saturating_add(self, other: Cost) -> Cost {
        match (self, other) {
            (Cost::Coin(a), Cost::Coin(b)) => Cost::Coin(a + b),
            _ => Cost::Unavailable,
        }
    }

    /// Cost of `quantity` units at this unit cost.
    pub fn scale(self, quantity: u32) -> Cost {
        match self {
            Cost::Coin(v) => Cost::Coin(v * quantity as f64),
            Cost::Unavailable => Cost::Unavailable,
        }
    }

    /// Per-unit cost when this total buys `quantity` units.
    pub fn per_unit(self, quantity: u32) -> Cost {
        match self {
            Cost::Coin(v) if quantity > 0 => Cost::Coin(v / quantity as f64),
            _ => Cost::Unavailable,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unavailable_never_wins_min() {
        assert_eq!(Cost::Unavailable.min(Cost::Coin(5.0)), Cost::Coin(5.0));
        assert_eq!(Cost::Coin(5.0).min(Cost::Unavailable), Cost::Coin(5.0));
        assert_eq!(Cost::Unavailable.min(Cost::Unavailable), Cost::Unavailable);
    }

    #[test]
    fn min_ties_prefer_receiver() {
        // the receiver carries the preferred acquisition method
        assert_eq!(Cost::Coin(3.0).min(Cost::Coin(3.0)), Cost::Coin(3.0));
    }

    #[test]
    fn arithmetic_absorbs_unavailable() {
        assert_eq!(
            Cost::Coin(2.0).saturating_add(Cost::Unavailable),
            Cost::Unavailable
        );
        assert_eq!(Cost::Unavailable.scale(10), Cost::Unavailable);
        assert_eq!(Cost::Coin(9.0).per_unit(3), Cost::Coin(3.0));
        assert_eq!(Cost::Coin(9.0).per_unit(0), Cost::Unavailable);
    }

    #[test]
    fn self_consuming_recipe_rejected() {
        let recipe = Recipe {
            game_id: 1,
            unique_id: 42,
            is_altered: false,
            needs_recipe: false,
            output_item: 7,
            output_quantity: 1,
            ingredients: vec![Ingredient::new(7, 2)],
        };
        assert!(recipe.validate().is_err());
    }
}
