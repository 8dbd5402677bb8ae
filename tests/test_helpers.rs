// Shared builders for catalog-based tests
#![allow(dead_code)]

use craftflip::codec;
use craftflip::ident;
use craftflip::model::{Ingredient, Item, Recipe};
use craftflip::store::Catalog;

pub fn ingredients(entries: &[(u32, u32)]) -> Vec<Ingredient> {
    entries
        .iter()
        .map(|&(item_id, count)| Ingredient::new(item_id, count))
        .collect()
}

/// An item only buyable and sellable on the market.
pub fn market_item(id: u32, name: &str, tp_cost: i64, tp_value: i64) -> Item {
    Item {
        tp_cost: Some(tp_cost),
        tp_value: Some(tp_value),
        ..Item::unpriced(id, name)
    }
}

/// An item only buyable from a vendor.
pub fn vendor_item(id: u32, name: &str, vendor_cost: i64) -> Item {
    Item {
        vendor_cost: Some(vendor_cost),
        ..Item::unpriced(id, name)
    }
}

/// A base recipe with its unique id derived from the game id, the same
/// way catalog population does it.
pub fn recipe(game_id: u32, output: u32, quantity: u32, entries: &[(u32, u32)]) -> Recipe {
    Recipe {
        game_id,
        unique_id: ident::recipe_uid(game_id),
        is_altered: false,
        needs_recipe: false,
        output_item: output,
        output_quantity: quantity,
        ingredients: codec::aggregate(&ingredients(entries)),
    }
}

pub fn catalog(items: Vec<Item>, recipes: Vec<Recipe>) -> Catalog {
    let mut catalog = Catalog::new();
    for item in items {
        catalog.insert_item(item);
    }
    for r in recipes {
        catalog.insert_recipe(r).expect("test recipe should be valid");
    }
    catalog
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builders_produce_valid_recipes() {
        let r = recipe(1, 10, 2, &[(1, 1), (2, 3)]);
        assert!(r.validate().is_ok());
        assert_eq!(r.unique_id, ident::recipe_uid(1));
    }
}
