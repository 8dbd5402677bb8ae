//! Alternate-recipe derivation.
//!
//! For every recipe R producing an intermediate item O and every recipe
//! P consuming O, a combined recipe is synthesized that crafts O in
//! place instead of buying it. The two sides are scaled by integer
//! multipliers so that O is conserved exactly: with R producing `qc` per
//! craft and P consuming `n`, `g = gcd(qc, n)` gives P × (qc/g) and
//! R × (n/g), and O cancels out of the combined ingredient multiset.
//!
//! Derivation runs to a fixed point because a derived recipe can itself
//! be a component or product of a further combination. Each pass works
//! against an immutable pre-pass snapshot and buffers its insertions,
//! merging only at the pass boundary. Lookups within a pass never see
//! half-merged state, so the result does not depend on scan order.

use tracing::debug;

use crate::codec;
use crate::error::Result;
use crate::ident;
use crate::model::Recipe;
use crate::store::Catalog;

#[derive(Debug, Default, Clone, Copy)]
pub struct DeriveStats {
    pub passes: usize,
    pub added: usize,
}

fn gcd(mut a: u32, mut b: u32) -> u32 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// One derivation pass over a consistent snapshot of the catalog.
/// Returns the buffered new recipes without inserting them.
pub fn derive_pass(catalog: &Catalog) -> Vec<Recipe> {
    // Deterministic scan order: base recipes first, then by game id,
    // then by unique id.
    let mut snapshot: Vec<(&Recipe, &str)> = catalog
        .recipes()
        .map(|r| (r, catalog.encoding(r.unique_id).unwrap_or_default()))
        .collect();
    snapshot.sort_by_key(|(r, _)| (r.is_altered, r.game_id, r.unique_id));

    let mut pending: Vec<Recipe> = Vec::new();
    let mut pending_ids = std::collections::HashSet::new();
    let mut pending_encodings = std::collections::HashSet::new();

    for (component, _) in &snapshot {
        let token = codec::output_token(component.output_item);

        for (product, product_encoded) in &snapshot {
            if !product_encoded.contains(&token) {
                continue;
            }

            let combined_uid = ident::combined_uid(product.unique_id, component.unique_id);
            if catalog.has_recipe(combined_uid) || pending_ids.contains(&combined_uid) {
                continue;
            }

            // The token match guarantees the product consumes the
            // component's output.
            let needed = product
                .ingredients
                .iter()
                .find(|i| i.item_id == component.output_item)
                .map(|i| i.count)
                .unwrap_or(0);
            if needed == 0 {
                continue;
            }

            let g = gcd(component.output_quantity, needed);
            let product_multiplier = component.output_quantity / g;
            let component_multiplier = needed / g;

            let mut parts: Vec<&[crate::model::Ingredient]> = Vec::new();
            for _ in 0..product_multiplier {
                parts.push(&product.ingredients);
            }
            for _ in 0..component_multiplier {
                parts.push(&component.ingredients);
            }
            let ingredients = codec::combine(&parts, Some(component.output_item));

            // A mutually-recursive pair (A needs B, B needs A) would
            // combine into a recipe consuming its own output. Such a
            // combination is meaningless; skip it.
            if ingredients.iter().any(|i| i.item_id == product.output_item) {
                debug!(
                    product = product.unique_id,
                    component = component.unique_id,
                    "combination feeds its own output, skipping"
                );
                continue;
            }

            let encoded = codec::encode(&ingredients);
            if catalog.has_encoding(&encoded) || pending_encodings.contains(&encoded) {
                continue;
            }

            pending_ids.insert(combined_uid);
            pending_encodings.insert(encoded);
            pending.push(Recipe {
                game_id: product.game_id,
                unique_id: combined_uid,
                is_altered: true,
                needs_recipe: product.needs_recipe,
                output_item: product.output_item,
                output_quantity: product.output_quantity * product_multiplier,
                ingredients,
            });
        }
    }

    pending
}

/// Run derivation passes until a full pass adds nothing. Returns how
/// many passes ran and how many recipes were added in total.
pub fn derive_alternates(catalog: &mut Catalog) -> Result<DeriveStats> {
    let mut stats = DeriveStats::default();
    loop {
        let pending = derive_pass(catalog);
        stats.passes += 1;
        if pending.is_empty() {
            return Ok(stats);
        }
        for recipe in pending {
            if catalog.insert_recipe(recipe)? {
                stats.added += 1;
            }
        }
        debug!(pass = stats.passes, total_added = stats.added, "derivation pass merged");
    }
}

#[cfg(test)]
mod tests {
    use super::gcd;

    #[test]
    fn gcd_basics() {
        assert_eq!(gcd(2, 4), 2);
        assert_eq!(gcd(4, 2), 2);
        assert_eq!(gcd(7, 13), 1);
        assert_eq!(gcd(12, 18), 6);
        assert_eq!(gcd(5, 0), 5);
    }
}
