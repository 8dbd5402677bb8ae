// Deriver semantics: gcd scaling, intermediate conservation, id and
// content dedup, and fixed-point convergence.

mod test_helpers;

use craftflip::derive::{derive_alternates, derive_pass};
use craftflip::ident;
use craftflip::model::Ingredient;
use test_helpers::{catalog, market_item, recipe};

const A: u32 = 1;
const B: u32 = 2;
const C: u32 = 3;
const WIDGET: u32 = 10;
const GADGET: u32 = 11;

#[test]
fn gcd_scaling_conserves_the_intermediate() {
    // component: 2 Widget from {A:1, B:1}; product: 3 Gadget from
    // {Widget:4, C:1}. g = gcd(2,4) = 2, product x1, component x2.
    let component = recipe(100, WIDGET, 2, &[(A, 1), (B, 1)]);
    let product = recipe(200, GADGET, 3, &[(WIDGET, 4), (C, 1)]);
    let expected_uid = ident::combined_uid(product.unique_id, component.unique_id);

    let mut cat = catalog(
        vec![
            market_item(A, "Alpha", 10, 5),
            market_item(B, "Beta", 10, 5),
            market_item(C, "Gamma", 10, 5),
            market_item(WIDGET, "Widget", 100, 80),
            market_item(GADGET, "Gadget", 500, 400),
        ],
        vec![component, product],
    );

    let stats = derive_alternates(&mut cat).unwrap();
    assert_eq!(stats.added, 1);

    let derived = cat.recipe(expected_uid).expect("derived recipe stored");
    assert!(derived.is_altered);
    assert_eq!(derived.game_id, 200);
    assert_eq!(derived.output_item, GADGET);
    assert_eq!(derived.output_quantity, 3);
    assert!(derived.ingredients.iter().all(|i| i.item_id != WIDGET));
    assert!(derived.ingredients.contains(&Ingredient::new(A, 2)));
    assert!(derived.ingredients.contains(&Ingredient::new(B, 2)));
    assert!(derived.ingredients.contains(&Ingredient::new(C, 1)));
    assert_eq!(derived.ingredients.len(), 3);
}

#[test]
fn rerun_on_unchanged_catalog_adds_nothing() {
    let mut cat = catalog(
        vec![
            market_item(A, "Alpha", 10, 5),
            market_item(WIDGET, "Widget", 100, 80),
            market_item(GADGET, "Gadget", 500, 400),
        ],
        vec![
            recipe(100, WIDGET, 1, &[(A, 2)]),
            recipe(200, GADGET, 1, &[(WIDGET, 3)]),
        ],
    );

    let first = derive_alternates(&mut cat).unwrap();
    assert!(first.added > 0);

    // Identities are digests of the combined pair, so the second run
    // recognizes everything it produced the first time.
    let second = derive_alternates(&mut cat).unwrap();
    assert_eq!(second.added, 0);
}

#[test]
fn derivation_chains_through_derived_recipes() {
    const D: u32 = 4;
    let mut cat = catalog(
        vec![
            market_item(A, "Alpha", 10, 5),
            market_item(B, "Beta", 20, 10),
            market_item(C, "Gamma", 30, 15),
            market_item(D, "Delta", 40, 20),
        ],
        vec![
            recipe(1, B, 1, &[(A, 1)]),
            recipe(2, C, 1, &[(B, 1)]),
            recipe(3, D, 1, &[(C, 1)]),
        ],
    );

    let stats = derive_alternates(&mut cat).unwrap();

    // pass 1: C from {A}, D from {B}; pass 2: D from {A} (the second
    // route to it dedups on content); pass 3 adds nothing
    assert_eq!(stats.added, 3);
    assert!(stats.passes >= 3);

    let d_recipes: Vec<_> = cat
        .recipes_by_output(D)
        .iter()
        .map(|&uid| cat.recipe(uid).unwrap())
        .collect();
    assert_eq!(d_recipes.len(), 3);
    assert!(
        d_recipes
            .iter()
            .any(|r| r.ingredients == vec![Ingredient::new(A, 1)])
    );
}

#[test]
fn content_duplicates_are_skipped_within_a_pass() {
    // Two distinct component recipes for Widget with the same encoded
    // ingredients cannot both exist; the catalog already dedups that.
    // Instead: two products consuming Widget derive two distinct
    // combinations; re-deriving produces no content echo.
    let mut cat = catalog(
        vec![
            market_item(A, "Alpha", 10, 5),
            market_item(WIDGET, "Widget", 100, 80),
            market_item(GADGET, "Gadget", 500, 400),
            market_item(C, "Gizmo", 600, 450),
        ],
        vec![
            recipe(100, WIDGET, 1, &[(A, 1)]),
            recipe(200, GADGET, 1, &[(WIDGET, 2)]),
            recipe(300, C, 1, &[(WIDGET, 2)]),
        ],
    );

    let stats = derive_alternates(&mut cat).unwrap();
    // Gadget from {A:2} and Gizmo from {A:2}: same ingredient string is
    // fine across different pairs only until the first lands; the
    // second is a content duplicate and is skipped silently.
    assert_eq!(stats.added, 1);
}

#[test]
fn mutually_recursive_pair_derives_nothing() {
    let mut cat = catalog(
        vec![
            market_item(A, "Alpha", 10, 5),
            market_item(B, "Beta", 20, 10),
        ],
        vec![recipe(1, A, 1, &[(B, 1)]), recipe(2, B, 1, &[(A, 1)])],
    );

    // Folding B's recipe into A's would yield "A from {A}"; the deriver
    // must skip the self-feeding combination rather than store it.
    let stats = derive_alternates(&mut cat).unwrap();
    assert_eq!(stats.added, 0);
    assert_eq!(cat.recipe_count(), 2);
}

#[test]
fn single_pass_buffers_instead_of_inserting() {
    let cat = catalog(
        vec![
            market_item(A, "Alpha", 10, 5),
            market_item(WIDGET, "Widget", 100, 80),
            market_item(GADGET, "Gadget", 500, 400),
        ],
        vec![
            recipe(100, WIDGET, 1, &[(A, 2)]),
            recipe(200, GADGET, 1, &[(WIDGET, 3)]),
        ],
    );

    let before = cat.recipe_count();
    let pending = derive_pass(&cat);
    assert_eq!(pending.len(), 1);
    // the pass itself must not touch the catalog
    assert_eq!(cat.recipe_count(), before);
}
