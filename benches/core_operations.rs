use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use craftflip::codec;
use craftflip::derive::derive_pass;
use craftflip::ident;
use craftflip::model::{Ingredient, Item, Recipe};
use craftflip::resolver::CostResolver;
use craftflip::store::Catalog;

fn sample_multiset(len: u32) -> Vec<Ingredient> {
    (0..len)
        .map(|i| Ingredient::new(12_000 + i * 7, (i % 9) + 1))
        .collect()
}

fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("codec_encode");
    for size in [4u32, 16, 64] {
        let entries = sample_multiset(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &entries, |b, entries| {
            b.iter(|| codec::encode(black_box(entries)))
        });
    }
    group.finish();
}

fn bench_decode(c: &mut Criterion) {
    let encoded = codec::encode(&sample_multiset(16));
    c.bench_function("codec_decode", |b| {
        b.iter(|| codec::decode(black_box(&encoded)).unwrap())
    });
}

fn chain_catalog(depth: u32) -> Catalog {
    // item i is crafted from item i-1; item 0 is bought
    let mut catalog = Catalog::new();
    for i in 0..=depth {
        let mut item = Item::unpriced(i, format!("item-{i}"));
        item.tp_cost = Some(10 + i as i64 * 100);
        item.tp_value = Some(8);
        catalog.insert_item(item);
    }
    for i in 1..=depth {
        catalog
            .insert_recipe(Recipe {
                game_id: i,
                unique_id: ident::recipe_uid(i),
                is_altered: false,
                needs_recipe: false,
                output_item: i,
                output_quantity: 1,
                ingredients: vec![Ingredient::new(i - 1, 2)],
            })
            .unwrap();
    }
    catalog
}

fn bench_resolver_chain(c: &mut Criterion) {
    let catalog = chain_catalog(24);
    c.bench_function("resolver_chain_24", |b| {
        b.iter(|| {
            // fresh resolver each round so the memo does not trivialize
            // the measurement
            let mut resolver = CostResolver::new(&catalog, 35.0);
            black_box(resolver.unit_cost(24))
        })
    });
}

fn bench_derive_pass(c: &mut Criterion) {
    let catalog = chain_catalog(12);
    c.bench_function("derive_pass_chain_12", |b| {
        b.iter(|| black_box(derive_pass(&catalog)))
    });
}

criterion_group!(
    benches,
    bench_encode,
    bench_decode,
    bench_resolver_chain,
    bench_derive_pass
);
criterion_main!(benches);
