//! Catalog population: items, vendor/karma channels, market prices,
//! and base recipes.

use colored::Colorize;

use crate::api::Gw2Api;
use crate::config::Config;
use crate::error::Result;
use crate::progress;
use crate::store::{self, Catalog};

/// Coin prices at fixed-price vendors, by item id. The API does not
/// expose vendor inventories, so this table is maintained by hand;
/// `[[price_override]]` entries in the config file extend or correct it.
const VENDOR_PRICES: &[(u32, i64)] = &[
    (12136, 8),
    (12137, 2),
    (12141, 2),
    (12145, 4),
    (12151, 8),
    (12152, 2),
    (12153, 8),
    (12155, 8),
    (12156, 8),
    (12157, 8),
    (12158, 8),
    (12159, 2),
    (12165, 2),
    (12235, 2),
    (12237, 2),
    (12239, 2),
    (12240, 2),
    (12245, 2),
    (12249, 2),
    (12251, 2),
    (12252, 2),
    (12256, 1),
    (12271, 8),
    (12324, 8),
    (12325, 3),
    (12328, 3),
    (12337, 3),
    (12338, 3),
    (12339, 3),
    (12340, 3),
    (12350, 4),
    (12502, 6),
    (12503, 6),
    (12514, 4),
    (12515, 4),
    (12516, 4),
    (12517, 4),
    (12518, 4),
    (12543, 8),
    (12794, 5),
    (13005, 496),
    (13006, 1480),
    (13007, 5000),
    (13008, 20_000),
    (13009, 100_000),
    (19704, 8),
    (19717, 21),
    (19750, 16),
    (19789, 16),
    (19790, 64),
    (19791, 48),
    (19792, 8),
    (19793, 32),
    (19794, 24),
    (19924, 48),
    (46747, 150),
    (62942, 8),
    (70647, 32),
    (75087, 5000),
    (75762, 104),
    (76839, 56),
];

fn seed_vendor_prices(catalog: &mut Catalog, config: &Config) {
    for &(id, cost) in VENDOR_PRICES {
        catalog.apply_vendor_price(id, Some(cost), None);
    }
    for entry in &config.price_overrides {
        catalog.apply_vendor_price(entry.id, entry.vendor, entry.karma);
    }
}

async fn refresh_market_prices(api: &Gw2Api, catalog: &mut Catalog) -> usize {
    let ids = catalog.item_ids();
    let prices = api.prices(&ids).await;
    let updated = prices.len();
    for price in prices {
        catalog.apply_market_price(price.id, price.buy_cost(), price.sell_value());
    }
    updated
}

/// Build the whole catalog from scratch: item index, item details,
/// vendor table, market prices, base recipes. Replaces any existing
/// snapshot.
pub async fn init(api: &Gw2Api, config: &Config) -> Result<()> {
    let mut catalog = Catalog::new();

    let spinner = progress::spinner("Fetching item index...");
    let item_ids = api.all_item_ids().await;
    spinner.finish_and_clear();
    if item_ids.is_empty() {
        println!("{} The API returned no items; nothing to do", "✗".red());
        return Ok(());
    }

    let spinner = progress::spinner(format!("Fetching {} items...", item_ids.len()));
    let items = api.items(&item_ids).await;
    spinner.finish_and_clear();
    for api_item in items {
        catalog.insert_item(api_item.into_item());
    }
    println!("{} {} items", "✓".green(), catalog.item_count());

    seed_vendor_prices(&mut catalog, config);

    let spinner = progress::spinner("Fetching market prices...");
    let priced = refresh_market_prices(api, &mut catalog).await;
    spinner.finish_and_clear();
    println!("{} {} market prices", "✓".green(), priced);

    let spinner = progress::spinner("Fetching recipe index...");
    let recipe_ids = api.all_recipe_ids().await;
    spinner.finish_and_clear();

    let spinner = progress::spinner(format!("Fetching {} recipes...", recipe_ids.len()));
    let recipes = api.recipes(&recipe_ids).await;
    spinner.finish_and_clear();

    let mut inserted = 0usize;
    let mut skipped = 0usize;
    for api_recipe in recipes {
        let recipe = api_recipe.into_recipe();
        if recipe.validate().is_err() {
            // the API occasionally carries degenerate recipes; they
            // cannot participate in analysis
            skipped += 1;
            continue;
        }
        if catalog.insert_recipe(recipe)? {
            inserted += 1;
        } else {
            skipped += 1;
        }
    }
    println!(
        "{} {} base recipes ({} duplicates or degenerate skipped)",
        "✓".green(),
        inserted,
        skipped
    );

    catalog.save(&store::snapshot_path())?;
    println!(
        "Catalog saved to {}",
        store::snapshot_path().display().to_string().dimmed()
    );
    Ok(())
}

/// Refresh market prices on an existing catalog snapshot.
pub async fn prices(api: &Gw2Api) -> Result<()> {
    let Some(mut catalog) = store::load_default()? else {
        println!("{} No catalog snapshot; run {} first", "✗".red(), "flip init".cyan());
        return Ok(());
    };

    let spinner = progress::spinner("Updating market prices...");
    let updated = refresh_market_prices(api, &mut catalog).await;
    spinner.finish_and_clear();

    catalog.save(&store::snapshot_path())?;
    println!("{} {} prices updated", "✓".green(), updated);
    Ok(())
}
