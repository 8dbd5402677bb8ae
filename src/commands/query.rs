//! Read-only catalog queries: item details, name search, and the
//! cheapest-acquisition breakdown.

use colored::Colorize;

use crate::coin::{format_coin, format_cost};
use crate::config::Config;
use crate::error::{FlipError, Result};
use crate::profit::ProfitEvaluator;
use crate::store::{self, Catalog};

fn load_catalog() -> Result<Option<Catalog>> {
    let catalog = store::load_default()?;
    if catalog.is_none() {
        println!("{} No catalog snapshot; run {} first", "✗".red(), "flip init".cyan());
    }
    Ok(catalog)
}

fn coin_channel(value: Option<i64>) -> String {
    match value {
        Some(v) => format_coin(v as f64),
        None => "-".to_string(),
    }
}

/// Item detail: channels, best price, and the recipes around it.
pub fn info(item_id: u32, json: bool, config: &Config) -> Result<()> {
    let Some(catalog) = load_catalog()? else {
        return Ok(());
    };
    let item = catalog
        .item(item_id)
        .ok_or(FlipError::ItemNotFound(item_id))?;

    if json {
        println!("{}", serde_json::to_string_pretty(item)?);
        return Ok(());
    }

    println!("{}", format!("==> {} ({})", item.name, item.id).bold().green());
    if item.bound {
        println!("{}", "bound: cannot be traded on the market".yellow());
    }
    println!("{}: {}", "Market buy".bold(), coin_channel(item.tp_cost));
    println!("{}: {}", "Market sell".bold(), coin_channel(item.tp_value));
    println!("{}: {}", "Vendor buy".bold(), coin_channel(item.vendor_cost));
    println!(
        "{}: {}",
        "Vendor sell".bold(),
        format_coin(item.vendor_value as f64)
    );
    if let Some(karma) = item.karma_cost {
        println!("{}: {} karma", "Karma buy".bold(), karma);
    }

    let (method, cost) = catalog.best_price(item_id, config.karma_per_coin);
    println!(
        "{}: {} ({})",
        "Best buy".bold(),
        format_cost(cost),
        method
    );

    let producing = catalog.recipes_by_output(item_id);
    let consuming = catalog.recipes_by_input(item_id);
    println!(
        "{}: {} producing, {} consuming",
        "Recipes".bold(),
        producing.len(),
        consuming.len()
    );
    Ok(())
}

/// Case-insensitive name search with fuzzy suggestions when nothing
/// matches outright.
pub fn search(query: &str) -> Result<()> {
    let Some(catalog) = load_catalog()? else {
        return Ok(());
    };
    let needle = query.to_lowercase();

    let mut matches: Vec<_> = catalog
        .all_items()
        .filter(|i| i.name.to_lowercase().contains(&needle))
        .collect();
    matches.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));

    if !matches.is_empty() {
        let total = matches.len();
        for item in matches.into_iter().take(25) {
            println!("{:>8}  {}", item.id.to_string().dimmed(), item.name);
        }
        if total > 25 {
            println!("... and {} more", total - 25);
        }
        return Ok(());
    }

    // No substring hit: offer the closest names instead.
    let mut scored: Vec<_> = catalog
        .all_items()
        .map(|i| (strsim::jaro_winkler(&needle, &i.name.to_lowercase()), i))
        .filter(|(score, _)| *score > 0.7)
        .collect();
    scored.sort_by(|a, b| b.0.total_cmp(&a.0));

    if scored.is_empty() {
        println!("No items matching '{query}'");
    } else {
        println!("No items matching '{query}'. Did you mean:");
        for (_, item) in scored.into_iter().take(5) {
            println!("{:>8}  {}", item.id.to_string().dimmed(), item.name);
        }
    }
    Ok(())
}

/// Cheapest-acquisition breakdown tree for an item.
pub fn cost(item_id: u32, config: &Config) -> Result<()> {
    let Some(catalog) = load_catalog()? else {
        return Ok(());
    };
    if catalog.item(item_id).is_none() {
        return Err(FlipError::ItemNotFound(item_id));
    }

    let mut evaluator = ProfitEvaluator::new(&catalog, config.karma_per_coin);
    for line in evaluator.breakdown(item_id) {
        println!("{line}");
    }
    Ok(())
}
