//! Profit reports: the full catalog scan, single-target reports, and
//! the "what do I do with this stack" comparison.

use std::collections::BTreeSet;

use colored::Colorize;

use crate::coin::{format_coin, format_cost};
use crate::config::Config;
use crate::error::{FlipError, Result};
use crate::profit::{sale_price, Evaluation, ProfitEvaluator};
use crate::progress;
use crate::store::{self, Catalog};

fn load_catalog() -> Result<Option<Catalog>> {
    let catalog = store::load_default()?;
    if catalog.is_none() {
        println!("{} No catalog snapshot; run {} first", "✗".red(), "flip init".cyan());
    }
    Ok(catalog)
}

fn item_name(catalog: &Catalog, item_id: u32) -> String {
    catalog
        .item(item_id)
        .map(|i| i.name.clone())
        .unwrap_or_else(|| format!("item {item_id}"))
}

fn print_report(catalog: &Catalog, evaluator: &ProfitEvaluator, evaluation: &Evaluation) {
    let name = item_name(catalog, evaluation.output_item);
    let kind = if evaluation.is_altered { ", derived" } else { "" };
    println!(
        "{}",
        format!("==> {} (recipe {}{})", name, evaluation.game_id, kind)
            .bold()
            .green()
    );
    if evaluation.needs_recipe {
        println!("  {}", "requires learning the recipe sheet first".yellow());
    }
    print!("{}", evaluator.render_plan(evaluation));
    println!("{}: {}", "Revenue".bold(), format_cost(evaluation.revenue));
    println!("{}: {}", "Cost".bold(), format_cost(evaluation.cost));
    println!("{}: {}", "Profit".bold(), format_cost(evaluation.profit()));
    if let Some(roi) = evaluation.roi() {
        println!("{}: {:.1}%", "ROI".bold(), roi * 100.0);
    }
}

/// Evaluate every output item in the catalog and report the profitable
/// plans, best first.
pub fn scan(min_profit: Option<i64>, config: &Config) -> Result<()> {
    let Some(catalog) = load_catalog()? else {
        return Ok(());
    };
    let floor = min_profit.unwrap_or(config.min_profit) as f64;

    let outputs: BTreeSet<u32> = catalog.recipes().map(|r| r.output_item).collect();
    let bar = progress::bar(outputs.len() as u64, "Evaluating");

    let mut evaluator = ProfitEvaluator::new(&catalog, config.karma_per_coin);
    let mut winners: Vec<Evaluation> = Vec::new();
    for output in outputs {
        if let Some(best) = evaluator.best_for_output(output)
            && best.is_profitable()
            && best.profit().value().is_some_and(|p| p >= floor)
        {
            winners.push(best);
        }
        bar.inc(1);
    }
    bar.finish_and_clear();

    if winners.is_empty() {
        println!("No recipe clears {} profit", format_coin(floor));
        return Ok(());
    }

    winners.sort_by(|a, b| {
        b.profit()
            .value()
            .unwrap_or(f64::NEG_INFINITY)
            .total_cmp(&a.profit().value().unwrap_or(f64::NEG_INFINITY))
    });
    for evaluation in &winners {
        print_report(&catalog, &evaluator, evaluation);
        println!();
    }
    println!("{} {} profitable outputs", "✓".green(), winners.len());
    Ok(())
}

/// Best plan for a single output item, or for every stored variant of a
/// game recipe id.
pub fn best(id: u32, by_recipe: bool, config: &Config) -> Result<()> {
    let Some(catalog) = load_catalog()? else {
        return Ok(());
    };
    let mut evaluator = ProfitEvaluator::new(&catalog, config.karma_per_coin);

    let evaluation = if by_recipe {
        evaluator.best_for_game_recipe(id)
    } else {
        evaluator.best_for_output(id)
    };

    match evaluation {
        Some(best) if best.is_profitable() => print_report(&catalog, &evaluator, &best),
        Some(best) => {
            let name = item_name(&catalog, best.output_item);
            println!("{} is {}", name, "not profitable".yellow());
        }
        None => {
            let what = if by_recipe { "recipe" } else { "item" };
            println!("No stored recipe for {what} {id}");
        }
    }
    Ok(())
}

/// Compare selling an item outright against crafting it into something
/// better. Mirrors the "just sell it" advice of the report tooling.
pub fn use_item(item_id: u32, config: &Config) -> Result<()> {
    let Some(catalog) = load_catalog()? else {
        return Ok(());
    };
    let item = catalog
        .item(item_id)
        .ok_or(FlipError::ItemNotFound(item_id))?
        .clone();
    let (sell_method, direct) = sale_price(&item);

    let mut evaluator = ProfitEvaluator::new(&catalog, config.karma_per_coin);
    let consuming = catalog.recipes_by_input(item_id);

    // Rank consuming recipes by profit per consumed unit of the item.
    let mut best: Option<(f64, Evaluation)> = None;
    for uid in consuming {
        let Some(recipe) = catalog.recipe(uid) else {
            continue;
        };
        let used = recipe
            .ingredients
            .iter()
            .find(|i| i.item_id == item_id)
            .map(|i| i.count)
            .unwrap_or(0);
        if used == 0 {
            continue;
        }
        let recipe = recipe.clone();
        let evaluation = evaluator.evaluate(&recipe);
        let Some(profit) = evaluation.profit().value() else {
            continue;
        };
        let per_unit = profit / used as f64;
        if best.as_ref().is_none_or(|(current, _)| per_unit > *current) {
            best = Some((per_unit, evaluation));
        }
    }

    match best {
        Some((per_unit, evaluation))
            if per_unit > direct.value().unwrap_or(f64::NEG_INFINITY)
                && evaluation.is_profitable() =>
        {
            println!(
                "Best use of {}: {} per unit via recipe {}",
                item.name.bold(),
                format_coin(per_unit).green(),
                evaluation.game_id
            );
            print_report(&catalog, &evaluator, &evaluation);
        }
        _ => match direct.value() {
            Some(price) => println!(
                "Just sell the {} at {} for {}",
                item.name.bold(),
                sell_method,
                format_coin(price).green()
            ),
            None => println!(
                "{} has no sale channel and no profitable use",
                item.name.bold()
            ),
        },
    }
    Ok(())
}
