use colored::Colorize;

use crate::error::Result;
use crate::store;

/// Catalog snapshot overview.
pub fn status() -> Result<()> {
    let Some(catalog) = store::load_default()? else {
        println!("No catalog snapshot at {}", store::snapshot_path().display());
        return Ok(());
    };

    println!("{}", "==> Catalog".bold().green());
    println!("{}: {}", "Items".bold(), catalog.item_count());
    println!(
        "{}: {} ({} derived)",
        "Recipes".bold(),
        catalog.recipe_count(),
        catalog.altered_count()
    );
    if let Some(saved_at) = catalog.saved_at() {
        let age = chrono::Utc::now().signed_duration_since(saved_at);
        println!(
            "{}: {} ({} hours ago)",
            "Saved".bold(),
            saved_at.format("%Y-%m-%d %H:%M UTC"),
            age.num_hours()
        );
    }
    println!(
        "{}: {}",
        "Path".bold(),
        store::snapshot_path().display().to_string().dimmed()
    );
    Ok(())
}

/// Delete the catalog snapshot.
pub fn clean() -> Result<()> {
    store::clear_snapshot()?;
    println!("{} Catalog snapshot removed", "✓".green());
    Ok(())
}
