use colored::Colorize;

use crate::derive::derive_pass;
use crate::error::Result;
use crate::progress;
use crate::store;

/// Run alternate-recipe derivation to a fixed point and save the
/// enlarged catalog.
pub fn derive() -> Result<()> {
    let Some(mut catalog) = store::load_default()? else {
        println!("{} No catalog snapshot; run {} first", "✗".red(), "flip init".cyan());
        return Ok(());
    };

    let before = catalog.recipe_count();
    let spinner = progress::spinner("Deriving alternate recipes...");

    let mut passes = 0usize;
    let mut added = 0usize;
    loop {
        passes += 1;
        spinner.set_message(format!(
            "Deriving alternate recipes (pass {passes}, {added} added)..."
        ));
        let pending = derive_pass(&catalog);
        if pending.is_empty() {
            break;
        }
        for recipe in pending {
            if catalog.insert_recipe(recipe)? {
                added += 1;
            }
        }
    }
    spinner.finish_and_clear();

    catalog.save(&store::snapshot_path())?;
    println!(
        "{} {} alternate recipes added in {} passes ({} -> {} total)",
        "✓".green(),
        added,
        passes,
        before,
        catalog.recipe_count()
    );
    Ok(())
}
