use clap::{CommandFactory, Parser, Subcommand};
use colored::Colorize;

use craftflip::commands;
use craftflip::config::Config;
use craftflip::Gw2Api;

#[derive(Parser)]
#[command(name = "flip")]
#[command(author, version, about = "A fast crafting-profit analyzer for the Guild Wars 2 trading post", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the catalog: items, vendor table, market prices, recipes
    Init,

    /// Refresh market prices on the existing catalog
    Prices,

    /// Derive alternate recipes until no new combination appears
    Derive,

    /// Report every profitable recipe, best first
    Scan {
        /// Profit floor in copper (overrides the configured default)
        #[arg(long)]
        min_profit: Option<i64>,
    },

    /// Best plan for one output item
    Best {
        /// Output item id (or game recipe id with --recipe)
        id: u32,

        /// Treat the id as a game recipe id
        #[arg(long)]
        recipe: bool,
    },

    /// Compare selling an item outright against crafting with it
    Use {
        /// Item id
        item: u32,
    },

    /// Cheapest-acquisition breakdown for an item
    Cost {
        /// Item id
        item: u32,
    },

    /// Show item details
    Info {
        /// Item id
        item: u32,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Search items by name
    Search {
        /// Query string
        query: String,
    },

    /// Catalog snapshot overview
    Status,

    /// Delete the catalog snapshot
    Clean,

    /// Generate shell completions
    Completions {
        shell: clap_complete::Shell,
    },
}

/// NO_COLOR standard first, then plain-pipe detection.
fn init_colors() {
    if std::env::var_os("NO_COLOR").is_some()
        || !std::io::IsTerminal::is_terminal(&std::io::stdout())
    {
        colored::control::set_override(false);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "craftflip=debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .init();
    init_colors();

    let config = Config::load()?;

    match cli.command {
        Some(Commands::Init) => {
            let api = Gw2Api::new(&config.api_base)?;
            commands::init(&api, &config).await?;
        }
        Some(Commands::Prices) => {
            let api = Gw2Api::new(&config.api_base)?;
            commands::prices(&api).await?;
        }
        Some(Commands::Derive) => {
            commands::derive()?;
        }
        Some(Commands::Scan { min_profit }) => {
            commands::scan(min_profit, &config)?;
        }
        Some(Commands::Best { id, recipe }) => {
            commands::best(id, recipe, &config)?;
        }
        Some(Commands::Use { item }) => {
            commands::use_item(item, &config)?;
        }
        Some(Commands::Cost { item }) => {
            commands::cost(item, &config)?;
        }
        Some(Commands::Info { item, json }) => {
            commands::info(item, json, &config)?;
        }
        Some(Commands::Search { query }) => {
            commands::search(&query)?;
        }
        Some(Commands::Status) => {
            commands::status()?;
        }
        Some(Commands::Clean) => {
            commands::clean()?;
        }
        Some(Commands::Completions { shell }) => {
            clap_complete::generate(shell, &mut Cli::command(), "flip", &mut std::io::stdout());
        }
        None => {
            println!(
                "{} flip finds what is worth crafting on the trading post",
                "⚒".bold()
            );
            println!("\nRun {} to see available commands.", "flip --help".cyan());
            println!(
                "\nTypical flow: {} then {} then {}",
                "flip init".cyan(),
                "flip derive".cyan(),
                "flip scan".cyan()
            );
        }
    }

    Ok(())
}
