//! drydock — CLI client for drydockd.
//!
//! Queries the proxy and runs the catalog pipeline locally.

use clap::{Parser, Subcommand};
use serde_json::Value;

use drydock::catalog::source::DEFAULT_PROXY_URL;
use drydock::catalog::{
    Catalog, FilterState, HttpCatalogSource, ShipType, SortDirection, SortKey,
};

/// Drydock CLI client
#[derive(Parser)]
#[command(name = "drydock")]
#[command(version = drydock::PKG_VERSION)]
#[command(about = "Drydock proxy and catalog client")]
struct Args {
    /// Proxy API root
    #[arg(short, long, env = "DRYDOCK_URL", default_value = DEFAULT_PROXY_URL)]
    url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show proxy health and cache contents
    Health,

    /// Delete every cached record on the proxy
    ClearCache,

    /// List ships from the catalog
    Ships {
        /// Case-insensitive substring of the display name
        #[arg(short, long)]
        search: Option<String>,
        /// Nation code (repeatable)
        #[arg(short, long)]
        nation: Vec<String>,
        /// Ship type, e.g. destroyer or carrier (repeatable)
        #[arg(short = 't', long = "type")]
        ship_type: Vec<ShipType>,
        /// Tier (repeatable)
        #[arg(long)]
        tier: Vec<u32>,
        /// Only premium ships
        #[arg(long, conflicts_with = "special")]
        premium: bool,
        /// Only special ships
        #[arg(long)]
        special: bool,
        /// Sort key: name, tier, nation or type
        #[arg(long, default_value = "tier")]
        sort: SortKey,
        /// Sort direction: asc or desc
        #[arg(long, default_value = "asc")]
        direction: SortDirection,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialise tracing (default: warn for CLI; override with RUST_LOG).
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let args = Args::parse();
    let api = args.url.trim_end_matches('/');

    match args.command {
        Command::Health => {
            let root = api.strip_suffix("/api").unwrap_or(api);
            let health: Value = reqwest::get(format!("{root}/health"))
                .await?
                .error_for_status()?
                .json()
                .await?;
            println!(
                "drydockd {}",
                health["version"].as_str().unwrap_or("unknown")
            );
            println!("status: {}", health["status"].as_str().unwrap_or("unknown"));
            println!("cached: {}", health["cache"]["count"]);
            if let Some(files) = health["cache"]["files"].as_array() {
                for file in files {
                    println!(
                        "  {} {} age={} valid={}",
                        file["file"].as_str().unwrap_or_default(),
                        file["size"].as_str().unwrap_or_default(),
                        file["age"].as_str().unwrap_or("?"),
                        file["valid"]
                    );
                }
            }
        }

        Command::ClearCache => {
            let report: Value = reqwest::Client::new()
                .delete(format!("{api}/cache"))
                .send()
                .await?
                .error_for_status()?
                .json()
                .await?;
            println!("deleted {} cached files", report["filesDeleted"]);
        }

        Command::Ships {
            search,
            nation,
            ship_type,
            tier,
            premium,
            special,
            sort,
            direction,
            json,
        } => {
            let mut filters = FilterState::default();
            filters.set_search_text(search.unwrap_or_default());
            filters.nations.extend(nation);
            filters.types.extend(ship_type);
            filters.tiers.extend(tier);
            filters.set_premium_only(premium);
            filters.set_special_only(special);

            let mut catalog = Catalog::new(HttpCatalogSource::new(api)?);
            catalog.load().await?;
            catalog.set_filters(filters);
            catalog.set_sort_key(sort);
            catalog.set_sort_direction(direction);

            if json {
                println!("{}", serde_json::to_string_pretty(catalog.view())?);
            } else {
                for ship in catalog.view() {
                    println!(
                        "{:>3}  {:<28} {:<16} {:<12}{}{}",
                        ship.tier,
                        ship.display_name,
                        ship.nation_display,
                        ship.type_display,
                        if ship.is_premium { " premium" } else { "" },
                        if ship.is_special { " special" } else { "" },
                    );
                }
                println!("{} of {} ships", catalog.len(), catalog.total());
            }
        }
    }

    Ok(())
}
