use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use pokescout::config::Config;
use pokescout::fetch::{PokeApiClient, PokemonSource};
use pokescout::pipeline::{fetch_many, ItemStatus, DEFAULT_POKEMON};
use pokescout::server::{self, AppState};
use pokescout::store::Store;
use pokescout::ui;

/// Pokemon Scout - fetch Pokemon data from PokeAPI into a local database.
#[derive(Parser)]
#[command(name = "pokescout", version, about, args_conflicts_with_subcommands = true)]
struct Cli {
    /// Pokemon names to fetch (space-separated)
    pokemon: Vec<String>,

    /// Initialize (reset) the database
    #[arg(long)]
    init_db: bool,

    /// Fetch the default Pokemon list
    #[arg(long)]
    default: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP API server
    Serve {
        /// Address to bind
        #[arg(long, default_value = "0.0.0.0:5000")]
        bind: String,
    },
    /// Browse the database through the interactive menu
    Menu,
    /// Print all stored Pokemon
    List,
    /// Export all stored Pokemon to a JSON file
    Export {
        /// Output file
        #[arg(default_value = "pokemon_export.json")]
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // the menu owns the terminal; keep stray log lines off its screen
    let default_filter = if matches!(cli.command, Some(Command::Menu)) {
        "pokescout=error"
    } else {
        "pokescout=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();

    let config = Config::from_env();
    let store = Store::connect(&config.database_url).await?;
    let client = Arc::new(PokeApiClient::new(config.api_base_url.as_str())?);

    match cli.command {
        Some(Command::Serve { bind }) => {
            store.ensure_schema().await?;
            let state = AppState {
                store,
                source: client,
            };
            server::serve(state, &bind).await?;
        }
        Some(Command::Menu) => {
            ui::run_menu(store, client).await?;
        }
        Some(Command::List) => {
            store.ensure_schema().await?;
            list_pokemon(&store).await?;
        }
        Some(Command::Export { file }) => {
            store.ensure_schema().await?;
            let count = store.export_to_file(&file).await?;
            println!("Exported {} Pokemon to '{}'", count, file.display());
        }
        None => {
            if cli.init_db {
                println!("Initializing database...");
                store.reset().await?;
                println!("Database initialized!");
            } else {
                store.ensure_schema().await?;
            }

            if cli.default {
                let names: Vec<String> = DEFAULT_POKEMON.iter().map(|s| s.to_string()).collect();
                println!(
                    "Fetching default Pokemon list: {}",
                    DEFAULT_POKEMON.join(", ")
                );
                run_batch(&store, client.as_ref(), &names).await;
            } else if !cli.pokemon.is_empty() {
                run_batch(&store, client.as_ref(), &cli.pokemon).await;
            } else if !cli.init_db {
                println!("Nothing to fetch. Try `pokescout pikachu`, `--default`, or `--help`.");
            }
        }
    }

    Ok(())
}

/// Fetch a list of names sequentially and print one line per item, the way
/// the batch front-ends report.
async fn run_batch(store: &Store, source: &dyn PokemonSource, names: &[String]) {
    let report = fetch_many(store, source, names).await;
    for (name, status) in &report.items {
        match status {
            ItemStatus::Stored => println!("[ok] {} stored successfully", name),
            ItemStatus::AlreadyStored => println!("[--] {} already exists in database", name),
            ItemStatus::NotFound => println!("[!!] {} not found", name),
            ItemStatus::Failed(e) => println!("[!!] {} error: {}", name, e),
        }
    }
    println!(
        "Successfully stored: {}/{} Pokemon",
        report.stored, report.total
    );
}

async fn list_pokemon(store: &Store) -> anyhow::Result<()> {
    let all = store.list_all().await?;
    if all.is_empty() {
        println!("No Pokemon found in database.");
        println!("Run `pokescout --default` to add some.");
        return Ok(());
    }

    println!("POKEMON IN DATABASE ({} total)", all.len());
    println!();
    for p in &all {
        let types: Vec<&str> = p.types.iter().map(|t| t.type_name.as_str()).collect();
        println!(
            "#{:03} - {:15} | Types: {}",
            p.pokedex_number,
            p.name,
            types.join(", ")
        );
    }
    Ok(())
}
