// Rack assistant entry point.
//
// Startup sequence:
// 1. Initialize tracing (log to stderr; stdout carries the rendered output)
// 2. Load config
// 3. Open the list store
// 4. Build the word source (loads the vocabulary in local mode)
// 5. Parse the query, resolve it, render the result

use rack_assistant::compose::Composer;
use rack_assistant::config;
use rack_assistant::format::{self, DisplayOptions};
use rack_assistant::query::Query;
use rack_assistant::source::{LocalSource, RemoteSource, SourceKind};
use rack_assistant::store::{self, ListStore, MemoryListStore, SqliteListStore, StoreKind};
use rack_assistant::vocabulary::Vocabulary;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{info, warn};

#[derive(Parser)]
#[command(
    name = "rackmate",
    about = "Find the words a letter rack can spell, filtered through shared allow/deny lists",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a rack and print the rendered word groups
    Query {
        /// Letters available on the rack (e.g. "TEARING")
        #[arg(long)]
        rack: Option<String>,

        /// Minimum word length; falls back to the configured default
        #[arg(long)]
        min_length: Option<String>,

        /// Comma-separated words to add to the allowlist
        #[arg(long)]
        allow: Option<String>,

        /// Comma-separated words to add to the denylist
        #[arg(long)]
        deny: Option<String>,

        /// Group results into length tiers instead of by first letter
        #[arg(long)]
        tiered: bool,

        /// Words per row; falls back to the configured default
        #[arg(long)]
        columns: Option<usize>,
    },

    /// Print a stored word list (Denylist, Allowlist, or SeenWords)
    Lists {
        /// Name of the list to print
        name: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize tracing (stderr only; stdout is the query result)
    init_tracing()?;

    let cli = Cli::parse();

    // 2. Load config
    let config = config::load_config().context("failed to load configuration")?;
    info!(
        "Config loaded: source mode '{}', store backend '{}'",
        config.source.mode, config.store.backend
    );

    // 3. Open the list store
    let store = match config.store.backend.as_str() {
        "memory" => {
            warn!("Memory store configured; lists will not outlive this process");
            StoreKind::Memory(MemoryListStore::new())
        }
        _ => {
            let sqlite = SqliteListStore::open(&config.store.path)
                .with_context(|| format!("failed to open list store at {}", config.store.path))?;
            info!("List store opened at {}", config.store.path);
            StoreKind::Sqlite(sqlite)
        }
    };

    match cli.command {
        Commands::Query {
            rack,
            min_length,
            allow,
            deny,
            tiered,
            columns,
        } => {
            // 4. Build the word source
            let source = match config.source.mode.as_str() {
                "remote" => {
                    info!("Using remote word source at {}", config.source.remote_url);
                    SourceKind::Remote(RemoteSource::from_config(&config.source))
                }
                _ => {
                    let vocabulary =
                        Vocabulary::load(&config.vocabulary).context("failed to load vocabulary")?;
                    info!(
                        "Vocabulary loaded: {} words from {}",
                        vocabulary.len(),
                        config.vocabulary.path
                    );
                    SourceKind::Local(LocalSource::new(vocabulary))
                }
            };

            // 5. Parse the query, resolve it, render the result
            let query = match Query::from_params(
                rack.as_deref(),
                min_length.as_deref(),
                allow.as_deref(),
                deny.as_deref(),
                config.query.default_min_length,
            ) {
                Ok(query) => query,
                Err(e) => {
                    // Same payload an HTTP front end would return with a 400.
                    println!("{}", serde_json::to_string(&e.payload())?);
                    std::process::exit(2);
                }
            };
            info!(
                "Resolving rack '{}' with min_length {}",
                query.rack, query.min_length
            );

            let composer = Composer::new(source, store);
            let resolution = composer.resolve(&query).await;
            if resolution.is_degraded() {
                warn!(
                    "Resolve degraded: {} step(s) failed, results may be partial",
                    resolution.warnings.len()
                );
            }

            let mut opts = DisplayOptions::from_config(&config.display);
            if tiered {
                opts.tiered = true;
            }
            if let Some(columns) = columns {
                if columns == 0 {
                    anyhow::bail!("--columns must be at least 1");
                }
                opts.columns = columns;
            }

            println!("{}", format::render(&resolution.words, query.min_length, &opts));
        }

        Commands::Lists { name } => {
            let canonical = match name.to_ascii_lowercase().as_str() {
                "denylist" => store::DENYLIST,
                "allowlist" => store::ALLOWLIST,
                "seenwords" | "seen" => store::SEEN_WORDS,
                other => anyhow::bail!(
                    "unknown list '{other}' (expected Denylist, Allowlist, or SeenWords)"
                ),
            };

            let words = store
                .read_list(canonical)
                .await
                .with_context(|| format!("failed to read {canonical}"))?;
            info!("{} words in {canonical}", words.len());
            for word in &words {
                println!("{word}");
            }
        }
    }

    Ok(())
}

/// Initialize tracing to stderr so stdout stays clean for the rendered output.
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("rack_assistant=info,warn")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
