//! memos-mcp: Command-line interface for the Memos MCP server

use anyhow::Result;
use clap::{Parser, Subcommand};
use memos_mcp::config::{path_resolver, AppConfig};
use memos_mcp::mcp::MemosMcpServer;
use memos_mcp::service::{MemoService, SearchMemosArgs};
use memos_mcp::store::SqliteMemoStore;
use rmcp::ServiceExt;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{stdin, stdout};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// ============================================================================
// Startup Helpers
// ============================================================================

/// Load config from file and environment, then apply CLI overrides
fn load_config(database: Option<String>, user_id: Option<i32>) -> Result<AppConfig> {
    let mut config = AppConfig::load(&path_resolver::get_default_config_path())?;
    if let Some(path) = database {
        config = config.with_database_path(&path);
    }
    if let Some(id) = user_id {
        config = config.with_user_id(id);
    }
    config.validate()?;
    Ok(config)
}

/// Open (creating if needed) the SQLite store named by the config
fn open_service(config: &AppConfig) -> Result<Arc<MemoService>> {
    let db_path = path_resolver::resolve_path(config.database_path())?;
    if let Some(parent) = db_path.parent() {
        if !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    tracing::info!("Opening memo database: {}", db_path.display());
    let store = SqliteMemoStore::open(&db_path)?;
    Ok(Arc::new(MemoService::new(Arc::new(store))))
}

// ============================================================================
// CLI Implementation
// ============================================================================

/// memos-mcp: MCP server exposing Memos notes to AI agents
#[derive(Parser)]
#[command(name = "memos-mcp")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize memos-mcp configuration
    Init {
        /// Force overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },
    /// Start the MCP server on stdio
    Serve {
        /// Path to the SQLite database (overrides config and MEMOS_MCP_DATABASE)
        #[arg(short, long)]
        database: Option<String>,

        /// Act as this user (overrides config and MEMOS_MCP_USER_ID)
        #[arg(short, long)]
        user_id: Option<i32>,
    },
    /// Search memo content (for testing)
    Search {
        /// Text to search for
        query: String,

        /// Path to the SQLite database
        #[arg(short, long)]
        database: Option<String>,

        /// Search as this user
        #[arg(short, long)]
        user_id: Option<i32>,
    },
    /// List tags with memo counts (for testing)
    Tags {
        /// Path to the SQLite database
        #[arg(short, long)]
        database: Option<String>,

        /// List as this user
        #[arg(short, long)]
        user_id: Option<i32>,
    },
}

fn init_config(force: bool) -> Result<()> {
    let config_dir = path_resolver::get_config_dir();
    let config_path = config_dir.join("config.toml");

    eprintln!("Initializing memos-mcp configuration...");
    eprintln!("Config directory: {}", config_dir.display());

    if !config_dir.exists() {
        std::fs::create_dir_all(&config_dir)?;
        eprintln!("Created config directory");
    }

    if config_path.exists() && !force {
        eprintln!("Configuration file already exists: {}", config_path.display());
        eprintln!("Use --force to overwrite");
        return Ok(());
    }

    let database: PathBuf = path_resolver::get_default_database_path();
    let default_config = AppConfig::default().with_database_path(&database.to_string_lossy());
    let toml_content = default_config.to_toml()?;
    std::fs::write(&config_path, &toml_content)?;

    eprintln!("Created configuration file: {}", config_path.display());
    eprintln!("\nConfiguration initialized successfully!");
    eprintln!("Edit {} to set user_id and the database path.", config_path.display());

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Log to stderr so stdout stays free for the MCP transport
    let log_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| log_level.to_string()),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    match cli.command {
        Commands::Init { force } => init_config(force),
        Commands::Serve { database, user_id } => {
            let config = load_config(database, user_id)?;
            let service = open_service(&config)?;
            let caller = config.caller();
            tracing::info!("Starting MCP server as {:?}", caller);
            eprintln!(
                "memos-mcp server starting... (database: {})",
                config.database_path()
            );

            let server = MemosMcpServer::new(service, caller);
            let transport = (stdin(), stdout());
            let running = server.serve(transport).await?;

            let _quit_reason = running.waiting().await?;
            Ok(())
        }
        Commands::Search {
            query,
            database,
            user_id,
        } => {
            let config = load_config(database, user_id)?;
            let service = open_service(&config)?;
            let results = service
                .search_memos(&config.caller(), &SearchMemosArgs { query: query.clone() })
                .await?;

            if results.is_empty() {
                println!("No memos found for '{}'", query);
            } else {
                println!("Found {} memos for '{}':\n", results.len(), query);
                for (i, memo) in results.iter().enumerate() {
                    println!("{}. {} [{}]", i + 1, memo.name, memo.visibility);
                    if !memo.tags.is_empty() {
                        println!("   Tags: {:?}", memo.tags);
                    }
                    let snippet: String = memo.content.chars().take(100).collect();
                    println!("   {}", snippet);
                    println!();
                }
            }
            Ok(())
        }
        Commands::Tags { database, user_id } => {
            let config = load_config(database, user_id)?;
            let service = open_service(&config)?;
            let tags = service.list_tags(&config.caller()).await?;

            println!("Found {} tags:\n", tags.len());
            for tag in &tags {
                println!("- {} ({})", tag.tag, tag.count);
            }
            Ok(())
        }
    }
}
