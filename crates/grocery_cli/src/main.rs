//! Grocery CLI - a grocery list synced with a remote item collection
//!
//! Usage: grocery <command> [options]

mod render;
mod shell;

use clap::{Parser, Subcommand};
use grocery_common::{GroceryError, EXIT_ERROR, EXIT_SUCCESS, EXIT_SYNC_ERROR};
use grocery_config::{Config, CONFIG_PATH};
use grocery_core::{AppSnapshot, GroceryApp, HttpRemote, ItemId, LoadState};
use render::Renderer;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    name = "grocery",
    version,
    about = "Grocery list synced with a remote item collection"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose/debug logging
    #[arg(long, global = true)]
    verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    log_json: bool,

    /// Remote collection URL (overrides config and GROCERY_API_URL)
    #[arg(long, global = true, value_name = "URL")]
    api_url: Option<String>,

    /// Directory containing .grocery/config.toml
    #[arg(long, global = true, value_name = "DIR")]
    workspace: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create .grocery/config.toml with defaults
    Init,

    /// Show the list
    List {
        /// Only show items containing this text (case-insensitive)
        #[arg(short, long)]
        search: Option<String>,

        /// Output the snapshot as JSON
        #[arg(long)]
        json: bool,
    },

    /// Add an item
    Add {
        /// Item text (words are joined with spaces)
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,

        /// Output the snapshot as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check or uncheck an item
    Check {
        id: ItemId,

        /// Output the snapshot as JSON
        #[arg(long)]
        json: bool,
    },

    /// Delete an item
    Delete {
        id: ItemId,

        /// Output the snapshot as JSON
        #[arg(long)]
        json: bool,
    },

    /// Interactive session
    Shell,
}

/// A one-shot mutation
enum Action {
    Add(String),
    Check(ItemId),
    Delete(ItemId),
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    grocery_common::telemetry::init_tracing(cli.verbose, cli.log_json);
    tracing::debug!("Grocery CLI started");

    let code = match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            e.downcast_ref::<GroceryError>()
                .map_or(EXIT_ERROR, GroceryError::exit_code)
        }
    };

    std::process::exit(code);
}

async fn run(cli: Cli) -> anyhow::Result<i32> {
    let workspace = cli.workspace.clone().unwrap_or_else(|| PathBuf::from("."));

    match cli.command {
        Commands::Init => cmd_init(&workspace),
        Commands::List { ref search, json } => {
            let (app, renderer) = open(&cli, &workspace, json)?;
            cmd_list(app, renderer, search.as_deref()).await
        }
        Commands::Add { ref text, json } => {
            let (app, renderer) = open(&cli, &workspace, json)?;
            cmd_mutate(app, renderer, Action::Add(text.join(" "))).await
        }
        Commands::Check { id, json } => {
            let (app, renderer) = open(&cli, &workspace, json)?;
            cmd_mutate(app, renderer, Action::Check(id)).await
        }
        Commands::Delete { id, json } => {
            let (app, renderer) = open(&cli, &workspace, json)?;
            cmd_mutate(app, renderer, Action::Delete(id)).await
        }
        Commands::Shell => {
            let (app, renderer) = open(&cli, &workspace, false)?;
            shell::run(app, renderer).await?;
            Ok(EXIT_SUCCESS)
        }
    }
}

//
// Helper functions
//

/// Load config, apply the CLI override, and build the app
fn open(
    cli: &Cli,
    workspace: &Path,
    json: bool,
) -> anyhow::Result<(GroceryApp<HttpRemote>, Renderer)> {
    let mut config = Config::load(workspace)?;
    if let Some(url) = &cli.api_url {
        config.remote.api_url = url.clone();
        config.validate()?;
    }
    tracing::debug!(api_url = %config.remote.api_url, "Using remote");

    let remote = HttpRemote::new(&config.remote)?;
    let renderer = Renderer {
        show_footer: config.display.show_footer,
        json,
    };
    Ok((GroceryApp::new(remote), renderer))
}

fn exit_code_for(snapshot: &AppSnapshot) -> i32 {
    if snapshot.fetch_error.is_some() {
        EXIT_SYNC_ERROR
    } else {
        EXIT_SUCCESS
    }
}

//
// Command implementations
//

fn cmd_init(workspace: &Path) -> anyhow::Result<i32> {
    use std::fs;

    let config_path = workspace.join(CONFIG_PATH);
    if config_path.exists() {
        eprintln!("✓ {} already exists", CONFIG_PATH);
        return Ok(EXIT_SUCCESS);
    }

    if let Some(parent) = config_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&config_path, Config::default_toml())?;
    eprintln!("✓ Created {}", CONFIG_PATH);
    Ok(EXIT_SUCCESS)
}

async fn cmd_list(
    mut app: GroceryApp<HttpRemote>,
    renderer: Renderer,
    search: Option<&str>,
) -> anyhow::Result<i32> {
    render::start_with_spinner(&mut app).await?;

    let snapshot = match search {
        Some(query) => app.set_search(query),
        None => app.snapshot(),
    };
    renderer.draw(&snapshot)?;
    Ok(exit_code_for(&snapshot))
}

async fn cmd_mutate(
    mut app: GroceryApp<HttpRemote>,
    renderer: Renderer,
    action: Action,
) -> anyhow::Result<i32> {
    let loaded = render::start_with_spinner(&mut app).await?;

    // Without the current list, client-side ids could collide
    if let LoadState::Failed(_) = app.load_state() {
        renderer.draw(&loaded)?;
        return Ok(EXIT_SYNC_ERROR);
    }

    let snapshot = match action {
        Action::Add(text) => {
            let text = text.trim();
            if text.is_empty() {
                return Err(GroceryError::ValidationError(
                    "item text cannot be empty".to_string(),
                )
                .into());
            }
            app.add_item(text).await?
        }
        Action::Check(id) => app.toggle_checked(id).await?,
        Action::Delete(id) => app.delete_item(id).await?,
    };

    renderer.draw(&snapshot)?;
    Ok(exit_code_for(&snapshot))
}
