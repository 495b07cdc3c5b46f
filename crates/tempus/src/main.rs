//! tempus - local snapshot-based version tracking.
//!
//! This is the main entry point for the tempus CLI.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tempus_core::{Config, LogEntry, LogLevel, VersionManager};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tempus")]
#[command(author, version, about = "Local snapshot-based version tracking", long_about = None)]
struct Cli {
    /// Project directory to operate on (defaults to the current directory)
    #[arg(long, global = true, value_name = "PATH")]
    dir: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Subcommand
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start tracking versions in the project directory
    New {
        /// Name for the project
        name: String,
    },
    /// Capture the working tree as a new version
    Save {
        /// Describe what changed
        #[arg(short, long)]
        message: Option<String>,
    },
    /// Show the version history
    Log,
    /// Replace the working tree with a stored version
    Restore {
        /// Version to restore (1.2, v1.2, or a bare 3 for 3.0)
        version: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Show project information
    Status,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let root = match cli.dir.clone() {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    let (config, sources) = Config::load(Some(&root)).await?;
    init_logging(cli.verbose, config.log_level);
    for source in &sources {
        tracing::debug!(path = %source.display(), "Loaded config");
    }

    let manager = VersionManager::new(&root);

    match cli.command {
        Commands::New { name } => cmd_new(&manager, &config, &name).await,
        Commands::Save { message } => cmd_save(&manager, message.as_deref()).await,
        Commands::Log => cmd_log(&manager).await,
        Commands::Restore { version, yes } => cmd_restore(&manager, &version, yes).await,
        Commands::Status => cmd_status(&manager).await,
    }
}

/// Initialize logging to stderr.
///
/// `-v` forces debug output for the tempus crates; otherwise the configured
/// level (default info) applies. `RUST_LOG` overrides both.
fn init_logging(verbose: bool, level: Option<LogLevel>) {
    let filter = if verbose {
        "tempus=debug,tempus_core=debug,tempus_store=debug".to_string()
    } else {
        let level = level.map(|l| l.as_str()).unwrap_or("info");
        format!("tempus={level},tempus_core={level},tempus_store={level}")
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Handle `tempus new`.
async fn cmd_new(manager: &VersionManager, config: &Config, name: &str) -> anyhow::Result<()> {
    let author = config
        .author
        .clone()
        .or_else(|| std::env::var("USER").ok())
        .unwrap_or_else(|| "unknown".to_string());

    let project = manager.init(name, &author).await?;

    println!("Initialized project '{}'", project.name);
    println!("Location: {}", manager.root().display());
    println!();
    println!("Next steps:");
    println!("  tempus save -m \"message\"    capture a version");
    println!("  tempus log                   view history");
    Ok(())
}

/// Handle `tempus save`.
async fn cmd_save(manager: &VersionManager, message: Option<&str>) -> anyhow::Result<()> {
    let saved = manager.save(message).await?;

    println!("Saved version {}", saved.version);
    println!("  Date:    {}", saved.saved_at);
    println!("  Message: {}", saved.message);
    println!("  Entries: {}", saved.entries_saved);
    Ok(())
}

/// Handle `tempus log`.
async fn cmd_log(manager: &VersionManager) -> anyhow::Result<()> {
    let entries = manager.log().await?;

    if entries.is_empty() {
        println!("No versions saved yet.");
        return Ok(());
    }

    println!("Version history (newest first):");
    println!();
    for entry in entries {
        print_log_entry(&entry);
    }
    Ok(())
}

fn print_log_entry(entry: &LogEntry) {
    match &entry.metadata {
        Some(metadata) => {
            println!("Version {}", metadata.version);
            println!("  Date:    {}", metadata.saved_at);
            println!("  Message: {}", metadata.message);
            println!("  Entries: {}", metadata.entries_saved);
        }
        None => {
            println!("Version {}", entry.version);
            println!("  (metadata unavailable)");
        }
    }
    println!();
}

/// Handle `tempus restore`.
async fn cmd_restore(manager: &VersionManager, version: &str, yes: bool) -> anyhow::Result<()> {
    let plan = manager.plan_restore(version).await?;

    println!("Restoring version {}", plan.version());
    match plan.metadata() {
        Some(metadata) => {
            println!("  Date:    {}", metadata.saved_at);
            println!("  Message: {}", metadata.message);
        }
        None => println!("  (metadata unavailable)"),
    }
    println!();

    if !yes && !confirm("This replaces the current working tree. Continue?")? {
        println!("Cancelled.");
        return Ok(());
    }

    let report = manager.restore(plan.confirm()).await?;

    println!("Restored version {}", report.version);
    println!("  Entries removed:  {}", report.removed);
    println!("  Entries restored: {}", report.restored);
    Ok(())
}

/// Handle `tempus status`.
async fn cmd_status(manager: &VersionManager) -> anyhow::Result<()> {
    let status = manager.status().await?;

    println!("Project:  {}", status.project.name);
    println!("Author:   {}", status.project.author);
    println!("Created:  {}", status.project.created_at);
    println!("Location: {}", status.root.display());
    println!("Versions: {}", status.version_count);
    match status.latest {
        Some(latest) => println!("Latest:   {}", latest),
        None => println!("Latest:   (none yet)"),
    }
    Ok(())
}

/// Ask a yes/no question, defaulting to no.
fn confirm(question: &str) -> anyhow::Result<bool> {
    use std::io::{self, Write};

    print!("{} [y/N] ", question);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().eq_ignore_ascii_case("y"))
}
