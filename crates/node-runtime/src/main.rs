//! # Content Node
//!
//! Command-line entry point.
//!
//! ```text
//! node-runtime init   [--repo PATH]              create a repository + identity
//! node-runtime id     [--repo PATH]              construct offline, print peer id and mode
//! node-runtime daemon [--repo PATH] [--offline]  construct, run until Ctrl+C, destroy
//! ```
//!
//! `--repo` overrides `NODE_REPO_PATH`; `--offline` overrides `NODE_OFFLINE`.
//! Log verbosity comes from `NODE_LOG` (falling back to `RUST_LOG`, then `info`).

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use node_runtime::adapters::FsRepo;
use node_runtime::{construct_with, destroy, Node, NodeConfig, NodeOptions};

/// Content-addressed storage node.
#[derive(Parser, Debug)]
#[command(name = "node-runtime")]
#[command(about = "Content-addressed storage node")]
struct Args {
    /// Repository directory
    #[arg(short, long, global = true)]
    repo: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Initialize a repository with a fresh identity
    Init,
    /// Print the node's peer id and mode
    Id,
    /// Run a node until interrupted
    Daemon {
        /// Do not activate network routing
        #[arg(long)]
        offline: bool,
    },
}

fn init_logging() -> Result<()> {
    let filter = EnvFilter::try_from_env("NODE_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging()?;
    let args = Args::parse();

    let mut config = NodeConfig::from_env();
    if let Some(repo) = args.repo {
        config.storage.repo_path = repo;
    }
    if let Command::Daemon { offline: true } = args.command {
        config.network.online = false;
    }
    config.validate().context("invalid configuration")?;

    match args.command {
        Command::Init => init(&config),
        Command::Id => id(&config),
        Command::Daemon { .. } => daemon(config).await,
    }
}

fn init(config: &NodeConfig) -> Result<()> {
    let path = &config.storage.repo_path;
    let identity = FsRepo::init(path)
        .with_context(|| format!("failed to initialize repository {}", path.display()))?;
    println!("{}", identity.peer_id);
    Ok(())
}

fn id(config: &NodeConfig) -> Result<()> {
    let path = &config.storage.repo_path;
    let node = construct_with(path, NodeOptions::offline(), &config.subsystems())
        .with_context(|| format!("failed to open repository {}", path.display()))?;
    let peer_id = node
        .peer_id()
        .context("node constructed without an identity")?;
    println!("{} ({})", peer_id, node.mode());
    destroy(Some(node));
    Ok(())
}

async fn daemon(config: NodeConfig) -> Result<()> {
    info!("===========================================");
    info!("  Content Node v{}", env!("CARGO_PKG_VERSION"));
    info!("===========================================");

    let node = start_node(config).await?;

    node.print_status();
    info!("Node is running. Press Ctrl+C to stop.");
    tokio::signal::ctrl_c().await?;

    info!("Shutting down");
    destroy(Some(node));
    Ok(())
}

/// Construct on the blocking pool; construction waits on the repository lock
/// and disk I/O.
async fn start_node(config: NodeConfig) -> Result<Node> {
    let cfg = config.clone();
    tokio::task::spawn_blocking(move || {
        construct_with(&cfg.storage.repo_path, cfg.options(), &cfg.subsystems())
    })
    .await
    .context("construction task panicked")?
    .with_context(|| {
        format!(
            "failed to construct node over {}",
            config.storage.repo_path.display()
        )
    })
}
