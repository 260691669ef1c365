//! Serve a directory over HTTP: static files plus listings, with access
//! logging. The moral equivalent of pointing a browser at a folder.

use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use tokio::net::TcpListener;

use stackware::config::{load_config, ShareConfig};
use stackware::observability::init_tracing;
use stackware::{DirIndex, Logged, Server, Stack, StaticFiles};

#[derive(Parser)]
#[command(name = "share")]
#[command(about = "Serve a directory over HTTP", long_about = None)]
struct Cli {
    /// Optional TOML config file; flags override it.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory to serve.
    #[arg(short, long)]
    root: Option<PathBuf>,

    /// Bind address.
    #[arg(short, long)]
    bind: Option<String>,

    /// List dotfiles in directory listings.
    #[arg(long)]
    show_hidden: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ShareConfig::default(),
    };
    if let Some(root) = cli.root {
        config.root = root;
    }
    if let Some(bind) = cli.bind {
        config.bind_address = bind;
    }
    if cli.show_hidden {
        config.show_hidden = true;
    }

    let root = config.root.canonicalize()?;
    tracing::info!(
        bind_address = %config.bind_address,
        root = %root.display(),
        "configuration loaded"
    );

    let mut files = StaticFiles::new("/", &root);
    if let Some(index) = &config.index {
        files = files.with_index(index);
    }
    let pipeline = Logged::new(
        Stack::new()
            .layer(files)
            .layer(DirIndex::new("/", &root).show_hidden(config.show_hidden)),
    );

    let listener = TcpListener::bind(&config.bind_address).await?;
    tracing::info!(
        address = %listener.local_addr()?,
        "sharing directory"
    );

    Server::new(pipeline)
        .request_timeout(Duration::from_secs(config.request_timeout_secs))
        .run(listener)
        .await?;

    tracing::info!("shutdown complete");
    Ok(())
}
