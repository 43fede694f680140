use anyhow::{Context, Result};
use clap::Parser;
use std::{net::IpAddr, path::PathBuf, sync::Arc};
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use album_catalog_server::album_store::{AlbumStore, InMemoryAlbumStore, SqliteAlbumStore};
use album_catalog_server::config::{
    parse_port, AppConfig, CliConfig, FileConfig, DEFAULT_DB_PATH, DEFAULT_PORT,
};
use album_catalog_server::server::{config::DEFAULT_MAX_BODY_BYTES, run_server};
use album_catalog_server::RequestsLoggingLevel;

fn parse_path(s: &str) -> Result<PathBuf> {
    let path_buf = PathBuf::from(s);
    let original_path = match path_buf.canonicalize() {
        Ok(path) => path,
        Err(msg) => {
            if msg.kind() == std::io::ErrorKind::NotFound {
                path_buf
            } else {
                return Err(msg).with_context(|| format!("Error resolving path: {}", s));
            }
        }
    };
    if original_path.is_absolute() {
        return Ok(original_path);
    }
    let cwd = std::env::current_dir()?;
    Ok(cwd.join(original_path))
}

#[derive(Parser, Debug)]
#[command(version, about = "Serves a small album catalog over HTTP")]
struct CliArgs {
    /// Path to a TOML config file. Values in it override the flags below.
    #[clap(long, value_parser = parse_path)]
    pub config: Option<PathBuf>,

    /// The port to listen on.
    #[clap(short, long, env = "listenPort", value_parser = parse_port, default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// The address to bind to.
    #[clap(long, default_value = "0.0.0.0")]
    pub bind_address: IpAddr,

    /// Path to the SQLite database backing the /db routes.
    #[clap(long, value_parser = parse_path, default_value = DEFAULT_DB_PATH)]
    pub db_path: PathBuf,

    /// Start the in-memory store empty instead of with the demo albums.
    #[clap(long)]
    pub no_demo_albums: bool,

    /// The level of logging to perform on each request.
    #[clap(long, default_value = "path")]
    pub logging_level: RequestsLoggingLevel,

    /// Request bodies larger than this many bytes are rejected.
    #[clap(long, default_value_t = DEFAULT_MAX_BODY_BYTES)]
    pub max_body_bytes: usize,

    /// Open and check the database, print album counts and exit.
    #[clap(long)]
    pub check_only: bool,
}

impl CliArgs {
    fn to_cli_config(&self) -> CliConfig {
        CliConfig {
            port: self.port,
            bind_address: self.bind_address,
            db_path: self.db_path.clone(),
            demo_albums: !self.no_demo_albums,
            logging_level: self.logging_level.clone(),
            max_body_bytes: self.max_body_bytes,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()?;

    let file_config = match &cli_args.config {
        Some(path) => {
            info!("Loading config file {:?}", path);
            Some(FileConfig::load(path)?)
        }
        None => None,
    };
    let config = AppConfig::resolve(&cli_args.to_cli_config(), file_config)?;

    info!("Opening album database at {:?}", config.db_path);
    let db_store = SqliteAlbumStore::new(&config.db_path)
        .with_context(|| format!("Could not open album database {:?}", config.db_path))?;

    let memory_store = if config.demo_albums {
        InMemoryAlbumStore::with_demo_albums()
    } else {
        InMemoryAlbumStore::new()
    };

    if cli_args.check_only {
        println!(
            "Database {:?} is valid: {} album(s) stored, {} album(s) in memory.",
            config.db_path,
            db_store.get_albums_count(),
            memory_store.get_albums_count()
        );
        return Ok(());
    }

    info!(
        "Ready to serve {} in-memory and {} stored album(s)",
        memory_store.get_albums_count(),
        db_store.get_albums_count()
    );

    run_server(
        config.server_config(),
        Arc::new(memory_store),
        Arc::new(db_store),
    )
    .await
}
