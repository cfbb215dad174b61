//! `retail` binary.
//!
//! Reads `config.toml` (or the path given with `--config`) layered with
//! `RETAIL__*` environment variables, opens the SQLite store, and either
//! serves the dashboards or runs one of the maintenance commands.
//!
//! ```text
//! retail serve
//! retail import --csv online_retail.csv --stock-multiplier 1.5
//! retail invoice-dates
//! retail reset-db
//! ```

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use retail_core::{model::StockMultiplier, store::RetailStore as _};
use retail_store_sqlite::SqliteStore;
use retail_web::{AppState, ServerConfig, Templates};
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Retail analytics dashboards and import pipeline")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml", global = true)]
  config: PathBuf,

  #[command(subcommand)]
  command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
  /// Serve the dashboards and JSON API (the default).
  Serve {
    #[arg(long)]
    host: Option<String>,
    #[arg(long)]
    port: Option<u16>,
  },
  /// Rebuild the normalized tables from the flat source table.
  Import {
    /// Import this CSV file instead of a source table.
    #[arg(long, conflicts_with = "source_database")]
    csv: Option<PathBuf>,
    /// SQLite database holding the source table.
    #[arg(long)]
    source_database: Option<PathBuf>,
    /// Name of the source table.
    #[arg(long)]
    table: Option<String>,
    /// Initial stock is units sold times this factor.
    #[arg(long)]
    stock_multiplier: Option<f64>,
  },
  /// List the distinct invoice dates in the store.
  InvoiceDates,
  /// Drop and recreate every table.
  ResetDb,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  // Load configuration.
  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("RETAIL").separator("__"))
    .build()
    .context("failed to read config file")?;

  let mut server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  let database_path = expand_tilde(&server_cfg.database_path);
  let store = SqliteStore::open(&database_path)
    .await
    .with_context(|| format!("failed to open store at {database_path:?}"))?;

  match cli.command.unwrap_or(Command::Serve { host: None, port: None }) {
    Command::Serve { host, port } => {
      if let Some(host) = host {
        server_cfg.host = host;
      }
      if let Some(port) = port {
        server_cfg.port = port;
      }
      serve(store, server_cfg).await
    }
    Command::Import { csv, source_database, table, stock_multiplier } => {
      let import = &mut server_cfg.import;
      if let Some(csv) = csv {
        import.source_csv = Some(csv);
      }
      if let Some(db) = source_database {
        import.source_csv = None;
        import.source_database = Some(db);
      }
      if let Some(table) = table {
        import.source_table = table;
      }
      if let Some(m) = stock_multiplier {
        import.stock_multiplier =
          StockMultiplier::new(m).context("invalid --stock-multiplier")?;
      }
      import_dataset(&store, &server_cfg, &database_path).await
    }
    Command::InvoiceDates => {
      let dates = store
        .invoice_dates()
        .await
        .context("failed to list invoice dates")?;
      for date in &dates {
        println!("{date}");
      }
      tracing::info!(count = dates.len(), "distinct invoice dates");
      Ok(())
    }
    Command::ResetDb => {
      store.reset().await.context("failed to reset database")?;
      tracing::info!(path = ?database_path, "database reset");
      Ok(())
    }
  }
}

async fn serve(store: SqliteStore, server_cfg: ServerConfig) -> anyhow::Result<()> {
  let templates = Templates::new().context("failed to load templates")?;
  let address = format!("{}:{}", server_cfg.host, server_cfg.port);
  let state = AppState {
    store:     Arc::new(store),
    config:    Arc::new(server_cfg),
    templates: Arc::new(templates),
  };
  let app = retail_web::router(state);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

async fn import_dataset(
  store: &SqliteStore,
  server_cfg: &ServerConfig,
  database_path: &Path,
) -> anyhow::Result<()> {
  let source_spec = server_cfg.import.source(database_path);
  tracing::info!(source = %source_spec, "loading source table");
  let source = source_spec
    .load()
    .await
    .with_context(|| format!("failed to load {source_spec}"))?;

  let summary = retail_import::run_import(store, &source, &server_cfg.import.options())
    .await
    .context("import failed")?;

  println!(
    "{}",
    serde_json::to_string_pretty(&summary).context("failed to serialise import summary")?
  );
  Ok(())
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
