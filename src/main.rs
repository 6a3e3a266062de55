use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use playrec_api::RestApi;
use playrec_core::{Engine, EngineConfig, EngineSnapshot, DEFAULT_TOP_N};
use playrec_loader::{CsvLoader, CsvOptions};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Recommend games played like the one you enjoy
#[derive(Parser, Debug)]
#[command(name = "playrec")]
#[command(about = "Item-item game recommendations from play logs", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print games similar to the given one
    Recommend {
        #[command(flatten)]
        source: SourceArgs,

        /// Game title to find neighbours for
        #[arg(short, long)]
        game: String,

        /// Number of recommendations
        #[arg(short = 'n', long, default_value_t = DEFAULT_TOP_N)]
        top_n: usize,

        /// Print similarity scores
        #[arg(long)]
        scores: bool,
    },
    /// Print every game the model knows about
    Games {
        #[command(flatten)]
        source: SourceArgs,
    },
    /// Serve the REST API
    Serve {
        #[command(flatten)]
        source: SourceArgs,

        /// HTTP API port
        #[arg(long, default_value_t = 8080)]
        http_port: u16,
    },
}

#[derive(Args, Debug)]
struct SourceArgs {
    /// Interaction log (CSV)
    #[arg(short, long, default_value = "./data/steam-200k.csv")]
    data: PathBuf,

    /// First CSV row holds column names
    #[arg(long)]
    has_headers: bool,

    /// JSON file overriding engine settings
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl SourceArgs {
    fn engine_config(&self) -> anyhow::Result<EngineConfig> {
        match &self.config {
            Some(path) => {
                let json = std::fs::read_to_string(path)
                    .with_context(|| format!("reading config {}", path.display()))?;
                Ok(EngineConfig::from_json(&json)?)
            }
            None => Ok(EngineConfig::default()),
        }
    }

    fn fit(&self) -> anyhow::Result<(EngineSnapshot, EngineConfig)> {
        let config = self.engine_config()?;
        let options = CsvOptions {
            has_headers: self.has_headers,
            ..Default::default()
        };
        let raw = CsvLoader::new(options).load(&self.data)?;
        let snapshot = EngineSnapshot::fit(&raw, &config)
            .with_context(|| format!("building model from {}", self.data.display()))?;
        Ok((snapshot, config))
    }
}

fn init_tracing(level: &str) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(level))?;
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Recommend {
            source,
            game,
            top_n,
            scores,
        } => {
            init_tracing(&source.log_level)?;
            let (snapshot, _) = source.fit()?;
            let recommendations = snapshot.recommend(&game, top_n);
            if recommendations.is_empty() {
                println!("No recommendations found for \"{}\". Try a different game.", game);
            } else {
                for rec in recommendations {
                    if scores {
                        println!("{:.4}\t{}", rec.score, rec.item_id);
                    } else {
                        println!("{}", rec.item_id);
                    }
                }
            }
        }
        Command::Games { source } => {
            init_tracing(&source.log_level)?;
            let (snapshot, _) = source.fit()?;
            for game in snapshot.list_known_items() {
                println!("{}", game);
            }
        }
        Command::Serve { source, http_port } => {
            init_tracing(&source.log_level)?;
            info!("Starting playrec v{}", env!("CARGO_PKG_VERSION"));
            info!("Data file: {:?}", source.data);

            let (snapshot, config) = source.fit()?;
            let engine = Arc::new(Engine::from_snapshot(snapshot, config));

            let http_handle = std::thread::spawn(move || {
                info!("Starting HTTP server on port {}", http_port);
                let sys = actix_web::rt::System::new();
                sys.block_on(async {
                    if let Err(e) = RestApi::start(engine, http_port).await {
                        tracing::error!("HTTP server error: {}", e);
                    }
                })
            });

            info!("HTTP API: http://localhost:{}/", http_port);

            tokio::select! {
                _ = tokio::signal::ctrl_c() => {
                    info!("Shutdown signal received");
                }
                _ = tokio::task::spawn_blocking(move || {
                    http_handle.join().ok();
                }) => {
                    info!("HTTP server stopped");
                }
            }

            info!("Shutting down...");
        }
    }

    Ok(())
}
