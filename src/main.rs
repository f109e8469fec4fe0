use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::{info, warn, Level};
use tracing_subscriber::EnvFilter;

use retro_lens::{
    composition::{FrameSurface, RenderLoop, Session},
    config::Config,
    filters::FilterKind,
    video::{ImageSource, TestPatternSource, VideoSource},
};

#[derive(Parser)]
#[command(
    name = "retro-lens",
    version,
    about = "Run live frames through retro filters",
    long_about = "Retro-Lens applies real-time retro filters (orange & teal, white noise, 8-bit, ASCII) to a live frame source and presents the result at display rate."
)]
struct Cli {
    /// Filter to apply (identity, orange_teal, white_noise, eight_bit, ascii, grayscale, pixelate)
    #[arg(short, long)]
    filter: Option<FilterKind>,

    /// Still image to use as the source instead of the test pattern
    #[arg(short, long)]
    image: Option<PathBuf>,

    /// Test pattern width
    #[arg(long, default_value_t = 640)]
    width: u32,

    /// Test pattern height
    #[arg(long, default_value_t = 480)]
    height: u32,

    /// Number of ticks to run
    #[arg(short, long, default_value_t = 90)]
    ticks: u64,

    /// Disable the horizontal mirror
    #[arg(long)]
    no_mirror: bool,

    /// Write the last presented frame to this PNG
    #[arg(short, long)]
    snapshot: Option<PathBuf>,

    /// Configuration file (optional)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// List the available filters and exit
    #[arg(long)]
    list: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level.as_str()));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Starting Retro-Lens v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let mut config = match &cli.config {
        Some(config_path) => {
            info!("Loading configuration from {:?}", config_path);
            Config::from_file(config_path)?
        }
        None => {
            info!("Using default configuration");
            Config::default()
        }
    };
    if let Some(kind) = cli.filter {
        config.pipeline.initial_filter = kind;
    }
    if cli.no_mirror {
        config.pipeline.mirror = false;
    }
    config.validate()?;

    let session = Arc::new(Session::from_config(&config.pipeline));

    if cli.list {
        for definition in session.registry().list() {
            println!(
                "{:<14} {:<12} {:<9} {}",
                definition.name,
                definition.kind.slug(),
                definition.icon,
                definition.kind.description()
            );
        }
        return Ok(());
    }

    rayon::ThreadPoolBuilder::new()
        .num_threads(config.pipeline.worker_threads)
        .build_global()?;

    let source: Box<dyn VideoSource> = match &cli.image {
        Some(path) => {
            info!("Source: image {:?}", path);
            Box::new(ImageSource::open(path)?)
        }
        None => {
            info!("Source: {}x{} test pattern", cli.width, cli.height);
            Box::new(TestPatternSource::new(cli.width, cli.height))
        }
    };

    let active = session.registry().active_filter();
    info!("Filter: {} ({})", active.name, active.kind.description());

    let mut render_loop = RenderLoop::new(&config, session.clone(), FrameSurface::new());
    render_loop.attach(source);

    // Ctrl-C stops the loop before its next tick
    let cancel = render_loop.cancel_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel.cancel();
        }
    });

    let stats = match render_loop.run(Some(cli.ticks)).await {
        Ok(stats) => stats,
        Err(e) => {
            warn!("{}", e.user_message());
            return Err(e.into());
        }
    };

    info!(
        "Presented {} of {} ticks ({} not ready, {} skipped), {:.2} ms per frame",
        stats.presented,
        stats.ticks,
        stats.not_ready,
        stats.skipped,
        stats.average_process_time().as_secs_f64() * 1000.0
    );

    if let Some(path) = &cli.snapshot {
        if render_loop.surface().save_snapshot(path)? {
            info!("Snapshot saved to: {:?}", path);
        } else {
            warn!("No frame was presented, nothing to save");
        }
    }

    Ok(())
}
