use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// Lookback used by `--all-history`; the API clamps it to what exists.
const ALL_HISTORY_DAYS: u32 = 20_000;

#[derive(Parser, Debug)]
#[command(name = "seriesreel", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render one MP4 per symbol (requires `ffmpeg`).
    Render(RenderArgs),
    /// Print the frame, duration and pitch plan for a series file as JSON.
    Plan(PlanArgs),
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Symbol to render; repeat for a batch.
    #[arg(long = "symbol", required = true)]
    symbols: Vec<String>,

    /// Number of most recent daily points.
    #[arg(long, default_value_t = 365, conflicts_with = "all_history")]
    days: u32,

    /// Fetch as much history as the source has.
    #[arg(long)]
    all_history: bool,

    /// TOML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Read `<SYMBOL>.json` series files from this directory instead of the network.
    #[arg(long)]
    series_dir: Option<PathBuf>,

    /// Override `output.dir`.
    #[arg(long)]
    out_dir: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct PlanArgs {
    /// Series JSON: `[{ "label": .., "value": .. }, ..]`.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// TOML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Plan(args) => cmd_plan(args),
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<seriesreel::AppConfig> {
    match path {
        Some(p) => Ok(seriesreel::AppConfig::load(p)?),
        None => Ok(seriesreel::AppConfig::default()),
    }
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let mut cfg = load_config(args.config.as_deref())?;
    if let Some(dir) = args.out_dir {
        cfg.output.dir = dir;
    }

    let source: Box<dyn seriesreel::SeriesSource> = match args.series_dir {
        Some(dir) => Box::new(seriesreel::JsonFileSource::new(dir)),
        None => Box::new(seriesreel::CryptoCompareSource::new(cfg.source.clone())?),
    };
    let renderer = seriesreel::ChartRenderer::new(seriesreel::ChartStyle::from_config(&cfg))?;
    let encoder_opts = seriesreel::FfmpegEncoderOpts::from_config(&cfg.encoder);
    if !seriesreel::is_ffmpeg_available(&encoder_opts.program) {
        anyhow::bail!(
            "ffmpeg is required for MP4 rendering, but '{}' could not be run",
            encoder_opts.program.display()
        );
    }
    let encoder = seriesreel::FfmpegEncoder::new(encoder_opts);
    let pipeline =
        seriesreel::Pipeline::new(cfg, source, Box::new(renderer), Box::new(encoder))?;

    let days = if args.all_history {
        ALL_HISTORY_DAYS
    } else {
        args.days
    };
    let requests: Vec<_> = args
        .symbols
        .iter()
        .map(|s| seriesreel::SeriesRequest::new(s.to_ascii_uppercase(), days))
        .collect();

    let report = pipeline.run_batch(&requests, |event| eprintln!("{event}"));
    for path in &report.artifacts {
        println!("{}", path.display());
    }
    eprintln!("{}", report.summary());

    if report.requested > 0 && report.succeeded() == 0 {
        anyhow::bail!("no videos were generated");
    }
    Ok(())
}

fn cmd_plan(args: PlanArgs) -> anyhow::Result<()> {
    let cfg = load_config(args.config.as_deref())?;
    cfg.validate()?;
    let text = std::fs::read_to_string(&args.in_path)
        .with_context(|| format!("read series '{}'", args.in_path.display()))?;
    let points: Vec<seriesreel::SeriesPoint> =
        serde_json::from_str(&text).with_context(|| "parse series JSON")?;
    let series = seriesreel::SeriesModel::new(points)?;

    let plan = seriesreel::Planner::new(&cfg)?.plan(&series)?;
    println!("{}", serde_json::to_string_pretty(&plan)?);
    Ok(())
}
