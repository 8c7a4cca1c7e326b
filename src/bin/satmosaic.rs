use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "satmosaic", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Stack the last days of Sentinel-3 imagery around a point into one PNG.
    Sentinel(SentinelArgs),
    /// Download the latest NASA SDO solar image.
    Sdo(SdoArgs),
}

#[derive(Parser, Debug)]
struct SentinelArgs {
    /// Optional JSON config; flags below override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Center latitude in degrees.
    #[arg(short = 'a', long, allow_hyphen_values = true)]
    latitude: Option<f64>,

    /// Center longitude in degrees.
    #[arg(short = 'b', long, allow_hyphen_values = true)]
    longitude: Option<f64>,

    /// Zoom level, 0 (1000 km wide) to 4 (150 km wide).
    #[arg(short = 'z', long)]
    zoom_level: Option<f64>,

    /// Output width in pixels (requires --height).
    #[arg(long)]
    width: Option<u32>,

    /// Output height in pixels (requires --width).
    #[arg(long)]
    height: Option<u32>,

    /// Number of past days to stack.
    #[arg(long)]
    days: Option<u32>,

    /// WMS layer name.
    #[arg(long)]
    layer: Option<String>,

    /// Frame stacking strategy.
    #[arg(long, value_enum)]
    policy: Option<satmosaic::CompositePolicy>,

    /// Color correction applied after stacking.
    #[arg(long, value_enum)]
    correction: Option<CorrectionChoice>,

    /// Tail percentile for --correction percentile-stretch.
    #[arg(long)]
    percentile: Option<f64>,

    /// Per-request timeout in seconds.
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Concurrent downloads (default: one per day).
    #[arg(long)]
    workers: Option<usize>,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct SdoArgs {
    /// SDO channel: 0171, 0171pfss, 0304, 0304pfss or HMIIC.
    #[arg(long, default_value = "0304")]
    color_mode: String,

    /// Per-request timeout in seconds.
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Output image path (format from extension).
    #[arg(long)]
    out: PathBuf,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum CorrectionChoice {
    GrayWorld,
    PercentileStretch,
    None,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Sentinel(args) => cmd_sentinel(args),
        Command::Sdo(args) => cmd_sdo(args),
    }
}

fn build_config(args: &SentinelArgs) -> anyhow::Result<satmosaic::MosaicConfig> {
    let mut cfg = match &args.config {
        Some(path) => satmosaic::MosaicConfig::from_path(path)?,
        None => satmosaic::MosaicConfig::default(),
    };

    if args.latitude.is_some() {
        cfg.latitude = args.latitude;
    }
    if args.longitude.is_some() {
        cfg.longitude = args.longitude;
    }
    if let Some(z) = args.zoom_level {
        cfg.zoom_level = z;
    }
    if args.width.is_some() || args.height.is_some() {
        cfg.width = args.width;
        cfg.height = args.height;
    }
    if let Some(d) = args.days {
        cfg.days = d;
    }
    if let Some(layer) = &args.layer {
        cfg.layer = layer.clone();
    }
    if let Some(p) = args.policy {
        cfg.policy = p;
    }
    if args.timeout_secs.is_some() {
        cfg.fetch_timeout_secs = args.timeout_secs;
    }
    if args.workers.is_some() {
        cfg.fetch_workers = args.workers;
    }

    if let Some(choice) = args.correction {
        cfg.correction = match choice {
            CorrectionChoice::None => satmosaic::ColorCorrection::None,
            CorrectionChoice::GrayWorld => satmosaic::ColorCorrection::default(),
            CorrectionChoice::PercentileStretch => satmosaic::ColorCorrection::PercentileStretch {
                percentile: satmosaic::color::DEFAULT_STRETCH_PERCENTILE,
            },
        };
    }
    if let Some(p) = args.percentile {
        match &mut cfg.correction {
            satmosaic::ColorCorrection::PercentileStretch { percentile } => *percentile = p,
            _ => anyhow::bail!("--percentile requires --correction percentile-stretch"),
        }
    }

    cfg.validate()?;
    Ok(cfg)
}

fn cmd_sentinel(args: SentinelArgs) -> anyhow::Result<()> {
    let cfg = build_config(&args)?;
    let fetcher = satmosaic::HttpFetcher::new(cfg.fetch_timeout())?;

    let out = satmosaic::compose_sentinel(&cfg, &fetcher, satmosaic::CancelToken::new())?;
    tracing::info!(
        used = out.frames_used,
        requested = out.frames_requested,
        "mosaic complete"
    );

    write_png(&args.out, &out.image)
}

fn cmd_sdo(args: SdoArgs) -> anyhow::Result<()> {
    let mode: satmosaic::SdoColorMode = args.color_mode.parse()?;
    let timeout = args.timeout_secs.map(std::time::Duration::from_secs);
    let fetcher = satmosaic::HttpFetcher::new(timeout)?;

    let img = satmosaic::fetch_sdo_image(&fetcher, mode)?;
    create_parent_dir(&args.out)?;
    img.save(&args.out)
        .with_context(|| format!("write image '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn write_png(path: &Path, img: &image::RgbImage) -> anyhow::Result<()> {
    create_parent_dir(path)?;
    image::save_buffer_with_format(
        path,
        img.as_raw(),
        img.width(),
        img.height(),
        image::ColorType::Rgb8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", path.display()))?;

    eprintln!("wrote {}", path.display());
    Ok(())
}

fn create_parent_dir(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    Ok(())
}
