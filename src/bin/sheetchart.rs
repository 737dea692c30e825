use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use sheetchart::dates::parse_patterns;
use sheetchart::labels::{
    CharWidthEstimate, LabelLayoutEngine, LinearScale, RelaxationMode, label_targets,
};
use sheetchart::{ChartConfig, DateNormalizer, ParsedDate};
use sheetchart::{dataset, stats, storage};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(
    name = "sheetchart",
    version,
    about = "Normalize spreadsheet time series and lay out chart labels"
)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse a single date cell and print it as YYYY-MM-DD (or `unparseable`).
    Date(DateArgs),
    /// Load a CSV export, normalize dates and numbers (and optionally save / summarize).
    Prepare(PrepareArgs),
    /// Compute right-edge label positions for a CSV export and print them as JSON.
    Labels(LabelArgs),
}

#[derive(ValueEnum, Clone, Debug)]
enum OutFormat {
    Csv,
    Json,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Relaxation {
    Forward,
    Symmetric,
}

impl From<Relaxation> for RelaxationMode {
    fn from(r: Relaxation) -> Self {
        match r {
            Relaxation::Forward => RelaxationMode::Forward,
            Relaxation::Symmetric => RelaxationMode::Symmetric,
        }
    }
}

#[derive(Args, Debug)]
struct DateArgs {
    /// Raw cell text, e.g. "Ene-20" or "2020-01-05".
    raw: String,
    /// Format pattern to try, in order (repeatable): `%Y-%m-%d`, `%b-%y`, mmmYY, yearMonth…
    #[arg(short = 'f', long = "format")]
    formats: Vec<String>,
}

#[derive(Args, Debug)]
struct PrepareArgs {
    /// CSV file (wide or long layout).
    csv: PathBuf,
    /// JSON configuration file.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Save prepared rows to file (format inferred by --format or extension).
    #[arg(long)]
    out: Option<PathBuf>,
    /// Output format (csv or json). If omitted, inferred from --out extension.
    #[arg(long, value_enum)]
    format: Option<OutFormat>,
    /// Print per-series statistics to stdout.
    #[arg(long, default_value_t = false)]
    stats: bool,
}

#[derive(Args, Debug)]
struct LabelArgs {
    /// CSV file (wide or long layout).
    csv: PathBuf,
    /// JSON configuration file.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Plot height in pixels; the lowest value maps here, the highest to 0.
    #[arg(long, default_value_t = 400.0)]
    height: f64,
    /// Minimum vertical distance between labels (overrides config).
    #[arg(long)]
    min_distance: Option<f64>,
    /// Maximum label width in pixels (overrides config).
    #[arg(long)]
    max_width: Option<f64>,
    /// Font size used for width estimation (overrides config).
    #[arg(long)]
    font_px: Option<f64>,
    /// Collision relaxation strategy (overrides config).
    #[arg(long, value_enum)]
    relaxation: Option<Relaxation>,
}

fn fmt_opt(v: Option<f64>) -> String {
    match v {
        Some(x) if x.is_finite() => {
            // Format up to 4 decimals, then trim trailing zeros and trailing dot.
            let s = format!("{:.4}", x);
            s.trim_end_matches('0').trim_end_matches('.').to_string()
        }
        _ => "NA".to_string(),
    }
}

fn load_config(path: Option<&Path>) -> Result<ChartConfig> {
    match path {
        Some(p) => ChartConfig::from_json_path(p)
            .with_context(|| format!("reading config {}", p.display())),
        None => Ok(ChartConfig::default()),
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Date(args) => cmd_date(args),
        Command::Prepare(args) => cmd_prepare(args),
        Command::Labels(args) => cmd_labels(args),
    }
}

fn cmd_date(args: DateArgs) -> Result<()> {
    let formats = parse_patterns(&args.formats)?;
    match DateNormalizer::default().parse(&args.raw, &formats) {
        ParsedDate::Date(d) => println!("{}", d.format("%Y-%m-%d")),
        ParsedDate::Unparseable => println!("unparseable"),
    }
    Ok(())
}

fn cmd_prepare(args: PrepareArgs) -> Result<()> {
    let cfg = load_config(args.config.as_deref())?;
    let data = dataset::load_path(&args.csv, &cfg.data)
        .with_context(|| format!("preparing {}", args.csv.display()))?;

    if let Some(path) = args.out.as_ref() {
        let fmt = match args.format {
            Some(OutFormat::Csv) => "csv",
            Some(OutFormat::Json) => "json",
            None => path.extension().and_then(|e| e.to_str()).unwrap_or("csv"),
        }
        .to_ascii_lowercase();
        match fmt.as_str() {
            "csv" => storage::save_csv(&data, path)?,
            "json" => storage::save_json(&data, path)?,
            other => anyhow::bail!("unsupported format: {}", other),
        }
        eprintln!("Saved {} rows to {}", data.rows.len(), path.display());
    }

    if args.stats {
        for s in stats::series_summary(&data) {
            let date = |d: Option<chrono::NaiveDate>| d.map_or("NA".to_string(), |d| d.to_string());
            println!(
                "{}  count={} missing={}  min={} max={} mean={} median={}  {}..{} last={}",
                s.series,
                s.count,
                s.missing,
                fmt_opt(s.min),
                fmt_opt(s.max),
                fmt_opt(s.mean),
                fmt_opt(s.median),
                date(s.first_date),
                date(s.last_date),
                fmt_opt(s.last_value)
            );
        }
    }

    Ok(())
}

fn cmd_labels(args: LabelArgs) -> Result<()> {
    let mut cfg = load_config(args.config.as_deref())?;
    if let Some(d) = args.min_distance {
        cfg.labels.min_distance = d;
    }
    if let Some(w) = args.max_width {
        cfg.labels.max_width = w;
    }
    if let Some(px) = args.font_px {
        cfg.labels.font_px = px;
    }
    if let Some(r) = args.relaxation {
        cfg.labels.relaxation = r.into();
    }

    let data = dataset::load_path(&args.csv, &cfg.data)
        .with_context(|| format!("preparing {}", args.csv.display()))?;
    let Some(scale) = LinearScale::vertical(&data, args.height) else {
        anyhow::bail!("{} has no numeric values to place labels for", args.csv.display());
    };

    let targets = label_targets(&data, &scale, &cfg.data.display_names);
    let engine = LabelLayoutEngine::from(&cfg.labels);
    let estimate = CharWidthEstimate::new(cfg.labels.font_px);
    let labels = engine.layout(&targets, |s: &str| estimate.measure(s));

    println!("{}", serde_json::to_string_pretty(&labels)?);
    Ok(())
}
