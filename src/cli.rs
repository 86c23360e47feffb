//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::open_tick_source;
use crate::adapters::svg_chart_adapter::SvgChartAdapter;
use crate::domain::analysis::{analyze_table, AnalysisConfig, AnalysisReport};
use crate::domain::config_validation::{
    read_initial_money, read_max_nodes, read_variant, validate_analysis_config,
};
use crate::domain::error::TradeTreeError;
use crate::domain::price_table::PriceTable;
use crate::domain::signal::{extract_signals, SignalSet};
use crate::domain::strategy_tree::{TreeConfig, Variant};
use crate::domain::universe::{parse_assets, select_assets};
use crate::ports::chart_port::{ChartData, ChartPort};
use crate::ports::config_port::ConfigPort;

#[derive(Parser, Debug)]
#[command(
    name = "tradetree",
    about = "Turning-point detection and buy/sell sequence enumeration over tick data"
)]
pub struct Cli {
    /// Log level when RUST_LOG is unset (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build strategy trees and write the analysis report
    Analyze {
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[command(flatten)]
        overrides: AnalyzeOverrides,
        #[arg(long)]
        dry_run: bool,
    },
    /// Print buy/sell candidate ticks per asset
    Signals {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(long)]
        asset: Option<String>,
    },
    /// List assets in a tick file
    Assets {
        #[arg(short, long)]
        input: PathBuf,
    },
    /// Validate an analysis configuration
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

/// Command-line values that take precedence over the config file.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct AnalyzeOverrides {
    /// Tick file (.json or .csv)
    #[arg(short, long)]
    pub input: Option<PathBuf>,
    /// Comma-separated asset names
    #[arg(long)]
    pub asset: Option<String>,
    /// pruned or exhaustive
    #[arg(long)]
    pub variant: Option<Variant>,
    #[arg(long)]
    pub initial_money: Option<f64>,
    #[arg(long)]
    pub max_nodes: Option<usize>,
    /// Report path; stdout when absent
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    /// Directory for one SVG chart per asset
    #[arg(long)]
    pub chart_dir: Option<PathBuf>,
}

/// Fully resolved `analyze` settings.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyzeSettings {
    pub input: PathBuf,
    pub assets: Vec<String>,
    pub analysis: AnalysisConfig,
    pub output: Option<PathBuf>,
    pub chart_dir: Option<PathBuf>,
}

pub fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    // A second initialisation (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

pub fn run(cli: Cli) -> ExitCode {
    init_logging(&cli.log_level);

    let result = match cli.command {
        Command::Analyze {
            config,
            overrides,
            dry_run,
        } => run_analyze(config.as_deref(), &overrides, dry_run),
        Command::Signals { input, asset } => run_signals(&input, asset.as_deref()),
        Command::Assets { input } => run_assets(&input),
        Command::Validate { config } => run_validate(&config),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            (&e).into()
        }
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, TradeTreeError> {
    info!("Loading config from {}", path.display());
    FileConfigAdapter::from_file(path)
}

pub fn build_analysis_config(config: &dyn ConfigPort) -> Result<AnalysisConfig, TradeTreeError> {
    let defaults = AnalysisConfig::default();
    Ok(AnalysisConfig {
        initial_money: read_initial_money(config)?.unwrap_or(defaults.initial_money),
        tree: TreeConfig {
            variant: read_variant(config)?.unwrap_or_default(),
            max_nodes: read_max_nodes(config)?,
        },
    })
}

/// Merge config file values with command-line overrides.
pub fn resolve_settings(
    config: Option<&dyn ConfigPort>,
    overrides: &AnalyzeOverrides,
) -> Result<AnalyzeSettings, TradeTreeError> {
    let mut analysis = match config {
        Some(c) => build_analysis_config(c)?,
        None => AnalysisConfig::default(),
    };

    if let Some(variant) = overrides.variant {
        analysis.tree.variant = variant;
    }
    if let Some(money) = overrides.initial_money {
        if !money.is_finite() || money <= 0.0 {
            return Err(TradeTreeError::ConfigInvalid {
                section: "analysis".into(),
                key: "initial_money".into(),
                reason: "--initial-money must be positive".into(),
            });
        }
        analysis.initial_money = money;
    }
    if let Some(limit) = overrides.max_nodes {
        if limit == 0 {
            return Err(TradeTreeError::ConfigInvalid {
                section: "analysis".into(),
                key: "max_nodes".into(),
                reason: "--max-nodes must be at least 1".into(),
            });
        }
        analysis.tree.max_nodes = Some(limit);
    }

    let input = overrides
        .input
        .clone()
        .or_else(|| config.and_then(|c| c.get_path("data", "input")))
        .ok_or_else(|| TradeTreeError::ConfigMissing {
            section: "data".into(),
            key: "input".into(),
        })?;

    let asset_list = overrides
        .asset
        .clone()
        .or_else(|| config.and_then(|c| c.get_string("data", "assets")));
    let assets = match asset_list {
        Some(list) => parse_assets(&list).map_err(|e| TradeTreeError::ConfigInvalid {
            section: "data".into(),
            key: "assets".into(),
            reason: e.to_string(),
        })?,
        None => Vec::new(),
    };

    Ok(AnalyzeSettings {
        input,
        assets,
        analysis,
        output: overrides
            .output
            .clone()
            .or_else(|| config.and_then(|c| c.get_path("output", "report"))),
        chart_dir: overrides
            .chart_dir
            .clone()
            .or_else(|| config.and_then(|c| c.get_path("output", "chart_dir"))),
    })
}

fn load_table(input: &Path) -> Result<PriceTable, TradeTreeError> {
    info!("Loading ticks from {}", input.display());
    open_tick_source(input).load_table()
}

fn run_analyze(
    config_path: Option<&Path>,
    overrides: &AnalyzeOverrides,
    dry_run: bool,
) -> Result<(), TradeTreeError> {
    let adapter = config_path.map(load_config).transpose()?;
    let settings = resolve_settings(adapter.as_ref().map(|a| a as &dyn ConfigPort), overrides)?;

    if dry_run {
        return run_dry_run(&settings);
    }

    let report = run_analysis(&settings)?;
    write_report(&report, settings.output.as_deref())
}

/// Load, analyze and chart. Returns the report without writing it.
pub fn run_analysis(settings: &AnalyzeSettings) -> Result<AnalysisReport, TradeTreeError> {
    let table = load_table(&settings.input)?;
    let assets = select_assets(&table, &settings.assets)?;

    info!(
        "Analyzing {} assets ({} variant, initial money {})",
        assets.len(),
        settings.analysis.tree.variant,
        settings.analysis.initial_money
    );

    let generated_at = chrono::Utc::now().to_rfc3339();
    let report = analyze_table(&table, &assets, &settings.analysis, generated_at)?;

    if let Some(dir) = &settings.chart_dir {
        write_charts(&table, &report, dir)?;
    }

    Ok(report)
}

pub fn run_dry_run(settings: &AnalyzeSettings) -> Result<(), TradeTreeError> {
    let table = load_table(&settings.input)?;
    let assets = select_assets(&table, &settings.assets)?;

    for name in &assets {
        let series = table.series(name)?;
        let signals = extract_signals(series)?;
        info!(
            "  {}: {} ticks, {} buy / {} sell candidates",
            name,
            series.len(),
            signals.buy_times.len(),
            signals.sell_times.len()
        );
        if settings.analysis.tree.variant == Variant::Exhaustive && signals.candidate_count() > 40 {
            warn!("  {name}: exhaustive enumeration over this many candidates may not finish");
        }
    }

    info!("Dry run complete: configuration is valid");
    Ok(())
}

/// SVG file name for `asset`, unique among the names already in `taken`.
///
/// Characters outside `[A-Za-z0-9._-]` become `_`, so distinct assets can
/// sanitize to the same stem; later ones get a `-2`, `-3`, ... suffix.
/// Names are compared case-insensitively.
fn chart_file_name(asset: &str, taken: &mut HashSet<String>) -> String {
    let stem: String = asset
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' || c == '.' { c } else { '_' })
        .collect();
    let mut name = format!("{stem}.svg");
    let mut n = 2;
    while !taken.insert(name.to_lowercase()) {
        name = format!("{stem}-{n}.svg");
        n += 1;
    }
    name
}

fn write_charts(table: &PriceTable, report: &AnalysisReport, dir: &Path) -> Result<(), TradeTreeError> {
    fs::create_dir_all(dir)?;
    let renderer = SvgChartAdapter;
    let mut taken = HashSet::new();
    for (name, analysis) in &report.assets {
        let signals = analysis.signals();
        let chart = ChartData {
            series: table.series(name)?,
            signals: &signals,
            best_path: analysis.best_path.as_ref(),
        };
        let path = dir.join(chart_file_name(name, &mut taken));
        renderer.render(&chart, &path)?;
        info!("Chart for {} written to: {}", name, path.display());
    }
    Ok(())
}

pub fn write_report(report: &AnalysisReport, output: Option<&Path>) -> Result<(), TradeTreeError> {
    let json = serde_json::to_string_pretty(report)?;
    match output {
        Some(path) => {
            fs::write(path, json)?;
            info!("Report written to: {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

/// Candidate ticks for the named asset, or every asset.
pub fn collect_signals(
    table: &PriceTable,
    asset: Option<&str>,
) -> Result<BTreeMap<String, SignalSet>, TradeTreeError> {
    let requested: Vec<String> = asset.map(|a| vec![a.to_string()]).unwrap_or_default();
    let mut out = BTreeMap::new();
    for name in select_assets(table, &requested)? {
        let signals = extract_signals(table.series(&name)?)?;
        out.insert(name, signals);
    }
    Ok(out)
}

fn run_signals(input: &Path, asset: Option<&str>) -> Result<(), TradeTreeError> {
    let table = load_table(input)?;
    let signals = collect_signals(&table, asset)?;
    println!("{}", serde_json::to_string_pretty(&signals)?);
    Ok(())
}

fn run_assets(input: &Path) -> Result<(), TradeTreeError> {
    let table = load_table(input)?;
    let names = table.asset_names();
    if names.is_empty() {
        warn!("No assets found in {}", input.display());
    }
    for series in table.iter() {
        println!("{}\t{}", series.asset, series.len());
    }
    info!("{} assets found", names.len());
    Ok(())
}

fn run_validate(config_path: &Path) -> Result<(), TradeTreeError> {
    let adapter = load_config(config_path)?;
    validate_analysis_config(&adapter)?;
    let analysis = build_analysis_config(&adapter)?;
    info!(
        "Configuration is valid: {} variant, initial money {}, node budget {}",
        analysis.tree.variant,
        analysis.initial_money,
        analysis
            .tree
            .max_nodes
            .map_or_else(|| "unbounded".to_string(), |n| n.to_string())
    );
    Ok(())
}
