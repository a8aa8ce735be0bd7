use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Deserialize;
use tracing::info;

use pallet_pack_core::prelude::*;

#[derive(Parser, Debug)]
#[command(
    name = "pallet-pack",
    about = "Pack a box catalogue onto a pallet using one of five heuristic variants",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Show a progress spinner while packing (disable with --no-progress or --quiet)
    #[arg(long, default_value_t = true, action = ArgAction::Set, global = true, help_heading = "Logging/UX")]
    progress: bool,
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = ArgAction::Count, global = true, help_heading = "Logging/UX")]
    verbose: u8,
    /// Quiet mode (errors only; overrides verbose and disables the spinner)
    #[arg(short, long, default_value_t = false, global = true, help_heading = "Logging/UX")]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Pack a catalogue file (pallet + boxes) and print a summary
    Pack(PackArgs),
    /// List the five placement-policy variants
    Variants,
    /// Pack the same catalogue with every variant and print a comparison table
    Bench(BenchArgs),
}

#[derive(Parser, Debug, Clone)]
struct PackArgs {
    /// Catalogue file, YAML or JSON: a pallet plus a list of boxes, each with a quantity
    catalogue: PathBuf,
    /// Placement-policy variant
    #[arg(short = 'm', long, default_value = "weight-aware")]
    variant: VariantArg,
    /// Override the variant's default support-ratio threshold
    #[arg(long)]
    support_threshold: Option<f64>,
    /// Disable the "no heavier on lighter" rule (Weight-Aware only)
    #[arg(long, default_value_t = false)]
    no_weight_check: bool,
    /// Require >= 2 base corners resting on a supporting top face
    #[arg(long, default_value_t = false)]
    edge_support: bool,
    /// Floor-grid / spiral step, in centimetres
    #[arg(long, default_value_t = 15)]
    grid_step: i32,
    /// Cap on a growing candidate-point set before it is trimmed
    #[arg(long, default_value_t = 4096)]
    candidate_cap: usize,
    /// Seed for the Extreme-Points jitter
    #[arg(long, default_value_t = 0x5EED)]
    seed: u64,
    /// Print the full result JSON instead of a human summary
    #[arg(long, default_value_t = false)]
    json: bool,
    /// Write the result JSON to a file as well as (or instead of) stdout
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Parser, Debug, Clone)]
struct BenchArgs {
    /// Catalogue file, YAML or JSON
    catalogue: PathBuf,
    /// Run all five variants concurrently (requires the `parallel` feature)
    #[arg(long, default_value_t = false)]
    parallel: bool,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum VariantArg {
    WeightAware,
    ExtremePoints,
    Laff,
    CornerPoints,
    Sfc,
}

impl From<VariantArg> for Variant {
    fn from(v: VariantArg) -> Self {
        match v {
            VariantArg::WeightAware => Variant::WeightAware,
            VariantArg::ExtremePoints => Variant::ExtremePoints,
            VariantArg::Laff => Variant::Laff,
            VariantArg::CornerPoints => Variant::CornerPoints,
            VariantArg::Sfc => Variant::Sfc,
        }
    }
}

#[derive(Debug, Deserialize)]
struct PalletSpec {
    width: i32,
    depth: i32,
    height: i32,
    max_weight: f64,
}

#[derive(Debug, Deserialize)]
struct BoxSpec {
    name: String,
    length: i32,
    width: i32,
    height: i32,
    weight: f64,
    #[serde(default = "one")]
    quantity: u32,
}

fn one() -> u32 {
    1
}

#[derive(Debug, Deserialize)]
struct Catalogue {
    pallet: PalletSpec,
    boxes: Vec<BoxSpec>,
}

fn load_catalogue(path: &Path) -> Result<Catalogue> {
    let text = fs::read_to_string(path).with_context(|| format!("reading catalogue {}", path.display()))?;
    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    let catalogue = if is_json {
        serde_json::from_str(&text).with_context(|| format!("parsing {} as JSON", path.display()))?
    } else {
        serde_yaml::from_str(&text).with_context(|| format!("parsing {} as YAML", path.display()))?
    };
    Ok(catalogue)
}

/// Expands each `BoxSpec`'s `quantity` into that many distinct `BoxItem`s
/// with ids `name_0 .. name_{n-1}`.
fn expand_boxes(catalogue: &Catalogue) -> Result<Vec<BoxItem>> {
    let mut items = Vec::new();
    for spec in &catalogue.boxes {
        for i in 0..spec.quantity.max(1) {
            let id = format!("{}_{i}", spec.name);
            let item = BoxItem::new(id, spec.length, spec.width, spec.height, spec.weight)
                .with_context(|| format!("box '{}' has invalid dimensions or weight", spec.name))?;
            items.push(item);
        }
    }
    Ok(items)
}

fn build_pallet(spec: &PalletSpec) -> Result<Pallet> {
    Pallet::new(spec.width, spec.depth, spec.height, spec.max_weight).context("invalid pallet dimensions")
}

fn init_tracing(verbose: u8, quiet: bool) {
    let level = if quiet {
        "error"
    } else {
        match verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(format!("pallet_pack_core={level},pallet_pack_cli={level}")));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();
}

fn spinner(show: bool, message: &str) -> Option<ProgressBar> {
    if !show {
        return None;
    }
    let bar = ProgressBar::new_spinner();
    bar.set_style(ProgressStyle::with_template("{spinner:.green} {msg}").unwrap());
    bar.set_message(message.to_string());
    bar.enable_steady_tick(std::time::Duration::from_millis(80));
    Some(bar)
}

fn run_pack(args: &PackArgs) -> Result<PackResult> {
    let catalogue = load_catalogue(&args.catalogue)?;
    let pallet = build_pallet(&catalogue.pallet)?;
    let items = expand_boxes(&catalogue)?;

    let variant: Variant = args.variant.into();
    let mut options = PackingOptions::builder(variant)
        .grid_step(args.grid_step)
        .candidate_cap(args.candidate_cap)
        .seed(args.seed)
        .weight_check_enabled(!args.no_weight_check)
        .require_edge_support(args.edge_support)
        .build();
    if let Some(threshold) = args.support_threshold {
        options.support_threshold = threshold;
    }

    info!(variant = variant.display_name(), boxes = items.len(), "packing");
    let mut packer = Packer::new(variant, options);
    packer.set_pallet(pallet);
    for item in items {
        packer.add_box(item);
    }
    let result = packer.pack()?;
    Ok(result)
}

fn print_summary(variant: Variant, result: &PackResult) {
    let total = result.placed.len() + result.unplaced.len();
    println!("variant:              {}", variant.display_name());
    println!("placed / total:       {} / {}", result.placed.len(), total);
    println!("volume utilization:   {:.1}%", result.report.volume_utilization * 100.0);
    println!("space utilization:    {:.1}%", result.report.space_utilization * 100.0);
    println!("weight utilization:   {:.1}%", result.report.weight_utilization * 100.0);
    println!("calculation time:     {:.3}s", result.calculation_time);
    let cog = result.report.center_of_gravity;
    println!("centre of gravity:    ({:.1}, {:.1}, {:.1})", cog.0, cog.1, cog.2);
    if !result.report.recommendations.is_empty() {
        println!("recommendations:");
        for r in &result.report.recommendations {
            println!("  - {r}");
        }
    }
    if !result.unplaced.is_empty() {
        println!("unplaced:");
        for u in &result.unplaced {
            println!("  - {} ({})", u.item.id, u.reason);
        }
    }
}

fn cmd_pack(args: &PackArgs, progress: bool) -> Result<()> {
    let bar = spinner(progress, "packing...");
    let result = run_pack(args)?;
    if let Some(bar) = bar {
        bar.finish_and_clear();
    }

    let value = pallet_pack_core::export::to_result_json(&result);
    if let Some(out) = &args.out {
        fs::write(out, serde_json::to_string_pretty(&value)?)
            .with_context(|| format!("writing result to {}", out.display()))?;
        println!("wrote result to {}", out.display());
    }
    if args.json {
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        print_summary(args.variant.into(), &result);
    }
    Ok(())
}

fn cmd_variants() {
    for variant in Variant::ALL {
        println!("{variant:?} -> {}", variant.display_name());
    }
}

fn cmd_bench(args: &BenchArgs) -> Result<()> {
    let catalogue = load_catalogue(&args.catalogue)?;
    let pallet = build_pallet(&catalogue.pallet)?;
    let items = expand_boxes(&catalogue)?;

    let run_variant = |variant: Variant| -> PackResult {
        let mut packer = Packer::new(variant, PackingOptions::for_variant(variant));
        packer.set_pallet(pallet);
        for item in &items {
            packer.add_box(item.clone());
        }
        packer.pack().expect("pack is infallible once a pallet is set")
    };

    #[cfg(feature = "parallel")]
    let results: Vec<(Variant, PackResult)> = if args.parallel {
        use rayon::prelude::*;
        Variant::ALL
            .into_par_iter()
            .map(|variant| (variant, run_variant(variant)))
            .collect()
    } else {
        Variant::ALL.into_iter().map(|v| (v, run_variant(v))).collect()
    };
    #[cfg(not(feature = "parallel"))]
    let results: Vec<(Variant, PackResult)> = {
        if args.parallel {
            eprintln!("warning: --parallel requires the `parallel` feature; running sequentially");
        }
        Variant::ALL.into_iter().map(|v| (v, run_variant(v))).collect()
    };

    println!(
        "{:<24} {:>8} {:>8} {:>10} {:>10} {:>10}",
        "variant", "placed", "total", "space %", "weight %", "time (s)"
    );
    for (variant, result) in &results {
        let total = result.placed.len() + result.unplaced.len();
        println!(
            "{:<24} {:>8} {:>8} {:>10.1} {:>10.1} {:>10.3}",
            variant.display_name(),
            result.placed.len(),
            total,
            result.report.space_utilization * 100.0,
            result.report.weight_utilization * 100.0,
            result.calculation_time,
        );
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);
    let progress = cli.progress && !cli.quiet;

    match &cli.command {
        Commands::Pack(args) => cmd_pack(args, progress)?,
        Commands::Variants => cmd_variants(),
        Commands::Bench(args) => cmd_bench(args)?,
    }
    Ok(())
}
