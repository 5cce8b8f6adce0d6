//! gridcrit: Criticality ranking of distribution grid assets.
//! Entry point for the command-line binary.

mod config;
mod report;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use gridcrit_common::RunConfig;
use gridcrit_ingestion::export::export_dataset;
use gridcrit_ingestion::generator::generate_dataset;
use gridcrit_ingestion::profile::profile_dataset;
use gridcrit_ingestion::sources::load_dataset;
use gridcrit_ingestion::weights_file::load_or_create;
use gridcrit_ranker::{preflight, run_criticality, CriticalityRun, PipelineOptions, WeightTable};
use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::PathOverrides;

#[derive(Parser)]
#[command(name = "gridcrit")]
#[command(about = "Rank distribution grid assets by weighted criticality", long_about = None)]
struct Cli {
    /// Configuration file (TOML, YAML or JSON)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding the dataset, weights and output files
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Interruption dataset file
    #[arg(long, global = true)]
    dataset: Option<PathBuf>,

    /// Weight file (Variavel,Peso)
    #[arg(long, global = true)]
    weights: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a synthetic interruption dataset
    Generate {
        /// Number of records
        #[arg(short = 'n', long)]
        records: Option<usize>,
        /// Seed for a reproducible dataset
        #[arg(long)]
        seed: Option<u64>,
        /// Replace an existing dataset
        #[arg(long)]
        force: bool,
    },
    /// Show the weight table, writing the default one if missing
    Weights,
    /// Check that the dataset carries every weighted variable
    Validate {
        /// Skip deriving the combined DEC+FEC impact
        #[arg(long)]
        no_combined: bool,
    },
    /// Score, rank and export the dataset
    Score(ScoreArgs),
    /// Descriptive profile of the dataset
    Profile,
    /// Generate the dataset if missing, then score it
    Run(ScoreArgs),
}

#[derive(clap::Args, Clone)]
struct ScoreArgs {
    /// Rows shown in the ranking
    #[arg(short, long)]
    top: Option<usize>,
    /// Output file for the ranked table
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Skip deriving the combined DEC+FEC impact
    #[arg(long)]
    no_combined: bool,
    /// Print a JSON summary instead of tables
    #[arg(long)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so stdout carries only reports
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("gridcrit=info,warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut cfg = config::load(cli.config.as_deref())?;
    let overrides = PathOverrides {
        data_dir: cli.data_dir.clone(),
        dataset: cli.dataset.clone(),
        weights: cli.weights.clone(),
        output: None,
    };
    overrides.apply(&mut cfg);

    match cli.command {
        Commands::Generate { records, seed, force } => {
            if let Some(n) = records {
                cfg.generator.records = n;
            }
            if seed.is_some() {
                cfg.generator.seed = seed;
            }
            generate(&cfg, force)?;
        }
        Commands::Weights => {
            let weights = weights(&cfg)?;
            println!("{}", report::weights_table(&weights));
        }
        Commands::Validate { no_combined } => {
            if no_combined {
                cfg.scoring.combined_impact = false;
            }
            validate(&cfg)?;
        }
        Commands::Score(args) => score(&mut cfg, &args)?,
        Commands::Profile => profile(&cfg)?,
        Commands::Run(args) => {
            if !cfg.paths.dataset_path().exists() {
                generate(&cfg, false)?;
            }
            score(&mut cfg, &args)?;
        }
    }

    Ok(())
}

fn generate(cfg: &RunConfig, force: bool) -> anyhow::Result<()> {
    let path = cfg.paths.dataset_path();
    if path.exists() && !force {
        anyhow::bail!("{} already exists (use --force to replace it)", path.display());
    }
    let dataset = generate_dataset(&cfg.generator)?;
    export_dataset(&path, &dataset)?;
    println!("Generated {} records into {}", dataset.n_rows(), path.display());
    Ok(())
}

fn weights(cfg: &RunConfig) -> anyhow::Result<WeightTable> {
    let path = cfg.paths.weights_path();
    let (weights, created) = load_or_create(&path)?;
    if created {
        warn!(path = %path.display(), "Weight file missing, default weights written");
    }
    Ok(weights)
}

fn validate(cfg: &RunConfig) -> anyhow::Result<()> {
    let dataset = load_dataset(&cfg.paths.dataset_path())?;
    let weights = weights(cfg)?;
    preflight(&dataset, &weights, &PipelineOptions::from(&cfg.scoring))
        .with_context(|| format!("{} does not match the weight table", cfg.paths.dataset_path().display()))?;
    println!(
        "{}: {} records, all {} weighted variables present",
        cfg.paths.dataset_path().display(),
        dataset.n_rows(),
        weights.len()
    );
    Ok(())
}

#[derive(Serialize)]
struct ScoreSummary<'a> {
    run_id: String,
    computed_at: String,
    output: String,
    n_records: usize,
    degenerate: &'a [String],
    reference: Option<&'a gridcrit_ranker::reference::ReferenceComparison>,
    top: Vec<TopRecord>,
}

#[derive(Serialize)]
struct TopRecord {
    rank: usize,
    identifier: String,
    index: f64,
}

fn score(cfg: &mut RunConfig, args: &ScoreArgs) -> anyhow::Result<()> {
    if let Some(ref output) = args.output {
        PathOverrides { output: Some(output.clone()), ..Default::default() }.apply(cfg);
    }
    if args.no_combined {
        cfg.scoring.combined_impact = false;
    }
    let top_n = args.top.unwrap_or(cfg.output.top_n);

    let dataset = load_dataset(&cfg.paths.dataset_path())?;
    let weights = weights(cfg)?;
    let run = run_criticality(&dataset, &weights, &PipelineOptions::from(&cfg.scoring))?;

    let output = cfg.paths.output_path();
    export_dataset(&output, &run.ranked.dataset)?;
    info!(run_id = %run.run_id, path = %output.display(), "Ranked table exported");

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary(cfg, &run, top_n))?);
        return Ok(());
    }

    println!(
        "{}",
        report::ranking_table(&run.ranked.dataset, &weights, &cfg.scoring, top_n, cfg.output.precision)
    );
    if let Some(ref reference) = run.reference {
        println!("{}", report::reference_table(reference));
    }
    println!("{}", report::run_summary(&run));
    println!("Ranked table written to {}", output.display());
    Ok(())
}

fn summary<'a>(cfg: &RunConfig, run: &'a CriticalityRun, top_n: usize) -> ScoreSummary<'a> {
    let top = run
        .ranked
        .dataset
        .records()
        .take(top_n)
        .map(|r| TopRecord {
            rank: r.row() + 1,
            identifier: r.text(&cfg.scoring.identifier_column),
            index: r.number(&cfg.scoring.index_column).unwrap_or(0.0),
        })
        .collect();
    ScoreSummary {
        run_id: run.run_id.to_string(),
        computed_at: run.computed_at.to_rfc3339(),
        output: cfg.paths.output_path().display().to_string(),
        n_records: run.ranked.len(),
        degenerate: &run.degenerate,
        reference: run.reference.as_ref(),
        top,
    }
}

fn profile(cfg: &RunConfig) -> anyhow::Result<()> {
    let dataset = load_dataset(&cfg.paths.dataset_path())?;
    let categories = [cfg.scoring.asset_column.as_str(), "Causa", "Status_Ativo"];
    let profile = profile_dataset(&dataset, &categories, "Data_Interrupcao");
    for (title, table) in report::profile_tables(&profile) {
        println!("{title}\n{table}\n");
    }
    Ok(())
}
