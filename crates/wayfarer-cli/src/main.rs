//! Wayfarer command-line entry point: `plan` for one-off requests,
//! `eval` for offline provider evaluation runs.

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use serde::Deserialize;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;
use wayfarer_eval::{load_samples, summarize, EvalConfig, EvaluationHarness, JsonlStore};
use wayfarer_llm::{FallbackChain, LlmClient, ModelConfig};
use wayfarer_planner::TravelPlanner;
use wayfarer_sources::{ContextCollector, SourcesConfig};

#[derive(Parser)]
#[command(name = "wayfarer", about = "Wayfarer — travel-plan orchestration engine")]
struct Cli {
    /// Path to config file
    #[arg(short, long, default_value = "wayfarer.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a travel plan from a free-text request
    Plan {
        /// The travel request text
        text: String,
    },
    /// Run the offline evaluation harness over a dataset
    Eval {
        /// Path to the JSON dataset file
        #[arg(short, long)]
        data: PathBuf,
        /// Number of samples to run (overrides config)
        #[arg(long)]
        sample_limit: Option<usize>,
        /// Records output path (overrides config)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Top-level configuration: the ordered provider chain, the data-source
/// set, and the optional evaluation section.
#[derive(Deserialize)]
struct WayfarerConfig {
    /// LLM providers in fallback priority order.
    llm: Vec<ModelConfig>,
    #[serde(default)]
    sources: SourcesConfig,
    eval: Option<EvalConfig>,
}

fn load_config(path: &PathBuf) -> anyhow::Result<WayfarerConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading config file {}", path.display()))?;
    let config: WayfarerConfig =
        toml::from_str(&text).with_context(|| format!("parsing {}", path.display()))?;
    config.sources.validate()?;
    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli.config)?;

    match cli.command {
        Commands::Plan { text } => run_plan(config, &text).await,
        Commands::Eval {
            data,
            sample_limit,
            output,
        } => run_eval(config, data, sample_limit, output).await,
    }
}

async fn run_plan(config: WayfarerConfig, text: &str) -> anyhow::Result<()> {
    let clients = config.llm.into_iter().map(LlmClient::new).collect();
    let chain = FallbackChain::new(clients)?;
    let collector = ContextCollector::new(&config.sources);
    let planner = TravelPlanner::new(chain, collector);

    let plan = planner.plan(text).await?;

    info!(
        destination = %plan.metadata.destination,
        attempts = plan.attempts.len(),
        "plan generated"
    );

    println!(
        "# {} — {} days ({} to {})\n",
        plan.metadata.destination,
        plan.metadata.duration_days,
        plan.metadata.start_date,
        plan.metadata.end_date
    );
    for (header, section) in [
        ("Itinerary", &plan.itinerary),
        ("Packing List", &plan.packing_list),
        ("Budget", &plan.budget),
    ] {
        match section {
            Some(text) => println!("## {header}\n{text}\n"),
            None => println!("## {header}\n(unavailable)\n"),
        }
    }

    Ok(())
}

async fn run_eval(
    config: WayfarerConfig,
    data: PathBuf,
    sample_limit: Option<usize>,
    output: Option<PathBuf>,
) -> anyhow::Result<()> {
    let Some(eval_config) = config.eval else {
        bail!("config has no [eval] section");
    };

    let limit = sample_limit.or(eval_config.sample_limit);
    let samples = load_samples(&data, limit)?;

    let candidates = config.llm;
    let harness = EvaluationHarness::new(candidates.clone(), &eval_config, &config.sources)?;
    let records = harness.run(&samples).await;

    let store = JsonlStore::new(output.unwrap_or_else(|| eval_config.output_path.clone()));
    store.append_all(&records)?;
    println!("{} records written to {}", records.len(), store.path().display());

    println!("\nProvider ranking:");
    for (rank, summary) in summarize(&records, &candidates).iter().enumerate() {
        println!(
            "{}. {} — overall {:.2} (scored {}, unscored {}, failed {})",
            rank + 1,
            summary.provider,
            summary.overall_mean,
            summary.scored_samples,
            summary.unscored_samples,
            summary.failed_samples,
        );
        for (dimension, stats) in &summary.per_dimension {
            println!(
                "     {dimension}: mean {:.2} (min {}, max {}, n={})",
                stats.mean, stats.min, stats.max, stats.count
            );
        }
    }

    Ok(())
}
