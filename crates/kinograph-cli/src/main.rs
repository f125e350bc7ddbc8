//! Kinograph CLI - build a movie knowledge graph from MovieLens and Wikidata

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::info;

use kinograph_core::config::Config;
use kinograph_core::movielens::{self, LoadOptions};
use kinograph_core::pipeline::Pipeline;
use kinograph_core::wikidata::WikidataClient;
use kinograph_core::{export, viz};

#[derive(Parser)]
#[command(name = "kinograph")]
#[command(author, version, about = "MovieLens-to-Wikidata knowledge graph builder", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Quiet mode (suppress the summary printout)
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve sampled movies against Wikidata and assemble the graph
    Build {
        /// MovieLens 100k directory (defaults to the configured one)
        #[arg(long)]
        data_dir: Option<PathBuf>,

        /// Number of distinct movies to resolve
        #[arg(long)]
        sample_size: Option<usize>,

        /// Resolve every distinct movie instead of a sample
        #[arg(long)]
        no_sample: bool,

        /// Node budget for the exported subgraph
        #[arg(long)]
        node_limit: Option<usize>,

        /// CSV file for the flattened result rows
        #[arg(short, long, default_value = "wikidata_results.csv")]
        output: PathBuf,

        /// Write a Graphviz DOT file of the bounded subgraph
        #[arg(long)]
        dot: Option<PathBuf>,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Write the default configuration file
    Init,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("kinograph_core=info".parse()?)
                .add_directive("kinograph_cli=info".parse()?),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::load()?;

    match cli.command {
        Commands::Build {
            data_dir,
            sample_size,
            no_sample,
            node_limit,
            output,
            dot,
        } => {
            cmd_build(
                &config,
                data_dir,
                sample_size,
                no_sample,
                node_limit,
                &output,
                dot.as_deref(),
                cli.quiet,
            )
            .await
        }

        Commands::Config { action } => cmd_config(&config, action),
    }
}

#[allow(clippy::too_many_arguments)]
async fn cmd_build(
    config: &Config,
    data_dir: Option<PathBuf>,
    sample_size: Option<usize>,
    no_sample: bool,
    node_limit: Option<usize>,
    output: &std::path::Path,
    dot: Option<&std::path::Path>,
    quiet: bool,
) -> anyhow::Result<()> {
    let data_dir = data_dir.unwrap_or_else(|| config.dataset.data_dir.clone());
    let sample = if no_sample {
        None
    } else {
        Some(sample_size.unwrap_or(config.dataset.sample_size))
    };
    let node_limit = node_limit.unwrap_or(config.graph.node_limit);

    info!(data_dir = %data_dir.display(), "Loading MovieLens dataset");
    let options = LoadOptions {
        year: true,
        ..Default::default()
    };
    let rated = movielens::load(&data_dir, &options)?;
    let items = movielens::distinct_items(&rated, sample);
    info!(movies = items.len(), "Selected movies for resolution");

    let client = Arc::new(WikidataClient::new(&config.wikidata)?);
    let pipeline = Pipeline::new(client);
    let run = pipeline.run(&items).await;

    export::write_csv(output, &run.rows)?;

    if let Some(dot_path) = dot {
        let subgraph = run.graph.extract_subgraph(node_limit);
        std::fs::write(dot_path, viz::render_dot(&subgraph))?;
        info!(
            path = %dot_path.display(),
            nodes = subgraph.node_count(),
            edges = subgraph.edge_count(),
            "Subgraph written"
        );
    }

    if !quiet {
        println!("{}", run.summary);
        println!("Results:   {}", output.display());
    }

    Ok(())
}

fn cmd_config(config: &Config, action: ConfigAction) -> anyhow::Result<()> {
    match action {
        ConfigAction::Show => {
            println!("{}", config.to_toml()?);
            Ok(())
        }
        ConfigAction::Init => {
            config.save()?;
            println!("Configuration written to {}", Config::config_path()?.display());
            Ok(())
        }
    }
}
