use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use docwright_agent::AgentRuntime;
use docwright_cluster::Clusterer;
use docwright_core::{ComponentRegistry, DocwrightError, RunConfig};
use docwright_extract::{Extractor, FileCollectionConfig};
use docwright_graph::{build_graph, GraphArtifact};
use docwright_llm::{FallbackChain, ModelProvider, OpenAiCompatibleConfig, OpenAiCompatibleProvider};
use docwright_orchestrator::Orchestrator;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "docwright")]
#[command(about = "Turns a repository into navigable, agent-written Markdown documentation", long_about = None)]
#[command(version)]
struct Cli {
    /// Output format for the final run summary
    #[arg(short, long, global = true, default_value = "pretty")]
    output: OutputFormat,

    /// Verbose (debug-level) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    Json,
    Pretty,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full analysis-clustering-agent pipeline against a repository
    Run(RunArgs),

    /// Load and validate a config file without running the pipeline
    ValidateConfig {
        /// Path to a docwright.toml config file
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[derive(Parser)]
struct RunArgs {
    /// Path to a docwright.toml config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Overrides `repository_root` from the config file
    #[arg(long)]
    repository_root: Option<PathBuf>,

    /// Overrides `output_directory` from the config file
    #[arg(long)]
    output_directory: Option<PathBuf>,

    /// Overrides `main_model` from the config file
    #[arg(long)]
    main_model: Option<String>,

    /// Overrides `cluster_model` from the config file
    #[arg(long)]
    cluster_model: Option<String>,

    /// Git commit identifier to record in the run's metadata artifact
    #[arg(long)]
    commit: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match &cli.command {
        Commands::ValidateConfig { config } => {
            let run_config = RunConfig::load(config.as_deref()).context("failed to load config")?;
            run_config.validate().context("config validation failed")?;
            println!("{} configuration is valid", "OK:".green().bold());
            Ok(())
        }
        Commands::Run(args) => match run_pipeline(args).await {
            Ok(summary) => {
                print_output(&cli.output, &summary)?;
                Ok(())
            }
            Err(e) => {
                eprintln!("{} {e}", "Error:".red().bold());
                std::process::exit(1);
            }
        },
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

async fn run_pipeline(args: &RunArgs) -> Result<serde_json::Value> {
    let mut config = RunConfig::load(args.config.as_deref()).context("failed to load config")?;
    if let Some(root) = &args.repository_root {
        config.repository_root = root.clone();
    }
    if let Some(out) = &args.output_directory {
        config.output_directory = out.clone();
    }
    if let Some(model) = &args.main_model {
        config.main_model = model.clone();
    }
    if let Some(model) = &args.cluster_model {
        config.cluster_model = model.clone();
    }
    config.validate().context("config validation failed")?;

    tracing::info!(repository_root = %config.repository_root.display(), "starting docwright run");

    let extractor = Extractor::new();
    let file_config = FileCollectionConfig {
        include_patterns: config.include_patterns.clone(),
        exclude_patterns: config.exclude_patterns.clone(),
    };
    let extracted = extractor
        .extract_repository(&config.repository_root, &file_config)
        .await
        .context("component extraction failed")?;

    let mut components = Vec::new();
    let mut edges = Vec::new();
    for file in extracted {
        components.extend(file.components);
        edges.extend(file.edges);
    }
    tracing::info!(components = components.len(), edges = edges.len(), "extraction complete");

    let graph_result = build_graph(components, edges);
    tracing::info!(
        leaves = graph_result.leaf_ids.len(),
        cycles_broken = graph_result.cycles_broken,
        "graph build complete"
    );

    tokio::fs::create_dir_all(&config.output_directory)
        .await
        .context("failed to create output directory")?;
    let graph_artifact = GraphArtifact::new(&graph_result.graph, graph_result.registry.clone(), graph_result.leaf_ids.clone());
    graph_artifact
        .write(&config.output_directory.join("graph.json"))
        .context("failed to persist graph artifact")?;

    let cluster_chain = build_fallback_chain(&config, &config.cluster_model)?;
    let module_tree = {
        let clusterer = Clusterer::new(&graph_result.registry, &config.budgets, &cluster_chain);
        clusterer.cluster(graph_result.leaf_ids).await
    };
    tracing::info!(modules = module_tree.children.len(), "clustering complete");

    let registry: Arc<ComponentRegistry> = Arc::new(graph_result.registry);
    let agent_chain = build_fallback_chain(&config, &config.main_model)?;
    let synthesis_chain = build_fallback_chain(&config, &config.main_model)?;
    let agent_runtime = AgentRuntime::new(agent_chain);

    let orchestrator = Orchestrator::new(
        agent_runtime,
        synthesis_chain,
        registry,
        config.output_directory.clone(),
        config.repository_root.clone(),
        config.budgets,
        config.doc_type,
        config.custom_instructions.clone(),
        config.main_model.clone(),
        args.commit.clone(),
    );
    let metadata = orchestrator.run(&module_tree).await.context("documentation run failed")?;

    tracing::info!(output_directory = %config.output_directory.display(), "docwright run complete");
    serde_json::to_value(metadata).map_err(Into::into)
}

fn build_fallback_chain(config: &RunConfig, primary_model: &str) -> Result<FallbackChain, DocwrightError> {
    let base_url = config
        .api_base_url
        .clone()
        .unwrap_or_else(|| OpenAiCompatibleConfig::default().base_url);
    let api_key = std::env::var("DOCWRIGHT_API_KEY").ok();

    let model_names = std::iter::once(primary_model.to_string()).chain(config.fallback_models.iter().cloned());
    let mut providers: Vec<Arc<dyn ModelProvider>> = Vec::new();
    for model in model_names {
        let provider_config = OpenAiCompatibleConfig {
            base_url: base_url.clone(),
            model,
            api_key: api_key.clone(),
            ..OpenAiCompatibleConfig::default()
        };
        providers.push(Arc::new(OpenAiCompatibleProvider::new(provider_config)?));
    }
    Ok(FallbackChain::new(providers))
}

fn print_output(format: &OutputFormat, value: &serde_json::Value) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(value)?);
        }
        OutputFormat::Pretty => {
            print_pretty(value)?;
        }
    }
    Ok(())
}

fn print_pretty(value: &serde_json::Value) -> Result<()> {
    println!("{}", "Run complete".green().bold());
    if let serde_json::Value::Object(map) = value {
        for (key, val) in map {
            let key_colored = key.cyan().bold();
            match val {
                serde_json::Value::String(s) => println!("  {key_colored}: {}", s),
                serde_json::Value::Number(n) => println!("  {key_colored}: {}", n.to_string().yellow()),
                serde_json::Value::Null => println!("  {key_colored}: -"),
                other => println!("  {key_colored}: {other}"),
            }
        }
    }
    Ok(())
}
