use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use model_fetcher::{FetchOptions, Registry, RetrieverBuilder};

/// Download pretrained models and datasets by name.
#[derive(Parser)]
#[command(name = "model-fetcher", version)]
struct Cli {
  /// Task the resource is registered under
  task_name: String,

  /// Resource to download
  resource_name: String,

  /// Directory to store the downloaded resource in
  #[arg(short = 'd', long, default_value = "pretrained_resources")]
  output_dir: String,

  /// Timeout for establishing mirror connections, in seconds
  #[arg(short = 't', long, default_value_t = 10)]
  timeout_limit: u64,

  #[arg(long)]
  disable_progress_bar: bool,

  /// Download even when a matching local artifact already exists
  #[arg(long)]
  ignore_cached_files: bool,

  /// Keep archives next to their extracted contents
  #[arg(long)]
  keep_compressed_files: bool,

  /// Skip SHA-256 verification of downloaded artifacts
  #[arg(long)]
  ignore_resource_hash: bool,

  /// Load the registry from this directory instead of the bundled one
  #[arg(long)]
  registry_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .init();

  let cli = Cli::parse();

  let registry = match &cli.registry_dir {
    Some(dir) => Registry::from_dir(dir),
    None => Registry::bundled(),
  };
  let retriever = RetrieverBuilder::new().set_registry(registry).build();

  let options = FetchOptions {
    show_progress_bar: !cli.disable_progress_bar,
    check_cached: !cli.ignore_cached_files,
    clean_compressed_files: !cli.keep_compressed_files,
    check_resource_hash: !cli.ignore_resource_hash,
    timeout_secs: cli.timeout_limit,
  };

  // Racing against ctrl-c drops the resolve future, which is what removes a
  // partially transferred file. Exiting must wait until the select expression
  // has completed and run that drop.
  let outcome = tokio::select! {
    outcome = retriever.resolve(&cli.task_name, &cli.resource_name, &cli.output_dir, &options) => Some(outcome),
    _ = tokio::signal::ctrl_c() => None,
  };

  let outcome = match outcome {
    Some(outcome) => outcome,
    None => {
      eprintln!("Interrupted.");
      std::process::exit(130);
    },
  };

  match outcome {
    Ok(true) => println!("Resource downloaded successfully into '{}'.", cli.output_dir),
    Ok(false) => {
      println!("Could not download resource.");
      std::process::exit(1);
    },
    Err(error) => {
      eprintln!("{}", error);
      std::process::exit(1);
    },
  }
}
