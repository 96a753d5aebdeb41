//! docship CLI - versioned documentation pipeline.
//!
//! Provides commands for:
//! - `prepare-sources`: materialize one working tree per version
//! - `build`: run the static-site generator for one branch
//! - `redirects`: rewrite a moved version's pages into redirects
//! - `outdated`: inject "view latest" banners into old versions
//! - `index` / `search`: search-engine loading and querying
//! - `branches`: which branches the current commit invalidates
//! - `deploy`: publish the merged site to the hosting branch

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{
    BranchesArgs, BuildArgs, DeployArgs, IndexArgs, OutdatedArgs, PrepareSourcesArgs,
    RedirectsArgs, SearchArgs,
};
use output::Output;

/// docship - versioned documentation pipeline.
#[derive(Parser)]
#[command(name = "docship", version, about)]
struct Cli {
    /// Enable verbose logging.
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Materialize a working tree per documentation version.
    PrepareSources(PrepareSourcesArgs),
    /// Build one branch's documentation site.
    Build(BuildArgs),
    /// Rewrite a generated tree into redirect pages.
    Redirects(RedirectsArgs),
    /// Inject outdated-version banners into a published version.
    Outdated(OutdatedArgs),
    /// Load a build's pages into the search index.
    Index(IndexArgs),
    /// Query the search index.
    Search(SearchArgs),
    /// Print the branches the current commit requires rebuilding.
    Branches(BranchesArgs),
    /// Merge every version's output and publish the hosting branch.
    Deploy(DeployArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let result = match cli.command {
        Commands::PrepareSources(args) => args.execute(&output),
        Commands::Build(args) => args.execute(&output),
        Commands::Redirects(args) => args.execute(&output),
        Commands::Outdated(args) => args.execute(&output),
        Commands::Index(args) => args.execute(&output),
        Commands::Search(args) => args.execute(&output),
        Commands::Branches(args) => args.execute(&output),
        Commands::Deploy(args) => args.execute(&output),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
