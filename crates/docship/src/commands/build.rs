//! `docship build` command implementation.

use std::path::PathBuf;

use clap::Args;
use docship_config::Config;

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the build command.
#[derive(Args)]
pub(crate) struct BuildArgs {
    /// Docs branch to generate docs for.
    #[arg(long)]
    branch: String,

    /// Folder where the docs branches are materialized.
    #[arg(long)]
    sources_folder: PathBuf,

    /// Also build and publish a PDF for this version.
    #[arg(long)]
    with_pdf: bool,

    /// Path to configuration file (default: auto-discover docship.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl BuildArgs {
    pub(crate) fn execute(self, output: &Output) -> Result<(), CliError> {
        let config = Config::load(self.config.as_deref(), None)?;
        let registry = config.load_registry()?;

        docship_site::write_versions_json(&registry, &self.sources_folder)?;

        output.info(&format!("Building {}...", self.branch));
        docship_site::build(&registry, &self.branch, &self.sources_folder, self.with_pdf)?;

        output.success(&format!("Built {}", self.branch));
        Ok(())
    }
}
