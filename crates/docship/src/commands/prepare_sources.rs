//! `docship prepare-sources` command implementation.

use std::path::PathBuf;

use clap::Args;
use docship_config::Config;

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the prepare-sources command.
#[derive(Args)]
pub(crate) struct PrepareSourcesArgs {
    /// Folder the documentation branches are materialized into.
    #[arg(long)]
    sources_folder: PathBuf,

    /// Only materialize this branch (expects a prior full run).
    #[arg(long)]
    branch: Option<String>,

    /// Path to configuration file (default: auto-discover docship.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl PrepareSourcesArgs {
    pub(crate) fn execute(self, output: &Output) -> Result<(), CliError> {
        let config = Config::load(self.config.as_deref(), None)?;
        let registry = config.load_registry()?;

        if let Some(branch) = &self.branch {
            output.info(&format!("Materializing {branch}..."));
            docship_sources::materialize_branch(&registry, &self.sources_folder, branch)?;
        } else {
            let repo_url = config.require_repo_url()?;
            output.info(&format!(
                "Materializing {} versions into {}...",
                registry.len(),
                self.sources_folder.display()
            ));
            docship_sources::materialize(
                &registry,
                repo_url,
                &self.sources_folder,
                config.site.major_alias.as_deref(),
            )?;
        }

        output.success("Sources ready");
        Ok(())
    }
}
