//! `docship deploy` command implementation.

use std::path::PathBuf;

use clap::Args;
use docship_config::Config;
use docship_deploy::{DeployGate, GateDecision, checkout_hosting, prepare_output, publish};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the deploy command.
#[derive(Args)]
pub(crate) struct DeployArgs {
    /// Folder where the docs were built (contains `output/`).
    #[arg(long)]
    sources_folder: PathBuf,

    /// Working tree of the hosting branch.
    #[arg(long)]
    gh_pages_folder: PathBuf,

    /// Path to configuration file (default: auto-discover docship.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl DeployArgs {
    pub(crate) fn execute(self, output: &Output) -> Result<(), CliError> {
        let config = Config::load(self.config.as_deref(), None)?;
        let registry = config.load_registry()?;

        // A failed gate condition is a successful no-op, not an error
        let token = match DeployGate::from_config(&config).check() {
            GateDecision::Proceed { token } => token,
            GateDecision::Skip { reason } => {
                output.warning(&format!("Deploy skipped: {reason}"));
                return Ok(());
            }
        };

        let repo_url = config.require_repo_url()?;
        let output_folder = self.sources_folder.join("output");

        output.info(&format!(
            "Checking out {} into {}...",
            config.site.hosting_branch,
            self.gh_pages_folder.display()
        ));
        checkout_hosting(&config.site, repo_url, &self.gh_pages_folder)?;

        output.info("Preparing merged output...");
        prepare_output(&registry, &config.site, &output_folder)?;

        output.info(&format!(
            "Publishing to {} on {}...",
            config.site.hosting_branch, repo_url
        ));
        publish(
            &config.site,
            repo_url,
            &output_folder,
            &self.gh_pages_folder,
            &token,
        )?;

        output.success("Published");
        Ok(())
    }
}
