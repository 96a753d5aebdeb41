//! `docship branches` command implementation.

use std::path::PathBuf;

use clap::Args;
use docship_config::Config;
use docship_sources::branches_to_build;

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the branches command.
#[derive(Args)]
pub(crate) struct BranchesArgs {
    /// Documentation repository checkout to inspect.
    #[arg(long, default_value = ".")]
    workdir: PathBuf,

    /// Branch the current build runs for (default: the configured
    /// branch environment variable).
    #[arg(long)]
    current_branch: Option<String>,

    /// Path to configuration file (default: auto-discover docship.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl BranchesArgs {
    pub(crate) fn execute(self, output: &Output) -> Result<(), CliError> {
        let config = Config::load(self.config.as_deref(), None)?;
        let registry = config.load_registry()?;

        let current_branch = match self.current_branch {
            Some(branch) => branch,
            None => std::env::var(&config.deploy.branch_var).map_err(|_| {
                CliError::Validation(format!(
                    "pass --current-branch or set {}",
                    config.deploy.branch_var
                ))
            })?,
        };

        let branches = branches_to_build(
            &registry,
            &self.workdir,
            &current_branch,
            &config.site.main_branch,
        )?;

        for branch in branches {
            output.data(&branch);
        }
        Ok(())
    }
}
