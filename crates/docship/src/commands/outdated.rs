//! `docship outdated` command implementation.

use std::path::PathBuf;

use clap::Args;
use docship_config::Config;
use docship_rewrite::outdated::inject_banners;

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the outdated command.
#[derive(Args)]
pub(crate) struct OutdatedArgs {
    /// Folder where the published pages are.
    #[arg(long)]
    gh_pages_folder: PathBuf,

    /// Branch whose published version gets the banners.
    #[arg(long)]
    branch: String,

    /// Path to configuration file (default: auto-discover docship.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl OutdatedArgs {
    pub(crate) fn execute(self, output: &Output) -> Result<(), CliError> {
        let config = Config::load(self.config.as_deref(), None)?;
        let registry = config.load_registry()?;

        // The latest published tree is the bare-major alias when one is
        // deployed, the latest slug itself otherwise
        let latest_tree = config
            .site
            .major_alias
            .as_deref()
            .unwrap_or_else(|| registry.latest_slug());

        let count = inject_banners(
            &registry,
            &self.gh_pages_folder,
            &self.branch,
            &config.site.series_prefix,
            latest_tree,
        )?;

        if count == 0 {
            output.info(&format!("No banners to inject for {}", self.branch));
        } else {
            output.success(&format!("Injected {count} banners for {}", self.branch));
        }
        Ok(())
    }
}
