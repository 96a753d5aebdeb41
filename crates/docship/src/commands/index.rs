//! `docship index` command implementation.

use std::path::PathBuf;

use clap::Args;
use docship_config::{CliSettings, Config};
use docship_search::{SearchClient, build_documents};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the index command.
#[derive(Args)]
pub(crate) struct IndexArgs {
    /// Folder with the build's JSON page fragments.
    #[arg(long)]
    build_folder: PathBuf,

    /// Version slug the documents are indexed under.
    #[arg(long)]
    docs_version: String,

    /// Delete and re-create the index before loading. Without this,
    /// re-indexing a version duplicates its documents.
    #[arg(long)]
    recreate: bool,

    /// Search engine base URL (overrides config).
    #[arg(long)]
    search_url: Option<String>,

    /// Search index name (overrides config).
    #[arg(long)]
    index: Option<String>,

    /// Path to configuration file (default: auto-discover docship.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl IndexArgs {
    pub(crate) fn execute(self, output: &Output) -> Result<(), CliError> {
        let cli_settings = CliSettings {
            search_url: self.search_url.clone(),
            index: self.index.clone(),
            ..CliSettings::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        let client = SearchClient::new(&config.search.base_url, &config.search.index);

        if self.recreate {
            output.info(&format!("Recreating index {}...", config.search.index));
            client.delete_index()?;
            client.create_index()?;
        }

        output.info(&format!(
            "Indexing {} from {}...",
            self.docs_version,
            self.build_folder.display()
        ));
        let count =
            client.index_documents(build_documents(&self.docs_version, &self.build_folder))?;

        output.success(&format!(
            "Indexed {count} documents for {}",
            self.docs_version
        ));
        Ok(())
    }
}
