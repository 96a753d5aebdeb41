//! `docship search` command implementation.

use std::path::PathBuf;

use clap::Args;
use docship_config::{CliSettings, Config};
use docship_search::{SearchClient, find_relevant_text};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the search command.
#[derive(Args)]
pub(crate) struct SearchArgs {
    /// Free-text keywords to search for.
    #[arg(required = true)]
    keywords: Vec<String>,

    /// Version slug to search in.
    #[arg(long)]
    docs_version: String,

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

impl SearchArgs {
    pub(crate) fn execute(self, output: &Output) -> Result<(), CliError> {
        let cli_settings = CliSettings {
            search_url: self.search_url.clone(),
            index: self.index.clone(),
            ..CliSettings::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        let keywords = self.keywords.join(" ");
        let client = SearchClient::new(&config.search.base_url, &config.search.index);
        let hits = client.search(&self.docs_version, &keywords)?;

        if hits.is_empty() {
            output.info("No results");
            return Ok(());
        }

        for hit in &hits {
            output.data(&format!(
                "{:>6.2}  {}  ({})",
                hit.score, hit.document.title, hit.document.slug
            ));
            if let Some(snippet) = find_relevant_text(&hit.document.html, &keywords) {
                output.data(&format!("        {snippet}"));
            }
        }
        Ok(())
    }
}
