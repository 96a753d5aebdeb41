//! `docship redirects` command implementation.

use std::path::PathBuf;

use clap::Args;
use docship_config::{CliSettings, Config};
use docship_rewrite::redirects::{write_absolute_redirects, write_relative_redirects};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the redirects command.
#[derive(Args)]
pub(crate) struct RedirectsArgs {
    /// Path where the generated html files are.
    path_html: PathBuf,

    /// New slug the pages redirect to, like "1".
    #[arg(long)]
    new_slug: String,

    /// Old slug the pages currently live under, like "en/latest".
    /// When given, redirects are computed relative to each page;
    /// otherwise they point at the public site URL.
    #[arg(long)]
    old_slug: Option<String>,

    /// Public site URL prefix (overrides config).
    #[arg(long)]
    url_prefix: Option<String>,

    /// Path to configuration file (default: auto-discover docship.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl RedirectsArgs {
    pub(crate) fn execute(self, output: &Output) -> Result<(), CliError> {
        let cli_settings = CliSettings {
            url_prefix: self.url_prefix.clone(),
            ..CliSettings::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        let count = if let Some(old_slug) = &self.old_slug {
            write_relative_redirects(&self.path_html, old_slug, &self.new_slug)?
        } else {
            write_absolute_redirects(&self.path_html, &config.site.url_prefix, &self.new_slug)?
        };

        output.success(&format!(
            "Wrote {count} redirects to /{} under {}",
            self.new_slug,
            self.path_html.display()
        ));
        Ok(())
    }
}
