//! CLI error types.

use docship_config::ConfigError;
use docship_deploy::DeployError;
use docship_exec::ExecError;
use docship_rewrite::RewriteError;
use docship_search::SearchError;
use docship_site::BuildError;
use docship_sources::SourcesError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Exec(#[from] ExecError),

    #[error("{0}")]
    Sources(#[from] SourcesError),

    #[error("{0}")]
    Build(#[from] BuildError),

    #[error("{0}")]
    Rewrite(#[from] RewriteError),

    #[error("{0}")]
    Search(#[from] SearchError),

    #[error("{0}")]
    Deploy(#[from] DeployError),

    #[error("{0}")]
    Validation(String),
}
