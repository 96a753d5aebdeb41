//! Hosting-branch deployment.
//!
//! Three stages: [`gate`] decides from the CI environment whether this run
//! may publish at all, [`prepare`] finishes the merged output tree (legacy
//! redirect tree, bare-major alias), and [`publish`] replaces the hosting
//! branch's contents with it.
//!
//! Publishing has no rollback: a failure mid-way can leave the hosting
//! working tree inconsistent until the next successful run.

pub mod gate;
pub mod prepare;
pub mod publish;

pub use gate::{DeployGate, GateDecision};
pub use prepare::prepare_output;
pub use publish::{checkout_hosting, publish};

use std::path::PathBuf;

use docship_exec::ExecError;
use docship_rewrite::RewriteError;

/// Error from preparing or publishing the merged site.
#[derive(Debug, thiserror::Error)]
pub enum DeployError {
    /// An external git command failed.
    #[error(transparent)]
    Exec(#[from] ExecError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Rewriting the legacy redirect tree failed.
    #[error(transparent)]
    Rewrite(#[from] RewriteError),

    /// A slug's output tree is missing from the merged output folder.
    #[error("missing output tree: {}", .0.display())]
    MissingTree(PathBuf),
}
