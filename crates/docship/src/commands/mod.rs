//! CLI command implementations.

mod branches;
mod build;
mod deploy;
mod index;
mod outdated;
mod prepare_sources;
mod redirects;
mod search;

pub(crate) use branches::BranchesArgs;
pub(crate) use build::BuildArgs;
pub(crate) use deploy::DeployArgs;
pub(crate) use index::IndexArgs;
pub(crate) use outdated::OutdatedArgs;
pub(crate) use prepare_sources::PrepareSourcesArgs;
pub(crate) use redirects::RedirectsArgs;
pub(crate) use search::SearchArgs;
