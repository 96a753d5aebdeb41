//! Environment-driven deploy gating.
//!
//! A publish only happens from a CI build of the designated main branch
//! that is not a pull request and that holds a publish credential. Any
//! failed condition is a skip, never an error: the pipeline exits
//! successfully without publishing and logs which condition stopped it.

use docship_config::{Config, DeployConfig};
use tracing::info;

/// Deploy gate: the environment variable names to consult and the branch
/// that is allowed to publish.
#[derive(Debug)]
pub struct DeployGate {
    main_branch: String,
    branch_var: String,
    pull_request_var: String,
    token_var: String,
}

/// Outcome of checking the gate.
#[derive(Debug, PartialEq, Eq)]
pub enum GateDecision {
    /// Publish may proceed with this credential.
    Proceed {
        /// The publish token from the environment.
        token: String,
    },
    /// Publishing is skipped; the reason is user-facing.
    Skip {
        /// Which condition stopped the deploy.
        reason: String,
    },
}

impl DeployGate {
    /// Build the gate from loaded configuration.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        let DeployConfig {
            branch_var,
            pull_request_var,
            token_var,
        } = &config.deploy;
        Self {
            main_branch: config.site.main_branch.clone(),
            branch_var: branch_var.clone(),
            pull_request_var: pull_request_var.clone(),
            token_var: token_var.clone(),
        }
    }

    /// Check every condition against the process environment.
    #[must_use]
    pub fn check(&self) -> GateDecision {
        let branch = std::env::var(&self.branch_var).unwrap_or_default();
        if branch != self.main_branch {
            return self.skip(format!(
                "not the {} branch (building '{branch}')",
                self.main_branch
            ));
        }

        // Deploy only when CI says this is explicitly not a pull request
        let pull_request = std::env::var(&self.pull_request_var).unwrap_or_default();
        if pull_request != "false" {
            return self.skip("pull request build".to_owned());
        }

        match std::env::var(&self.token_var) {
            Ok(token) if !token.is_empty() => GateDecision::Proceed { token },
            _ => self.skip(format!("missing {} credential", self.token_var)),
        }
    }

    fn skip(&self, reason: String) -> GateDecision {
        info!("deploy skipped: {reason}");
        GateDecision::Skip { reason }
    }
}
