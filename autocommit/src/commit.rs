//! Commit stage: commit the staged changes with the configured identity.

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::config::Inputs;
use crate::git::{Git, GitRunner};

/// Commit the staged changes.
///
/// Returns the new commit id, or `None` when nothing was staged at commit
/// time (a later pull can leave the index empty even after staging probed
/// non-empty; that is a quiet no-op, not an error).
pub fn commit_changes<R: GitRunner>(git: &Git<R>, inputs: &Inputs) -> Result<Option<String>> {
    let author = inputs
        .author
        .as_ref()
        .map(|identity| format!("{} <{}>", identity.name, identity.email));
    let sha = git
        .commit(&inputs.message, author.as_deref(), &inputs.commit_args)
        .context("commit staged changes")?;
    match &sha {
        Some(sha) => info!(commit = %sha, "created commit"),
        None => debug!("commit skipped, nothing staged"),
    }
    Ok(sha)
}
