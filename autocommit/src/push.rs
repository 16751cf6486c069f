//! Pushing the commit and tags, including the tag-conflict recovery.
//!
//! Tag creation is not idempotent against a stale remote tag of the same
//! name, so a rejected tag push is recovered by deleting the remote tag and
//! retrying once. A failed retry degrades to a deferred run failure; the
//! commit push that already happened is never undone.

use anyhow::{Context, Result, anyhow};
use tracing::{info, warn};

use crate::config::PushDirective;
use crate::errors::ErrorAggregator;
use crate::git::{Git, GitRunner};
use crate::outputs::RunResult;
use crate::tag::tag_name;

/// Push the commit per the directive, then push tags when a tag was created.
///
/// A failed commit push is fatal. A rejected tag push goes through one
/// delete-and-retry cycle; if that fails too, the failure is recorded in the
/// aggregator and the run continues to its end.
pub fn push_changes<R: GitRunner>(
    git: &Git<R>,
    directive: &PushDirective,
    branch: &str,
    tag_args: Option<&[String]>,
    result: &mut RunResult,
    aggregator: &mut ErrorAggregator,
) -> Result<()> {
    match directive {
        PushDirective::None => return Ok(()),
        PushDirective::DefaultUpstream => {
            git.push(&[
                "origin".to_string(),
                branch.to_string(),
                "--set-upstream".to_string(),
            ])
            .with_context(|| format!("push branch '{branch}' to origin"))?;
        }
        PushDirective::CustomArgs(args) => {
            git.push(args).context("push with custom arguments")?;
        }
    }
    result.pushed = true;
    info!(branch, "pushed commit");

    if !result.tagged {
        return Ok(());
    }
    if let Err(err) = git.push_tags() {
        warn!(err = %format!("{err:#}"), "tag push rejected, attempting recovery");
        if let Err(retry_err) = recover_tag_push(git, tag_args) {
            aggregator.record("push tags to origin", retry_err);
            return Ok(());
        }
    }
    info!("pushed tags");
    Ok(())
}

/// Delete the conflicting remote tag and retry the tag push once.
fn recover_tag_push<R: GitRunner>(git: &Git<R>, tag_args: Option<&[String]>) -> Result<()> {
    let tag = tag_args
        .and_then(tag_name)
        .ok_or_else(|| anyhow!("no tag name found in tag arguments"))?;
    git.delete_remote_tag(tag)
        .with_context(|| format!("delete remote tag '{tag}'"))?;
    git.push_tags().context("retry tag push")
}
