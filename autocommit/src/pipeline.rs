//! The ordered commit-tag-push pipeline.
//!
//! Execution order is fixed and every git invocation is awaited to
//! completion before the next step: identity config, policy staging pass,
//! staged-diff check, branch resolution, re-staging pass, commit, tag, push,
//! then the deferred-error resolution. A clean index after the first staging
//! pass short-circuits to a no-op.

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::branch::resolve_branch;
use crate::commit::commit_changes;
use crate::config::{Inputs, PathspecPolicy, PushDirective};
use crate::errors::ErrorAggregator;
use crate::git::{Git, GitRunner};
use crate::outputs::RunResult;
use crate::push::push_changes;
use crate::stage::stage_changes;
use crate::tag::create_tag;

/// Run the whole pipeline.
///
/// `result` is owned by the caller and mutated as operations succeed, so the
/// outputs reflect everything that happened before a mid-pipeline failure.
pub fn run<R: GitRunner>(git: &Git<R>, inputs: &Inputs, result: &mut RunResult) -> Result<()> {
    configure_identity(git, inputs)?;

    // First staging pass, under the caller's pathspec policy. Deferred
    // errors recorded here count toward run failure even when the run
    // otherwise ends as a no-op.
    let mut aggregator = ErrorAggregator::new();
    stage_changes(git, inputs, inputs.pathspec_policy, &mut aggregator)
        .context("staging pass")?;

    let staged = git.staged_files().context("check staged changes")?;
    if staged.is_empty() {
        info!("working tree clean, nothing to commit");
        return aggregator.resolve();
    }
    debug!(count = staged.len(), "staged changes detected");

    let branch = resolve_branch(git, inputs).context("resolve branch")?;

    // Checkout and pull may have rewritten the index, so stage again. The
    // first pass already applied the policy, so repeat non-matches are
    // swallowed here rather than reported twice.
    stage_changes(git, inputs, PathspecPolicy::Ignore, &mut ErrorAggregator::new())
        .context("re-staging pass")?;

    if let Some(sha) = commit_changes(git, inputs)? {
        result.committed = true;
        result.commit_sha = Some(sha);
    }

    if let Some(tag_args) = &inputs.tag {
        match create_tag(git, tag_args) {
            Ok(()) => result.tagged = true,
            Err(err) => aggregator.record(format!("git tag {}", tag_args.join(" ")), err),
        }
    }

    if inputs.push != PushDirective::None {
        push_changes(
            git,
            &inputs.push,
            &branch.name,
            inputs.tag.as_deref(),
            result,
            &mut aggregator,
        )?;
    }

    aggregator.resolve()
}

/// Write the committer identity to repo-local config so unattended commits
/// work in checkouts without a global identity.
fn configure_identity<R: GitRunner>(git: &Git<R>, inputs: &Inputs) -> Result<()> {
    let Some(committer) = inputs.effective_committer() else {
        return Ok(());
    };
    git.set_config("user.name", &committer.name)
        .context("set user.name")?;
    git.set_config("user.email", &committer.email)
        .context("set user.email")?;
    if tracing::enabled!(tracing::Level::DEBUG) {
        git.log_config()?;
    }
    Ok(())
}
