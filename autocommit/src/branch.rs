//! Branch resolution: fetch, switch-or-create, then the pull decision.

use anyhow::{Context, Result, bail};
use tracing::{debug, info};

use crate::config::{BranchMode, FetchDirective, Inputs, PullDirective};
use crate::git::{BranchNotFound, Git, GitRunner};

/// Whether the target branch existed before this run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BranchOutcome {
    Existing,
    Created,
}

/// Resolved target branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedBranch {
    pub name: String,
    pub outcome: BranchOutcome,
}

/// Fetch remote refs, switch to the target branch (creating it when the mode
/// allows), and pull according to the directive and branch outcome.
///
/// Fetching happens first so the branch-existence check and the pull both
/// observe the latest remote state. The default fetch forces tag updates so a
/// diverged local tag cannot shadow the remote one.
pub fn resolve_branch<R: GitRunner>(git: &Git<R>, inputs: &Inputs) -> Result<ResolvedBranch> {
    match &inputs.fetch {
        FetchDirective::Default => {
            git.fetch(&["--tags".to_string(), "--force".to_string()])
                .context("fetch remote refs")?;
        }
        FetchDirective::Skip => debug!("fetch skipped"),
        FetchDirective::Args(args) => git.fetch(args).context("fetch remote refs")?,
    }

    let name = match &inputs.branch {
        Some(branch) => branch.clone(),
        None => git.current_branch().context("determine current branch")?,
    };

    let outcome = match git.checkout(&name) {
        Ok(()) => {
            debug!(branch = %name, "switched to existing branch");
            BranchOutcome::Existing
        }
        Err(err) if err.downcast_ref::<BranchNotFound>().is_some() => match inputs.branch_mode {
            BranchMode::Create => {
                info!(branch = %name, "branch not found, creating");
                git.checkout_new_branch(&name)
                    .with_context(|| format!("create branch '{name}'"))?;
                BranchOutcome::Created
            }
            BranchMode::Throw => {
                bail!("branch '{name}' not found and branch_mode is 'throw'");
            }
        },
        Err(err) => return Err(err),
    };

    match (&inputs.pull, outcome) {
        (PullDirective::Skip, _) => debug!("pull skipped"),
        (PullDirective::Args(args), _) => git.pull(args).context("pull")?,
        (PullDirective::Default, BranchOutcome::Created) => {
            debug!("new branch, skipping default pull");
        }
        (PullDirective::Default, BranchOutcome::Existing) => {
            git.pull(&["--no-rebase".to_string()]).context("pull")?;
        }
    }

    Ok(ResolvedBranch { name, outcome })
}
