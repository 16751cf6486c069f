//! Change staging: ordered `git add` / `git rm` argument groups with a
//! pathspec error-handling policy.

use anyhow::{Context, Result};
use tracing::debug;

use crate::config::{Inputs, PathspecPolicy};
use crate::errors::ErrorAggregator;
use crate::git::{Git, GitRunner, PathspecNoMatch};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StagingKind {
    Add,
    Remove,
}

impl StagingKind {
    fn as_str(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Remove => "rm",
        }
    }
}

/// Run every configured add group, then every remove group, in order.
///
/// A group whose pathspec matches nothing is handled per `policy`; any other
/// failure aborts immediately regardless of policy. Deferred errors land in
/// `aggregator` and the caller decides their fate at the end of the run.
pub fn stage_changes<R: GitRunner>(
    git: &Git<R>,
    inputs: &Inputs,
    policy: PathspecPolicy,
    aggregator: &mut ErrorAggregator,
) -> Result<()> {
    for group in &inputs.add {
        apply_group(git, StagingKind::Add, group, policy, aggregator)?;
    }
    for group in &inputs.remove {
        apply_group(git, StagingKind::Remove, group, policy, aggregator)?;
    }
    Ok(())
}

fn apply_group<R: GitRunner>(
    git: &Git<R>,
    kind: StagingKind,
    group: &[String],
    policy: PathspecPolicy,
    aggregator: &mut ErrorAggregator,
) -> Result<()> {
    let result = match kind {
        StagingKind::Add => git.add(group),
        StagingKind::Remove => git.rm(group),
    };
    let Err(err) = result else {
        return Ok(());
    };
    if err.downcast_ref::<PathspecNoMatch>().is_none() {
        return Err(err);
    }
    let operation = format!("git {} {}", kind.as_str(), group.join(" "));
    match policy {
        PathspecPolicy::Ignore => {
            debug!(%operation, "pathspec matched no files, ignoring");
            Ok(())
        }
        PathspecPolicy::ExitImmediately => Err(err).with_context(|| {
            format!("{operation} (pathspec_error_handling=exitImmediately)")
        }),
        PathspecPolicy::ExitAtEnd => {
            debug!(%operation, "pathspec matched no files, deferring failure");
            aggregator.record(operation, err);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{ScriptedGit, base_inputs, failure, pathspec_failure};

    fn inputs_with(add: &[&str], remove: &[&str]) -> Inputs {
        let mut inputs = base_inputs();
        inputs.add = add.iter().map(|g| vec![(*g).to_string()]).collect();
        inputs.remove = remove.iter().map(|g| vec![(*g).to_string()]).collect();
        inputs
    }

    #[test]
    fn ignore_policy_swallows_and_continues() {
        let git = Git::new(
            ScriptedGit::new().with_response(&["add", "missing"], pathspec_failure("missing")),
        );
        let inputs = inputs_with(&["missing", "src"], &[]);
        let mut agg = ErrorAggregator::new();
        stage_changes(&git, &inputs, PathspecPolicy::Ignore, &mut agg).expect("stage");
        assert!(agg.is_empty());
        // Both groups executed, in order.
        let calls = git.runner().calls();
        assert_eq!(calls, vec![vec!["add", "missing"], vec!["add", "src"]]);
    }

    #[test]
    fn exit_immediately_stops_before_later_groups() {
        let git = Git::new(
            ScriptedGit::new().with_response(&["add", "missing"], pathspec_failure("missing")),
        );
        let inputs = inputs_with(&["missing", "src"], &["old.txt"]);
        let mut agg = ErrorAggregator::new();
        let err = stage_changes(&git, &inputs, PathspecPolicy::ExitImmediately, &mut agg)
            .expect_err("must fail");
        assert!(format!("{err:#}").contains("git add missing"));
        assert!(agg.is_empty());
        assert_eq!(git.runner().calls().len(), 1);
    }

    #[test]
    fn exit_at_end_records_every_no_match_and_keeps_going() {
        let git = Git::new(
            ScriptedGit::new()
                .with_response(&["add", "missing"], pathspec_failure("missing"))
                .with_response(&["rm", "gone"], pathspec_failure("gone")),
        );
        let inputs = inputs_with(&["missing", "src"], &["gone"]);
        let mut agg = ErrorAggregator::new();
        stage_changes(&git, &inputs, PathspecPolicy::ExitAtEnd, &mut agg).expect("stage");
        assert_eq!(agg.len(), 2);
        assert_eq!(git.runner().calls().len(), 3);
        let err = agg.resolve().expect_err("deferred errors fail the run");
        assert!(format!("{err}").contains("2 runtime errors"));
    }

    #[test]
    fn non_pathspec_failure_is_fatal_even_under_ignore() {
        let git = Git::new(ScriptedGit::new().with_response(
            &["add", "src"],
            failure("", "fatal: Unable to create index.lock: Permission denied"),
        ));
        let inputs = inputs_with(&["src"], &[]);
        let mut agg = ErrorAggregator::new();
        let err = stage_changes(&git, &inputs, PathspecPolicy::Ignore, &mut agg)
            .expect_err("must fail");
        assert!(format!("{err:#}").contains("index.lock"));
    }
}
