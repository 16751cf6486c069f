//! Test-only helpers: a scripted git runner and input fixtures.

use std::collections::VecDeque;
use std::sync::Mutex;

use anyhow::Result;

use crate::config::{
    BranchMode, FetchDirective, Inputs, PathspecPolicy, PullDirective, PushDirective,
};
use crate::git::{GitRunner, ProcessOutput};

/// Deterministic inputs: add everything, ignore pathspec errors, push with
/// upstream tracking, no tag, no identities.
pub fn base_inputs() -> Inputs {
    Inputs {
        add: vec![vec![".".to_string()]],
        remove: Vec::new(),
        message: "Automated commit".to_string(),
        commit_args: Vec::new(),
        author: None,
        committer: None,
        branch: Some("main".to_string()),
        branch_mode: BranchMode::Throw,
        pathspec_policy: PathspecPolicy::Ignore,
        fetch: FetchDirective::Default,
        pull: PullDirective::Default,
        push: PushDirective::DefaultUpstream,
        tag: None,
        cwd: ".".into(),
    }
}

/// A successful invocation with the given stdout.
pub fn success_with_stdout(stdout: &str) -> ProcessOutput {
    ProcessOutput {
        success: true,
        code: Some(0),
        stdout: stdout.to_string(),
        stderr: String::new(),
    }
}

/// A failed invocation (exit 1) with the given stdout/stderr.
pub fn failure(stdout: &str, stderr: &str) -> ProcessOutput {
    ProcessOutput {
        success: false,
        code: Some(1),
        stdout: stdout.to_string(),
        stderr: stderr.to_string(),
    }
}

/// The failure git emits when a staging pathspec matches nothing.
pub fn pathspec_failure(pathspec: &str) -> ProcessOutput {
    failure(
        "",
        &format!("fatal: pathspec '{pathspec}' did not match any files"),
    )
}

/// The failure git emits when checking out an absent branch.
pub fn branch_not_found(branch: &str) -> ProcessOutput {
    failure(
        "",
        &format!("error: pathspec '{branch}' did not match any file(s) known to git"),
    )
}

struct Rule {
    prefix: Vec<String>,
    responses: VecDeque<ProcessOutput>,
}

/// Scripted [`GitRunner`]: records every invocation and answers from queued
/// responses.
///
/// Rules are matched in registration order against the start of the argument
/// list; the first rule with a remaining response wins, and anything
/// unmatched succeeds with empty output. Registering the same prefix twice
/// queues a second response, which is how a fail-then-succeed sequence (the
/// tag-push conflict) is scripted.
#[derive(Default)]
pub struct ScriptedGit {
    rules: Mutex<Vec<Rule>>,
    calls: Mutex<Vec<Vec<String>>>,
}

impl ScriptedGit {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response for invocations starting with `prefix`.
    #[must_use]
    pub fn with_response(self, prefix: &[&str], response: ProcessOutput) -> Self {
        {
            let mut rules = self.rules.lock().unwrap_or_else(|e| e.into_inner());
            rules.push(Rule {
                prefix: prefix.iter().map(|arg| (*arg).to_string()).collect(),
                responses: VecDeque::from([response]),
            });
        }
        self
    }

    /// Every git invocation so far, in order.
    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl GitRunner for ScriptedGit {
    fn run_git(&self, args: &[String]) -> Result<ProcessOutput> {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(args.to_vec());
        let mut rules = self.rules.lock().unwrap_or_else(|e| e.into_inner());
        for rule in rules.iter_mut() {
            if args.starts_with(&rule.prefix) {
                if let Some(response) = rule.responses.pop_front() {
                    return Ok(response);
                }
            }
        }
        Ok(success_with_stdout(""))
    }
}
