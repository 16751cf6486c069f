//! Git adapter: the only module that talks to the external tool.
//!
//! [`GitRunner`] is the process seam; tests substitute a scripted runner that
//! never spawns anything. [`Git`] layers typed operations on top and is the
//! single place where raw failure messages are classified: a staging command
//! that matched nothing becomes [`PathspecNoMatch`], a checkout of an absent
//! branch becomes [`BranchNotFound`], and a commit with nothing staged is
//! reported as `Ok(None)` rather than an error. Everything else is a plain
//! failure carrying the tool's message.

use std::path::PathBuf;
use std::process::Command;

use anyhow::{Context, Result, anyhow};
use thiserror::Error;
use tracing::debug;

/// Captured outcome of one git invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOutput {
    pub success: bool,
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ProcessOutput {
    /// stdout and stderr joined, for message classification.
    fn combined(&self) -> String {
        format!("{}\n{}", self.stdout, self.stderr)
    }

    fn message(&self) -> String {
        let err = self.stderr.trim();
        if err.is_empty() {
            self.stdout.trim().to_string()
        } else {
            err.to_string()
        }
    }
}

/// Abstraction over git process execution.
///
/// `Err` means the process could not be run at all; a git failure comes back
/// as `Ok` with `success: false` so the caller can classify the message.
pub trait GitRunner {
    fn run_git(&self, args: &[String]) -> Result<ProcessOutput>;
}

/// Runner that spawns the `git` binary in a working directory.
#[derive(Debug, Clone)]
pub struct GitCli {
    workdir: PathBuf,
}

impl GitCli {
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        Self {
            workdir: workdir.into(),
        }
    }
}

impl GitRunner for GitCli {
    fn run_git(&self, args: &[String]) -> Result<ProcessOutput> {
        debug!(args = %args.join(" "), "git");
        let output = Command::new("git")
            .args(args)
            .current_dir(&self.workdir)
            .output()
            .with_context(|| format!("spawn git {}", args.join(" ")))?;
        Ok(ProcessOutput {
            success: output.status.success(),
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }
}

/// A staging command whose pathspec matched zero files.
#[derive(Debug, Error)]
#[error("git {operation} {args}: pathspec matched no files")]
pub struct PathspecNoMatch {
    pub operation: String,
    pub args: String,
}

/// Checkout target that does not exist locally.
#[derive(Debug, Error)]
#[error("branch '{0}' not found")]
pub struct BranchNotFound(pub String);

// Signatures git prints for the two recoverable failure shapes. Staging says
// "did not match any files"; checkout says "did not match any file(s) known
// to git".
const STAGING_NO_MATCH: &str = "did not match any files";
const CHECKOUT_NO_MATCH: &str = "did not match any file";
const NOTHING_TO_COMMIT: &[&str] = &[
    "nothing to commit",
    "no changes added to commit",
    "nothing added to commit",
];

/// Typed git operations over a [`GitRunner`].
#[derive(Debug)]
pub struct Git<R> {
    runner: R,
}

impl<R: GitRunner> Git<R> {
    pub fn new(runner: R) -> Self {
        Self { runner }
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    fn run(&self, args: &[&str]) -> Result<ProcessOutput> {
        let owned: Vec<String> = args.iter().map(|arg| (*arg).to_string()).collect();
        self.runner.run_git(&owned)
    }

    fn run_checked(&self, args: &[&str]) -> Result<ProcessOutput> {
        let owned: Vec<String> = args.iter().map(|arg| (*arg).to_string()).collect();
        let output = self.runner.run_git(&owned)?;
        if !output.success {
            return Err(command_failed(&owned, &output));
        }
        Ok(output)
    }

    /// Write a repo-local config value.
    pub fn set_config(&self, key: &str, value: &str) -> Result<()> {
        self.run_checked(&["config", key, value])?;
        Ok(())
    }

    /// Log the effective config at debug level.
    pub fn log_config(&self) -> Result<()> {
        let output = self.run_checked(&["config", "--list"])?;
        debug!(config = %output.stdout.trim(), "effective git config");
        Ok(())
    }

    /// Current branch name (errors on detached HEAD).
    pub fn current_branch(&self) -> Result<String> {
        let output = self.run_checked(&["rev-parse", "--abbrev-ref", "HEAD"])?;
        let name = output.stdout.trim().to_string();
        if name == "HEAD" {
            return Err(anyhow!("detached HEAD: set a target branch explicitly"));
        }
        Ok(name)
    }

    pub fn fetch(&self, args: &[String]) -> Result<()> {
        let mut full = vec!["fetch".to_string()];
        full.extend_from_slice(args);
        let output = self.runner.run_git(&full)?;
        if !output.success {
            return Err(command_failed(&full, &output));
        }
        Ok(())
    }

    /// Switch to an existing branch. Absent branches come back as a typed
    /// [`BranchNotFound`] so the caller can decide to create instead.
    pub fn checkout(&self, branch: &str) -> Result<()> {
        let output = self.run(&["checkout", branch])?;
        if !output.success {
            if output.combined().contains(CHECKOUT_NO_MATCH) {
                return Err(anyhow::Error::new(BranchNotFound(branch.to_string())));
            }
            return Err(anyhow!("git checkout {branch} failed: {}", output.message()));
        }
        Ok(())
    }

    /// Create and switch to a new local branch.
    pub fn checkout_new_branch(&self, branch: &str) -> Result<()> {
        self.run_checked(&["checkout", "-b", branch])?;
        Ok(())
    }

    pub fn pull(&self, args: &[String]) -> Result<()> {
        let mut full = vec!["pull".to_string()];
        full.extend_from_slice(args);
        let output = self.runner.run_git(&full)?;
        if !output.success {
            return Err(command_failed(&full, &output));
        }
        Ok(())
    }

    pub fn add(&self, args: &[String]) -> Result<()> {
        self.stage("add", args)
    }

    pub fn rm(&self, args: &[String]) -> Result<()> {
        self.stage("rm", args)
    }

    fn stage(&self, operation: &str, args: &[String]) -> Result<()> {
        let mut full = vec![operation.to_string()];
        full.extend_from_slice(args);
        let output = self.runner.run_git(&full)?;
        if !output.success {
            if output.combined().contains(STAGING_NO_MATCH) {
                return Err(anyhow::Error::new(PathspecNoMatch {
                    operation: operation.to_string(),
                    args: args.join(" "),
                }));
            }
            return Err(command_failed(&full, &output));
        }
        Ok(())
    }

    /// Paths currently staged for commit.
    pub fn staged_files(&self) -> Result<Vec<String>> {
        let output = self.run_checked(&["diff", "--cached", "--name-only"])?;
        Ok(output
            .stdout
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| line.trim().to_string())
            .collect())
    }

    /// Commit staged changes.
    ///
    /// Returns the new commit id, or `None` when git reports there was
    /// nothing to commit (not an error for this tool).
    pub fn commit(
        &self,
        message: &str,
        author: Option<&str>,
        extra: &[String],
    ) -> Result<Option<String>> {
        let mut full = vec!["commit".to_string(), "-m".to_string(), message.to_string()];
        if let Some(author) = author {
            full.push(format!("--author={author}"));
        }
        full.extend_from_slice(extra);
        let output = self.runner.run_git(&full)?;
        if !output.success {
            let combined = output.combined();
            if NOTHING_TO_COMMIT
                .iter()
                .any(|signature| combined.contains(signature))
            {
                debug!("nothing staged at commit time");
                return Ok(None);
            }
            return Err(anyhow!("git commit failed: {}", output.message()));
        }
        let head = self.run_checked(&["rev-parse", "HEAD"])?;
        Ok(Some(head.stdout.trim().to_string()))
    }

    pub fn tag(&self, args: &[String]) -> Result<()> {
        let mut full = vec!["tag".to_string()];
        full.extend_from_slice(args);
        let output = self.runner.run_git(&full)?;
        if !output.success {
            return Err(command_failed(&full, &output));
        }
        Ok(())
    }

    pub fn push(&self, args: &[String]) -> Result<()> {
        let mut full = vec!["push".to_string()];
        full.extend_from_slice(args);
        let output = self.runner.run_git(&full)?;
        if !output.success {
            return Err(command_failed(&full, &output));
        }
        Ok(())
    }

    pub fn push_tags(&self) -> Result<()> {
        self.run_checked(&["push", "origin", "--tags"])?;
        Ok(())
    }

    /// Delete a tag on `origin` via push-with-delete semantics.
    pub fn delete_remote_tag(&self, tag: &str) -> Result<()> {
        self.run_checked(&["push", "origin", "--delete", tag])?;
        Ok(())
    }
}

fn command_failed(args: &[String], output: &ProcessOutput) -> anyhow::Error {
    anyhow!("git {} failed: {}", args.join(" "), output.message())
}
