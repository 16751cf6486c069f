//! Run inputs sourced from `INPUT_*` environment variables.
//!
//! The invoking platform passes every input as `INPUT_<NAME>` with an empty
//! string for unset values, so empty is treated as absent throughout. All
//! closed-set fields are validated here, before any git command runs.

use std::path::PathBuf;

use anyhow::{Context, Result, anyhow, bail};

/// Behavior when a staging command matches zero files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathspecPolicy {
    /// Swallow the error and continue with the next group.
    Ignore,
    /// Abort the whole run at the first non-matching group.
    ExitImmediately,
    /// Record the error, keep staging, fail the run at the end.
    ExitAtEnd,
}

/// Behavior when the target branch does not exist locally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BranchMode {
    Throw,
    Create,
}

/// What to push after committing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PushDirective {
    /// Do not push.
    None,
    /// Push the target branch to `origin` with upstream tracking.
    DefaultUpstream,
    /// Push with exactly these tokens, no implicit remote or branch.
    CustomArgs(Vec<String>),
}

/// How to fetch remote refs before branch resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchDirective {
    /// `git fetch --tags --force`.
    Default,
    Skip,
    Args(Vec<String>),
}

/// How to pull after branch resolution.
///
/// `Default` defers to the branch outcome: created branches skip the pull,
/// existing branches pull with `--no-rebase`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PullDirective {
    Default,
    Skip,
    Args(Vec<String>),
}

/// Author or committer identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub name: String,
    pub email: String,
}

/// Validated inputs for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inputs {
    /// `git add` argument groups, executed in order.
    pub add: Vec<Vec<String>>,
    /// `git rm` argument groups, executed in order.
    pub remove: Vec<Vec<String>>,
    pub message: String,
    /// Extra tokens appended to `git commit`.
    pub commit_args: Vec<String>,
    pub author: Option<Identity>,
    pub committer: Option<Identity>,
    /// Target branch; defaults to the current branch when absent.
    pub branch: Option<String>,
    pub branch_mode: BranchMode,
    pub pathspec_policy: PathspecPolicy,
    pub fetch: FetchDirective,
    pub pull: PullDirective,
    pub push: PushDirective,
    /// `git tag` arguments; presence enables tagging.
    pub tag: Option<Vec<String>>,
    pub cwd: PathBuf,
}

impl Inputs {
    /// Load inputs from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load inputs through a lookup closure (tests pass a map).
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| -> Option<String> {
            lookup(&format!("INPUT_{name}")).filter(|value| !value.trim().is_empty())
        };

        let add = parse_staging_spec(get("ADD").as_deref().or(Some(".")))
            .context("parse INPUT_ADD")?;
        let remove = parse_staging_spec(get("REMOVE").as_deref()).context("parse INPUT_REMOVE")?;

        let commit_args = match get("COMMIT") {
            Some(raw) => tokenize(&raw).context("parse INPUT_COMMIT")?,
            None => Vec::new(),
        };

        let tag = match get("TAG") {
            Some(raw) => Some(tokenize(&raw).context("parse INPUT_TAG")?),
            None => None,
        };

        Ok(Self {
            add,
            remove,
            message: get("MESSAGE").unwrap_or_else(|| "Automated commit".to_string()),
            commit_args,
            author: parse_identity("AUTHOR", get("AUTHOR_NAME"), get("AUTHOR_EMAIL"))?,
            committer: parse_identity(
                "COMMITTER",
                get("COMMITTER_NAME"),
                get("COMMITTER_EMAIL"),
            )?,
            branch: get("BRANCH"),
            branch_mode: parse_branch_mode(get("BRANCH_MODE").as_deref())?,
            pathspec_policy: parse_pathspec_policy(get("PATHSPEC_ERROR_HANDLING").as_deref())?,
            fetch: parse_fetch(get("FETCH").as_deref())?,
            pull: parse_pull(get("PULL").as_deref())?,
            push: parse_push(get("PUSH").as_deref())?,
            tag,
            cwd: PathBuf::from(get("CWD").unwrap_or_else(|| ".".to_string())),
        })
    }

    /// The committer identity to write to repo-local config.
    ///
    /// Falls back to the author so unattended commits succeed in checkouts
    /// without a global identity.
    pub fn effective_committer(&self) -> Option<&Identity> {
        self.committer.as_ref().or(self.author.as_ref())
    }
}

/// Split one argument string into tokens, shell-style.
fn tokenize(raw: &str) -> Result<Vec<String>> {
    let tokens =
        shlex::split(raw).ok_or_else(|| anyhow!("unbalanced quotes in argument string '{raw}'"))?;
    if tokens.is_empty() {
        bail!("argument string '{raw}' contains no tokens");
    }
    Ok(tokens)
}

/// Parse a staging spec: a single argument string, or a JSON array of
/// argument strings (one `git add`/`git rm` invocation per element).
fn parse_staging_spec(raw: Option<&str>) -> Result<Vec<Vec<String>>> {
    let Some(raw) = raw else {
        return Ok(Vec::new());
    };
    let groups: Vec<String> = if raw.trim_start().starts_with('[') {
        serde_json::from_str(raw)
            .with_context(|| format!("parse '{raw}' as a JSON array of argument strings"))?
    } else {
        vec![raw.to_string()]
    };
    groups.iter().map(|group| tokenize(group)).collect()
}

fn parse_identity(
    label: &str,
    name: Option<String>,
    email: Option<String>,
) -> Result<Option<Identity>> {
    match (name, email) {
        (Some(name), Some(email)) => Ok(Some(Identity { name, email })),
        (None, None) => Ok(None),
        _ => bail!("INPUT_{label}_NAME and INPUT_{label}_EMAIL must be set together"),
    }
}

fn parse_branch_mode(raw: Option<&str>) -> Result<BranchMode> {
    match raw {
        None | Some("throw") => Ok(BranchMode::Throw),
        Some("create") => Ok(BranchMode::Create),
        Some(other) => bail!("INPUT_BRANCH_MODE must be 'throw' or 'create', got '{other}'"),
    }
}

fn parse_pathspec_policy(raw: Option<&str>) -> Result<PathspecPolicy> {
    match raw {
        None | Some("ignore") => Ok(PathspecPolicy::Ignore),
        Some("exitImmediately") => Ok(PathspecPolicy::ExitImmediately),
        Some("exitAtEnd") => Ok(PathspecPolicy::ExitAtEnd),
        Some(other) => bail!(
            "INPUT_PATHSPEC_ERROR_HANDLING must be 'ignore', 'exitImmediately' or 'exitAtEnd', \
             got '{other}'"
        ),
    }
}

fn parse_fetch(raw: Option<&str>) -> Result<FetchDirective> {
    match raw {
        None => Ok(FetchDirective::Default),
        Some(raw) => match parse_bool(raw) {
            Some(true) => Ok(FetchDirective::Default),
            Some(false) => Ok(FetchDirective::Skip),
            None => Ok(FetchDirective::Args(
                tokenize(raw).context("parse INPUT_FETCH")?,
            )),
        },
    }
}

/// Sentinel accepted in `INPUT_PULL` to skip pulling entirely.
pub const NO_PULL: &str = "NO-PULL";

fn parse_pull(raw: Option<&str>) -> Result<PullDirective> {
    match raw {
        None => Ok(PullDirective::Default),
        Some(NO_PULL) => Ok(PullDirective::Skip),
        Some(raw) => Ok(PullDirective::Args(
            tokenize(raw).context("parse INPUT_PULL")?,
        )),
    }
}

fn parse_push(raw: Option<&str>) -> Result<PushDirective> {
    match raw {
        None => Ok(PushDirective::DefaultUpstream),
        Some(raw) => match parse_bool(raw) {
            Some(true) => Ok(PushDirective::DefaultUpstream),
            Some(false) => Ok(PushDirective::None),
            None => Ok(PushDirective::CustomArgs(
                tokenize(raw).context("parse INPUT_PUSH")?,
            )),
        },
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}
