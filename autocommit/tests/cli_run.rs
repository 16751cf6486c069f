//! CLI tests for the autocommit binary.
//!
//! Runs the real binary against a throwaway repository with a file-path
//! `origin` remote, and verifies exit codes plus the emitted outputs.

use std::fs;
use std::path::Path;
use std::process::Command;

use autocommit::exit_codes;

/// Inputs the binary reads; removed from the child environment so ambient
/// CI variables cannot leak into a test.
const INPUT_VARS: &[&str] = &[
    "INPUT_ADD",
    "INPUT_REMOVE",
    "INPUT_MESSAGE",
    "INPUT_COMMIT",
    "INPUT_AUTHOR_NAME",
    "INPUT_AUTHOR_EMAIL",
    "INPUT_COMMITTER_NAME",
    "INPUT_COMMITTER_EMAIL",
    "INPUT_BRANCH",
    "INPUT_BRANCH_MODE",
    "INPUT_PATHSPEC_ERROR_HANDLING",
    "INPUT_FETCH",
    "INPUT_PULL",
    "INPUT_PUSH",
    "INPUT_TAG",
    "INPUT_CWD",
    "GITHUB_OUTPUT",
];

fn autocommit_cmd(workdir: &Path, home: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_autocommit"));
    cmd.current_dir(workdir);
    for var in INPUT_VARS {
        cmd.env_remove(var);
    }
    isolate_git_env(&mut cmd, home);
    cmd
}

fn git(workdir: &Path, home: &Path, args: &[&str]) -> String {
    let mut cmd = Command::new("git");
    cmd.args(args).current_dir(workdir);
    isolate_git_env(&mut cmd, home);
    let output = cmd.output().expect("run git");
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).to_string()
}

/// Keep host-level git config (gpg signing, hooks, odd defaults) out of the
/// test repositories.
fn isolate_git_env(cmd: &mut Command, home: &Path) {
    cmd.env("HOME", home)
        .env("XDG_CONFIG_HOME", home)
        .env("GIT_CONFIG_NOSYSTEM", "1");
}

#[test]
fn invalid_policy_exits_with_config_code() {
    let temp = tempfile::tempdir().expect("tempdir");
    let status = autocommit_cmd(temp.path(), temp.path())
        .env("INPUT_PATHSPEC_ERROR_HANDLING", "bogus")
        .status()
        .expect("run autocommit");
    assert_eq!(status.code(), Some(exit_codes::CONFIG));
}

#[test]
fn commits_tags_and_pushes_to_local_origin() {
    let temp = tempfile::tempdir().expect("tempdir");
    let root = temp.path();
    git(root, root, &["init", "--bare", "origin.git"]);
    git(root, root, &["clone", "origin.git", "work"]);
    let work = root.join("work");
    fs::write(work.join("hello.txt"), "hello\n").expect("write file");

    let output_path = root.join("outputs.txt");
    let status = autocommit_cmd(&work, root)
        .env("INPUT_MESSAGE", "chore: first automated commit")
        .env("INPUT_AUTHOR_NAME", "Auto Author")
        .env("INPUT_AUTHOR_EMAIL", "author@example.com")
        .env("INPUT_COMMITTER_NAME", "Auto Committer")
        .env("INPUT_COMMITTER_EMAIL", "committer@example.com")
        .env("INPUT_BRANCH", "auto")
        .env("INPUT_BRANCH_MODE", "create")
        .env("INPUT_TAG", "v0.1.0")
        .env("GITHUB_OUTPUT", &output_path)
        .status()
        .expect("run autocommit");
    assert_eq!(status.code(), Some(exit_codes::OK));

    let outputs = fs::read_to_string(&output_path).expect("read outputs");
    assert!(outputs.contains("committed=true"), "outputs: {outputs}");
    assert!(outputs.contains("commit_sha="), "outputs: {outputs}");
    assert!(outputs.contains("tagged=true"), "outputs: {outputs}");
    assert!(outputs.contains("pushed=true"), "outputs: {outputs}");

    // The commit, branch, and tag all landed on the remote.
    let origin = root.join("origin.git");
    let tags = git(&origin, root, &["tag", "-l"]);
    assert!(tags.contains("v0.1.0"));
    let head = git(&origin, root, &["rev-parse", "refs/heads/auto"]);
    assert!(!head.trim().is_empty());

    let author = git(&work, root, &["log", "-1", "--format=%an <%ae>"]);
    assert_eq!(author.trim(), "Auto Author <author@example.com>");
}

#[test]
fn clean_tree_rerun_is_a_no_op_success() {
    let temp = tempfile::tempdir().expect("tempdir");
    let root = temp.path();
    git(root, root, &["init", "--bare", "origin.git"]);
    git(root, root, &["clone", "origin.git", "work"]);
    let work = root.join("work");
    fs::write(work.join("hello.txt"), "hello\n").expect("write file");

    let first_outputs = root.join("outputs-1.txt");
    let status = autocommit_cmd(&work, root)
        .env("INPUT_COMMITTER_NAME", "Auto Committer")
        .env("INPUT_COMMITTER_EMAIL", "committer@example.com")
        .env("INPUT_BRANCH", "auto")
        .env("INPUT_BRANCH_MODE", "create")
        .env("GITHUB_OUTPUT", &first_outputs)
        .status()
        .expect("run autocommit");
    assert_eq!(status.code(), Some(exit_codes::OK));

    // Nothing changed since the first run: no commit, no push, still OK.
    let second_outputs = root.join("outputs-2.txt");
    let status = autocommit_cmd(&work, root)
        .env("INPUT_COMMITTER_NAME", "Auto Committer")
        .env("INPUT_COMMITTER_EMAIL", "committer@example.com")
        .env("INPUT_BRANCH", "auto")
        .env("GITHUB_OUTPUT", &second_outputs)
        .status()
        .expect("run autocommit");
    assert_eq!(status.code(), Some(exit_codes::OK));

    let outputs = fs::read_to_string(&second_outputs).expect("read outputs");
    assert!(outputs.contains("committed=false"), "outputs: {outputs}");
    assert!(outputs.contains("pushed=false"), "outputs: {outputs}");
    assert!(outputs.contains("tagged=false"), "outputs: {outputs}");
    assert!(!outputs.contains("commit_sha="), "outputs: {outputs}");
}
