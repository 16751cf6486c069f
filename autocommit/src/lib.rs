//! Unattended commit-tag-push automation for a repository checkout.
//!
//! One invocation stages configured working-tree changes, resolves the
//! target branch, commits, optionally tags, optionally pushes, and reports
//! what happened through four named outputs. The crate enforces a strict
//! seam between orchestration and the external tool:
//!
//! - **[`git`]**: the only module that talks to the `git` binary. Raw
//!   failure messages are classified into typed errors here and nowhere
//!   else.
//! - **[`pipeline`]** and the stage modules ([`stage`], [`branch`],
//!   [`commit`], [`tag`], [`push`]): ordered orchestration over the git
//!   seam, generic over [`git::GitRunner`] so tests run against a scripted
//!   runner.

pub mod branch;
pub mod commit;
pub mod config;
pub mod errors;
pub mod exit_codes;
pub mod git;
pub mod logging;
pub mod outputs;
pub mod pipeline;
pub mod push;
pub mod stage;
pub mod tag;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
