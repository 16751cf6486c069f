//! Tag creation from configured arguments.

use anyhow::{Context, Result};
use tracing::info;

use crate::git::{Git, GitRunner};

/// Create a tag with the configured arguments.
pub fn create_tag<R: GitRunner>(git: &Git<R>, args: &[String]) -> Result<()> {
    git.tag(args).context("create tag")?;
    info!(args = %args.join(" "), "created tag");
    Ok(())
}

/// The tag name a conflict recovery should act on: the first token of the
/// tag-creation arguments that is not a flag.
pub fn tag_name(args: &[String]) -> Option<&str> {
    args.iter()
        .find(|token| !token.starts_with('-'))
        .map(String::as_str)
}
