//! Run outputs reported back to the invoking platform.
//!
//! The four named outputs are a log of what actually happened, not an
//! all-or-nothing transaction: each defaults to false/absent and flips only
//! on the corresponding successful operation, so they are emitted even when
//! the run fails partway.

use std::fs::OpenOptions;
use std::io::Write;

use anyhow::{Context, Result};
use tracing::info;

/// Environment variable naming the output file, one `name=value` per line.
pub const OUTPUT_FILE_ENV: &str = "GITHUB_OUTPUT";

/// What the run actually did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunResult {
    pub committed: bool,
    pub commit_sha: Option<String>,
    pub tagged: bool,
    pub pushed: bool,
}

impl RunResult {
    /// Render the output lines. `commit_sha` is only present when set.
    fn lines(&self) -> Vec<String> {
        let mut lines = vec![format!("committed={}", self.committed)];
        if let Some(sha) = &self.commit_sha {
            lines.push(format!("commit_sha={sha}"));
        }
        lines.push(format!("tagged={}", self.tagged));
        lines.push(format!("pushed={}", self.pushed));
        lines
    }
}

/// Emit the outputs: append to the platform output file when the environment
/// names one, otherwise log each line.
pub fn emit(result: &RunResult) -> Result<()> {
    let lines = result.lines();
    for line in &lines {
        info!(output = %line, "setting output");
    }
    if let Ok(path) = std::env::var(OUTPUT_FILE_ENV) {
        if !path.trim().is_empty() {
            let mut file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .with_context(|| format!("open output file {path}"))?;
            writeln!(file, "{}", lines.join("\n")).with_context(|| format!("write {path}"))?;
        }
    }
    Ok(())
}
