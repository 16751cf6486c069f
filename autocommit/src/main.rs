//! Commit, tag, and push working-tree changes in one unattended run.
//!
//! Inputs arrive as `INPUT_*` environment variables; outputs land in the
//! file named by `GITHUB_OUTPUT` (or the log). The process exits non-zero
//! when the run fails, and outputs always reflect what actually happened
//! before any failure.

use std::path::PathBuf;

use clap::Parser;

use autocommit::config::Inputs;
use autocommit::git::{Git, GitCli};
use autocommit::{exit_codes, logging, outputs, pipeline};

#[derive(Parser)]
#[command(
    name = "autocommit",
    version,
    about = "Commit, tag, and push working-tree changes unattended"
)]
struct Cli {
    /// Repository working directory (overrides INPUT_CWD).
    #[arg(long)]
    cwd: Option<PathBuf>,
}

fn main() {
    logging::init();
    let cli = Cli::parse();
    std::process::exit(run(cli));
}

fn run(cli: Cli) -> i32 {
    let inputs = match Inputs::from_env() {
        Ok(inputs) => inputs,
        Err(err) => {
            eprintln!("{err:#}");
            return exit_codes::CONFIG;
        }
    };
    let cwd = cli.cwd.unwrap_or_else(|| inputs.cwd.clone());
    let git = Git::new(GitCli::new(cwd));

    let mut result = outputs::RunResult::default();
    let outcome = pipeline::run(&git, &inputs, &mut result);

    // Outputs are a log of what happened; emit them even on failure.
    if let Err(err) = outputs::emit(&result) {
        eprintln!("{err:#}");
    }

    match outcome {
        Ok(()) => exit_codes::OK,
        Err(err) => {
            eprintln!("{err:#}");
            exit_codes::FAILED
        }
    }
}
