//! The `completions` command

use clap::CommandFactory;

use crate::cli::args::{Cli, CompletionsArgs};

/// Writes a completion script for the requested shell to stdout.
pub fn run(args: &CompletionsArgs) {
    clap_complete::generate(
        args.shell,
        &mut Cli::command(),
        "arenaloop",
        &mut std::io::stdout(),
    );
}
