//! The `validate` command
//!
//! Validates configuration files without starting the engine. All files
//! are checked and all issues printed before the command fails.

use crate::cli::args::ValidateArgs;
use crate::config::{ConfigLimits, loader};
use crate::error::{ArenaLoopError, ConfigError};

/// Validates each configuration file, printing every issue found.
///
/// # Errors
///
/// Returns the last failure after all files have been checked, so a
/// single run reports everything.
pub fn run(args: &ValidateArgs) -> Result<(), ArenaLoopError> {
    let limits = ConfigLimits::default();
    let mut failure: Option<ConfigError> = None;

    for file in &args.files {
        match loader::load_file(file, &limits) {
            Ok(result) => {
                for warning in &result.warnings {
                    println!("{}: {warning}", file.display());
                }
                println!("{}: ok", file.display());
            }
            Err(error) => {
                if let ConfigError::ValidationError { errors, .. } = &error {
                    for issue in errors {
                        println!("{}: {issue}", file.display());
                    }
                } else {
                    println!("{}: {error}", file.display());
                }
                failure = Some(error);
            }
        }
    }

    failure.map_or(Ok(()), |error| Err(error.into()))
}
