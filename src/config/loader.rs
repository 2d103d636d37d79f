//! Configuration loader
//!
//! Loading pipeline:
//! 1. Size check against [`ConfigLimits`]
//! 2. YAML parse + typed deserialization
//! 3. Validation (all issues collected)
//! 4. Freeze with `Arc`

use std::path::Path;
use std::sync::Arc;

use crate::config::schema::RootConfig;
use crate::config::validation::Validator;
use crate::error::{ConfigError, ValidationIssue};

// ============================================================================
// Limits
// ============================================================================

/// Limits applied while loading configuration files.
#[derive(Debug, Clone)]
pub struct ConfigLimits {
    /// Maximum number of configured event types.
    pub max_events: usize,

    /// Maximum configuration file size in bytes.
    pub max_config_size: u64,
}

impl Default for ConfigLimits {
    fn default() -> Self {
        Self {
            max_events: env_or("ARENALOOP_MAX_EVENTS", 64),
            max_config_size: env_or("ARENALOOP_MAX_CONFIG_SIZE", 1024 * 1024),
        }
    }
}

/// Reads a numeric limit from the environment, falling back to `default`
/// when unset or unparseable.
fn env_or<T: std::str::FromStr>(var: &str, default: T) -> T {
    std::env::var(var)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

// ============================================================================
// Loading
// ============================================================================

/// Result of loading a configuration file.
#[derive(Debug)]
pub struct LoadResult {
    /// The loaded and validated configuration.
    pub config: Arc<RootConfig>,

    /// Warnings encountered during validation.
    pub warnings: Vec<ValidationIssue>,
}

/// Loads, parses, and validates a configuration file.
///
/// # Errors
///
/// Returns [`ConfigError`] when the file is missing, unreadable, over the
/// size limit, not valid YAML, or fails semantic validation.
pub fn load_file(path: &Path, limits: &ConfigLimits) -> Result<LoadResult, ConfigError> {
    let metadata = std::fs::metadata(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            ConfigError::MissingFile {
                path: path.to_path_buf(),
            }
        } else {
            ConfigError::Read {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    if metadata.len() > limits.max_config_size {
        return Err(ConfigError::TooLarge {
            path: path.to_path_buf(),
            size: metadata.len(),
            limit: limits.max_config_size,
        });
    }

    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let config: RootConfig =
        serde_yaml::from_str(&raw).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    let result = Validator::new().validate(&config, limits);
    if result.has_errors() {
        return Err(ConfigError::ValidationError {
            path: path.display().to_string(),
            errors: result.errors,
        });
    }

    Ok(LoadResult {
        config: Arc::new(config),
        warnings: result.warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    const VALID: &str = "\
engine:
  voting_enabled: true
  voting_minutes: 5
  registration_minutes: 10
  interval_minutes: 60
  min_participants: 2
  global_message: true
events:
  - id: deathmatch
    name: Team Deathmatch
  - id: ctf
    name: Capture the Flag
";

    #[test]
    fn test_load_valid_config() {
        let file = write_config(VALID);
        let result = load_file(file.path(), &ConfigLimits::default()).unwrap();
        assert!(result.config.engine.voting_enabled);
        assert_eq!(result.config.events.len(), 2);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_missing_file() {
        let err = load_file(Path::new("/nonexistent/engine.yaml"), &ConfigLimits::default())
            .unwrap_err();
        assert!(matches!(err, ConfigError::MissingFile { .. }));
    }

    #[test]
    fn test_malformed_yaml_is_parse_error() {
        let file = write_config("engine: [unclosed");
        let err = load_file(file.path(), &ConfigLimits::default()).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
    }

    #[test]
    fn test_no_events_is_validation_error() {
        let file = write_config("engine: {}\nevents: []\n");
        let err = load_file(file.path(), &ConfigLimits::default()).unwrap_err();
        match err {
            ConfigError::ValidationError { errors, .. } => {
                assert_eq!(errors[0].path, "events");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_oversized_file_rejected() {
        let file = write_config(VALID);
        let limits = ConfigLimits {
            max_config_size: 16,
            ..ConfigLimits::default()
        };
        let err = load_file(file.path(), &limits).unwrap_err();
        assert!(matches!(err, ConfigError::TooLarge { .. }));
    }

    #[test]
    fn test_warnings_surface_without_failing() {
        let file = write_config(
            "engine:\n  min_participants: 0\nevents:\n  - id: dm\n    name: Deathmatch\n",
        );
        let result = load_file(file.path(), &ConfigLimits::default()).unwrap();
        assert_eq!(result.warnings.len(), 1);
    }

    #[test]
    fn test_env_or_falls_back_when_unset() {
        assert_eq!(env_or::<usize>("ARENALOOP_TEST_UNSET_LIMIT", 7), 7);
    }
}
