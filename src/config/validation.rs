//! Configuration validation
//!
//! Semantic validation on the fully deserialized [`RootConfig`].
//! Validation collects ALL issues (it does not stop at the first) so a
//! single `arenaloop validate` run reports everything at once.

use std::collections::HashSet;

use crate::config::loader::ConfigLimits;
use crate::config::schema::RootConfig;
use crate::error::{Severity, ValidationIssue};

// ============================================================================
// Public API
// ============================================================================

/// Result of configuration validation.
#[derive(Debug, Default)]
pub struct ValidationResult {
    /// Validation errors (prevent loading).
    pub errors: Vec<ValidationIssue>,

    /// Validation warnings (informational).
    pub warnings: Vec<ValidationIssue>,
}

impl ValidationResult {
    /// Returns `true` if there are any errors.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Returns `true` if validation passed (no errors).
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Configuration validator.
#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<ValidationIssue>,
    warnings: Vec<ValidationIssue>,
}

impl Validator {
    /// Creates a new validator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates a configuration and returns the result.
    pub fn validate(&mut self, config: &RootConfig, limits: &ConfigLimits) -> ValidationResult {
        self.errors.clear();
        self.warnings.clear();

        self.validate_engine(config);
        self.validate_events(config, limits);

        ValidationResult {
            errors: std::mem::take(&mut self.errors),
            warnings: std::mem::take(&mut self.warnings),
        }
    }

    fn validate_engine(&mut self, config: &RootConfig) {
        let engine = &config.engine;

        if engine.voting_enabled && engine.voting_minutes == 0 {
            self.warn(
                "engine.voting_minutes",
                "voting is enabled but lasts zero minutes; voting ends on its first tick",
            );
        }

        if engine.registration_minutes == 0 {
            self.warn(
                "engine.registration_minutes",
                "registration lasts zero minutes; players cannot sign up",
            );
        }

        if engine.interval_minutes == 0 {
            self.warn(
                "engine.interval_minutes",
                "interval of zero starts the next cycle immediately",
            );
        }

        if engine.min_participants == 0 {
            self.warn(
                "engine.min_participants",
                "minimum of zero never aborts an empty cycle",
            );
        }
    }

    fn validate_events(&mut self, config: &RootConfig, limits: &ConfigLimits) {
        if config.events.is_empty() {
            self.error("events", "no event types configured");
            return;
        }

        if config.events.len() > limits.max_events {
            self.error(
                "events",
                format!(
                    "{} event types exceeds the limit of {}",
                    config.events.len(),
                    limits.max_events
                ),
            );
        }

        let mut seen = HashSet::new();
        for (index, event) in config.events.iter().enumerate() {
            let path = format!("events[{index}]");

            if event.id.trim().is_empty() {
                self.error(format!("{path}.id"), "event id must not be empty");
            } else if !seen.insert(event.id.as_str()) {
                self.error(
                    format!("{path}.id"),
                    format!("duplicate event id '{}'", event.id),
                );
            }

            if event.name.trim().is_empty() {
                self.error(format!("{path}.name"), "event name must not be empty");
            }

            if let Some(floor) = event.min_participants {
                if floor < config.engine.min_participants {
                    self.warn(
                        format!("{path}.min_participants"),
                        format!(
                            "per-event floor {floor} is below the global minimum {}; the global minimum gates registration first",
                            config.engine.min_participants
                        ),
                    );
                }
            }
        }
    }

    fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ValidationIssue {
            path: path.into(),
            message: message.into(),
            severity: Severity::Error,
        });
    }

    fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ValidationIssue {
            path: path.into(),
            message: message.into(),
            severity: Severity::Warning,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::{EngineConfig, EventTypeConfig};

    fn config_with_events(events: Vec<EventTypeConfig>) -> RootConfig {
        RootConfig {
            engine: EngineConfig::default(),
            events,
        }
    }

    fn event(id: &str, name: &str) -> EventTypeConfig {
        EventTypeConfig {
            id: id.to_string(),
            name: name.to_string(),
            min_participants: None,
        }
    }

    #[test]
    fn test_valid_config_passes() {
        let config = config_with_events(vec![event("dm", "Deathmatch")]);
        let result = Validator::new().validate(&config, &ConfigLimits::default());
        assert!(result.is_valid());
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_empty_events_is_error() {
        let config = config_with_events(vec![]);
        let result = Validator::new().validate(&config, &ConfigLimits::default());
        assert!(result.has_errors());
        assert_eq!(result.errors[0].path, "events");
    }

    #[test]
    fn test_duplicate_event_ids_are_errors() {
        let config = config_with_events(vec![
            event("dm", "Deathmatch"),
            event("dm", "Deathmatch Again"),
        ]);
        let result = Validator::new().validate(&config, &ConfigLimits::default());
        assert!(result.has_errors());
        assert!(result.errors[0].message.contains("duplicate"));
    }

    #[test]
    fn test_empty_id_and_name_are_errors() {
        let config = config_with_events(vec![event("", "")]);
        let result = Validator::new().validate(&config, &ConfigLimits::default());
        assert_eq!(result.errors.len(), 2);
    }

    #[test]
    fn test_zero_voting_minutes_warns_when_enabled() {
        let mut config = config_with_events(vec![event("dm", "Deathmatch")]);
        config.engine.voting_enabled = true;
        config.engine.voting_minutes = 0;
        let result = Validator::new().validate(&config, &ConfigLimits::default());
        assert!(result.is_valid());
        assert!(
            result
                .warnings
                .iter()
                .any(|w| w.path == "engine.voting_minutes")
        );
    }

    #[test]
    fn test_zero_voting_minutes_silent_when_disabled() {
        let mut config = config_with_events(vec![event("dm", "Deathmatch")]);
        config.engine.voting_enabled = false;
        config.engine.voting_minutes = 0;
        let result = Validator::new().validate(&config, &ConfigLimits::default());
        assert!(
            !result
                .warnings
                .iter()
                .any(|w| w.path == "engine.voting_minutes")
        );
    }

    #[test]
    fn test_zero_min_participants_warns() {
        let mut config = config_with_events(vec![event("dm", "Deathmatch")]);
        config.engine.min_participants = 0;
        let result = Validator::new().validate(&config, &ConfigLimits::default());
        assert!(
            result
                .warnings
                .iter()
                .any(|w| w.path == "engine.min_participants")
        );
    }

    #[test]
    fn test_per_event_floor_below_global_warns() {
        let mut config = config_with_events(vec![EventTypeConfig {
            id: "duel".to_string(),
            name: "Duel".to_string(),
            min_participants: Some(1),
        }]);
        config.engine.min_participants = 4;
        let result = Validator::new().validate(&config, &ConfigLimits::default());
        assert!(result.is_valid());
        assert_eq!(result.warnings.len(), 1);
    }

    #[test]
    fn test_too_many_events_is_error() {
        let events = (0..5)
            .map(|i| event(&format!("e{i}"), &format!("Event {i}")))
            .collect();
        let config = config_with_events(events);
        let limits = ConfigLimits {
            max_events: 3,
            ..ConfigLimits::default()
        };
        let result = Validator::new().validate(&config, &limits);
        assert!(result.has_errors());
    }

    #[test]
    fn test_all_issues_collected_not_first_only() {
        let mut config = config_with_events(vec![event("", ""), event("dm", "DM"), event("dm", "DM2")]);
        config.engine.min_participants = 0;
        let result = Validator::new().validate(&config, &ConfigLimits::default());
        // empty id, empty name, duplicate id
        assert_eq!(result.errors.len(), 3);
        assert_eq!(result.warnings.len(), 1);
    }
}
