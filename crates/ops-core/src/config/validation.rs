//! Pluggable configuration validators.
//!
//! Validators are named and run in registration order against the same tree
//! snapshot. Every failure is collected; nothing short-circuits, so one report
//! lists every violated rule as `"[name] message"`.

use serde_json::Value;
use std::fmt;

use crate::config::errors::ConfigError;
use crate::config::types::{ConfigTree, OpsConfig};

/// Name of the built-in validator requiring the core sections.
pub const REQUIRED_SECTIONS_VALIDATOR: &str = "required-sections";

/// Name of the built-in validator checking known keys against the typed schema.
pub const SCHEMA_VALIDATOR: &str = "schema";

/// Sections every configuration must contain as trees.
pub const REQUIRED_SECTIONS: [&str; 3] = ["monitor", "logs", "deploy"];

/// `Err` carries one human-readable message per violation.
pub type ValidationResult = Result<(), Vec<String>>;

/// A consistency rule over a whole configuration tree.
///
/// Closures of the shape `|tree: &ConfigTree| -> ValidationResult` implement
/// this trait directly.
pub trait Validator: Send + Sync {
    fn validate(&self, tree: &ConfigTree) -> ValidationResult;
}

impl<F> Validator for F
where
    F: Fn(&ConfigTree) -> ValidationResult + Send + Sync,
{
    fn validate(&self, tree: &ConfigTree) -> ValidationResult {
        self(tree)
    }
}

/// Outcome of running every registered validator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    /// Failures in registration order, formatted `"[name] message"`.
    pub errors: Vec<String>,
}

impl ValidationReport {
    pub fn passed(&self) -> bool {
        self.errors.is_empty()
    }

    /// Convert into a `ConfigError::ValidationFailed` naming `operation`.
    pub fn into_result(self, operation: &str) -> Result<(), ConfigError> {
        if self.passed() {
            Ok(())
        } else {
            Err(ConfigError::ValidationFailed {
                operation: operation.to_string(),
                errors: self.errors,
            })
        }
    }
}

struct RegisteredValidator {
    name: String,
    validator: Box<dyn Validator>,
}

/// Ordered set of named validators.
#[derive(Default)]
pub struct ValidatorRegistry {
    validators: Vec<RegisteredValidator>,
}

impl fmt::Debug for ValidatorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidatorRegistry")
            .field("validators", &self.names())
            .finish()
    }
}

impl ValidatorRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the built-in `required-sections` and `schema` validators.
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        registry.register(REQUIRED_SECTIONS_VALIDATOR, RequiredSections);
        registry.register(SCHEMA_VALIDATOR, SchemaValidator);
        registry
    }

    /// Store `validator` under `name`.
    ///
    /// Re-registering a name replaces the validator but keeps its position.
    pub fn register(&mut self, name: impl Into<String>, validator: impl Validator + 'static) {
        let name = name.into();
        let validator: Box<dyn Validator> = Box::new(validator);

        if let Some(existing) = self.validators.iter_mut().find(|v| v.name == name) {
            tracing::debug!(event = "core.config.validator_replaced", name = %name);
            existing.validator = validator;
            return;
        }

        tracing::debug!(event = "core.config.validator_registered", name = %name);
        self.validators.push(RegisteredValidator { name, validator });
    }

    pub fn names(&self) -> Vec<&str> {
        self.validators.iter().map(|v| v.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.validators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }

    /// Run every validator against `tree` and collect all failures.
    pub fn run_all(&self, tree: &ConfigTree) -> ValidationReport {
        let mut errors = Vec::new();

        for registered in &self.validators {
            if let Err(messages) = registered.validator.validate(tree) {
                if messages.is_empty() {
                    errors.push(format!("[{}] validation failed", registered.name));
                }
                for message in messages {
                    errors.push(format!("[{}] {}", registered.name, message));
                }
            }
        }

        if !errors.is_empty() {
            tracing::warn!(
                event = "core.config.validation_failed",
                error_count = errors.len(),
                errors = ?errors
            );
        }

        ValidationReport { errors }
    }
}

/// Requires `monitor`, `logs` and `deploy` to be present as trees.
pub struct RequiredSections;

impl Validator for RequiredSections {
    fn validate(&self, tree: &ConfigTree) -> ValidationResult {
        let errors: Vec<String> = REQUIRED_SECTIONS
            .iter()
            .filter_map(|section| match tree.get(*section) {
                Some(Value::Object(_)) => None,
                Some(_) => Some(format!("Section '{}' must be an object", section)),
                None => Some(format!("Missing required section '{}'", section)),
            })
            .collect();

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

/// Checks known keys against [`OpsConfig`] and a few range rules.
pub struct SchemaValidator;

impl Validator for SchemaValidator {
    fn validate(&self, tree: &ConfigTree) -> ValidationResult {
        let config = OpsConfig::from_tree(tree).map_err(|e| vec![e.to_string()])?;

        let mut errors = Vec::new();
        if config.monitor.refresh_interval == 0 {
            errors.push("monitor.refreshInterval must be greater than 0".to_string());
        }
        if config.monitor.max_processes == 0 {
            errors.push("monitor.maxProcesses must be at least 1".to_string());
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}
