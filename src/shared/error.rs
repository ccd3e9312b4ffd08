use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the CLI application.
///
/// These codes allow CI systems to distinguish between bad invocations
/// and transformations that ran but failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success - every requested target was transformed
    Success = 0,
    /// Invalid command-line arguments (clap parsing errors)
    InvalidArguments = 2,
    /// At least one target failed (model error, I/O error, environment error, etc.)
    TransformationFailed = 3,
}

impl ExitCode {
    /// Convert to i32 for use with std::process::exit
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitCode::Success => write!(f, "Success (0)"),
            ExitCode::InvalidArguments => write!(f, "Invalid Arguments (2)"),
            ExitCode::TransformationFailed => write!(f, "Transformation Failed (3)"),
        }
    }
}

/// Errors raised while reading, resolving and transforming a deployment model.
///
/// Model-integrity variants describe the offending entity; I/O variants carry
/// the path that failed. Programming errors (`LifecycleOrder`,
/// `UnsupportedVariant`) indicate a defect in the driving code.
#[derive(Debug, Error)]
pub enum TransformError {
    #[error("Failed to parse deployment model: {path}\nDetails: {details}\n\n💡 Hint: Please verify that the model file is valid YAML")]
    ModelParse { path: PathBuf, details: String },

    #[error("Instance '{entity}' has no resolvable type{}\n\n💡 Hint: Declare the type under component_types or relation_types", .type_name.as_ref().map(|t| format!(" ('{}')", t)).unwrap_or_default())]
    UnresolvableType {
        entity: String,
        type_name: Option<String>,
    },

    #[error("Relation '{relation}' of '{source_component}' points to unknown component '{target}'")]
    UnknownEntity {
        source_component: String,
        relation: String,
        target: String,
    },

    #[error("Inheritance chain of type '{type_name}' exceeds {limit} levels")]
    InheritanceTooDeep { type_name: String, limit: usize },

    #[error("Hosted-on cycle detected at component '{component}'\n\n💡 Hint: A component must be hosted on a chain that ends at a compute node")]
    HostingCycle { component: String },

    #[error("Component '{component}' declares more than one hosted_on relation ({hosts:?})")]
    MultipleHosts {
        component: String,
        hosts: Vec<String>,
    },

    #[error("Component '{component}' is not hosted on a compute node")]
    MissingHost { component: String },

    #[error("Property '{attribute}' of '{entity}' cannot be read as {expected} (value: '{found}')")]
    TypeMismatch {
        entity: String,
        attribute: String,
        expected: &'static str,
        found: String,
    },

    #[error("Environment check for target '{target}' failed: {reason}\n\n💡 Hint: Install the missing tool or disable tool verification")]
    Environment { target: String, reason: String },

    #[error("Model check for target '{target}' failed: {reason}")]
    ModelCheck { target: String, reason: String },

    #[error("Failed to read file: {path}\nDetails: {details}\n\n💡 Hint: Please verify that the artifact exists relative to the source directory")]
    FileRead { path: PathBuf, details: String },

    #[error("Failed to write to file: {path}\nDetails: {details}\n\n💡 Hint: Please verify that the output directory is writable")]
    FileWrite { path: PathBuf, details: String },

    #[error("Security violation: {path}\nReason: {reason}")]
    PathViolation { path: PathBuf, reason: String },

    #[error("Lifecycle phase '{requested}' invoked out of order (expected '{expected}')")]
    LifecycleOrder {
        expected: &'static str,
        requested: &'static str,
    },

    #[error("Target '{target}' does not support {variant} '{entity}'")]
    UnsupportedVariant {
        target: String,
        variant: String,
        entity: String,
    },

    #[error("Unknown target '{name}'\n\n💡 Hint: Available targets: {available}")]
    UnknownTarget { name: String, available: String },

    #[error("Failed to serialize {format} output\nDetails: {details}")]
    Serialization { format: String, details: String },

    /// Validation error for builder patterns
    #[error("Validation error: {message}")]
    Validation { message: String },
}
