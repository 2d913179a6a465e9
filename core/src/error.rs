//! Error types for schema construction and argument resolution.
//!
//! The two classes never mix: [`ConfigurationError`] is raised only while an
//! [`Engine`](crate::Engine) is being built and signals a bug in the schema,
//! while [`UsageError`] is raised only by resolution and signals bad input
//! from the person running the program.

use std::fmt::Write as _;

use thiserror::Error;

/// Exit code hosts are expected to use after reporting a [`UsageError`].
pub const USAGE_EXIT_CODE: i32 = 2;

/// A single structural problem found by schema validation.
///
/// `path` fields are dotted node paths starting at `root`
/// (e.g. `root.scan.deep`).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaDefect {
    /// A parameter references a type tag the registry does not know.
    #[error("Invalid type '{tag}' for parameter '{param}' in {path} (available: {})", .available.join(", "))]
    UnknownType {
        path: String,
        param: String,
        tag: String,
        available: Vec<String>,
    },
    /// `default_child` names a child that does not exist.
    #[error("Default command '{name}' defined in {path} but not found among its sub-commands")]
    MissingDefaultChild { path: String, name: String },
    /// Two parameters on one root-to-leaf path share an identifier.
    #[error("Duplicate parameter '{identifier}' in {path} (already declared in {first})")]
    DuplicateIdentifier {
        path: String,
        identifier: String,
        first: String,
    },
    /// An override key names no parameter of the node or its ancestors.
    #[error("Override '{key}' in {path} does not match any parameter of this command or its parents")]
    UnknownOverride { path: String, key: String },
    /// A parameter name is empty or only a prefix, or a flag name reads as
    /// a value (e.g. `-5` or `-inf`).
    #[error("Invalid parameter name '{name}' in {path}")]
    InvalidName { path: String, name: String },
    /// A parameter claims a flag reserved for help.
    #[error("Parameter '{name}' in {path} is reserved for help")]
    ReservedName { path: String, name: String },
    /// A parameter's identifier collides with the serialized command path.
    #[error("Parameter '{name}' in {path} uses the identifier '{identifier}', which is reserved for the command path")]
    ReservedIdentifier {
        path: String,
        name: String,
        identifier: String,
    },
    /// A child command word is empty or looks like a flag.
    #[error("Invalid sub-command name '{name}' in {path}")]
    InvalidCommandName { path: String, name: String },
    /// Two children of one node share a command word.
    #[error("Duplicate sub-command '{name}' in {path}")]
    DuplicateCommand { path: String, name: String },
    /// A default or override literal does not fit the parameter's type.
    #[error("Invalid default for '{param}' in {path}: {message}")]
    InvalidDefault {
        path: String,
        param: String,
        message: String,
    },
}

/// Aggregated validation failure returned when building an
/// [`Engine`](crate::Engine).
///
/// This is a programmer error: hosts should abort at startup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", describe_defects(.defects))]
pub struct ConfigurationError {
    defects: Vec<SchemaDefect>,
}

impl ConfigurationError {
    pub(crate) fn new(defects: Vec<SchemaDefect>) -> Self {
        Self { defects }
    }

    /// All defects found, in depth-first order.
    pub fn defects(&self) -> &[SchemaDefect] {
        &self.defects
    }
}

fn describe_defects(defects: &[SchemaDefect]) -> String {
    match defects {
        [single] => format!("invalid CLI schema: {single}"),
        defects => {
            let mut out = format!("invalid CLI schema ({} problems):", defects.len());
            for defect in defects {
                let _ = write!(out, "\n  - {defect}");
            }
            out
        }
    }
}

/// Invalid command-line input.
///
/// The message is meant for the person at the terminal; hosts print it to
/// stderr and exit with [`USAGE_EXIT_CODE`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UsageError {
    /// A flag-shaped token matches no flag on the resolved path.
    #[error("unrecognized argument '{flag}' for '{command}'")]
    UnknownFlag { flag: String, command: String },
    /// A command word matches no sub-command and there is no default.
    #[error("invalid choice '{token}' for '{command}' (choose from {})", .choices.join(", "))]
    UnknownCommand {
        token: String,
        command: String,
        choices: Vec<String>,
    },
    /// A sub-command is required but none was given.
    #[error("'{command}' requires a sub-command (choose from {})", .choices.join(", "))]
    MissingCommand {
        command: String,
        choices: Vec<String>,
    },
    /// A flag was given without the value(s) its type needs.
    #[error("argument '{param}' expects {expected}")]
    MissingValue { param: String, expected: String },
    /// A positional without default received no token.
    #[error("missing required argument '{param}'")]
    MissingPositional { param: String },
    /// More positional tokens than positional parameters.
    #[error("unexpected extra arguments: {}", .tokens.join(" "))]
    ExcessPositionals { tokens: Vec<String> },
    /// A token could not be coerced to the parameter's type.
    #[error("argument '{param}': expected {tag}, got '{value}' ({message})")]
    InvalidValue {
        param: String,
        tag: String,
        value: String,
        message: String,
    },
}

impl UsageError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        USAGE_EXIT_CODE
    }
}

/// Failed typed lookup on a [`Namespace`](crate::Namespace).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    /// The identifier is not declared on the resolved path.
    #[error("no parameter '{0}' on the resolved command path")]
    Unknown(String),
    /// The parameter exists but received neither a token nor a default.
    #[error("parameter '{0}' has no value")]
    Unset(String),
    /// The stored value has a different type.
    #[error("parameter '{identifier}' is {found}, not {expected}")]
    WrongType {
        identifier: String,
        expected: &'static str,
        found: &'static str,
    },
}
