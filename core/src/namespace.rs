//! Flat result of a successful resolution.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::LookupError;
use crate::value::Value;

/// Key the command path is serialized under, next to the parameter values.
pub const COMMAND_KEY: &str = "command";

/// Resolved parameter values plus the chosen command path.
///
/// Every parameter declared on the resolved path has an entry, whether it
/// was given on the command line, filled from a default, or left unset (a
/// flag with no token and no default). Parameters of commands that were not
/// chosen never appear.
///
/// # Examples
///
/// ```
/// use elegant_cli_core::*;
///
/// let root = CommandNode::new("app")
///     .with_param(ParameterSpec::flag("--depth").with_type("int").with_default("5"))
///     .with_param(ParameterSpec::flag("--label"));
/// let engine = Engine::new(root).unwrap();
///
/// let ns = engine.resolve(["--label", "x"]).unwrap();
/// assert_eq!(ns.get_int("depth"), Ok(5));
/// assert_eq!(ns.get_str("label"), Ok("x"));
/// assert!(ns.command().is_empty());
/// assert!(matches!(ns.get_bool("depth"), Err(LookupError::WrongType { .. })));
/// assert!(matches!(ns.get("missing"), Err(LookupError::Unknown(_))));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Namespace {
    command: Vec<String>,
    #[serde(flatten)]
    values: BTreeMap<String, Option<Value>>,
}

impl Namespace {
    pub(crate) fn new(command: Vec<String>, values: BTreeMap<String, Option<Value>>) -> Self {
        Self { command, values }
    }

    /// Command names chosen at each level, root first. Empty when the
    /// schema has no sub-commands.
    pub fn command(&self) -> &[String] {
        &self.command
    }

    /// The first-level command, if any.
    pub fn command_name(&self) -> Option<&str> {
        self.command.first().map(String::as_str)
    }

    /// Returns `true` if `identifier` is declared on the resolved path.
    pub fn contains(&self, identifier: &str) -> bool {
        self.values.contains_key(identifier)
    }

    /// Returns the value, or `None` if the parameter is declared but unset.
    pub fn get_opt(&self, identifier: &str) -> Result<Option<&Value>, LookupError> {
        self.values
            .get(identifier)
            .map(Option::as_ref)
            .ok_or_else(|| LookupError::Unknown(identifier.to_string()))
    }

    pub fn get(&self, identifier: &str) -> Result<&Value, LookupError> {
        self.get_opt(identifier)?
            .ok_or_else(|| LookupError::Unset(identifier.to_string()))
    }

    pub fn get_str(&self, identifier: &str) -> Result<&str, LookupError> {
        self.typed(identifier, "str", Value::as_str)
    }

    pub fn get_int(&self, identifier: &str) -> Result<i64, LookupError> {
        self.typed(identifier, "int", Value::as_int)
    }

    /// Float lookup; `int` values are widened.
    pub fn get_float(&self, identifier: &str) -> Result<f64, LookupError> {
        self.typed(identifier, "float", Value::as_float)
    }

    pub fn get_bool(&self, identifier: &str) -> Result<bool, LookupError> {
        self.typed(identifier, "bool", Value::as_bool)
    }

    pub fn get_list(&self, identifier: &str) -> Result<&[String], LookupError> {
        self.typed(identifier, "list", Value::as_list)
    }

    fn typed<'a, T>(
        &'a self,
        identifier: &str,
        expected: &'static str,
        pick: impl FnOnce(&'a Value) -> Option<T>,
    ) -> Result<T, LookupError> {
        let value = self.get(identifier)?;
        pick(value).ok_or_else(|| LookupError::WrongType {
            identifier: identifier.to_string(),
            expected,
            found: value.kind_name(),
        })
    }

    /// Iterates over `(identifier, value)` pairs in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&Value>)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_ref()))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
