//! Schema tree definitions.
//!
//! A CLI is described by a tree of [`CommandNode`]s. Each node declares its
//! own [`ParameterSpec`]s, optional child commands, an optional default
//! child and an override map that replaces ancestor defaults whenever the
//! resolved path runs through the node.
//!
//! # Examples
//!
//! ```
//! use elegant_cli_core::{CommandNode, ParameterSpec};
//!
//! let root = CommandNode::new("bundler")
//!     .with_param(ParameterSpec::positional("target_dir").with_default("."))
//!     .with_default_child("check")
//!     .with_child(
//!         CommandNode::new("check")
//!             .with_param(ParameterSpec::flag("-a").with_type("bool").with_default(false)),
//!     )
//!     .with_child(
//!         CommandNode::new("build")
//!             .with_override("target_dir", "./src")
//!             .with_param(ParameterSpec::flag("--minify").with_type("bool")),
//!     );
//!
//! assert_eq!(root.child_names(), vec!["check", "build"]);
//! assert_eq!(root.child("build").unwrap().params[0].identifier(), "minify");
//! ```

use serde::{Deserialize, Serialize};

use crate::registry::DEFAULT_TYPE_TAG;
use crate::value::Literal;

/// Character that marks a flag token.
pub const FLAG_PREFIX: char = '-';

/// Flags reserved for help routing.
pub const HELP_FLAGS: &[&str] = &["-h", "--help"];

/// Derives the public identifier for a parameter name or override key.
///
/// Leading prefix characters are stripped and internal `-` separators become
/// underscores.
///
/// # Examples
///
/// ```
/// use elegant_cli_core::identifier_for;
///
/// assert_eq!(identifier_for("--dry-run"), "dry_run");
/// assert_eq!(identifier_for("-o"), "o");
/// assert_eq!(identifier_for("target_dir"), "target_dir");
/// ```
pub fn identifier_for(name: &str) -> String {
    name.trim_start_matches(FLAG_PREFIX).replace(FLAG_PREFIX, "_")
}

/// Returns `true` if `token` looks like a flag rather than a value.
///
/// A lone `-` and negative numbers are values.
pub fn is_flag_shaped(token: &str) -> bool {
    token.len() > 1 && token.starts_with(FLAG_PREFIX) && token.parse::<f64>().is_err()
}

/// One declared parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterSpec {
    /// Name as written: `target_dir` (positional), `-o` or `--dry-run` (flag).
    pub name: String,
    /// Type tag resolved through the [`TypeRegistry`](crate::TypeRegistry).
    pub type_tag: String,
    /// Default literal, if any.
    pub default: Option<Literal>,
    /// Only honored for `list` flags: the flag must end up with values.
    pub required: bool,
    /// Description shown by help renderers.
    pub help: Option<String>,
}

impl ParameterSpec {
    fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            type_tag: DEFAULT_TYPE_TAG.to_string(),
            default: None,
            required: false,
            help: None,
        }
    }

    /// Creates a positional parameter. Positionals without a default are
    /// required.
    pub fn positional(name: &str) -> Self {
        Self::named(name)
    }

    /// Creates a flag parameter; `name` carries its prefix (`-o`, `--out`).
    pub fn flag(name: &str) -> Self {
        Self::named(name)
    }

    pub fn with_type(mut self, tag: &str) -> Self {
        self.type_tag = tag.to_string();
        self
    }

    pub fn with_default(mut self, default: impl Into<Literal>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_help(mut self, help: &str) -> Self {
        self.help = Some(help.to_string());
        self
    }

    pub fn is_flag(&self) -> bool {
        self.name.starts_with(FLAG_PREFIX)
    }

    pub fn is_positional(&self) -> bool {
        !self.is_flag()
    }

    /// Public identifier under which the value appears in a
    /// [`Namespace`](crate::Namespace).
    pub fn identifier(&self) -> String {
        identifier_for(&self.name)
    }

    /// Checks if `token` is this flag's marker.
    pub fn matches(&self, token: &str) -> bool {
        self.is_flag() && self.name == token
    }
}

/// One level of the command tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommandNode {
    /// Command word that selects this node (the program name for the root).
    pub name: String,
    /// One-line description.
    pub help: Option<String>,
    /// Parameters declared at this level, in declaration order.
    pub params: Vec<ParameterSpec>,
    /// Child commands, in declaration order.
    pub children: Vec<CommandNode>,
    /// Child entered when no command word matches.
    pub default_child: Option<String>,
    /// Default replacements for ancestor-or-self parameters, keyed by
    /// identifier (or flag spelling).
    pub overrides: Vec<(String, Literal)>,
}

impl CommandNode {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    pub fn with_help(mut self, help: &str) -> Self {
        self.help = Some(help.to_string());
        self
    }

    pub fn with_param(mut self, param: ParameterSpec) -> Self {
        self.params.push(param);
        self
    }

    pub fn with_child(mut self, child: CommandNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_default_child(mut self, name: &str) -> Self {
        self.default_child = Some(name.to_string());
        self
    }

    /// Adds an override. `key` may be an identifier (`target_dir`) or a flag
    /// spelling (`-o`); both normalize through [`identifier_for`].
    pub fn with_override(mut self, key: &str, value: impl Into<Literal>) -> Self {
        self.overrides.push((key.to_string(), value.into()));
        self
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub fn child(&self, name: &str) -> Option<&CommandNode> {
        self.children.iter().find(|c| c.name == name)
    }

    pub fn child_names(&self) -> Vec<&str> {
        self.children.iter().map(|c| c.name.as_str()).collect()
    }

    /// The default child node, if one is configured and exists.
    pub fn default_child_node(&self) -> Option<&CommandNode> {
        self.default_child.as_deref().and_then(|name| self.child(name))
    }

    /// Finds an own parameter by public identifier.
    pub fn param(&self, identifier: &str) -> Option<&ParameterSpec> {
        self.params.iter().find(|p| p.identifier() == identifier)
    }

    /// Finds an own flag by its literal marker.
    pub fn find_flag(&self, token: &str) -> Option<&ParameterSpec> {
        self.params.iter().find(|p| p.matches(token))
    }

    /// Overrides with keys normalized to identifiers.
    pub fn normalized_overrides(&self) -> impl Iterator<Item = (String, &Literal)> {
        self.overrides
            .iter()
            .map(|(key, value)| (identifier_for(key), value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_derivation() {
        assert_eq!(ParameterSpec::flag("--dry-run").identifier(), "dry_run");
        assert_eq!(ParameterSpec::flag("-a").identifier(), "a");
        assert_eq!(ParameterSpec::positional("out-dir").identifier(), "out_dir");
    }

    #[test]
    fn test_flag_shape() {
        assert!(is_flag_shaped("-a"));
        assert!(is_flag_shaped("--minify"));
        assert!(!is_flag_shaped("-"));
        assert!(!is_flag_shaped("-5"));
        assert!(!is_flag_shaped("-0.5"));
        assert!(!is_flag_shaped("build"));
    }

    #[test]
    fn test_parameter_kind() {
        let flag = ParameterSpec::flag("--minify").with_type("bool");
        assert!(flag.is_flag());
        assert!(flag.matches("--minify"));
        assert!(!flag.matches("minify"));

        let positional = ParameterSpec::positional("target_dir");
        assert!(positional.is_positional());
        assert!(!positional.matches("target_dir"));
        assert_eq!(positional.type_tag, "str");
    }

    #[test]
    fn test_command_node_lookup() {
        let root = CommandNode::new("app")
            .with_child(CommandNode::new("scan"))
            .with_child(CommandNode::new("by_config").with_override("-o", "x.md"))
            .with_default_child("by_config");

        assert!(!root.is_leaf());
        assert_eq!(root.default_child_node().unwrap().name, "by_config");
        assert!(root.child("missing").is_none());

        let overrides: Vec<_> = root.child("by_config").unwrap().normalized_overrides().collect();
        assert_eq!(overrides[0].0, "o");
    }

    #[test]
    fn test_param_lookup_by_identifier() {
        let node = CommandNode::new("app")
            .with_param(ParameterSpec::flag("--dry-run").with_type("bool"))
            .with_param(ParameterSpec::positional("target_dir"));

        assert_eq!(node.param("dry_run").unwrap().name, "--dry-run");
        assert!(node.param("target_dir").unwrap().is_positional());
        assert!(node.param("--dry-run").is_none());
        assert!(node.find_flag("--dry-run").is_some());
    }
}
