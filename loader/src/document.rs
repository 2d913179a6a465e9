//! Declarative schema documents.
//!
//! A document describes one command level:
//!
//! ```yaml
//! help: "Code bundler"
//! args:
//!   target_dir: { type: str, default: ".", help: "Target directory" }
//!   --debug:    { type: bool, default: false }
//! sub_command:
//!   __default__: check
//!   check:
//!     args: { -a: { type: bool, default: false } }
//!   build:
//!     overrides: { target_dir: "./src" }
//!     args: { --minify: { type: bool } }
//! ```
//!
//! Keys under `args`, `sub_command` and `overrides` keep document order, which
//! is the order positionals bind in and the order help lists commands in.
//! The raw maps are read as [`serde_yaml::Mapping`], which is insertion
//! ordered for both JSON and YAML input.

use elegant_cli_core::{CommandNode, DEFAULT_TYPE_TAG, Literal, ParameterSpec};
use serde::Deserialize;
use serde_yaml::{Mapping, Value as YamlValue};

/// Key under `sub_command` naming the default child.
pub const DEFAULT_COMMAND_KEY: &str = "__default__";

/// One entry under `args`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ArgDocument {
    /// Type tag; `str` when omitted.
    #[serde(rename = "type", default)]
    pub type_tag: Option<String>,
    #[serde(default)]
    pub default: Option<Literal>,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub help: Option<String>,
}

/// One command level of a schema document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchemaDocument {
    pub help: Option<String>,
    pub args: Vec<(String, ArgDocument)>,
    pub default_command: Option<String>,
    pub commands: Vec<(String, SchemaDocument)>,
    pub overrides: Vec<(String, Literal)>,
}

/// Wire shape of a document level before key order is lifted into vectors.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawDocument {
    #[serde(default)]
    help: Option<String>,
    #[serde(default)]
    args: Mapping,
    #[serde(default)]
    sub_command: Mapping,
    #[serde(default)]
    overrides: Mapping,
}

impl TryFrom<RawDocument> for SchemaDocument {
    type Error = String;

    fn try_from(raw: RawDocument) -> Result<Self, Self::Error> {
        let mut args = Vec::with_capacity(raw.args.len());
        for (key, value) in raw.args {
            let name = key_string(&key, "args")?;
            let arg: ArgDocument = serde_yaml::from_value(value)
                .map_err(|e| format!("args.{name}: {e}"))?;
            args.push((name, arg));
        }

        let mut default_command = None;
        let mut commands = Vec::new();
        for (key, value) in raw.sub_command {
            let name = key_string(&key, "sub_command")?;
            if name == DEFAULT_COMMAND_KEY {
                let target = value
                    .as_str()
                    .ok_or_else(|| format!("sub_command.{DEFAULT_COMMAND_KEY} must be a string"))?;
                default_command = Some(target.to_string());
                continue;
            }
            let raw_child: RawDocument = serde_yaml::from_value(value)
                .map_err(|e| format!("sub_command.{name}: {e}"))?;
            let child = SchemaDocument::try_from(raw_child)
                .map_err(|e| format!("sub_command.{name}.{e}"))?;
            commands.push((name, child));
        }

        let mut overrides = Vec::with_capacity(raw.overrides.len());
        for (key, value) in raw.overrides {
            let name = key_string(&key, "overrides")?;
            let literal = serde_json::to_value(&value)
                .map_err(|e| format!("overrides.{name}: {e}"))?;
            overrides.push((name, literal));
        }

        Ok(Self {
            help: raw.help,
            args,
            default_command,
            commands,
            overrides,
        })
    }
}

fn key_string(key: &YamlValue, section: &str) -> Result<String, String> {
    key.as_str()
        .map(str::to_string)
        .ok_or_else(|| format!("{section}: keys must be strings, found {key:?}"))
}

impl<'de> Deserialize<'de> for SchemaDocument {
    fn deserialize<D: serde::Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<Self, D::Error> {
        let raw = RawDocument::deserialize(deserializer)?;
        SchemaDocument::try_from(raw).map_err(serde::de::Error::custom)
    }
}

impl SchemaDocument {
    /// Builds the command tree for this document with `name` as the root
    /// command. Declaration order is kept throughout.
    pub fn into_node(self, name: &str) -> CommandNode {
        CommandNode {
            name: name.to_string(),
            help: self.help,
            params: self
                .args
                .into_iter()
                .map(|(param_name, arg)| arg.into_spec(param_name))
                .collect(),
            children: self
                .commands
                .into_iter()
                .map(|(child_name, child)| child.into_node(&child_name))
                .collect(),
            default_child: self.default_command,
            overrides: self.overrides,
        }
    }
}

impl ArgDocument {
    /// Builds the parameter declared under `name`. A `null` default counts
    /// as no default.
    pub fn into_spec(self, name: String) -> ParameterSpec {
        ParameterSpec {
            name,
            type_tag: self
                .type_tag
                .unwrap_or_else(|| DEFAULT_TYPE_TAG.to_string()),
            default: self.default.filter(|literal| !literal.is_null()),
            required: self.required,
            help: self.help,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    const BUNDLER: &str = r#"
help: Code bundler
args:
  target_dir: { type: str, default: ".", help: Target directory }
  --debug: { type: bool, default: false }
sub_command:
  __default__: check
  check:
    args: { -a: { type: bool, default: false } }
  build:
    help: Build it
    overrides: { target_dir: ./src }
    args: { --minify: { type: bool } }
"#;

    #[test]
    fn test_yaml_document_keeps_order() {
        let doc: SchemaDocument = serde_yaml::from_str(BUNDLER).unwrap();
        let names: Vec<&str> = doc.args.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, ["target_dir", "--debug"]);
        let commands: Vec<&str> = doc.commands.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(commands, ["check", "build"]);
        assert_eq!(doc.default_command.as_deref(), Some("check"));
        assert_eq!(doc.commands[1].1.overrides, vec![("target_dir".to_string(), json!("./src"))]);
    }

    #[test]
    fn test_json_document_keeps_order() {
        let text = r#"{
            "args": { "z": {}, "a": {"type": "int", "default": 3} },
            "sub_command": { "second": {}, "first": {}, "__default__": "first" }
        }"#;
        let doc: SchemaDocument = serde_json::from_str(text).unwrap();
        assert_eq!(doc.args[0].0, "z");
        assert_eq!(doc.args[1].1.default, Some(json!(3)));
        assert_eq!(doc.commands[0].0, "second");
        assert_eq!(doc.default_command.as_deref(), Some("first"));
    }

    #[test]
    fn test_unknown_keys_rejected() {
        let err = serde_yaml::from_str::<SchemaDocument>("argz: {}").unwrap_err();
        assert!(err.to_string().contains("argz"));

        let err = serde_yaml::from_str::<SchemaDocument>("args: { -x: { typ: int } }").unwrap_err();
        assert!(err.to_string().contains("args.-x"));
    }

    #[test]
    fn test_duplicate_keys_rejected() {
        let text = "sub_command:\n  a: {}\n  a: {}\n";
        assert!(serde_yaml::from_str::<SchemaDocument>(text).is_err());
    }

    #[test]
    fn test_default_command_must_be_string() {
        let err = serde_yaml::from_str::<SchemaDocument>("sub_command: { __default__: [a] }")
            .unwrap_err();
        assert!(err.to_string().contains("__default__"));
    }

    #[test]
    fn test_into_node() {
        let doc: SchemaDocument = serde_yaml::from_str(BUNDLER).unwrap();
        let root = doc.into_node("bundler");
        assert_eq!(root.name, "bundler");
        assert_eq!(root.help.as_deref(), Some("Code bundler"));
        assert!(root.params[0].is_positional());
        assert_eq!(root.params[1].type_tag, "bool");
        assert_eq!(root.default_child.as_deref(), Some("check"));
        assert_eq!(root.child_names(), ["check", "build"]);
        assert_eq!(root.child("check").unwrap().params[0].name, "-a");
    }

    #[test]
    fn test_null_default_means_none() {
        let doc: SchemaDocument = serde_yaml::from_str("args: { -o: { default: null } }").unwrap();
        let root = doc.into_node("app");
        assert_eq!(root.params[0].default, None);
        assert_eq!(root.params[0].type_tag, "str");
    }
}
