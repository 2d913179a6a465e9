//! Help routing and per-node structure for usage renderers.
//!
//! The engine does not format help text. It decides *which* command a help
//! request is about and exposes that command's structure as a [`NodeHelp`],
//! leaving layout to the host.
//!
//! A help request routes like a normal invocation, with one twist: the
//! default child is only entered when the tokens carry a flag that belongs
//! to it. So `app -h` shows the root even when the root has a default child,
//! while `app -s -h` shows the default child if `-s` is one of its flags.

use std::collections::HashMap;

use serde::Serialize;

use crate::namespace::Namespace;
use crate::registry::TypeRegistry;
use crate::resolve::kind_of;
use crate::schema::{CommandNode, HELP_FLAGS, ParameterSpec, identifier_for, is_flag_shaped};
use crate::value::Literal;

/// Result of [`Engine::run`](crate::Engine::run).
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Tokens resolved to a namespace.
    Resolved(Namespace),
    /// A help flag was present; show help for this command.
    Help(HelpRequest),
}

/// Command whose help was requested.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HelpRequest {
    /// Command words below the root; empty for the root itself.
    pub path: Vec<String>,
}

/// One parameter as a renderer sees it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParamHelp {
    pub name: String,
    pub identifier: String,
    pub type_tag: String,
    /// Effective default on this command path, overrides applied.
    pub default: Option<Literal>,
    /// Positional without default, or a required `list` flag.
    pub required: bool,
    pub positional: bool,
    pub help: Option<String>,
}

/// One child command as a renderer sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChildHelp {
    pub name: String,
    pub help: Option<String>,
    pub is_default: bool,
}

/// Structure of one command, with context from its ancestors.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeHelp {
    /// Root command name (the program).
    pub program: String,
    /// Command words below the root.
    pub path: Vec<String>,
    pub help: Option<String>,
    /// Parameters declared on this command.
    pub params: Vec<ParamHelp>,
    /// Parameters declared on ancestors, root first.
    pub inherited: Vec<ParamHelp>,
    pub children: Vec<ChildHelp>,
    pub default_child: Option<String>,
}

pub(crate) fn is_help_token(token: &str) -> bool {
    HELP_FLAGS.contains(&token)
}

/// Determines which command a help request targets.
///
/// Flags visible at each level are dropped together with their values before
/// routing, the same way the resolver extracts them, so a flag value that
/// happens to name a command never selects it.
pub(crate) fn help_target(
    root: &CommandNode,
    registry: &TypeRegistry,
    tokens: &[String],
) -> HelpRequest {
    let mut remaining: Vec<&str> = tokens
        .iter()
        .map(String::as_str)
        .filter(|token| !is_help_token(token))
        .collect();
    let mut path = Vec::new();
    let mut visible: Vec<&ParameterSpec> = Vec::new();
    let mut node = root;

    loop {
        visible.extend(node.params.iter().filter(|p| p.is_flag()));
        remaining = drop_visible_flags(remaining, &visible, registry);
        if node.is_leaf() {
            break;
        }

        let explicit = remaining
            .iter()
            .enumerate()
            .filter(|(_, token)| !is_flag_shaped(token))
            .find_map(|(index, token)| node.child(token).map(|child| (index, child)));

        let next = match explicit {
            Some((index, child)) => {
                remaining.remove(index);
                child
            }
            None => match node.default_child_node() {
                Some(child)
                    if remaining
                        .iter()
                        .any(|token| is_flag_shaped(token) && subtree_declares(child, token)) =>
                {
                    child
                }
                _ => break,
            },
        };

        path.push(next.name.clone());
        node = next;
    }

    HelpRequest { path }
}

fn drop_visible_flags<'t>(
    tokens: Vec<&'t str>,
    visible: &[&ParameterSpec],
    registry: &TypeRegistry,
) -> Vec<&'t str> {
    let mut rest = Vec::with_capacity(tokens.len());
    let mut tokens = tokens.into_iter().peekable();

    while let Some(token) = tokens.next() {
        let Some(param) = visible.iter().find(|p| p.matches(token)) else {
            rest.push(token);
            continue;
        };
        let kind = kind_of(registry, param);
        if kind.is_list() {
            while tokens.next_if(|t| !is_flag_shaped(t)).is_some() {}
        } else if !kind.is_switch() {
            let _ = tokens.next_if(|t| !is_flag_shaped(t));
        }
    }

    rest
}

fn subtree_declares(node: &CommandNode, flag: &str) -> bool {
    node.find_flag(flag).is_some() || node.children.iter().any(|c| subtree_declares(c, flag))
}

/// Builds the structure of the command at `path` (command words below the
/// root), or `None` if the path does not exist.
pub(crate) fn describe<S: AsRef<str>>(root: &CommandNode, path: &[S]) -> Option<NodeHelp> {
    let mut chain = vec![root];
    let mut node = root;
    for name in path {
        node = node.child(name.as_ref())?;
        chain.push(node);
    }

    let mut defaults: HashMap<String, &Literal> = HashMap::new();
    for step in &chain {
        for param in &step.params {
            if let Some(default) = &param.default {
                defaults.insert(param.identifier(), default);
            }
        }
        for (key, literal) in &step.overrides {
            defaults.insert(identifier_for(key), literal);
        }
    }

    let describe_param = |param: &ParameterSpec| {
        let identifier = param.identifier();
        let default = defaults
            .get(&identifier)
            .copied()
            .filter(|literal| !literal.is_null())
            .cloned();
        ParamHelp {
            name: param.name.clone(),
            type_tag: param.type_tag.clone(),
            required: if param.is_positional() {
                default.is_none()
            } else {
                param.required && param.type_tag == "list"
            },
            default,
            positional: param.is_positional(),
            help: param.help.clone(),
            identifier,
        }
    };

    let (_, ancestors) = chain.split_last()?;
    let inherited = ancestors
        .iter()
        .flat_map(|step| step.params.iter())
        .map(&describe_param)
        .collect();
    let params = node.params.iter().map(&describe_param).collect();

    Some(NodeHelp {
        program: root.name.clone(),
        path: path.iter().map(|s| s.as_ref().to_string()).collect(),
        help: node.help.clone(),
        params,
        inherited,
        children: node
            .children
            .iter()
            .map(|child| ChildHelp {
                name: child.name.clone(),
                help: child.help.clone(),
                is_default: node.default_child.as_deref() == Some(child.name.as_str()),
            })
            .collect(),
        default_child: node.default_child.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree() -> CommandNode {
        CommandNode::new("app")
            .with_param(ParameterSpec::flag("-g").with_type("bool").with_help("GlobalFlag"))
            .with_param(ParameterSpec::flag("-o").with_default("root.md"))
            .with_default_child("default_cmd")
            .with_child(
                CommandNode::new("default_cmd")
                    .with_help("Default Command Help")
                    .with_override("-o", "override.md")
                    .with_param(ParameterSpec::flag("-s").with_type("bool").with_help("SpecificFlag")),
            )
            .with_child(CommandNode::new("other_cmd").with_help("Other Command Help"))
    }

    fn target(tokens: &[&str]) -> Vec<String> {
        let tokens: Vec<String> = tokens.iter().map(|t| t.to_string()).collect();
        help_target(&tree(), &TypeRegistry::builtin(), &tokens).path
    }

    #[test]
    fn test_help_root_ignores_default_child() {
        assert!(target(&["-h"]).is_empty());
        assert!(target(&["-g", "--help"]).is_empty());
    }

    #[test]
    fn test_help_explicit_child() {
        assert_eq!(target(&["default_cmd", "-h"]), vec!["default_cmd"]);
        assert_eq!(target(&["-h", "other_cmd"]), vec!["other_cmd"]);
    }

    #[test]
    fn test_help_default_child_from_owned_flag() {
        assert_eq!(target(&["-s", "-h"]), vec!["default_cmd"]);
    }

    #[test]
    fn test_help_skips_flag_values_naming_commands() {
        assert!(target(&["-o", "other_cmd", "-h"]).is_empty());
        assert!(target(&["-o", "default_cmd", "--help"]).is_empty());
        assert_eq!(target(&["-o", "other_cmd", "other_cmd", "-h"]), vec!["other_cmd"]);
        assert_eq!(target(&["-g", "other_cmd", "-h"]), vec!["other_cmd"]);
    }

    #[test]
    fn test_describe_root() {
        let help = describe::<&str>(&tree(), &[]).unwrap();
        assert_eq!(help.program, "app");
        assert!(help.inherited.is_empty());
        assert_eq!(help.params.len(), 2);
        assert_eq!(help.default_child.as_deref(), Some("default_cmd"));
        assert!(help.children[0].is_default);
        assert!(!help.children[1].is_default);
    }

    #[test]
    fn test_describe_child_applies_overrides() {
        let help = describe(&tree(), &["default_cmd"]).unwrap();
        assert_eq!(help.help.as_deref(), Some("Default Command Help"));
        assert_eq!(help.params[0].name, "-s");
        let inherited_o = help.inherited.iter().find(|p| p.identifier == "o").unwrap();
        assert_eq!(inherited_o.default, Some(Literal::from("override.md")));
    }

    #[test]
    fn test_describe_unknown_path() {
        assert!(describe(&tree(), &["nope"]).is_none());
    }
}
