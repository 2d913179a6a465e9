//! Static schema validation.
//!
//! Walks a [`CommandNode`] tree once, depth-first, and reports structural
//! defects before any token is parsed: unknown type tags, dangling default
//! children, identifiers repeated along one root-to-leaf path, overrides of
//! unknown parameters, and defaults that do not fit their type.
//!
//! Identifier uniqueness is checked per path, not per tree: two sibling
//! commands may both declare `-v`, but a child may not redeclare a parameter
//! of one of its ancestors.
//!
//! # Examples
//!
//! ```
//! use elegant_cli_core::*;
//!
//! let registry = TypeRegistry::builtin();
//!
//! let ok = CommandNode::new("app")
//!     .with_child(CommandNode::new("a").with_param(ParameterSpec::flag("-v").with_type("bool")))
//!     .with_child(CommandNode::new("b").with_param(ParameterSpec::flag("-v").with_type("bool")));
//! assert!(validate_tree(&ok, &registry).is_empty());
//!
//! let bad = CommandNode::new("app")
//!     .with_child(CommandNode::new("a"))
//!     .with_default_child("ghost");
//! let defects = validate_tree(&bad, &registry);
//! assert!(matches!(defects[0], SchemaDefect::MissingDefaultChild { .. }));
//! ```

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::error::SchemaDefect;
use crate::namespace::COMMAND_KEY;
use crate::registry::TypeRegistry;
use crate::schema::{CommandNode, HELP_FLAGS, ParameterSpec, identifier_for, is_flag_shaped};

/// Name of the root segment in reported paths.
pub const ROOT_SEGMENT: &str = "root";

/// Parameters visible on the current root-to-node path.
struct Scope<'a> {
    by_identifier: HashMap<String, (String, &'a ParameterSpec)>,
    order: Vec<String>,
}

impl<'a> Scope<'a> {
    fn new() -> Self {
        Self {
            by_identifier: HashMap::new(),
            order: Vec::new(),
        }
    }

    fn get(&self, identifier: &str) -> Option<&(String, &'a ParameterSpec)> {
        self.by_identifier.get(identifier)
    }

    fn push(&mut self, identifier: String, declared_in: String, param: &'a ParameterSpec) {
        self.order.push(identifier.clone());
        self.by_identifier.insert(identifier, (declared_in, param));
    }

    fn mark(&self) -> usize {
        self.order.len()
    }

    fn truncate(&mut self, mark: usize) {
        for identifier in self.order.drain(mark..) {
            self.by_identifier.remove(&identifier);
        }
    }
}

/// Validates a schema tree against a type registry.
///
/// Returns every defect found, in depth-first order. An empty vector means
/// the tree is valid.
pub fn validate_tree(root: &CommandNode, registry: &TypeRegistry) -> Vec<SchemaDefect> {
    let mut errors = Vec::new();
    let mut path = vec![ROOT_SEGMENT.to_string()];
    let mut scope = Scope::new();
    let visited = validate_node(root, registry, &mut path, &mut scope, &mut errors);
    debug!(nodes = visited, defects = errors.len(), "Validated schema tree");
    errors
}

fn validate_node<'a>(
    node: &'a CommandNode,
    registry: &TypeRegistry,
    path: &mut Vec<String>,
    scope: &mut Scope<'a>,
    errors: &mut Vec<SchemaDefect>,
) -> usize {
    let here = path.join(".");
    let mark = scope.mark();

    for param in &node.params {
        validate_param(param, registry, &here, scope, errors);
    }

    for (key, literal) in &node.overrides {
        let identifier = identifier_for(key);
        let Some((_, param)) = scope.get(&identifier) else {
            errors.push(SchemaDefect::UnknownOverride {
                path: here.clone(),
                key: key.clone(),
            });
            continue;
        };
        // Unknown tags were already reported where the parameter was declared.
        if let Some(entry) = registry.get(&param.type_tag) {
            if let Err(message) = entry.adopt(literal) {
                errors.push(SchemaDefect::InvalidDefault {
                    path: here.clone(),
                    param: param.name.clone(),
                    message: format!("override {message}"),
                });
            }
        }
    }

    if let Some(name) = &node.default_child {
        if node.child(name).is_none() {
            errors.push(SchemaDefect::MissingDefaultChild {
                path: here.clone(),
                name: name.clone(),
            });
        }
    }

    let mut visited = 1;
    let mut seen: HashSet<&str> = HashSet::new();
    for child in &node.children {
        let name = child.name.as_str();
        if name.trim().is_empty() || is_flag_shaped(name) {
            errors.push(SchemaDefect::InvalidCommandName {
                path: here.clone(),
                name: name.to_string(),
            });
            continue;
        }
        if !seen.insert(name) {
            errors.push(SchemaDefect::DuplicateCommand {
                path: here.clone(),
                name: name.to_string(),
            });
            continue;
        }

        path.push(name.to_string());
        visited += validate_node(child, registry, path, scope, errors);
        path.pop();
    }

    scope.truncate(mark);
    visited
}

fn validate_param<'a>(
    param: &'a ParameterSpec,
    registry: &TypeRegistry,
    here: &str,
    scope: &mut Scope<'a>,
    errors: &mut Vec<SchemaDefect>,
) {
    let identifier = param.identifier();
    if identifier.trim().is_empty() || (param.is_flag() && !is_flag_shaped(&param.name)) {
        errors.push(SchemaDefect::InvalidName {
            path: here.to_string(),
            name: param.name.clone(),
        });
        return;
    }
    if HELP_FLAGS.contains(&param.name.as_str()) {
        errors.push(SchemaDefect::ReservedName {
            path: here.to_string(),
            name: param.name.clone(),
        });
        return;
    }
    if identifier == COMMAND_KEY {
        errors.push(SchemaDefect::ReservedIdentifier {
            path: here.to_string(),
            name: param.name.clone(),
            identifier,
        });
        return;
    }

    match registry.get(&param.type_tag) {
        None => errors.push(SchemaDefect::UnknownType {
            path: here.to_string(),
            param: param.name.clone(),
            tag: param.type_tag.clone(),
            available: registry.tags().into_iter().map(String::from).collect(),
        }),
        Some(entry) => {
            if let Some(default) = &param.default {
                if let Err(message) = entry.adopt(default) {
                    errors.push(SchemaDefect::InvalidDefault {
                        path: here.to_string(),
                        param: param.name.clone(),
                        message,
                    });
                }
            }
        }
    }

    if let Some((first, _)) = scope.get(&identifier) {
        errors.push(SchemaDefect::DuplicateIdentifier {
            path: here.to_string(),
            identifier,
            first: first.clone(),
        });
        return;
    }
    scope.push(identifier, here.to_string(), param);
}
