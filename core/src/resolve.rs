//! Recursive-descent resolution of a token list against a schema tree.
//!
//! Each level runs three steps:
//!
//! 1. **Flag extraction**: tokens naming a flag visible at this level (own
//!    or inherited) are consumed together with their values. Flag-shaped
//!    tokens nobody here recognizes stay in the stream; they may belong to a
//!    deeper command.
//! 2. **Routing**: the first non-flag token naming a child selects it and is
//!    removed from the stream. Otherwise the default child is entered without
//!    consuming anything.
//! 3. **Leaf binding**: at a leaf, leftover tokens bind to positionals
//!    collected root to leaf, then every parameter on the path is finalized
//!    from its explicit token or its override-adjusted default.
//!
//! All state lives in a `Frame` passed down by value, so concurrent
//! resolutions against one tree never share anything mutable.

use std::collections::{BTreeMap, HashMap};

use tracing::{debug, trace};

use crate::error::UsageError;
use crate::namespace::Namespace;
use crate::registry::{TypeEntry, TypeKind, TypeRegistry};
use crate::schema::{CommandNode, ParameterSpec, is_flag_shaped};
use crate::value::{Literal, Value};

/// Raw tokens bound to one parameter before coercion.
#[derive(Debug)]
enum Binding {
    Switch,
    Single(String),
    Many(Vec<String>),
}

/// Accumulator carried from the root to the selected leaf.
#[derive(Debug, Default)]
struct Frame<'a> {
    /// Resolved path, root first.
    path: Vec<&'a CommandNode>,
    /// Command words chosen below the root.
    names: Vec<String>,
    /// Parameters of every node on the path, in declaration order.
    visible: Vec<&'a ParameterSpec>,
    /// Effective default literal per identifier; later nodes overwrite.
    defaults: HashMap<String, &'a Literal>,
    explicit: HashMap<String, Binding>,
}

impl<'a> Frame<'a> {
    fn enter(&mut self, node: &'a CommandNode) {
        self.path.push(node);
        for param in &node.params {
            self.visible.push(param);
            if let Some(default) = &param.default {
                self.defaults.insert(param.identifier(), default);
            }
        }
        for (identifier, literal) in node.normalized_overrides() {
            self.defaults.insert(identifier, literal);
        }
    }

    fn find_flag(&self, token: &str) -> Option<&'a ParameterSpec> {
        self.visible.iter().copied().find(|p| p.matches(token))
    }

    /// Space-separated command line prefix, e.g. `app scan deep`.
    fn label(&self) -> String {
        self.path
            .iter()
            .map(|node| node.name.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

enum Route<'a> {
    Explicit(usize, &'a CommandNode),
    Default(&'a CommandNode),
}

/// Resolves `tokens` against the tree rooted at `root`.
pub(crate) fn resolve_tokens(
    root: &CommandNode,
    registry: &TypeRegistry,
    tokens: Vec<String>,
) -> Result<Namespace, UsageError> {
    descend(root, registry, tokens, Frame::default())
}

fn descend<'a>(
    node: &'a CommandNode,
    registry: &TypeRegistry,
    stream: Vec<String>,
    mut frame: Frame<'a>,
) -> Result<Namespace, UsageError> {
    frame.enter(node);
    let mut stream = extract_flags(&mut frame, registry, stream)?;

    if node.is_leaf() {
        return bind_leaf(registry, stream, frame);
    }

    let child = match route(node, &stream, &frame)? {
        Route::Explicit(index, child) => {
            stream.remove(index);
            debug!(command = %child.name, parent = %node.name, "Routed to explicit sub-command");
            child
        }
        Route::Default(child) => {
            debug!(command = %child.name, parent = %node.name, "Routed to default sub-command");
            child
        }
    };
    frame.names.push(child.name.clone());
    descend(child, registry, stream, frame)
}

pub(crate) fn kind_of(registry: &TypeRegistry, param: &ParameterSpec) -> TypeKind {
    // Tags were checked at construction; fall back to a single-valued kind.
    registry
        .get(&param.type_tag)
        .map(TypeEntry::kind)
        .unwrap_or(TypeKind::Str)
}

fn extract_flags(
    frame: &mut Frame<'_>,
    registry: &TypeRegistry,
    stream: Vec<String>,
) -> Result<Vec<String>, UsageError> {
    let mut rest = Vec::with_capacity(stream.len());
    let mut tokens = stream.into_iter().peekable();

    while let Some(token) = tokens.next() {
        let Some(param) = frame.find_flag(&token) else {
            rest.push(token);
            continue;
        };

        let kind = kind_of(registry, param);
        let binding = if kind.is_switch() {
            Binding::Switch
        } else if kind.is_list() {
            let mut values = Vec::new();
            while let Some(value) = tokens.next_if(|t| !is_flag_shaped(t)) {
                values.push(value);
            }
            if values.is_empty() {
                return Err(UsageError::MissingValue {
                    param: param.name.clone(),
                    expected: "one or more values".to_string(),
                });
            }
            Binding::Many(values)
        } else {
            match tokens.next_if(|t| !is_flag_shaped(t)) {
                Some(value) => Binding::Single(value),
                None => {
                    return Err(UsageError::MissingValue {
                        param: param.name.clone(),
                        expected: format!("a value of type {}", param.type_tag),
                    });
                }
            }
        };

        trace!(flag = %token, binding = ?binding, "Consumed flag");
        // Repeated flags: the last occurrence wins.
        frame.explicit.insert(param.identifier(), binding);
    }

    Ok(rest)
}

fn route<'a>(
    node: &'a CommandNode,
    stream: &[String],
    frame: &Frame<'a>,
) -> Result<Route<'a>, UsageError> {
    let explicit = stream
        .iter()
        .enumerate()
        .filter(|(_, token)| !is_flag_shaped(token))
        .find_map(|(index, token)| node.child(token).map(|child| (index, child)));
    if let Some((index, child)) = explicit {
        return Ok(Route::Explicit(index, child));
    }

    if let Some(child) = node.default_child_node() {
        return Ok(Route::Default(child));
    }

    let choices: Vec<String> = node.child_names().into_iter().map(String::from).collect();
    match stream.iter().find(|token| !is_flag_shaped(token)) {
        Some(token) => Err(UsageError::UnknownCommand {
            token: token.clone(),
            command: frame.label(),
            choices,
        }),
        None => Err(UsageError::MissingCommand {
            command: frame.label(),
            choices,
        }),
    }
}

fn bind_leaf(
    registry: &TypeRegistry,
    stream: Vec<String>,
    mut frame: Frame<'_>,
) -> Result<Namespace, UsageError> {
    if let Some(flag) = stream.iter().find(|token| is_flag_shaped(token)) {
        return Err(UsageError::UnknownFlag {
            flag: flag.clone(),
            command: frame.label(),
        });
    }

    let positionals: Vec<&ParameterSpec> = frame
        .visible
        .iter()
        .copied()
        .filter(|p| p.is_positional())
        .collect();

    let mut tokens = stream.into_iter();
    for param in positionals {
        if kind_of(registry, param).is_list() {
            let values: Vec<String> = tokens.by_ref().collect();
            if !values.is_empty() {
                frame.explicit.insert(param.identifier(), Binding::Many(values));
            }
        } else if let Some(token) = tokens.next() {
            frame.explicit.insert(param.identifier(), Binding::Single(token));
        }
    }

    let excess: Vec<String> = tokens.collect();
    if !excess.is_empty() {
        return Err(UsageError::ExcessPositionals { tokens: excess });
    }

    debug!(command = %frame.label(), bound = frame.explicit.len(), "Bound leaf");
    finalize(registry, frame)
}

fn invalid(param: &ParameterSpec, value: String, message: String) -> UsageError {
    UsageError::InvalidValue {
        param: param.name.clone(),
        tag: param.type_tag.clone(),
        value,
        message,
    }
}

fn finalize(registry: &TypeRegistry, mut frame: Frame<'_>) -> Result<Namespace, UsageError> {
    let mut values = BTreeMap::new();
    let visible = std::mem::take(&mut frame.visible);

    for param in visible {
        let identifier = param.identifier();
        let entry = registry.get(&param.type_tag).ok_or_else(|| {
            invalid(param, String::new(), format!("unknown type '{}'", param.type_tag))
        })?;

        let value = match frame.explicit.remove(&identifier) {
            Some(Binding::Switch) => Some(Value::Bool(true)),
            Some(Binding::Single(raw)) => Some(
                entry
                    .coerce(&raw)
                    .map_err(|message| invalid(param, raw.clone(), message))?,
            ),
            Some(Binding::Many(raw)) => Some(
                entry
                    .coerce_list(&raw)
                    .map_err(|message| invalid(param, raw.join(" "), message))?,
            ),
            None => {
                let default = match frame.defaults.get(&identifier) {
                    Some(literal) => entry
                        .adopt(literal)
                        .map_err(|message| invalid(param, literal.to_string(), message))?,
                    None => None,
                };
                match default {
                    Some(value) => Some(value),
                    None if param.is_positional() => {
                        return Err(UsageError::MissingPositional {
                            param: param.name.clone(),
                        });
                    }
                    None if entry.kind().is_switch() => Some(Value::Bool(false)),
                    None if entry.kind().is_list() => Some(Value::List(Vec::new())),
                    None => None,
                }
            }
        };

        if param.is_flag()
            && param.required
            && entry.kind().is_list()
            && value
                .as_ref()
                .and_then(Value::as_list)
                .is_none_or(<[String]>::is_empty)
        {
            return Err(UsageError::MissingValue {
                param: param.name.clone(),
                expected: "one or more values".to_string(),
            });
        }

        values.insert(identifier, value);
    }

    Ok(Namespace::new(frame.names, values))
}
