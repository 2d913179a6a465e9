//! Declarative command-line argument engine.
//!
//! A CLI is described as a tree of [`CommandNode`]s, each declaring
//! [`ParameterSpec`]s (positionals and flags), optional sub-commands, a
//! default sub-command and default overrides for inherited parameters.
//! Values are typed through a [`TypeRegistry`] that maps type tags to
//! coercion functions.
//!
//! - [`Engine::new`] / [`Engine::with_registry`] validate the whole tree up
//!   front ([`validate_tree`]) and refuse to build on any defect.
//! - [`Engine::resolve`] walks the tree against a token list, choosing one
//!   command per level, and produces a flat [`Namespace`].
//! - [`Engine::run`] does the same but honors `-h`/`--help`, returning the
//!   command whose help was asked for. [`Engine::describe`] exposes that
//!   command's structure for rendering.
//!
//! # Example
//!
//! ```
//! use elegant_cli_core::*;
//!
//! let root = CommandNode::new("docs")
//!     .with_param(ParameterSpec::positional("src").with_default("."))
//!     .with_param(ParameterSpec::flag("-o").with_default("out.md"))
//!     .with_default_child("scan")
//!     .with_child(
//!         CommandNode::new("scan")
//!             .with_param(ParameterSpec::flag("-e").with_type("list").with_default(vec![".rs"])),
//!     )
//!     .with_child(
//!         CommandNode::new("by_config")
//!             .with_override("-o", "final.md")
//!             .with_param(ParameterSpec::flag("--depth").with_type("int").with_default(5)),
//!     );
//! let engine = Engine::new(root).unwrap();
//!
//! let ns = engine.resolve(["/src", "by_config", "--depth", "2"]).unwrap();
//! assert_eq!(ns.command(), ["by_config"]);
//! assert_eq!(ns.get_str("src"), Ok("/src"));
//! assert_eq!(ns.get_str("o"), Ok("final.md"));
//! assert_eq!(ns.get_int("depth"), Ok(2));
//! assert!(!ns.contains("e"));
//!
//! let ns = engine.resolve(["-e", ".py", ".js"]).unwrap();
//! assert_eq!(ns.command(), ["scan"]);
//! assert_eq!(ns.get_list("e").unwrap(), [".py", ".js"]);
//! ```

mod engine;
mod error;
mod help;
mod namespace;
mod registry;
mod resolve;
mod schema;
mod validate;
mod value;

pub use engine::Engine;
pub use error::{ConfigurationError, LookupError, SchemaDefect, USAGE_EXIT_CODE, UsageError};
pub use help::{ChildHelp, HelpRequest, NodeHelp, Outcome, ParamHelp};
pub use namespace::{COMMAND_KEY, Namespace};
pub use registry::{
    BUILTIN_TAGS, Check, Coercer, DEFAULT_TYPE_TAG, TypeEntry, TypeKind, TypeRegistry,
};
pub use schema::{
    CommandNode, FLAG_PREFIX, HELP_FLAGS, ParameterSpec, identifier_for, is_flag_shaped,
};
pub use validate::{ROOT_SEGMENT, validate_tree};
pub use value::{Literal, Value};
