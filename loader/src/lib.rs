//! Declarative JSON/YAML schema documents for [`elegant_cli_core`].
//!
//! A document describes a command tree as nested maps (`args`,
//! `sub_command` with an optional `__default__`, `overrides`, `help`).
//! [`load_schema`] / [`parse_schema`] read it into a [`SchemaDocument`],
//! [`SchemaDocument::into_node`] turns it into a [`CommandNode`] and
//! [`load_engine`] does both and validates.
//!
//! # Example
//!
//! ```
//! use elegant_cli_core::Engine;
//! use elegant_cli_loader::{SchemaFormat, parse_schema};
//!
//! let text = r#"
//! args:
//!   directory: { default: "." }
//!   -o: { default: root.md }
//! sub_command:
//!   __default__: by_config
//!   scan:
//!     args: { -c: { type: bool, default: false } }
//!   by_config:
//!     overrides: { -o: config.md }
//! "#;
//! let doc = parse_schema(text, SchemaFormat::Yaml).unwrap();
//! let engine = Engine::new(doc.into_node("docs")).unwrap();
//!
//! let ns = engine.resolve(["/src"]).unwrap();
//! assert_eq!(ns.command(), ["by_config"]);
//! assert_eq!(ns.get_str("o"), Ok("config.md"));
//! ```
//!
//! [`CommandNode`]: elegant_cli_core::CommandNode

mod document;
mod error;
mod loader;

pub use document::{ArgDocument, DEFAULT_COMMAND_KEY, SchemaDocument};
pub use error::{LoaderError, Result};
pub use loader::{SchemaFormat, load_engine, load_schema, parse_schema};
