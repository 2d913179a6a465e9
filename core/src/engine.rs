//! Validated engine handle: construction and resolution entry points.

use tracing::{debug, info};

use crate::error::{ConfigurationError, UsageError};
use crate::help::{self, HelpRequest, NodeHelp, Outcome};
use crate::namespace::Namespace;
use crate::registry::TypeRegistry;
use crate::resolve::resolve_tokens;
use crate::schema::CommandNode;
use crate::validate::validate_tree;

/// A schema tree that passed validation, bundled with the registry it was
/// validated against.
///
/// The engine is immutable; [`resolve`](Self::resolve) and
/// [`run`](Self::run) take `&self` and may be called from several threads at
/// once.
///
/// # Examples
///
/// ```
/// use elegant_cli_core::*;
///
/// let root = CommandNode::new("bundler")
///     .with_param(ParameterSpec::positional("target_dir").with_default("."))
///     .with_default_child("check")
///     .with_child(
///         CommandNode::new("check")
///             .with_param(ParameterSpec::flag("-a").with_type("bool").with_default(false)),
///     )
///     .with_child(
///         CommandNode::new("build")
///             .with_override("target_dir", "./src")
///             .with_param(ParameterSpec::flag("--minify").with_type("bool")),
///     );
/// let engine = Engine::new(root).unwrap();
///
/// let ns = engine.resolve(["build"]).unwrap();
/// assert_eq!(ns.command(), ["build"]);
/// assert_eq!(ns.get_str("target_dir"), Ok("./src"));
/// assert_eq!(ns.get_bool("minify"), Ok(false));
///
/// let ns = engine.resolve(["-a"]).unwrap();
/// assert_eq!(ns.command(), ["check"]);
/// assert_eq!(ns.get_bool("a"), Ok(true));
/// ```
#[derive(Debug, Clone)]
pub struct Engine {
    root: CommandNode,
    registry: TypeRegistry,
}

impl Engine {
    /// Validates `root` against the built-in registry.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigurationError`] listing every schema defect.
    pub fn new(root: CommandNode) -> Result<Self, ConfigurationError> {
        Self::with_registry(root, TypeRegistry::builtin())
    }

    /// Validates `root` against `registry`, which the engine keeps as its
    /// own snapshot.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigurationError`] listing every schema defect.
    pub fn with_registry(
        root: CommandNode,
        registry: TypeRegistry,
    ) -> Result<Self, ConfigurationError> {
        let defects = validate_tree(&root, &registry);
        if !defects.is_empty() {
            return Err(ConfigurationError::new(defects));
        }
        info!(command = %root.name, "CLI schema validated");
        Ok(Self { root, registry })
    }

    pub fn root(&self) -> &CommandNode {
        &self.root
    }

    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    /// Resolves a token list (without the program name) to a namespace.
    ///
    /// Help flags get no special treatment here; use [`run`](Self::run) to
    /// honor them.
    ///
    /// # Errors
    ///
    /// Returns a [`UsageError`] describing the first problem with the input.
    pub fn resolve<I, S>(&self, tokens: I) -> Result<Namespace, UsageError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let tokens: Vec<String> = tokens.into_iter().map(Into::into).collect();
        debug!(tokens = ?tokens, "Resolving");
        resolve_tokens(&self.root, &self.registry, tokens)
    }

    /// Resolves tokens, or reports a help request if `-h`/`--help` is
    /// present anywhere.
    ///
    /// # Examples
    ///
    /// ```
    /// use elegant_cli_core::*;
    ///
    /// let root = CommandNode::new("app")
    ///     .with_default_child("run")
    ///     .with_child(CommandNode::new("run").with_param(ParameterSpec::flag("-s").with_type("bool")))
    ///     .with_child(CommandNode::new("stop"));
    /// let engine = Engine::new(root).unwrap();
    ///
    /// let Outcome::Help(request) = engine.run(["-h"]).unwrap() else { panic!() };
    /// assert!(request.path.is_empty());
    ///
    /// let Outcome::Help(request) = engine.run(["-s", "-h"]).unwrap() else { panic!() };
    /// assert_eq!(request.path, ["run"]);
    /// ```
    ///
    /// # Errors
    ///
    /// Returns a [`UsageError`] when resolution fails.
    pub fn run<I, S>(&self, tokens: I) -> Result<Outcome, UsageError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let tokens: Vec<String> = tokens.into_iter().map(Into::into).collect();
        if tokens.iter().any(|token| help::is_help_token(token)) {
            let request = help::help_target(&self.root, &self.registry, &tokens);
            debug!(path = ?request.path, "Help requested");
            return Ok(Outcome::Help(request));
        }
        self.resolve(tokens).map(Outcome::Resolved)
    }

    /// Returns the command a help request in `tokens` would target, if the
    /// tokens contain a help flag.
    pub fn help_target<S: AsRef<str>>(&self, tokens: &[S]) -> Option<HelpRequest> {
        let tokens: Vec<String> = tokens.iter().map(|t| t.as_ref().to_string()).collect();
        tokens
            .iter()
            .any(|token| help::is_help_token(token))
            .then(|| help::help_target(&self.root, &self.registry, &tokens))
    }

    /// Exposes the structure of the command at `path` (command words below
    /// the root) for help rendering.
    pub fn describe<S: AsRef<str>>(&self, path: &[S]) -> Option<NodeHelp> {
        help::describe(&self.root, path)
    }
}
