//! Type registry mapping type tags to coercion functions.
//!
//! Parameters name their type with a string tag (`"int"`, `"list"`, or any
//! tag the caller registers). The registry resolves those tags to a
//! [`TypeEntry`], which knows how many value tokens the type consumes
//! ([`TypeKind`]) and how to turn raw tokens into a [`Value`].
//!
//! A registry is populated before an [`Engine`](crate::Engine) is built and
//! is snapshotted into it; registering types afterwards has no effect on
//! engines that already exist.
//!
//! # Examples
//!
//! ```
//! use elegant_cli_core::{TypeRegistry, Value};
//!
//! let mut registry = TypeRegistry::builtin();
//! registry.register("shout", |raw: &str| Ok(Value::Str(format!("{}!!!", raw.to_uppercase()))));
//!
//! assert!(registry.contains("shout"));
//! assert_eq!(registry.coerce("shout", "hello"), Ok(Value::Str("HELLO!!!".into())));
//! assert_eq!(registry.coerce("int", "42"), Ok(Value::Int(42)));
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::value::{Literal, Value};

/// Coercion function: raw token to value, or a human-readable reason.
pub type Coercer = Arc<dyn Fn(&str) -> Result<Value, String> + Send + Sync>;

/// Validity predicate applied to every coerced value.
pub type Check = Arc<dyn Fn(&Value) -> bool + Send + Sync>;

/// Type tags seeded into every [`TypeRegistry::builtin`] registry.
pub const BUILTIN_TAGS: &[&str] = &["str", "int", "float", "bool", "list"];

/// Tag used when a parameter does not declare a type.
pub const DEFAULT_TYPE_TAG: &str = "str";

/// Arity class of a type.
///
/// The kind decides how many tokens a flag of this type consumes: none for
/// [`Bool`](TypeKind::Bool), one or more for [`List`](TypeKind::List), and
/// exactly one for everything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    Str,
    Int,
    Float,
    Bool,
    List,
    /// Caller-registered scalar type.
    Custom,
}

impl TypeKind {
    /// Returns `true` if flags of this kind never take a value token.
    pub fn is_switch(self) -> bool {
        matches!(self, Self::Bool)
    }

    /// Returns `true` if parameters of this kind collect several tokens.
    pub fn is_list(self) -> bool {
        matches!(self, Self::List)
    }
}

/// A registered type: its tag, arity and coercion.
#[derive(Clone)]
pub struct TypeEntry {
    tag: String,
    kind: TypeKind,
    coerce: Coercer,
    check: Option<Check>,
}

impl fmt::Debug for TypeEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeEntry")
            .field("tag", &self.tag)
            .field("kind", &self.kind)
            .field("check", &self.check.is_some())
            .finish_non_exhaustive()
    }
}

impl TypeEntry {
    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn kind(&self) -> TypeKind {
        self.kind
    }

    /// Coerces a single raw token.
    ///
    /// For `list` types this coerces one item, not the whole list; use
    /// [`coerce_list`](Self::coerce_list) for the full value.
    pub fn coerce(&self, raw: &str) -> Result<Value, String> {
        let value = (self.coerce)(raw)?;
        self.verify(value)
    }

    /// Coerces a run of tokens into a [`Value::List`].
    pub fn coerce_list(&self, raw: &[String]) -> Result<Value, String> {
        let mut items = Vec::with_capacity(raw.len());
        for token in raw {
            match (self.coerce)(token)? {
                Value::Str(s) => items.push(s),
                other => items.push(other.to_string()),
            }
        }
        self.verify(Value::List(items))
    }

    /// Turns a configured default or override literal into a value.
    ///
    /// Returns `Ok(None)` for `null`. Scalar literals are stringified and
    /// coerced, so `5` and `"5"` are equivalent for an `int` type.
    pub fn adopt(&self, literal: &Literal) -> Result<Option<Value>, String> {
        match (self.kind, literal) {
            (_, Literal::Null) => Ok(None),
            (TypeKind::List, Literal::Array(items)) => {
                let tokens = items
                    .iter()
                    .map(literal_token)
                    .collect::<Result<Vec<_>, _>>()?;
                self.coerce_list(&tokens).map(Some)
            }
            (TypeKind::List, _) => Err(format!("expected a list for type '{}'", self.tag)),
            (_, Literal::Array(_)) => Err(format!("a list is not a valid '{}' value", self.tag)),
            (TypeKind::Bool, Literal::Bool(b)) => self.verify(Value::Bool(*b)).map(Some),
            (TypeKind::Custom, Literal::Object(_)) => {
                self.verify(Value::Custom(literal.clone())).map(Some)
            }
            (_, scalar) => self.coerce(&literal_token(scalar)?).map(Some),
        }
    }

    fn verify(&self, value: Value) -> Result<Value, String> {
        match &self.check {
            Some(check) if !check(&value) => Err(format!(
                "value '{value}' is not a valid '{}'",
                self.tag
            )),
            _ => Ok(value),
        }
    }
}

fn literal_token(literal: &Literal) -> Result<String, String> {
    match literal {
        Literal::String(s) => Ok(s.clone()),
        Literal::Number(n) => Ok(n.to_string()),
        Literal::Bool(b) => Ok(b.to_string()),
        Literal::Null => Err("null is not a valid item".to_string()),
        Literal::Array(_) | Literal::Object(_) => Err("nested values are not supported".to_string()),
    }
}

/// Table of known type tags.
///
/// Cloning is cheap: coercion functions are reference counted.
#[derive(Debug, Clone)]
pub struct TypeRegistry {
    entries: HashMap<String, TypeEntry>,
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl TypeRegistry {
    /// Creates an empty registry with no types at all.
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Creates a registry seeded with `str`, `int`, `float`, `bool` and `list`.
    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        registry.insert("str", TypeKind::Str, Arc::new(coerce_str), None);
        registry.insert("int", TypeKind::Int, Arc::new(coerce_int), None);
        registry.insert("float", TypeKind::Float, Arc::new(coerce_float), None);
        registry.insert("bool", TypeKind::Bool, Arc::new(coerce_bool), None);
        registry.insert("list", TypeKind::List, Arc::new(coerce_str), None);
        registry
    }

    /// Registers (or replaces) a type.
    ///
    /// A new tag is a single-valued custom type. Replacing an existing tag
    /// keeps its arity, so overriding `list` still collects several tokens
    /// and overriding `bool` still takes no value.
    pub fn register<F>(&mut self, tag: impl Into<String>, coerce: F)
    where
        F: Fn(&str) -> Result<Value, String> + Send + Sync + 'static,
    {
        let tag = tag.into();
        let kind = self.kind_for(&tag);
        self.insert(tag, kind, Arc::new(coerce), None);
    }

    /// Registers (or replaces) a type with a validity predicate that every
    /// coerced value must satisfy.
    pub fn register_with_check<F, C>(&mut self, tag: impl Into<String>, coerce: F, check: C)
    where
        F: Fn(&str) -> Result<Value, String> + Send + Sync + 'static,
        C: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        let tag = tag.into();
        let kind = self.kind_for(&tag);
        self.insert(tag, kind, Arc::new(coerce), Some(Arc::new(check)));
    }

    fn kind_for(&self, tag: &str) -> TypeKind {
        self.entries
            .get(tag)
            .map(|entry| entry.kind)
            .unwrap_or(TypeKind::Custom)
    }

    fn insert(&mut self, tag: impl Into<String>, kind: TypeKind, coerce: Coercer, check: Option<Check>) {
        let tag = tag.into();
        self.entries.insert(
            tag.clone(),
            TypeEntry {
                tag,
                kind,
                coerce,
                check,
            },
        );
    }

    pub fn get(&self, tag: &str) -> Option<&TypeEntry> {
        self.entries.get(tag)
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.entries.contains_key(tag)
    }

    /// Returns all registered tags, sorted.
    pub fn tags(&self) -> Vec<&str> {
        let mut tags: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        tags.sort_unstable();
        tags
    }

    /// Coerces one raw token with the type registered under `tag`.
    pub fn coerce(&self, tag: &str, raw: &str) -> Result<Value, String> {
        self.lookup(tag)?.coerce(raw)
    }

    /// Coerces a run of tokens with the list type registered under `tag`.
    pub fn coerce_list(&self, tag: &str, raw: &[String]) -> Result<Value, String> {
        self.lookup(tag)?.coerce_list(raw)
    }

    /// Turns a configured literal into a value of type `tag`.
    ///
    /// # Examples
    ///
    /// ```
    /// use elegant_cli_core::{TypeRegistry, Value};
    /// use serde_json::json;
    ///
    /// let registry = TypeRegistry::builtin();
    /// assert_eq!(registry.adopt("int", &json!("5")), Ok(Some(Value::Int(5))));
    /// assert_eq!(registry.adopt("int", &json!(5)), Ok(Some(Value::Int(5))));
    /// assert_eq!(registry.adopt("str", &json!(null)), Ok(None));
    /// assert!(registry.adopt("list", &json!("a")).is_err());
    /// ```
    pub fn adopt(&self, tag: &str, literal: &Literal) -> Result<Option<Value>, String> {
        self.lookup(tag)?.adopt(literal)
    }

    fn lookup(&self, tag: &str) -> Result<&TypeEntry, String> {
        self.get(tag).ok_or_else(|| format!("unknown type '{tag}'"))
    }
}

fn coerce_str(raw: &str) -> Result<Value, String> {
    Ok(Value::Str(raw.to_string()))
}

fn coerce_int(raw: &str) -> Result<Value, String> {
    raw.trim()
        .parse::<i64>()
        .map(Value::Int)
        .map_err(|_| format!("invalid int value: '{raw}'"))
}

fn coerce_float(raw: &str) -> Result<Value, String> {
    raw.trim()
        .parse::<f64>()
        .map(Value::Float)
        .map_err(|_| format!("invalid float value: '{raw}'"))
}

fn coerce_bool(raw: &str) -> Result<Value, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(Value::Bool(true)),
        "false" | "no" | "off" | "0" => Ok(Value::Bool(false)),
        _ => Err(format!("invalid bool value: '{raw}'")),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_builtin_tags_present() {
        let registry = TypeRegistry::builtin();
        assert_eq!(registry.tags(), vec!["bool", "float", "int", "list", "str"]);
        for tag in BUILTIN_TAGS {
            assert!(registry.contains(tag));
        }
    }

    #[test]
    fn test_builtin_coercions() {
        let registry = TypeRegistry::builtin();
        assert_eq!(registry.coerce("int", "-7"), Ok(Value::Int(-7)));
        assert_eq!(registry.coerce("float", "2.5"), Ok(Value::Float(2.5)));
        assert_eq!(registry.coerce("bool", "Yes"), Ok(Value::Bool(true)));
        assert_eq!(registry.coerce("bool", "off"), Ok(Value::Bool(false)));
        assert!(registry.coerce("int", "abc").is_err());
        assert!(registry.coerce("bool", "maybe").is_err());
    }

    #[test]
    fn test_coerce_list_collects_strings() {
        let registry = TypeRegistry::builtin();
        let value = registry
            .coerce_list("list", &[".py".to_string(), ".js".to_string()])
            .unwrap();
        assert_eq!(value, Value::List(vec![".py".into(), ".js".into()]));
    }

    #[test]
    fn test_register_replaces_and_keeps_kind() {
        let mut registry = TypeRegistry::builtin();
        registry.register("bool", |_: &str| Ok(Value::Bool(true)));
        assert_eq!(registry.get("bool").unwrap().kind(), TypeKind::Bool);

        registry.register("date", |raw: &str| Ok(Value::Str(raw.to_string())));
        assert_eq!(registry.get("date").unwrap().kind(), TypeKind::Custom);
    }

    #[test]
    fn test_register_with_check_rejects() {
        let mut registry = TypeRegistry::builtin();
        registry.register_with_check(
            "port",
            |raw: &str| raw.parse::<i64>().map(Value::Int).map_err(|e| e.to_string()),
            |value: &Value| value.as_int().is_some_and(|n| (1..=65535).contains(&n)),
        );
        assert_eq!(registry.coerce("port", "8080"), Ok(Value::Int(8080)));
        let err = registry.coerce("port", "70000").unwrap_err();
        assert!(err.contains("not a valid 'port'"));
    }

    #[test]
    fn test_adopt_literals() {
        let registry = TypeRegistry::builtin();
        assert_eq!(registry.adopt("bool", &json!(false)), Ok(Some(Value::Bool(false))));
        assert_eq!(registry.adopt("float", &json!(1)), Ok(Some(Value::Float(1.0))));
        assert_eq!(registry.adopt("str", &json!(3)), Ok(Some(Value::Str("3".into()))));
        assert_eq!(
            registry.adopt("list", &json!(["a", 1])),
            Ok(Some(Value::List(vec!["a".into(), "1".into()])))
        );
        assert!(registry.adopt("int", &json!(5.5)).is_err());
        assert!(registry.adopt("str", &json!(["a"])).is_err());
        assert!(registry.adopt("nope", &json!("a")).is_err());
    }
}
