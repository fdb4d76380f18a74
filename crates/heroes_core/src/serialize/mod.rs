//! Payload shaping for API responses.
//!
//! # Responsibility
//! - Render graph nodes into JSON objects.
//! - Apply per-entity exclusion rules plus caller rules while descending.
//! - Restrict output to an allow-list of scalar fields when asked.
//!
//! # Invariants
//! - Exclusion rules always win over the default "render every
//!   relationship" behavior.
//! - With entity rules enabled, a hero renders at most two levels deep
//!   (hero -> link -> power) and never re-enters a link collection.
//! - Traversal deeper than the configured limit fails with
//!   `SerializeError::DepthExceeded` instead of recursing without bound.

use serde_json::{Map, Value};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod graph;
pub mod rules;

pub use graph::{Graph, Node, Relation};
pub use rules::RuleSet;

/// Nesting limit applied by [`Serializer::new`].
pub const DEFAULT_MAX_DEPTH: usize = 8;

/// Serialization failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SerializeError {
    /// Rule string is not of the form `-a.b`.
    InvalidRule(String),
    /// Allow-list names a field that is not a scalar column of the entity.
    UnknownField { entity: &'static str, field: String },
    /// Relationship nesting exceeded the configured limit.
    DepthExceeded { path: String, max_depth: usize },
    /// An entity could not be encoded into JSON columns.
    Encode { entity: &'static str, reason: String },
}

impl Display for SerializeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidRule(rule) => write!(f, "invalid serialization rule `{rule}`"),
            Self::UnknownField { entity, field } => {
                write!(f, "{entity} has no serializable field `{field}`")
            }
            Self::DepthExceeded { path, max_depth } => write!(
                f,
                "serialization exceeded max depth {max_depth} at `{path}`"
            ),
            Self::Encode { entity, reason } => write!(f, "failed to encode {entity}: {reason}"),
        }
    }
}

impl Error for SerializeError {}

/// Per-call options, mirroring `to_dict(only=..., rules=...)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SerializeOptions<'a> {
    /// Scalar fields to keep. Relationships are not expanded when set.
    pub only: Option<&'a [&'a str]>,
    /// Extra `-path` exclusions applied on top of entity rules.
    pub rules: &'a [&'a str],
}

impl<'a> SerializeOptions<'a> {
    pub fn only(fields: &'a [&'a str]) -> Self {
        Self {
            only: Some(fields),
            rules: &[],
        }
    }

    pub fn rules(rules: &'a [&'a str]) -> Self {
        Self { only: None, rules }
    }
}

/// Graph-to-JSON renderer.
#[derive(Debug, Clone, Copy)]
pub struct Serializer {
    max_depth: usize,
    entity_rules: bool,
}

impl Default for Serializer {
    fn default() -> Self {
        Self::new()
    }
}

impl Serializer {
    pub fn new() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            entity_rules: true,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Ignores the rules entity types declare; only caller rules apply.
    pub fn without_entity_rules(mut self) -> Self {
        self.entity_rules = false;
        self
    }

    /// Renders `node` as a JSON object.
    pub fn to_payload(
        &self,
        node: Node<'_>,
        options: &SerializeOptions<'_>,
    ) -> Result<Map<String, Value>, SerializeError> {
        let caller_rules = RuleSet::parse(options.rules)?;
        if let Some(only) = options.only {
            return self.render_only(node, only, &caller_rules);
        }
        self.render(node, caller_rules, 0, node.kind())
    }

    fn render_only(
        &self,
        node: Node<'_>,
        only: &[&str],
        rules: &RuleSet,
    ) -> Result<Map<String, Value>, SerializeError> {
        let columns = node.columns()?;
        if let Some(unknown) = only.iter().find(|field| !columns.contains_key(**field)) {
            return Err(SerializeError::UnknownField {
                entity: node.kind(),
                field: (*unknown).to_string(),
            });
        }

        Ok(columns
            .into_iter()
            .filter(|(name, _)| only.contains(&name.as_str()) && !rules.excludes(name))
            .collect())
    }

    fn render(
        &self,
        node: Node<'_>,
        mut rules: RuleSet,
        depth: usize,
        path: &str,
    ) -> Result<Map<String, Value>, SerializeError> {
        if self.entity_rules {
            rules.merge(&RuleSet::parse(node.entity_rules())?);
        }

        let mut payload = Map::new();
        for (name, value) in node.columns()? {
            if !rules.excludes(&name) {
                payload.insert(name, value);
            }
        }

        for (name, relation) in node.relations() {
            if rules.excludes(name) {
                continue;
            }
            let child_path = format!("{path}.{name}");
            if depth + 1 > self.max_depth {
                return Err(SerializeError::DepthExceeded {
                    path: child_path,
                    max_depth: self.max_depth,
                });
            }

            let child_rules = rules.descend(name);
            let value = match relation {
                Relation::One(None) => Value::Null,
                Relation::One(Some(child)) => Value::Object(self.render(
                    child,
                    child_rules,
                    depth + 1,
                    &child_path,
                )?),
                Relation::Many(children) => Value::Array(
                    children
                        .into_iter()
                        .map(|child| {
                            self.render(child, child_rules.clone(), depth + 1, &child_path)
                                .map(Value::Object)
                        })
                        .collect::<Result<Vec<_>, _>>()?,
                ),
            };
            payload.insert(name.to_string(), value);
        }

        Ok(payload)
    }
}

/// Renders `node` with the default serializer.
pub fn to_payload(
    node: Node<'_>,
    options: &SerializeOptions<'_>,
) -> Result<Map<String, Value>, SerializeError> {
    Serializer::new().to_payload(node, options)
}
