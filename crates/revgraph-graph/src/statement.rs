//! Bulk CREATE statement construction.
//!
//! A [`GraphStatement`] collects node and relationship declarations and
//! renders them as one Cypher `CREATE` clause. Node aliases are derived from a
//! per-label counter (`reviewer_0`, `product_3`), never from the identifier
//! itself, and every identifier or property value is bound as a parameter.
//! Relationships can only be declared between aliases handed out by
//! [`GraphStatement::node`], so a relationship never references a node the
//! statement does not also create.

use std::collections::HashMap;
use std::fmt;

use anyhow::{bail, Result};
use serde::Serialize;

/// A value bound to a statement parameter.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ParamValue {
    Str(String),
    Int(i64),
    Float(f64),
}

impl From<&str> for ParamValue {
    fn from(v: &str) -> Self {
        Self::Str(v.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

impl From<i64> for ParamValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for ParamValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

/// Cypher text plus its bound parameters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Statement {
    pub text: String,
    pub params: Vec<(String, ParamValue)>,
}

impl Statement {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into(), params: Vec::new() }
    }

    pub fn param(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }

    pub fn get_param(&self, key: &str) -> Option<&ParamValue> {
        self.params.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}

/// Node classes and their graph labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Reviewer,
    Product,
    Type,
}

impl NodeKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Reviewer => "REVIEWER",
            Self::Product => "PRODUCT",
            Self::Type => "TYPE",
        }
    }

    /// The single identifying property.
    pub fn key(self) -> &'static str {
        match self {
            Self::Reviewer => "reviewerID",
            Self::Product => "asin",
            Self::Type => "name",
        }
    }

    fn alias_prefix(self) -> &'static str {
        match self {
            Self::Reviewer => "reviewer",
            Self::Product => "product",
            Self::Type => "type",
        }
    }
}

/// Statement-local node alias.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Alias(String);

impl Alias {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Alias {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone)]
struct NodeDecl {
    alias: Alias,
    kind: NodeKind,
    id: String,
}

#[derive(Debug, Clone)]
struct RelDecl {
    from: Alias,
    rel_type: &'static str,
    to: Alias,
    props: Vec<(&'static str, ParamValue)>,
}

/// Accumulates declarations for one bulk CREATE.
#[derive(Debug, Clone, Default)]
pub struct GraphStatement {
    nodes: Vec<NodeDecl>,
    aliases: HashMap<(NodeKind, String), Alias>,
    counters: HashMap<NodeKind, usize>,
    relationships: Vec<RelDecl>,
}

impl GraphStatement {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a node, or return the alias of the existing declaration for
    /// the same kind and identifier.
    pub fn node(&mut self, kind: NodeKind, id: &str) -> Alias {
        if let Some(alias) = self.aliases.get(&(kind, id.to_string())) {
            return alias.clone();
        }

        let counter = self.counters.entry(kind).or_insert(0);
        let alias = Alias(format!("{}_{}", kind.alias_prefix(), counter));
        *counter += 1;

        self.aliases.insert((kind, id.to_string()), alias.clone());
        self.nodes.push(NodeDecl { alias: alias.clone(), kind, id: id.to_string() });
        alias
    }

    /// Declare a directed relationship between two declared nodes.
    pub fn relate(
        &mut self,
        from: &Alias,
        rel_type: &'static str,
        to: &Alias,
        props: Vec<(&'static str, ParamValue)>,
    ) {
        self.relationships.push(RelDecl {
            from: from.clone(),
            rel_type,
            to: to.clone(),
            props,
        });
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn relationship_count(&self) -> usize {
        self.relationships.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Render as `CREATE` followed by comma-joined declarations, nodes first.
    pub fn render(&self) -> Result<Statement> {
        if self.is_empty() {
            bail!("Graph statement declares no nodes");
        }

        let mut params = Vec::with_capacity(self.nodes.len() + self.relationships.len());

        let node_fragments: Vec<String> = self
            .nodes
            .iter()
            .map(|n| {
                params.push((n.alias.to_string(), ParamValue::Str(n.id.clone())));
                format!("({}:{} {{{}: ${}}})", n.alias, n.kind.label(), n.kind.key(), n.alias)
            })
            .collect();

        let rel_fragments: Vec<String> = self
            .relationships
            .iter()
            .enumerate()
            .map(|(i, r)| {
                let props = r
                    .props
                    .iter()
                    .map(|(key, value)| {
                        let name = format!("r{}_{}", i, key);
                        let fragment = format!("{}: ${}", key, name);
                        params.push((name, value.clone()));
                        fragment
                    })
                    .collect::<Vec<_>>();

                if props.is_empty() {
                    format!("({})-[:{}]->({})", r.from, r.rel_type, r.to)
                } else {
                    format!("({})-[:{} {{{}}}]->({})", r.from, r.rel_type, props.join(", "), r.to)
                }
            })
            .collect();

        let mut groups = vec![node_fragments.join(",\n")];
        if !rel_fragments.is_empty() {
            groups.push(rel_fragments.join(",\n"));
        }

        Ok(Statement {
            text: format!("CREATE\n{}", groups.join(",\n\n")),
            params,
        })
    }
}
