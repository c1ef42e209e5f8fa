//! Test helpers: a CREATE-statement parser and an in-memory graph store.

use std::collections::{BTreeMap, HashSet};
use std::sync::Mutex;

use anyhow::{bail, Result};
use async_trait::async_trait;
use serde_json::json;

use crate::statement::Statement;
use crate::store::{GraphCounts, GraphStore, Record, VERIFY, WIPE};

#[derive(Debug, Default)]
pub struct ParsedCreate {
    /// `(alias, label)`
    pub nodes: Vec<(String, String)>,
    /// `(from, rel_type, to)`
    pub relationships: Vec<(String, String, String)>,
}

impl ParsedCreate {
    pub fn declared(&self) -> HashSet<&str> {
        self.nodes.iter().map(|(a, _)| a.as_str()).collect()
    }

    pub fn labelled(&self, label: &str) -> usize {
        self.nodes.iter().filter(|(_, l)| l == label).count()
    }

    /// Every relationship endpoint is declared, and every alias is declared once.
    pub fn assert_referentially_complete(&self) {
        let declared = self.declared();
        assert_eq!(declared.len(), self.nodes.len(), "duplicate node declaration");
        for (from, _, to) in &self.relationships {
            assert!(declared.contains(from.as_str()), "undeclared alias {from}");
            assert!(declared.contains(to.as_str()), "undeclared alias {to}");
        }
    }
}

fn between<'a>(s: &'a str, start: &str, end: char) -> &'a str {
    let from = s.find(start).map(|i| i + start.len()).unwrap_or(0);
    let rest = &s[from..];
    let to = rest.find(end).unwrap_or(rest.len());
    &rest[..to]
}

/// Split a rendered CREATE statement back into declarations.
pub fn parse_create(text: &str) -> ParsedCreate {
    let body = text.strip_prefix("CREATE\n").expect("statement must start with CREATE");
    assert!(!body.trim_end().ends_with(','), "trailing separator");

    let mut parsed = ParsedCreate::default();
    for fragment in body.split(",\n").map(str::trim).filter(|f| !f.is_empty()) {
        if let Some(arrow) = fragment.find("->(") {
            let from = between(fragment, "(", ')').to_string();
            let rel_type = between(fragment, "[:", ']')
                .split_whitespace()
                .next()
                .unwrap_or_default()
                .to_string();
            let to = between(&fragment[arrow..], "->(", ')').to_string();
            parsed.relationships.push((from, rel_type, to));
        } else {
            let alias = between(fragment, "(", ':').to_string();
            let label = between(fragment, ":", ' ').to_string();
            parsed.nodes.push((alias, label));
        }
    }
    parsed
}

#[derive(Debug, Default)]
struct FakeState {
    labels: BTreeMap<String, usize>,
    relationships: usize,
    executed: Vec<String>,
}

/// Graph store that understands wipe, bulk CREATE and the verification read.
/// Any other statement is logged and returns one `{"ok": true}` record.
#[derive(Debug, Default)]
pub struct FakeStore {
    state: Mutex<FakeState>,
    fail_on: Option<String>,
}

impl FakeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail any statement whose text contains `needle`.
    pub fn failing_on(needle: &str) -> Self {
        Self { fail_on: Some(needle.to_string()), ..Self::default() }
    }

    /// Pre-populate as if an earlier run had left data behind.
    pub fn with_leftovers(nodes: usize, relationships: usize) -> Self {
        let store = Self::default();
        {
            let mut state = store.state.lock().unwrap();
            state.labels.insert("STALE".to_string(), nodes);
            state.relationships = relationships;
        }
        store
    }

    pub fn executed(&self) -> Vec<String> {
        self.state.lock().unwrap().executed.clone()
    }
}

#[async_trait]
impl GraphStore for FakeStore {
    async fn run(&self, statement: &Statement) -> Result<Vec<Record>> {
        if let Some(needle) = &self.fail_on {
            if statement.text.contains(needle.as_str()) {
                bail!("fake store rejected statement");
            }
        }

        let mut state = self.state.lock().unwrap();
        state.executed.push(statement.text.clone());

        if statement.text == WIPE {
            state.labels.clear();
            state.relationships = 0;
            return Ok(Vec::new());
        }

        if statement.text == VERIFY {
            return Ok(state
                .labels
                .iter()
                .map(|(label, n)| {
                    let mut r = Record::new();
                    r.insert("label".into(), json!(label));
                    r.insert("nodes".into(), json!(n));
                    r
                })
                .collect());
        }

        if statement.text.starts_with("CREATE\n") {
            let parsed = parse_create(&statement.text);
            for (_, label) in &parsed.nodes {
                *state.labels.entry(label.clone()).or_insert(0) += 1;
            }
            state.relationships += parsed.relationships.len();
            return Ok(Vec::new());
        }

        let mut r = Record::new();
        r.insert("ok".into(), json!(true));
        Ok(vec![r])
    }

    async fn counts(&self) -> Result<GraphCounts> {
        let state = self.state.lock().unwrap();
        Ok(GraphCounts {
            nodes: state.labels.values().sum(),
            relationships: state.relationships,
        })
    }
}
