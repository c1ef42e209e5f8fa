//! Neo4j connection client.

use anyhow::{Context, Result};
use async_trait::async_trait;
use neo4rs::{ConfigBuilder, Graph, Query};
use serde::de::DeserializeOwned;
use tracing::debug;

use revgraph_core::config::GraphSettings;

use crate::statement::{ParamValue, Statement};
use crate::store::{GraphCounts, GraphStore, Record};

/// Client for Neo4j statement execution.
#[derive(Clone)]
pub struct GraphClient {
    graph: Graph,
}

impl GraphClient {
    /// Connect using the given settings.
    ///
    /// `Graph::connect` only builds a lazy pool, so a `RETURN 1` ping follows
    /// to surface bad credentials or an unreachable server immediately.
    pub async fn connect(settings: &GraphSettings) -> Result<Self> {
        let config = ConfigBuilder::default()
            .uri(&settings.uri)
            .user(&settings.user)
            .password(&settings.password)
            .db(settings.db.as_str())
            .max_connections(2)
            .fetch_size(500)
            .build()
            .context("Failed to build Neo4j config")?;

        let graph = Graph::connect(config)
            .await
            .context("Failed to create Neo4j connection pool")?;

        graph
            .run(Query::new("RETURN 1".to_string()))
            .await
            .with_context(|| format!("Neo4j at {} is not responding to queries", settings.uri))?;

        debug!(uri = %settings.uri, "Connected to Neo4j");
        Ok(Self { graph })
    }

    /// Execute a query and return its raw rows.
    pub async fn query(&self, query: Query) -> Result<Vec<neo4rs::Row>> {
        let mut result = self.graph.execute(query).await.context("Neo4j query failed")?;

        let mut rows = Vec::new();
        while let Some(row) = result.next().await.context("Failed to read Neo4j result")? {
            rows.push(row);
        }
        Ok(rows)
    }

    /// Execute a query and return a single field of the first row.
    pub async fn query_scalar<T: DeserializeOwned>(&self, query: Query, field: &str) -> Result<Option<T>> {
        let rows = self.query(query).await?;
        if let Some(row) = rows.into_iter().next() {
            let val: T = row
                .get(field)
                .map_err(|e| anyhow::anyhow!("Failed to get field '{}': {:?}", field, e))?;
            Ok(Some(val))
        } else {
            Ok(None)
        }
    }
}

fn to_query(statement: &Statement) -> Query {
    statement
        .params
        .iter()
        .fold(Query::new(statement.text.clone()), |q, (key, value)| match value {
            ParamValue::Str(s) => q.param(key, s.clone()),
            ParamValue::Int(n) => q.param(key, *n),
            ParamValue::Float(f) => q.param(key, *f),
        })
}

fn to_record(row: &neo4rs::Row) -> Record {
    match row.to::<Record>() {
        Ok(record) => record,
        Err(_) => {
            // Rows holding nodes or paths do not map onto plain JSON.
            let mut record = Record::new();
            record.insert("row".to_string(), serde_json::Value::String(format!("{:?}", row)));
            record
        }
    }
}

#[async_trait]
impl GraphStore for GraphClient {
    async fn run(&self, statement: &Statement) -> Result<Vec<Record>> {
        debug!(params = statement.params.len(), "Running statement");
        let rows = self.query(to_query(statement)).await?;
        Ok(rows.iter().map(to_record).collect())
    }

    async fn counts(&self) -> Result<GraphCounts> {
        let node_query = Query::new("MATCH (n) RETURN count(n) AS count".to_string());
        let rel_query = Query::new("MATCH ()-[r]->() RETURN count(r) AS count".to_string());

        let nodes: i64 = self.query_scalar(node_query, "count").await?.unwrap_or(0);
        let relationships: i64 = self.query_scalar(rel_query, "count").await?.unwrap_or(0);

        Ok(GraphCounts {
            nodes: nodes as usize,
            relationships: relationships as usize,
        })
    }
}
