//! Neo4j connection client.

use neo4rs::{ConfigBuilder, Graph, Query, Row};
use tracing::{debug, info, warn};

use crate::config::GraphConfig;
use crate::error::{GraphError, GraphResult};

/// Client for read-only Neo4j queries.
///
/// Cloning is cheap; clones share the driver's connection pool, which is
/// closed when the last clone is dropped.
#[derive(Clone)]
pub struct GraphClient {
    graph: Graph,
    uri: String,
}

impl GraphClient {
    /// Create a new GraphClient from config.
    ///
    /// neo4rs creates its pool lazily, so `Graph::connect` alone does not
    /// reach the server. A `RETURN 1` ping forces the bolt handshake, and the
    /// whole sequence is bounded by `config.connect_timeout`.
    pub async fn connect(config: &GraphConfig) -> GraphResult<Self> {
        config.validate()?;
        info!(uri = %config.uri, database = %config.database, "Connecting to Neo4j");

        let neo4j_config = ConfigBuilder::default()
            .uri(config.uri.as_str())
            .user(config.username.as_str())
            .password(config.password.as_str())
            .db(config.database.as_str())
            .max_connections(config.max_connections)
            .fetch_size(config.fetch_size)
            .build()
            .map_err(|e| GraphError::configuration(format!("Failed to build Neo4j config: {}", e)))?;

        let handshake = async {
            let graph = Graph::connect(neo4j_config).await.map_err(|e| {
                GraphError::connection(format!("Failed to create Neo4j connection pool: {}", e))
            })?;
            graph
                .run(Query::new("RETURN 1".to_string()))
                .await
                .map_err(|e| GraphError::connection(format!("Neo4j is not responding: {}", e)))?;
            Ok::<_, GraphError>(graph)
        };

        let graph = match tokio::time::timeout(config.connect_timeout, handshake).await {
            Ok(Ok(graph)) => graph,
            Ok(Err(e)) => {
                warn!(uri = %config.uri, error = %e, "Neo4j connection failed");
                return Err(e);
            }
            Err(_) => {
                warn!(uri = %config.uri, "Neo4j connection timed out");
                return Err(GraphError::connection(format!(
                    "Timed out after {:?} connecting to {}",
                    config.connect_timeout, config.uri
                )));
            }
        };

        Ok(Self {
            graph,
            uri: config.uri.clone(),
        })
    }

    /// Verify the server still answers queries.
    pub async fn ping(&self) -> GraphResult<()> {
        self.graph
            .run(Query::new("RETURN 1".to_string()))
            .await
            .map_err(|e| GraphError::connection(format!("Neo4j at {} is not responding: {}", self.uri, e)))
    }

    /// Execute a Cypher query and return results as rows.
    ///
    /// A connection is taken from the pool for the duration of the call and
    /// returned when the row stream is dropped.
    pub async fn query(&self, query: Query) -> GraphResult<Vec<Row>> {
        let mut stream = self
            .graph
            .execute(query)
            .await
            .map_err(|e| driver_error("Neo4j query failed", e))?;

        let mut rows = Vec::new();
        while let Some(row) = stream
            .next()
            .await
            .map_err(|e| driver_error("Failed to read Neo4j result", e))?
        {
            rows.push(row);
        }
        debug!(rows = rows.len(), "Neo4j query returned");
        Ok(rows)
    }

    /// Execute a query and collect one string column.
    pub async fn query_strings(&self, query: Query, field: &str) -> GraphResult<Vec<String>> {
        let rows = self.query(query).await?;
        rows.into_iter()
            .map(|row| {
                row.get::<String>(field).map_err(|e| {
                    GraphError::query(format!("Failed to get field '{}': {:?}", field, e))
                })
            })
            .collect()
    }
}

/// Map a driver error onto the error taxonomy.
///
/// Transport, handshake and authentication failures are connection errors
/// whenever they happen; everything else is a failed query.
fn driver_error(context: &str, err: neo4rs::Error) -> GraphError {
    match err {
        neo4rs::Error::IOError { .. }
        | neo4rs::Error::ConnectionError
        | neo4rs::Error::AuthenticationError(_)
        | neo4rs::Error::UnexpectedMessage(_) => {
            warn!(error = %err, "Lost connection to Neo4j");
            GraphError::connection(format!("{}: {}", context, err))
        }
        other => GraphError::query(format!("{}: {}", context, other)),
    }
}

/// Quote a label or relationship type for use inside a Cypher pattern.
///
/// Embedded back-ticks are doubled, which is Cypher's escape for quoted
/// identifiers.
pub fn quote_identifier(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}
