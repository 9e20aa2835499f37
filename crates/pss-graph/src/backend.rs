//! Schema introspection backends.

use async_trait::async_trait;
use neo4rs::Query;
use tokio::sync::OnceCell;
use tracing::debug;

use crate::client::{quote_identifier, GraphClient};
use crate::config::GraphConfig;
use crate::error::GraphResult;

/// Read-only schema introspection over a graph database.
///
/// Every method issues a fresh query; implementations must not cache
/// results between calls.
#[async_trait]
pub trait SchemaBackend: Send + Sync {
    /// Verify the database is reachable.
    async fn ping(&self) -> GraphResult<()>;

    /// All node labels, in database order.
    async fn labels(&self) -> GraphResult<Vec<String>>;

    /// All relationship types, in database order.
    async fn relationship_types(&self) -> GraphResult<Vec<String>>;

    /// Every property key known to the database.
    async fn property_keys(&self) -> GraphResult<Vec<String>>;

    /// Distinct property keys found on nodes carrying `label`.
    async fn node_property_keys(&self, label: &str) -> GraphResult<Vec<String>>;

    /// Distinct property keys found on relationships of type `rel_type`.
    async fn relationship_property_keys(&self, rel_type: &str) -> GraphResult<Vec<String>>;
}

/// Neo4j-backed schema introspection.
///
/// The driver connects on first use. A failed attempt is not remembered,
/// so the next call tries again.
pub struct Neo4jBackend {
    config: GraphConfig,
    client: OnceCell<GraphClient>,
}

impl Neo4jBackend {
    pub fn new(config: GraphConfig) -> Self {
        Self {
            config,
            client: OnceCell::new(),
        }
    }

    async fn client(&self) -> GraphResult<&GraphClient> {
        self.client
            .get_or_try_init(|| GraphClient::connect(&self.config))
            .await
    }

    async fn strings(&self, cypher: String, field: &str) -> GraphResult<Vec<String>> {
        debug!(query = %cypher, "Running schema query");
        self.client()
            .await?
            .query_strings(Query::new(cypher), field)
            .await
    }
}

#[async_trait]
impl SchemaBackend for Neo4jBackend {
    async fn ping(&self) -> GraphResult<()> {
        self.client().await?.ping().await
    }

    async fn labels(&self) -> GraphResult<Vec<String>> {
        self.strings("CALL db.labels() YIELD label RETURN label".to_string(), "label")
            .await
    }

    async fn relationship_types(&self) -> GraphResult<Vec<String>> {
        self.strings(
            "CALL db.relationshipTypes() YIELD relationshipType RETURN relationshipType".to_string(),
            "relationshipType",
        )
        .await
    }

    async fn property_keys(&self) -> GraphResult<Vec<String>> {
        self.strings(
            "CALL db.propertyKeys() YIELD propertyKey RETURN propertyKey".to_string(),
            "propertyKey",
        )
        .await
    }

    async fn node_property_keys(&self, label: &str) -> GraphResult<Vec<String>> {
        self.strings(node_property_query(label), "key").await
    }

    async fn relationship_property_keys(&self, rel_type: &str) -> GraphResult<Vec<String>> {
        self.strings(relationship_property_query(rel_type), "key").await
    }
}

fn node_property_query(label: &str) -> String {
    format!(
        "MATCH (n:{})
         WITH DISTINCT keys(n) AS keys
         UNWIND keys AS key
         RETURN DISTINCT key",
        quote_identifier(label)
    )
}

fn relationship_property_query(rel_type: &str) -> String {
    format!(
        "MATCH ()-[r:{}]->()
         WITH DISTINCT keys(r) AS keys
         UNWIND keys AS key
         RETURN DISTINCT key",
        quote_identifier(rel_type)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_property_query_quotes_label() {
        let q = node_property_query("Patent");
        assert!(q.starts_with("MATCH (n:`Patent`)"));
        assert!(q.contains("RETURN DISTINCT key"));
    }

    #[test]
    fn test_relationship_property_query_quotes_type() {
        let q = relationship_property_query("CITES");
        assert!(q.starts_with("MATCH ()-[r:`CITES`]->()"));

        let q = relationship_property_query("BAD`TYPE");
        assert!(q.starts_with("MATCH ()-[r:`BAD``TYPE`]->()"));
    }
}
