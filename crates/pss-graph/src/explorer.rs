//! Schema exploration over a [`SchemaBackend`].

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use tracing::info;

use crate::backend::{Neo4jBackend, SchemaBackend};
use crate::config::GraphConfig;
use crate::error::{GraphError, GraphResult};
use crate::schema::GraphSchema;

/// Reads node labels, relationship types and their property keys.
///
/// Stateless between calls: every operation re-queries the backend, so
/// results follow the live schema.
#[derive(Clone)]
pub struct SchemaExplorer {
    backend: Arc<dyn SchemaBackend>,
}

impl SchemaExplorer {
    /// Explore through an arbitrary backend.
    pub fn new(backend: Arc<dyn SchemaBackend>) -> Self {
        Self { backend }
    }

    /// Explore the Neo4j database described by `config`.
    ///
    /// No connection is made until the first operation.
    pub fn with_config(config: GraphConfig) -> Self {
        Self::new(Arc::new(Neo4jBackend::new(config)))
    }

    /// Read the configuration from the environment and explore that database.
    ///
    /// Fails with [`GraphError::Configuration`] before any network access if
    /// a required variable is missing.
    pub fn from_env() -> GraphResult<Self> {
        Ok(Self::with_config(GraphConfig::from_env()?))
    }

    /// Check that the database is reachable.
    pub async fn verify_connectivity(&self) -> GraphResult<()> {
        self.backend.ping().await
    }

    /// Fetch the complete schema.
    pub async fn get_schema(&self) -> GraphResult<GraphSchema> {
        let labels = self.backend.labels().await?;
        let rel_types = self.backend.relationship_types().await?;
        let property_keys: BTreeSet<String> = self.backend.property_keys().await?.into_iter().collect();

        let mut node_labels = BTreeMap::new();
        for label in labels {
            let props = self.backend.node_property_keys(&label).await?;
            node_labels.insert(label, props.into_iter().collect());
        }

        let mut relationship_types = BTreeMap::new();
        for rel_type in rel_types {
            let props = self.backend.relationship_property_keys(&rel_type).await?;
            relationship_types.insert(rel_type, props.into_iter().collect());
        }

        info!(
            labels = node_labels.len(),
            relationship_types = relationship_types.len(),
            property_keys = property_keys.len(),
            "Schema retrieved"
        );

        Ok(GraphSchema {
            node_labels,
            relationship_types,
            property_keys,
        })
    }

    /// Property keys observed on nodes carrying `label`.
    ///
    /// The set may be empty when the label exists but no node carries it.
    pub async fn get_node_properties(&self, label: &str) -> GraphResult<BTreeSet<String>> {
        let labels = self.backend.labels().await?;
        if !labels.iter().any(|l| l == label) {
            return Err(GraphError::InvalidLabel(label.to_string()));
        }
        Ok(self.backend.node_property_keys(label).await?.into_iter().collect())
    }

    /// Property keys observed on relationships of type `rel_type`.
    pub async fn get_relationship_properties(&self, rel_type: &str) -> GraphResult<BTreeSet<String>> {
        let types = self.backend.relationship_types().await?;
        if !types.iter().any(|t| t == rel_type) {
            return Err(GraphError::InvalidRelationshipType(rel_type.to_string()));
        }
        Ok(self
            .backend
            .relationship_property_keys(rel_type)
            .await?
            .into_iter()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ENV_PASSWORD, ENV_URI, ENV_USERNAME};
    use crate::mock::MockSchemaBackend;
    use std::time::Duration;

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn patent_backend() -> Arc<MockSchemaBackend> {
        Arc::new(
            MockSchemaBackend::new()
                .with_label("Patent", ["id", "title", "filing_date"])
                .with_label("Inventor", ["first_name", "last_name"])
                .with_relationship_type("CITES", ["date"])
                .with_relationship_type("INVENTED_BY", Vec::<String>::new())
                .with_property_key("abstract"),
        )
    }

    #[tokio::test]
    async fn test_patent_scenario() {
        let explorer = SchemaExplorer::new(patent_backend());

        let props = explorer.get_node_properties("Patent").await.unwrap();
        assert_eq!(props, set(&["id", "title", "filing_date"]));

        let props = explorer.get_relationship_properties("CITES").await.unwrap();
        assert_eq!(props, set(&["date"]));

        let err = explorer.get_node_properties("NonExistent").await.unwrap_err();
        assert!(matches!(err, GraphError::InvalidLabel(ref l) if l == "NonExistent"));
    }

    #[tokio::test]
    async fn test_unknown_relationship_type() {
        let explorer = SchemaExplorer::new(patent_backend());
        let err = explorer.get_relationship_properties("FUNDED_BY").await.unwrap_err();
        assert!(matches!(err, GraphError::InvalidRelationshipType(ref t) if t == "FUNDED_BY"));
    }

    #[tokio::test]
    async fn test_relationship_type_without_properties() {
        let explorer = SchemaExplorer::new(patent_backend());
        let props = explorer.get_relationship_properties("INVENTED_BY").await.unwrap();
        assert!(props.is_empty());
    }

    #[tokio::test]
    async fn test_get_schema() {
        let explorer = SchemaExplorer::new(patent_backend());
        let schema = explorer.get_schema().await.unwrap();

        assert_eq!(schema.node_labels.len(), 2);
        assert_eq!(schema.node_properties("Inventor"), Some(&set(&["first_name", "last_name"])));
        assert_eq!(schema.relationship_properties("INVENTED_BY"), Some(&set(&[])));
        assert!(schema.property_keys.contains("abstract"));
        assert!(schema.property_keys.contains("date"));
    }

    #[tokio::test]
    async fn test_node_properties_are_subset_of_schema() {
        let explorer = SchemaExplorer::new(patent_backend());
        let schema = explorer.get_schema().await.unwrap();

        for label in schema.label_names() {
            let props = explorer.get_node_properties(label).await.unwrap();
            assert!(props.is_subset(schema.node_properties(label).unwrap()));
            assert!(props.is_subset(&schema.property_keys));
        }
    }

    #[tokio::test]
    async fn test_get_schema_idempotent() {
        let explorer = SchemaExplorer::new(patent_backend());
        let first = explorer.get_schema().await.unwrap();
        let second = explorer.get_schema().await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_no_caching_between_calls() {
        let backend = patent_backend();
        let explorer = SchemaExplorer::new(backend.clone());

        assert!(explorer.get_node_properties("Assignee").await.is_err());
        backend.add_label("Assignee", ["name"]);
        let props = explorer.get_node_properties("Assignee").await.unwrap();
        assert_eq!(props, set(&["name"]));

        let before = backend.query_count();
        explorer.get_schema().await.unwrap();
        assert!(backend.query_count() > before);
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_connection_error() {
        let backend = patent_backend();
        backend.set_unreachable(true);
        let explorer = SchemaExplorer::new(backend);

        assert!(matches!(explorer.get_schema().await, Err(GraphError::Connection(_))));
        assert!(matches!(
            explorer.get_node_properties("Patent").await,
            Err(GraphError::Connection(_))
        ));
        assert!(matches!(explorer.verify_connectivity().await, Err(GraphError::Connection(_))));
    }

    #[test]
    fn test_missing_uri_fails_before_network() {
        let lookup = |key: &str| match key {
            k if k == ENV_USERNAME => Some("neo4j".to_string()),
            k if k == ENV_PASSWORD => Some("secret".to_string()),
            _ => None,
        };
        let err = GraphConfig::from_lookup(lookup).map(SchemaExplorer::with_config).err().unwrap();
        assert!(matches!(err, GraphError::Configuration(ref msg) if msg.contains(ENV_URI)));
    }

    #[tokio::test]
    async fn test_unreachable_neo4j_get_schema_is_connection_error() {
        let config = GraphConfig::new("bolt://127.0.0.1:1", "neo4j", "password")
            .unwrap()
            .with_connect_timeout(Duration::from_secs(2));
        let explorer = SchemaExplorer::with_config(config);

        let result = tokio::time::timeout(Duration::from_secs(10), explorer.get_schema())
            .await
            .expect("get_schema must not hang");
        assert!(matches!(result, Err(GraphError::Connection(_))));
    }
}
