//! In-memory schema backend for testing.
//!
//! Only built for tests or with the `test-util` feature.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::RwLock;

use crate::backend::SchemaBackend;
use crate::error::{GraphError, GraphResult};

#[derive(Debug, Default, Clone)]
struct MockData {
    labels: Vec<(String, Vec<String>)>,
    relationship_types: Vec<(String, Vec<String>)>,
    extra_property_keys: Vec<String>,
}

/// Mock schema backend holding labels and relationship types in insertion order.
#[derive(Debug, Default)]
pub struct MockSchemaBackend {
    data: RwLock<MockData>,
    unreachable: AtomicBool,
    queries: AtomicUsize,
}

impl MockSchemaBackend {
    /// Create an empty mock backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node label with the given property keys.
    pub fn with_label<I, S>(self, label: &str, properties: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.add_label(label, properties);
        self
    }

    /// Add a relationship type with the given property keys.
    pub fn with_relationship_type<I, S>(self, rel_type: &str, properties: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.add_relationship_type(rel_type, properties);
        self
    }

    /// Register a property key that no current node or relationship carries.
    pub fn with_property_key(self, key: &str) -> Self {
        self.data
            .write()
            .unwrap()
            .extra_property_keys
            .push(key.to_string());
        self
    }

    /// Add or replace a label, simulating a concurrent schema change.
    pub fn add_label<I, S>(&self, label: &str, properties: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let props: Vec<String> = properties.into_iter().map(Into::into).collect();
        let mut data = self.data.write().unwrap();
        match data.labels.iter_mut().find(|(l, _)| l == label) {
            Some(entry) => entry.1 = props,
            None => data.labels.push((label.to_string(), props)),
        }
    }

    /// Add or replace a relationship type.
    pub fn add_relationship_type<I, S>(&self, rel_type: &str, properties: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let props: Vec<String> = properties.into_iter().map(Into::into).collect();
        let mut data = self.data.write().unwrap();
        match data.relationship_types.iter_mut().find(|(t, _)| t == rel_type) {
            Some(entry) => entry.1 = props,
            None => data.relationship_types.push((rel_type.to_string(), props)),
        }
    }

    /// Make every subsequent call fail with a connection error.
    pub fn set_unreachable(&self, unreachable: bool) {
        self.unreachable.store(unreachable, Ordering::SeqCst);
    }

    /// Number of queries served so far.
    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    fn read(&self) -> GraphResult<std::sync::RwLockReadGuard<'_, MockData>> {
        if self.unreachable.load(Ordering::SeqCst) {
            return Err(GraphError::connection("mock database is unreachable"));
        }
        self.queries.fetch_add(1, Ordering::SeqCst);
        Ok(self.data.read().unwrap())
    }
}

fn dedup(keys: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for key in keys {
        if !out.contains(&key) {
            out.push(key);
        }
    }
    out
}

#[async_trait]
impl SchemaBackend for MockSchemaBackend {
    async fn ping(&self) -> GraphResult<()> {
        self.read().map(|_| ())
    }

    async fn labels(&self) -> GraphResult<Vec<String>> {
        Ok(self.read()?.labels.iter().map(|(l, _)| l.clone()).collect())
    }

    async fn relationship_types(&self) -> GraphResult<Vec<String>> {
        Ok(self
            .read()?
            .relationship_types
            .iter()
            .map(|(t, _)| t.clone())
            .collect())
    }

    async fn property_keys(&self) -> GraphResult<Vec<String>> {
        let data = self.read()?;
        let keys = data
            .labels
            .iter()
            .chain(data.relationship_types.iter())
            .flat_map(|(_, props)| props.iter().cloned())
            .chain(data.extra_property_keys.iter().cloned());
        Ok(dedup(keys))
    }

    async fn node_property_keys(&self, label: &str) -> GraphResult<Vec<String>> {
        let data = self.read()?;
        Ok(data
            .labels
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, props)| dedup(props.iter().cloned()))
            .unwrap_or_default())
    }

    async fn relationship_property_keys(&self, rel_type: &str) -> GraphResult<Vec<String>> {
        let data = self.read()?;
        Ok(data
            .relationship_types
            .iter()
            .find(|(t, _)| t == rel_type)
            .map(|(_, props)| dedup(props.iter().cloned()))
            .unwrap_or_default())
    }
}
