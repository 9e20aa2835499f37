//! Error types for schema exploration.

use thiserror::Error;

/// Errors raised while configuring, connecting to or querying Neo4j.
#[derive(Error, Debug)]
pub enum GraphError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Node label not found in schema: {0}")]
    InvalidLabel(String),

    #[error("Relationship type not found in schema: {0}")]
    InvalidRelationshipType(String),

    #[error("Query error: {0}")]
    Query(String),
}

/// Result type for graph operations.
pub type GraphResult<T> = Result<T, GraphError>;

impl GraphError {
    /// Create a configuration error.
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Create a connection error.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    /// Create a query error.
    pub fn query(msg: impl Into<String>) -> Self {
        Self::Query(msg.into())
    }
}
