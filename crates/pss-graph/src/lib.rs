//! # PSS Graph
//!
//! Neo4j schema exploration for the patent similarity-search project.
//!
//! Connects to Neo4j using environment-sourced configuration and reports
//! node labels, relationship types and the property keys observed on each.

pub mod backend;
pub mod client;
pub mod config;
pub mod error;
pub mod explorer;
#[cfg(any(test, feature = "test-util"))]
pub mod mock;
pub mod schema;

pub use backend::{Neo4jBackend, SchemaBackend};
pub use client::GraphClient;
pub use config::{load_dotenv, GraphConfig};
pub use error::{GraphError, GraphResult};
pub use explorer::SchemaExplorer;
pub use schema::GraphSchema;
