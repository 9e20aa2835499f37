//! Schema exploration commands.

use anyhow::{Context, Result};
use colored::Colorize;
use pss_graph::SchemaExplorer;
use std::collections::BTreeSet;

use crate::output;

/// Print the full schema snapshot.
pub async fn cmd_schema(explorer: &SchemaExplorer, json: bool) -> Result<()> {
    let schema = explorer
        .get_schema()
        .await
        .context("Failed to read Neo4j schema")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&schema)?);
    } else {
        output::print_schema(&schema);
    }
    Ok(())
}

/// Print the property keys of one node label.
pub async fn cmd_nodes(explorer: &SchemaExplorer, label: &str, json: bool) -> Result<()> {
    let props = node_properties(explorer, label).await?;

    if json {
        println!("{}", properties_json(&props)?);
    } else {
        output::print_properties("Label", label, &props);
    }
    Ok(())
}

/// Print the property keys of one relationship type.
pub async fn cmd_rels(explorer: &SchemaExplorer, rel_type: &str, json: bool) -> Result<()> {
    let props = relationship_properties(explorer, rel_type).await?;

    if json {
        println!("{}", properties_json(&props)?);
    } else {
        output::print_properties("Relationship type", rel_type, &props);
    }
    Ok(())
}

/// Check connectivity.
pub async fn cmd_ping(explorer: &SchemaExplorer) -> Result<()> {
    explorer
        .verify_connectivity()
        .await
        .context("Neo4j is not reachable")?;
    println!("{}", "Neo4j is reachable.".green());
    Ok(())
}

async fn node_properties(explorer: &SchemaExplorer, label: &str) -> Result<BTreeSet<String>> {
    explorer
        .get_node_properties(label)
        .await
        .with_context(|| format!("Failed to read properties of label '{}'", label))
}

async fn relationship_properties(explorer: &SchemaExplorer, rel_type: &str) -> Result<BTreeSet<String>> {
    explorer
        .get_relationship_properties(rel_type)
        .await
        .with_context(|| format!("Failed to read properties of relationship type '{}'", rel_type))
}

/// Property keys as a sorted JSON array.
fn properties_json(props: &BTreeSet<String>) -> Result<String> {
    Ok(serde_json::to_string_pretty(props)?)
}
