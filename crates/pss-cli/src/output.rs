//! Terminal output formatting.

use colored::Colorize;
use pss_graph::GraphSchema;
use std::collections::{BTreeMap, BTreeSet};

/// Print the schema with one section per kind.
pub fn print_schema(schema: &GraphSchema) {
    print_section("Node Labels", &schema.node_labels, |s| s.cyan().to_string());
    println!();
    print_section("Relationship Types", &schema.relationship_types, |s| {
        s.yellow().to_string()
    });
    println!();
    println!("{}", "Property Keys (across all nodes and relationships):".bold());
    if schema.property_keys.is_empty() {
        println!("  {}", "(none)".dimmed());
    }
    for key in &schema.property_keys {
        println!("  {} {}", "•".dimmed(), key);
    }
}

fn print_section(
    title: &str,
    entries: &BTreeMap<String, BTreeSet<String>>,
    paint: impl Fn(&str) -> String,
) {
    println!("{} ({})", format!("{}:", title).bold(), entries.len());
    if entries.is_empty() {
        println!("  {}", "(none)".dimmed());
        return;
    }
    for (name, props) in entries {
        if props.is_empty() {
            println!("  {} {}", "•".dimmed(), paint(name));
        } else {
            println!("  {} {} {}", "•".dimmed(), paint(name), format!("({})", join(props)).dimmed());
        }
    }
}

/// Print the property keys of a single label or relationship type.
pub fn print_properties(kind: &str, name: &str, props: &BTreeSet<String>) {
    println!("{} {}", format!("{}:", kind).bold(), name.cyan());
    println!("{}", "─".repeat(40));
    if props.is_empty() {
        println!("{}", "No properties found.".dimmed());
        return;
    }
    for prop in props {
        println!("  {} {}", "•".dimmed(), prop);
    }
}

fn join(props: &BTreeSet<String>) -> String {
    props.iter().map(String::as_str).collect::<Vec<_>>().join(", ")
}
