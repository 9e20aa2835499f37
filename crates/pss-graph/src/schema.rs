//! Point-in-time schema snapshot.

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Node labels, relationship types and their property keys as seen at one moment.
///
/// Not kept in sync with the database; call
/// [`SchemaExplorer::get_schema`](crate::SchemaExplorer::get_schema) again for a fresh view.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GraphSchema {
    /// Label → property keys observed on nodes with that label.
    pub node_labels: BTreeMap<String, BTreeSet<String>>,
    /// Relationship type → property keys observed on relationships of that type.
    pub relationship_types: BTreeMap<String, BTreeSet<String>>,
    /// Every property key known to the database.
    pub property_keys: BTreeSet<String>,
}

impl GraphSchema {
    pub fn node_properties(&self, label: &str) -> Option<&BTreeSet<String>> {
        self.node_labels.get(label)
    }

    pub fn relationship_properties(&self, rel_type: &str) -> Option<&BTreeSet<String>> {
        self.relationship_types.get(rel_type)
    }

    pub fn label_names(&self) -> impl Iterator<Item = &str> {
        self.node_labels.keys().map(String::as_str)
    }

    pub fn relationship_type_names(&self) -> impl Iterator<Item = &str> {
        self.relationship_types.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.node_labels.is_empty() && self.relationship_types.is_empty() && self.property_keys.is_empty()
    }

    /// Print the schema to standard output.
    pub fn display(&self) {
        print!("{}", self);
    }
}

fn write_section(
    f: &mut fmt::Formatter<'_>,
    title: &str,
    entries: &BTreeMap<String, BTreeSet<String>>,
) -> fmt::Result {
    writeln!(f, "{}:", title)?;
    if entries.is_empty() {
        return writeln!(f, "- (none)");
    }
    for (name, props) in entries {
        if props.is_empty() {
            writeln!(f, "- {}", name)?;
        } else {
            let joined: Vec<&str> = props.iter().map(String::as_str).collect();
            writeln!(f, "- {} ({})", name, joined.join(", "))?;
        }
    }
    Ok(())
}

impl fmt::Display for GraphSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_section(f, "Node Labels", &self.node_labels)?;
        writeln!(f)?;
        write_section(f, "Relationship Types", &self.relationship_types)?;
        writeln!(f)?;
        writeln!(f, "Property Keys (across all nodes and relationships):")?;
        if self.property_keys.is_empty() {
            writeln!(f, "- (none)")?;
        }
        for key in &self.property_keys {
            writeln!(f, "- {}", key)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn sample() -> GraphSchema {
        let mut schema = GraphSchema::default();
        schema
            .node_labels
            .insert("Patent".into(), set(&["title", "id", "filing_date"]));
        schema.node_labels.insert("Inventor".into(), set(&[]));
        schema.relationship_types.insert("CITES".into(), set(&["date"]));
        schema
            .relationship_types
            .insert("INVENTED_BY".into(), set(&[]));
        schema.property_keys = set(&["title", "date", "id", "filing_date"]);
        schema
    }

    #[test]
    fn test_display_format() {
        let expected = "\
Node Labels:
- Inventor
- Patent (filing_date, id, title)

Relationship Types:
- CITES (date)
- INVENTED_BY

Property Keys (across all nodes and relationships):
- date
- filing_date
- id
- title
";
        assert_eq!(sample().to_string(), expected);
    }

    #[test]
    fn test_display_empty_schema() {
        let expected = "\
Node Labels:
- (none)

Relationship Types:
- (none)

Property Keys (across all nodes and relationships):
- (none)
";
        let schema = GraphSchema::default();
        assert!(schema.is_empty());
        assert_eq!(schema.to_string(), expected);
        schema.display();
    }

    #[test]
    fn test_accessors() {
        let schema = sample();
        assert_eq!(schema.node_properties("Patent"), Some(&set(&["id", "title", "filing_date"])));
        assert_eq!(schema.node_properties("Missing"), None);
        assert_eq!(schema.relationship_properties("CITES"), Some(&set(&["date"])));
        assert_eq!(schema.label_names().collect::<Vec<_>>(), vec!["Inventor", "Patent"]);
        assert_eq!(
            schema.relationship_type_names().collect::<Vec<_>>(),
            vec!["CITES", "INVENTED_BY"]
        );
    }

    #[test]
    fn test_serializes_to_json() {
        let value = serde_json::to_value(sample()).unwrap();
        assert_eq!(value["relationship_types"]["CITES"], serde_json::json!(["date"]));
        assert_eq!(value["node_labels"]["Inventor"], serde_json::json!([]));
    }
}
