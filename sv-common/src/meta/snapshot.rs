use anyhow::bail;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::Error;

/// A serialized capture of exported table contents: one entry per table,
/// keyed by alias, in export order (key order survives the JSON round trip).
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot {
    tables: Map<String, Value>,
}

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_table(&mut self, alias: &str, rows: Vec<Value>) {
        self.tables.insert(alias.to_string(), Value::Array(rows));
    }

    /// Rows for a table; `None` when the alias is absent.
    pub fn rows(&self, alias: &str) -> Option<&[Value]> {
        match self.tables.get(alias) {
            Some(Value::Array(rows)) => Some(rows.as_slice()),
            _ => None,
        }
    }

    pub fn aliases(&self) -> Vec<&str> {
        self.tables.keys().map(|k| k.as_str()).collect()
    }

    pub fn table_count(&self) -> usize {
        self.tables.len()
    }

    pub fn parse(content: &str) -> anyhow::Result<Self> {
        let snapshot: Snapshot = serde_json::from_str(content)?;
        for (alias, rows) in snapshot.tables.iter() {
            let Value::Array(rows) = rows else {
                bail! {Error::SnapshotError(format!(
                    "entry for table {} is not an array",
                    alias
                ))}
            };
            if rows.iter().any(|row| !row.is_object()) {
                bail! {Error::SnapshotError(format!(
                    "table {} contains a non-object row",
                    alias
                ))}
            }
        }
        Ok(snapshot)
    }

    pub fn to_pretty_string(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_preserves_table_order() {
        let content = r#"{"users": [], "categories": [{"id": "CAT_1"}], "products": []}"#;
        let snapshot = Snapshot::parse(content).unwrap();
        assert_eq!(snapshot.aliases(), vec!["users", "categories", "products"]);
        assert_eq!(snapshot.rows("categories").unwrap().len(), 1);
    }

    #[test]
    fn test_missing_alias_yields_none() {
        let snapshot = Snapshot::parse(r#"{"users": []}"#).unwrap();
        assert!(snapshot.rows("carts").is_none());
    }

    #[test]
    fn test_row_order_survives_round_trip() {
        let content = r#"{"categories": [{"id": "CAT_parent"}, {"id": "CAT_child", "parentId": "CAT_parent"}]}"#;
        let snapshot = Snapshot::parse(content).unwrap();
        let serialized = snapshot.to_pretty_string().unwrap();
        let reparsed = Snapshot::parse(&serialized).unwrap();
        let rows = reparsed.rows("categories").unwrap();
        assert_eq!(rows[0]["id"], "CAT_parent");
        assert_eq!(rows[1]["id"], "CAT_child");
    }

    #[test]
    fn test_non_array_entry_is_rejected() {
        assert!(Snapshot::parse(r#"{"users": {"id": 1}}"#).is_err());
    }

    #[test]
    fn test_non_object_row_is_rejected() {
        assert!(Snapshot::parse(r#"{"users": [1, 2]}"#).is_err());
    }
}
