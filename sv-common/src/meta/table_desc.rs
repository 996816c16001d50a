use serde::Serialize;

use crate::meta::foreign_key::ForeignKey;

/// A registered table: its Postgres name, the key it is stored under in a
/// snapshot, and its declared foreign key edges.
#[derive(Debug, Clone, Serialize)]
pub struct TableDesc {
    pub tb: String,
    pub alias: String,
    pub foreign_keys: Vec<ForeignKey>,
}

impl TableDesc {
    pub fn new(tb: &str, alias: &str, foreign_keys: Vec<ForeignKey>) -> Self {
        Self {
            tb: tb.to_string(),
            alias: alias.to_string(),
            foreign_keys,
        }
    }

    /// Tables this one depends on, excluding the self reference.
    pub fn referenced_tbs(&self) -> Vec<&str> {
        self.foreign_keys
            .iter()
            .filter(|fk| !fk.is_self_reference(&self.tb))
            .map(|fk| fk.ref_tb.as_str())
            .collect()
    }
}
