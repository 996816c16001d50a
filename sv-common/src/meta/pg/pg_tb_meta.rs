use std::collections::HashMap;

use serde::Serialize;

use super::pg_col_type::PgColType;

#[derive(Debug, Clone, Serialize)]
pub struct PgTbMeta {
    pub schema: String,
    pub tb: String,
    pub cols: Vec<String>,
    pub col_type_map: HashMap<String, PgColType>,
}

impl PgTbMeta {
    pub fn get_col_type(&self, col: &str) -> anyhow::Result<&PgColType> {
        use anyhow::Context;
        self.col_type_map.get(col).with_context(|| {
            format!(
                r#"no type found for col: "{}" in "{}"."{}""#,
                col, self.schema, self.tb
            )
        })
    }
}
