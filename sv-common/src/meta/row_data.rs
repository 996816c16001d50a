use std::collections::HashMap;

use anyhow::Context;
use serde_json::{Map, Value};
use sqlx::postgres::PgRow;

use crate::meta::{
    adaptor::pg_col_value_convertor::PgColValueConvertor, col_value::ColValue,
    pg::pg_tb_meta::PgTbMeta,
};

#[derive(Debug, Clone, PartialEq)]
pub struct RowData {
    pub schema: String,
    pub tb: String,
    pub col_values: HashMap<String, ColValue>,
}

impl RowData {
    pub fn from_pg_row(row: &PgRow, tb_meta: &PgTbMeta) -> anyhow::Result<Self> {
        let mut col_values = HashMap::new();
        for (col, col_type) in &tb_meta.col_type_map {
            let col_value = PgColValueConvertor::from_query(row, col, col_type).with_context(
                || {
                    format!(
                        "schema: {}, tb: {}, col: {}, col_type: {}",
                        tb_meta.schema, tb_meta.tb, col, col_type
                    )
                },
            )?;
            col_values.insert(col.to_string(), col_value);
        }

        Ok(Self {
            schema: tb_meta.schema.clone(),
            tb: tb_meta.tb.clone(),
            col_values,
        })
    }

    /// Typed parse of one snapshot row object. Columns missing from the
    /// object become NULL; columns unknown to the live table fail.
    pub fn from_snapshot_row(row: &Map<String, Value>, tb_meta: &PgTbMeta) -> anyhow::Result<Self> {
        for col in row.keys() {
            if !tb_meta.col_type_map.contains_key(col) {
                anyhow::bail! {crate::error::Error::SnapshotError(format!(
                    r#"snapshot column "{}" does not exist in "{}"."{}""#,
                    col, tb_meta.schema, tb_meta.tb
                ))}
            }
        }

        let mut col_values = HashMap::new();
        for col in tb_meta.cols.iter() {
            let col_type = tb_meta.get_col_type(col)?;
            let col_value = match row.get(col) {
                Some(value) => PgColValueConvertor::from_snapshot_value(value, col_type)
                    .with_context(|| {
                        format!(
                            "schema: {}, tb: {}, col: {}",
                            tb_meta.schema, tb_meta.tb, col
                        )
                    })?,
                None => ColValue::None,
            };
            col_values.insert(col.to_string(), col_value);
        }

        Ok(Self {
            schema: tb_meta.schema.clone(),
            tb: tb_meta.tb.clone(),
            col_values,
        })
    }

    /// Snapshot row object, columns in declared table order.
    pub fn to_snapshot_row(&self, tb_meta: &PgTbMeta) -> anyhow::Result<Value> {
        let mut row = Map::new();
        for col in tb_meta.cols.iter() {
            let col_value = self.col_values.get(col).unwrap_or(&ColValue::None);
            let value = PgColValueConvertor::to_snapshot_value(col_value).with_context(|| {
                format!(
                    "schema: {}, tb: {}, col: {}",
                    tb_meta.schema, tb_meta.tb, col
                )
            })?;
            row.insert(col.to_string(), value);
        }
        Ok(Value::Object(row))
    }
}
