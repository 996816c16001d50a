use std::collections::HashMap;

use futures::TryStreamExt;
use sqlx::{Pool, Postgres, Row};

use super::{pg_col_type::PgColType, pg_tb_meta::PgTbMeta};
use crate::meta::row_data::RowData;

#[derive(Clone)]
pub struct PgMetaManager {
    pub conn_pool: Pool<Postgres>,
    pub name_to_tb_meta: HashMap<String, PgTbMeta>,
}

impl PgMetaManager {
    pub fn new(conn_pool: Pool<Postgres>) -> Self {
        PgMetaManager {
            conn_pool,
            name_to_tb_meta: HashMap::new(),
        }
    }

    pub async fn close(&self) -> anyhow::Result<()> {
        self.conn_pool.close().await;
        Ok(())
    }

    pub async fn get_tb_meta_by_row_data<'a>(
        &'a mut self,
        row_data: &RowData,
    ) -> anyhow::Result<&'a PgTbMeta> {
        let (schema, tb) = (row_data.schema.clone(), row_data.tb.clone());
        self.get_tb_meta(&schema, &tb).await
    }

    pub async fn get_tb_meta<'a>(
        &'a mut self,
        schema: &str,
        tb: &str,
    ) -> anyhow::Result<&'a PgTbMeta> {
        let full_name = format!(r#""{}"."{}""#, schema, tb);
        if !self.name_to_tb_meta.contains_key(&full_name) {
            let (cols, col_type_map) = Self::parse_cols(&self.conn_pool, schema, tb).await?;
            let tb_meta = PgTbMeta {
                schema: schema.to_string(),
                tb: tb.to_string(),
                cols,
                col_type_map,
            };
            self.name_to_tb_meta.insert(full_name.clone(), tb_meta);
        }
        Ok(self.name_to_tb_meta.get(&full_name).unwrap())
    }

    async fn parse_cols(
        conn_pool: &Pool<Postgres>,
        schema: &str,
        tb: &str,
    ) -> anyhow::Result<(Vec<String>, HashMap<String, PgColType>)> {
        let mut cols = Vec::new();
        let mut col_type_map = HashMap::new();

        // get cols of the table
        let sql = format!(
            "SELECT column_name FROM information_schema.columns
            WHERE table_schema='{}' AND table_name = '{}'
            ORDER BY ordinal_position;",
            schema, tb
        );
        let mut rows = sqlx::query(&sql).fetch(conn_pool);
        while let Some(row) = rows.try_next().await? {
            let col: String = row.try_get("column_name")?;
            cols.push(col);
        }

        // get col types of the table
        let sql = format!(
            "SELECT a.attname AS col_name,
                t.oid AS type_oid,
                t.typname AS type_name,
                t.typcategory::text AS type_category,
                COALESCE(et.typname, '') AS element_type_name
            FROM pg_attribute a
                INNER JOIN pg_class c ON a.attrelid = c.oid
                INNER JOIN pg_namespace n ON c.relnamespace = n.oid
                INNER JOIN pg_type t ON a.atttypid = t.oid
                LEFT JOIN pg_type et ON t.typelem = et.oid
            WHERE n.nspname = '{}'
                AND c.relname = '{}'
                AND a.attnum > 0
                AND NOT a.attisdropped;",
            schema, tb
        );

        let mut rows = sqlx::query(&sql).fetch(conn_pool);
        while let Some(row) = rows.try_next().await? {
            let col: String = row.try_get("col_name")?;
            if !cols.contains(&col) {
                continue;
            }

            let type_oid: i32 = row.try_get_unchecked("type_oid")?;
            let name: String = row.try_get("type_name")?;
            let category: String = row.try_get("type_category")?;
            let element_name: String = row.try_get("element_type_name")?;

            let enum_values = if category == "E" {
                Some(Self::get_enum_values(conn_pool, type_oid).await?)
            } else {
                None
            };

            let col_type = PgColType {
                alias: Self::get_alias(&name).to_string(),
                name,
                category,
                element_name,
                enum_values,
            };
            col_type_map.insert(col, col_type);
        }

        Ok((cols, col_type_map))
    }

    async fn get_enum_values(
        conn_pool: &Pool<Postgres>,
        type_oid: i32,
    ) -> anyhow::Result<Vec<String>> {
        let sql = format!(
            "SELECT enumlabel FROM pg_enum WHERE enumtypid = {} ORDER BY enumsortorder;",
            type_oid
        );
        let mut values = Vec::new();
        let mut rows = sqlx::query(&sql).fetch(conn_pool);
        while let Some(row) = rows.try_next().await? {
            let value: String = row.try_get("enumlabel")?;
            values.push(value);
        }
        Ok(values)
    }

    fn get_alias(type_name: &str) -> &str {
        match type_name {
            "bpchar" => "char",
            "serial2" => "int2",
            "serial4" => "int4",
            "serial8" => "int8",
            _ => type_name,
        }
    }
}
