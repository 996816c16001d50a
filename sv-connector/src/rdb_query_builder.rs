use sqlx::{postgres::PgArguments, query::Query, Postgres};

use sv_common::meta::{
    adaptor::{pg_col_value_convertor::PgColValueConvertor, sqlx_ext::SqlxPgExt},
    col_value::ColValue,
    pg::pg_tb_meta::PgTbMeta,
    row_data::RowData,
};
use sv_common::utils::sql_util::SqlUtil;

pub struct RdbQueryInfo<'a> {
    pub sql: String,
    pub cols: Vec<String>,
    pub binds: Vec<Option<&'a ColValue>>,
}

pub struct RdbQueryBuilder<'a> {
    tb_meta: &'a PgTbMeta,
}

impl RdbQueryBuilder<'_> {
    #[inline(always)]
    pub fn new_for_pg(tb_meta: &PgTbMeta) -> RdbQueryBuilder {
        RdbQueryBuilder { tb_meta }
    }

    #[inline(always)]
    pub fn create_pg_query<'a>(
        &self,
        query_info: &'a RdbQueryInfo,
    ) -> Query<'a, Postgres, PgArguments> {
        let mut query: Query<Postgres, PgArguments> = sqlx::query(&query_info.sql);
        for i in 0..query_info.binds.len() {
            let col_type = self
                .tb_meta
                .col_type_map
                .get(&query_info.cols[i])
                .unwrap();
            query = query.bind_col_value(query_info.binds[i], col_type);
        }
        query
    }

    /// Column list for extract SQL, with casts so every value decodes in a
    /// snapshot-friendly form.
    /// SELECT "id","status"::text,"tags"::text[] FROM "public"."Product"
    pub fn build_extract_cols_str(&self) -> anyhow::Result<String> {
        let mut extract_cols = Vec::new();
        for col in self.tb_meta.cols.iter() {
            let col_type = self.tb_meta.get_col_type(col)?;
            let extract_type = PgColValueConvertor::get_extract_type(col_type);
            let extract_col = if extract_type.is_empty() {
                SqlUtil::escape(col)
            } else {
                format!("{}::{}", SqlUtil::escape(col), extract_type)
            };
            extract_cols.push(extract_col);
        }
        Ok(extract_cols.join(","))
    }

    /// One multi-row INSERT for a batch:
    /// INSERT INTO "public"."Category"("id","name") VALUES($1::varchar,$2::text),($3::varchar,$4::text)
    pub fn get_batch_insert_query<'a>(
        &self,
        data: &'a [RowData],
        start_index: usize,
        batch_size: usize,
    ) -> anyhow::Result<RdbQueryInfo<'a>> {
        let mut placeholder_index = 1;
        let mut row_values = Vec::new();
        for _ in 0..batch_size {
            let mut col_values = Vec::new();
            for col in self.tb_meta.cols.iter() {
                col_values.push(self.get_placeholder(placeholder_index, col)?);
                placeholder_index += 1;
            }
            row_values.push(format!("({})", col_values.join(",")));
        }

        let sql = format!(
            "INSERT INTO {}.{}({}) VALUES{}",
            SqlUtil::escape(&self.tb_meta.schema),
            SqlUtil::escape(&self.tb_meta.tb),
            SqlUtil::escape_cols(&self.tb_meta.cols).join(","),
            row_values.join(",")
        );

        let mut cols = Vec::new();
        let mut binds = Vec::new();
        for row_data in data.iter().skip(start_index).take(batch_size) {
            for col_name in self.tb_meta.cols.iter() {
                cols.push(col_name.clone());
                binds.push(row_data.col_values.get(col_name));
            }
        }

        Ok(RdbQueryInfo { sql, cols, binds })
    }

    fn get_placeholder(&self, index: usize, col: &str) -> anyhow::Result<String> {
        let col_type = self.tb_meta.get_col_type(col)?;
        Ok(format!("${}::{}", index, col_type.cast_name()))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use sv_common::meta::pg::pg_col_type::PgColType;

    use super::*;

    fn tb_meta() -> PgTbMeta {
        let col_type = |name: &str, category: &str| PgColType {
            name: name.to_string(),
            alias: name.to_string(),
            category: category.to_string(),
            element_name: String::new(),
            enum_values: None,
        };

        let mut col_type_map = HashMap::new();
        col_type_map.insert("id".to_string(), col_type("varchar", "S"));
        col_type_map.insert("name".to_string(), col_type("text", "S"));
        col_type_map.insert("depth".to_string(), col_type("int4", "N"));

        PgTbMeta {
            schema: "public".to_string(),
            tb: "Category".to_string(),
            cols: vec!["id".to_string(), "name".to_string(), "depth".to_string()],
            col_type_map,
        }
    }

    fn row(id: &str) -> RowData {
        use sv_common::meta::col_value::ColValue;

        let mut col_values = HashMap::new();
        col_values.insert("id".to_string(), ColValue::String(id.to_string()));
        col_values.insert("name".to_string(), ColValue::String("Dilutions".to_string()));
        col_values.insert("depth".to_string(), ColValue::Long(0));
        RowData {
            schema: "public".to_string(),
            tb: "Category".to_string(),
            col_values,
        }
    }

    #[test]
    fn test_extract_cols_str_casts_text_affine_types() {
        let tb_meta = tb_meta();
        let query_builder = RdbQueryBuilder::new_for_pg(&tb_meta);
        assert_eq!(
            query_builder.build_extract_cols_str().unwrap(),
            r#""id"::text,"name"::text,"depth""#
        );
    }

    #[test]
    fn test_batch_insert_sql_shape() {
        let tb_meta = tb_meta();
        let query_builder = RdbQueryBuilder::new_for_pg(&tb_meta);
        let data = vec![row("CAT_1"), row("CAT_2")];
        let query_info = query_builder.get_batch_insert_query(&data, 0, 2).unwrap();

        assert_eq!(
            query_info.sql,
            r#"INSERT INTO "public"."Category"("id","name","depth") VALUES($1::varchar,$2::text,$3::int4),($4::varchar,$5::text,$6::int4)"#
        );
        assert_eq!(query_info.cols.len(), 6);
        assert_eq!(query_info.binds.len(), 6);
    }

    #[test]
    fn test_batch_insert_respects_start_index() {
        let tb_meta = tb_meta();
        let query_builder = RdbQueryBuilder::new_for_pg(&tb_meta);
        let data = vec![row("CAT_1"), row("CAT_2"), row("CAT_3")];
        let query_info = query_builder.get_batch_insert_query(&data, 2, 1).unwrap();

        assert_eq!(query_info.binds.len(), 3);
        let bound_id = query_info.binds[0].unwrap();
        assert_eq!(bound_id.to_option_string().unwrap(), "CAT_3");
    }
}
