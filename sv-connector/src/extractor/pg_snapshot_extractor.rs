use async_trait::async_trait;
use futures::TryStreamExt;
use sqlx::{Pool, Postgres};

use sv_common::log_info;
use sv_common::meta::{
    pg::{pg_meta_manager::PgMetaManager, pg_tb_meta::PgTbMeta},
    row_data::RowData,
};

use crate::{close_conn_pool, rdb_query_builder::RdbQueryBuilder, Extractor};

pub struct PgSnapshotExtractor {
    pub conn_pool: Pool<Postgres>,
    pub meta_manager: PgMetaManager,
    pub schema: String,
    pub tb: String,
}

#[async_trait]
impl Extractor for PgSnapshotExtractor {
    async fn extract(&mut self) -> anyhow::Result<Vec<RowData>> {
        log_info!(
            r#"PgSnapshotExtractor starts, schema: "{}", tb: "{}""#,
            self.schema,
            self.tb
        );
        self.extract_all().await
    }

    async fn close(&mut self) -> anyhow::Result<()> {
        close_conn_pool!(self)
    }
}

impl PgSnapshotExtractor {
    async fn extract_all(&mut self) -> anyhow::Result<Vec<RowData>> {
        let tb_meta = self
            .meta_manager
            .get_tb_meta(&self.schema, &self.tb)
            .await?
            .to_owned();

        let sql = Self::build_extract_sql(&tb_meta)?;
        let mut data = Vec::new();
        let mut rows = sqlx::query(&sql).fetch(&self.conn_pool);
        while let Some(row) = rows.try_next().await? {
            data.push(RowData::from_pg_row(&row, &tb_meta)?);
        }

        log_info!(
            r#"end extracting data from "{}"."{}", all count: {}"#,
            self.schema,
            self.tb,
            data.len()
        );
        Ok(data)
    }

    fn build_extract_sql(tb_meta: &PgTbMeta) -> anyhow::Result<String> {
        let query_builder = RdbQueryBuilder::new_for_pg(tb_meta);
        let cols_str = query_builder.build_extract_cols_str()?;
        // one full unconditional read per table
        Ok(format!(
            r#"SELECT {} FROM "{}"."{}""#,
            cols_str, tb_meta.schema, tb_meta.tb
        ))
    }
}
