use anyhow::Context;
use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use sv_common::log_info;
use sv_common::meta::{pg::pg_meta_manager::PgMetaManager, row_data::RowData};

use crate::{call_batch_fn, close_conn_pool, rdb_query_builder::RdbQueryBuilder, Sinker};

pub struct PgSinker {
    pub conn_pool: Pool<Postgres>,
    pub meta_manager: PgMetaManager,
    pub batch_size: usize,
}

#[async_trait]
impl Sinker for PgSinker {
    async fn sink(&mut self, mut data: Vec<RowData>) -> anyhow::Result<()> {
        if data.is_empty() {
            return Ok(());
        }
        call_batch_fn!(self, data, Self::batch_insert);
        Ok(())
    }

    async fn close(&mut self) -> anyhow::Result<()> {
        close_conn_pool!(self)
    }
}

impl PgSinker {
    // a failed batch fails the whole restore, no skip-and-continue
    async fn batch_insert(
        &mut self,
        data: &mut [RowData],
        start_index: usize,
        batch_size: usize,
    ) -> anyhow::Result<()> {
        let tb_meta = self
            .meta_manager
            .get_tb_meta_by_row_data(&data[0])
            .await?
            .to_owned();
        let query_builder = RdbQueryBuilder::new_for_pg(&tb_meta);

        let query_info = query_builder.get_batch_insert_query(data, start_index, batch_size)?;
        let query = query_builder.create_pg_query(&query_info);
        query.execute(&self.conn_pool).await.with_context(|| {
            format!(
                r#"batch insert into "{}"."{}" failed, start_index: {}, batch_size: {}"#,
                tb_meta.schema, tb_meta.tb, start_index, batch_size
            )
        })?;

        let batch_count = (data.len() + self.batch_size - 1) / self.batch_size;
        log_info!(
            r#"inserted batch {} of {} into "{}"."{}""#,
            start_index / self.batch_size + 1,
            batch_count,
            tb_meta.schema,
            tb_meta.tb
        );
        Ok(())
    }
}
