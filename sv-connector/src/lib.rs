pub mod extractor;
pub mod rdb_query_builder;
pub mod sinker;

use async_trait::async_trait;
use sv_common::meta::row_data::RowData;

#[async_trait]
pub trait Extractor {
    async fn extract(&mut self) -> anyhow::Result<Vec<RowData>>;

    async fn close(&mut self) -> anyhow::Result<()> {
        Ok(())
    }
}

#[async_trait]
pub trait Sinker {
    async fn sink(&mut self, mut _data: Vec<RowData>) -> anyhow::Result<()> {
        Ok(())
    }

    async fn close(&mut self) -> anyhow::Result<()> {
        Ok(())
    }
}

#[macro_export(local_inner_macros)]
macro_rules! close_conn_pool {
    ($self:ident) => {
        if $self.conn_pool.is_closed() {
            Ok(())
        } else {
            Ok($self.conn_pool.close().await)
        }
    };
}
