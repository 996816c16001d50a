use std::{
    env,
    fs::{self, File},
    io::Read,
    path::PathBuf,
};

use anyhow::{bail, Context};
use log4rs::config::RawConfig;
use serde_json::Value;
use sqlx::{postgres::PgPoolOptions, Pool, Postgres};

use sv_common::{
    config::app_config::AppConfig,
    error::Error,
    log_error, log_info, log_warn,
    meta::{
        dependency_order::resolve_insert_order, pg::pg_meta_manager::PgMetaManager,
        row_data::RowData, snapshot::Snapshot, table_desc::TableDesc,
        table_registry::ecommerce_tables,
    },
    utils::file_util::FileUtil,
};
use sv_connector::{
    extractor::pg_snapshot_extractor::PgSnapshotExtractor,
    sinker::{constraint_guard::ConstraintGuard, pg_sinker::PgSinker},
    Extractor, Sinker,
};

use crate::db_reset;

pub const LOG4RS_FILE: &str = "LOG4RS_FILE";

const DEFAULT_LOG4RS_CONFIG: &str = r#"
appenders:
  stdout:
    kind: console
    encoder:
      pattern: "{d(%Y-%m-%d %H:%M:%S%.6f)} - {l} - {m}{n}"

root:
  level: info
  appenders:
    - stdout

loggers:
  default_logger:
    level: info
    appenders:
      - stdout
    additive: false
"#;

pub struct TaskRunner {
    config: AppConfig,
}

impl TaskRunner {
    pub fn new() -> anyhow::Result<Self> {
        let config = AppConfig::from_env().context("invalid environment configs")?;
        Ok(Self { config })
    }

    pub fn init_log4rs() -> anyhow::Result<()> {
        let mut config_str = DEFAULT_LOG4RS_CONFIG.to_string();
        if let Ok(log4rs_file) = env::var(LOG4RS_FILE) {
            if fs::metadata(&log4rs_file).is_ok() {
                config_str.clear();
                File::open(&log4rs_file)?.read_to_string(&mut config_str)?;
            }
        }

        let config: RawConfig = serde_yaml::from_str(&config_str)?;
        log4rs::init_raw_config(config)?;
        Ok(())
    }

    /// Export every registered table, in dependency order, into a new
    /// timestamped snapshot file. A failing table yields an empty entry and
    /// the export continues.
    pub async fn backup(&self) -> anyhow::Result<()> {
        log_info!("starting database backup export");

        let tables = resolve_insert_order(&ecommerce_tables())?;
        let conn_pool = self.create_conn_pool().await?;
        let mut meta_manager = PgMetaManager::new(conn_pool.clone());

        let snapshot = self
            .export_snapshot(&tables, &conn_pool, &mut meta_manager)
            .await;

        let backup_path = FileUtil::new_backup_path(&self.config.backup_dir)?;
        fs::write(&backup_path, snapshot.to_pretty_string()?)?;
        log_info!(
            "database backup completed successfully, data saved to {}",
            backup_path.display()
        );

        conn_pool.close().await;
        Ok(())
    }

    /// Restore a snapshot into the database. With no explicit file the
    /// lexically-last backup in the backup directory is used.
    pub async fn restore(&self, backup_file: Option<&str>) -> anyhow::Result<()> {
        let backup_path = match backup_file {
            Some(file) => PathBuf::from(file),
            None => {
                let path = FileUtil::latest_backup_file(&self.config.backup_dir)?;
                log_info!("using latest backup: {}", path.display());
                path
            }
        };

        let content = fs::read_to_string(&backup_path)
            .with_context(|| format!("failed to read backup file {}", backup_path.display()))?;
        let snapshot = Snapshot::parse(&content)?;

        let tables = resolve_insert_order(&ecommerce_tables())?;
        for alias in snapshot.aliases() {
            if !tables.iter().any(|t| t.alias == alias) {
                log_warn!(
                    r#"snapshot table "{}" is not registered and will be ignored"#,
                    alias
                );
            }
        }

        let conn_pool = self.create_conn_pool().await?;
        let mut meta_manager = PgMetaManager::new(conn_pool.clone());

        log_info!("starting database restore");
        let guard = ConstraintGuard::suspend(conn_pool.clone()).await?;
        let load_result = self
            .load_snapshot(&snapshot, &tables, &conn_pool, &mut meta_manager)
            .await;
        // the resume must run on every exit path, even when the load failed
        let resume_result = guard.resume().await;
        load_result?;
        resume_result?;

        log_info!("restore completed successfully");
        conn_pool.close().await;
        Ok(())
    }

    /// Destructive reset of the active schema, never invoked by
    /// backup/restore.
    pub async fn drop_database(&self) -> anyhow::Result<()> {
        let conn_pool = self.create_conn_pool().await?;
        db_reset::drop_all(&conn_pool, &self.config.db_schema).await?;
        conn_pool.close().await;
        Ok(())
    }

    /// One snapshot entry per attempted table, in dependency order. A table
    /// whose read fails is logged and recorded as an empty entry, the export
    /// itself never fails.
    async fn export_snapshot(
        &self,
        tables: &[TableDesc],
        conn_pool: &Pool<Postgres>,
        meta_manager: &mut PgMetaManager,
    ) -> Snapshot {
        let mut snapshot = Snapshot::new();
        for table in tables.iter() {
            let rows = match self.export_table(conn_pool, meta_manager, table).await {
                Ok(rows) => rows,
                Err(error) => {
                    log_error!(r#"error exporting "{}": {:#}"#, table.tb, error);
                    Vec::new()
                }
            };
            snapshot.insert_table(&table.alias, rows);
        }
        snapshot
    }

    async fn export_table(
        &self,
        conn_pool: &Pool<Postgres>,
        meta_manager: &mut PgMetaManager,
        table: &TableDesc,
    ) -> anyhow::Result<Vec<Value>> {
        let tb_meta = meta_manager
            .get_tb_meta(&self.config.db_schema, &table.tb)
            .await?
            .to_owned();

        let mut extractor = PgSnapshotExtractor {
            conn_pool: conn_pool.clone(),
            meta_manager: meta_manager.clone(),
            schema: self.config.db_schema.clone(),
            tb: table.tb.clone(),
        };
        let data = extractor.extract().await?;

        let mut rows = Vec::with_capacity(data.len());
        for row_data in data.iter() {
            rows.push(row_data.to_snapshot_row(&tb_meta)?);
        }
        Ok(rows)
    }

    async fn load_snapshot(
        &self,
        snapshot: &Snapshot,
        tables: &[TableDesc],
        conn_pool: &Pool<Postgres>,
        meta_manager: &mut PgMetaManager,
    ) -> anyhow::Result<()> {
        for table in tables.iter() {
            let rows = snapshot.rows(&table.alias).unwrap_or(&[]);
            if rows.is_empty() {
                log_info!(r#"no data to insert for "{}""#, table.tb);
                continue;
            }

            let tb_meta = meta_manager
                .get_tb_meta(&self.config.db_schema, &table.tb)
                .await?
                .to_owned();

            let mut data = Vec::with_capacity(rows.len());
            for row in rows.iter() {
                let Some(row) = row.as_object() else {
                    bail! {Error::SnapshotError(format!(
                        "table {} contains a non-object row",
                        table.alias
                    ))}
                };
                data.push(RowData::from_snapshot_row(row, &tb_meta)?);
            }

            log_info!(r#"seeding "{}" ({} records)"#, table.tb, data.len());
            let mut sinker = PgSinker {
                conn_pool: conn_pool.clone(),
                meta_manager: meta_manager.clone(),
                batch_size: self.config.batch_size,
            };
            sinker.sink(data).await?;
        }
        Ok(())
    }

    async fn create_conn_pool(&self) -> anyhow::Result<Pool<Postgres>> {
        // one connection, the session-level toggle must cover every statement
        let conn_pool = PgPoolOptions::new()
            .max_connections(1)
            .connect(&self.config.url)
            .await
            .context("failed to connect to database")?;
        Ok(conn_pool)
    }
}
