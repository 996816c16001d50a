use super::env_loader::EnvLoader;

pub const DATABASE_URL: &str = "DATABASE_URL";
pub const DB_SCHEMA: &str = "DB_SCHEMA";
pub const BACKUP_DIR: &str = "BACKUP_DIR";
pub const BATCH_SIZE: &str = "BATCH_SIZE";

pub const DEFAULT_DB_SCHEMA: &str = "public";
pub const DEFAULT_BACKUP_DIR: &str = "backups";
pub const DEFAULT_BATCH_SIZE: usize = 100;

#[derive(Clone)]
pub struct AppConfig {
    pub url: String,
    pub db_schema: String,
    pub backup_dir: String,
    pub batch_size: usize,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            url: EnvLoader::get_required(DATABASE_URL)?,
            db_schema: EnvLoader::get_with_default(DB_SCHEMA, DEFAULT_DB_SCHEMA.to_string())?,
            backup_dir: EnvLoader::get_with_default(BACKUP_DIR, DEFAULT_BACKUP_DIR.to_string())?,
            batch_size: EnvLoader::get_with_default(BATCH_SIZE, DEFAULT_BATCH_SIZE)?,
        })
    }
}
