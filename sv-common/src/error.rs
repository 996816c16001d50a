use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("config error: {0}")]
    ConfigError(String),

    #[error("extractor error: {0}")]
    ExtractorError(String),

    #[error("sinker error: {0}")]
    SinkerError(String),

    #[error("snapshot error: {0}")]
    SnapshotError(String),

    #[error("metadata error: {0}")]
    MetadataError(String),

    #[error("sqlx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("json error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("unexpected error: {0}")]
    Unexpected(String),
}
