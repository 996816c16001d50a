pub mod pg_snapshot_extractor;
