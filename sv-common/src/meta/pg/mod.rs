pub mod pg_col_type;
pub mod pg_meta_manager;
pub mod pg_tb_meta;
