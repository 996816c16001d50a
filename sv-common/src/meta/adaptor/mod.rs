pub mod pg_col_value_convertor;
pub mod sqlx_ext;
