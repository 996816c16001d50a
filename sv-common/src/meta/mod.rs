pub mod adaptor;
pub mod col_value;
pub mod dependency_order;
pub mod foreign_key;
pub mod pg;
pub mod row_data;
pub mod snapshot;
pub mod table_desc;
pub mod table_registry;
