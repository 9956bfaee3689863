pub mod mysql;
pub mod product_store;
