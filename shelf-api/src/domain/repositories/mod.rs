pub mod product_store;

#[cfg(test)]
pub mod memory;
