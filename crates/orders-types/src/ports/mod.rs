pub mod order_store;
