//! orders-dispatch: the orders endpoint (config, operations, inbound HTTP dispatcher)

pub mod config;
pub mod errors;

pub mod application;

pub use orders_types::{domain, ports};

pub mod inbound; // HTTP adapter (route table, dispatcher, server)
