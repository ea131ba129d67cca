//! Domain types and store port shared by the orders crates.

pub mod domain;
pub mod ports;
