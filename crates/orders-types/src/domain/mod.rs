pub mod delivery;
pub mod menu;
pub mod order;
