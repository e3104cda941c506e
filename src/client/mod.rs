//! Everything related to a client
pub mod elytra;
pub mod pathfind;
pub mod physics;
pub mod settings;
pub mod sim;
pub mod state;
