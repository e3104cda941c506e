//! Movement costs, landing-site search and an elytra autopilot for a voxel
//! world agent.
//!
//! [`client::elytra::ElytraProcess`] is the entry point. It is driven once per
//! game tick by whatever owns the player and talks to a flight planner through
//! [`client::elytra::session::FlightSession`].

pub mod client;
pub mod error;
pub mod storage;
