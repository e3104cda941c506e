use interfaces::types::{BlockLocation, BlockState, ChunkLocation};

use crate::{
    client::{elytra::command::Controls, state::local::AgentState},
    error::PlanError,
    storage::blocks::BlockView,
};

/// Called once from the planner thread when a requested flight path is
/// ready or has failed
pub type PlanCallback = Box<dyn FnOnce(Result<(), PlanError>) + Send>;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SessionRequest {
    pub destination: BlockLocation,

    /// fly to the exact block rather than near it
    pub append_destination: bool,
    pub seed: i64,
    pub predict_terrain: bool,
}

/// Creates flight sessions. One session lives per destination.
pub trait FlightBackend {
    fn create(&mut self, request: SessionRequest) -> Box<dyn FlightSession>;
}

/// A background flight planner and the steering that follows its path.
///
/// Planning happens off the control thread; everything here returns
/// immediately.
pub trait FlightSession: Send {
    fn destination(&self) -> BlockLocation;
    fn seed(&self) -> i64;

    /// Start planning from `from` to the destination
    fn path_to(&mut self, from: BlockLocation);

    /// Start planning from `from` and report back through `on_done`
    fn path_to_destination(&mut self, from: BlockLocation, on_done: PlanCallback);

    /// the whole route has been planned
    fn is_complete(&self) -> bool;

    /// the final point of the planned route so far
    fn last(&self) -> Option<BlockLocation>;

    /// Once per tick, before any decision is made
    fn on_tick(&mut self, agent: &AgentState);

    /// Steer while gliding
    fn tick(&mut self, agent: &AgentState, landing_mode: bool, controls: &mut dyn Controls);

    /// Hand every loaded chunk to the planner again
    fn repack_chunks(&mut self, world: &dyn BlockView);
    fn on_chunk_event(&mut self, chunk: ChunkLocation, world: &dyn BlockView);
    fn on_block_change(&mut self, location: BlockLocation, state: BlockState);
    fn on_post_tick(&mut self);

    /// Release planner resources. Called off the control thread.
    fn destroy(self: Box<Self>);
}
