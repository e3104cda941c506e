//! Builds the world and player a simulated flight starts from

use interfaces::types::{BlockLocation, BlockState};
use swarm_elytra::{client::state::local::AgentState, storage::blocks::WorldBlocks};
use tracing::debug;

pub mod opts;

/// A netherrack floor at `floor_y` covering every chunk within `radius`
/// chunks of the origin
pub fn flat_nether(floor_y: i16, radius: i32) -> WorldBlocks {
    let mut world = WorldBlocks::nether();
    world.load_around(BlockLocation::new(0, floor_y, 0), radius);

    let edge = radius * 16;
    world.fill(
        BlockLocation::new(-edge, floor_y, -edge),
        BlockLocation::new(edge + 15, floor_y, edge + 15),
        BlockState::NETHERRACK,
    );

    debug!(floor_y, radius, "built flat nether");
    world
}

/// A player gliding at `start`
pub fn gliding(start: BlockLocation) -> AgentState {
    let mut agent = AgentState::mock(start.center_bottom());
    agent.on_ground = false;
    agent.fall_flying = true;
    agent
}

/// A player standing on top of a one block wide pillar that reaches from the
/// floor up to `start`
pub fn on_pillar(world: &mut WorldBlocks, floor_y: i16, start: BlockLocation) -> AgentState {
    world.fill(
        BlockLocation::new(start.x, floor_y, start.z),
        start.below(),
        BlockState::NETHERRACK,
    );

    AgentState::mock(start.center_bottom())
}
