//! Just enough player movement to fly the autopilot without a server.
//!
//! Walking, falling with drag, elytra gliding with firework boosts, and
//! friction on landing. Horizontal collisions are ignored.

use std::collections::HashSet;

use interfaces::types::{BlockLocation, Direction, Displacement, ItemKind};
use tracing::trace;

use crate::{
    client::{elytra::command::Input, state::local::AgentState},
    storage::blocks::BlockView,
};

const JUMP_UPWARDS_MOTION: f64 = 0.42;

const GRAVITY: f64 = 0.08;
const DRAG_MULT: f64 = 0.98;

/// horizontal drag while airborne
const AIR_DRAG: f64 = 0.91;

/// block slipperiness (0.6) times air drag
const GROUND_FRICTION: f64 = 0.546;

const WALK_SPEED: f64 = 0.215_85;
const SNEAK_MULT: f64 = 0.3;

/// blocks per tick along the look vector
const GLIDE_SPEED: f64 = 0.6;
const BOOSTED_GLIDE_SPEED: f64 = 1.5;

/// how long one firework keeps pushing
const BOOST_TICKS: u32 = 30;

/// elytras lose one durability per second of flight
const TICKS_PER_DAMAGE: u32 = 20;

/// gliding starts once the player has fallen this far
const DEPLOY_FALL_DISTANCE: f32 = 1.0;

/// vertical velocity after one tick of gravity and drag
fn ver_speed(prev_speed: f64) -> f64 {
    (prev_speed - GRAVITY) * DRAG_MULT
}

#[derive(Debug, Default)]
pub struct Physics {
    look: Direction,
    held: HashSet<Input>,
    boost_ticks: u32,
    glide_ticks: u32,
}

impl Physics {
    pub fn set_input(&mut self, input: Input, pressed: bool) {
        if pressed {
            self.held.insert(input);
        } else {
            self.held.remove(&input);
        }
    }

    pub fn clear_inputs(&mut self) {
        self.held.clear();
    }

    pub fn look(&mut self, direction: Direction) {
        self.look = direction;
    }

    pub const fn direction(&self) -> Direction {
        self.look
    }

    pub fn is_held(&self, input: Input) -> bool {
        self.held.contains(&input)
    }

    fn is_solid(world: &dyn BlockView, location: BlockLocation) -> bool {
        world.block_at(location).is_some_and(|state| state.full_block())
    }

    fn can_deploy(&self, agent: &AgentState) -> bool {
        self.is_held(Input::Jump)
            && agent.fall_distance > DEPLOY_FALL_DISTANCE
            && agent
                .inventory
                .chest()
                .is_some_and(|chest| chest.kind == ItemKind::ELYTRA && chest.durability() > 1)
    }

    fn glide(&mut self, agent: &mut AgentState) {
        if self.is_held(Input::UseItem)
            && self.boost_ticks == 0
            && agent.inventory.consume(ItemKind::FIREWORKS)
        {
            trace!("firework boost");
            self.boost_ticks = BOOST_TICKS;
        }

        let speed = if self.boost_ticks > 0 {
            self.boost_ticks -= 1;
            BOOSTED_GLIDE_SPEED
        } else {
            GLIDE_SPEED
        };

        agent.velocity = self.look.unit_vector() * speed;

        self.glide_ticks += 1;
        if self.glide_ticks % TICKS_PER_DAMAGE == 0 {
            if let Some(chest) = agent.inventory.chest_mut() {
                chest.damage = chest.damage.saturating_add(1);
            }
        }
    }

    fn walk(&self, agent: &mut AgentState) {
        let mut horizontal = if self.is_held(Input::Forward) {
            self.look.horizontal().unit_vector() * WALK_SPEED
        } else {
            agent.velocity.horizontal() * GROUND_FRICTION
        };

        if self.is_held(Input::Sneak) {
            horizontal *= SNEAK_MULT;
        }

        let dy = if self.is_held(Input::Jump) {
            JUMP_UPWARDS_MOTION
        } else {
            0.0
        };

        agent.velocity = horizontal.make_dy(dy);
    }

    fn fall(agent: &mut AgentState) {
        let horizontal = agent.velocity.horizontal() * AIR_DRAG;
        agent.velocity = horizontal.make_dy(ver_speed(agent.velocity.dy));
    }

    /// Advance `agent` by one tick
    pub fn tick(&mut self, agent: &mut AgentState, world: &dyn BlockView) {
        let below = BlockLocation::from(agent.location - Displacement::EPSILON_Y);
        let supported = Self::is_solid(world, below) && agent.velocity.dy <= 0.0;

        if agent.fall_flying {
            self.glide(agent);
        } else if supported {
            agent.on_ground = true;
            agent.fall_distance = 0.0;
            self.walk(agent);
        } else {
            agent.on_ground = false;
            if self.can_deploy(agent) {
                trace!("deploying elytra");
                agent.fall_flying = true;
                self.glide(agent);
            } else {
                Self::fall(agent);
            }
        }

        let next = agent.location + agent.velocity;
        let next_block = BlockLocation::from(next);

        if agent.velocity.dy < 0.0 && Self::is_solid(world, next_block) {
            agent.location = next.with_y(f64::from(next_block.y) + 1.0);
            agent.velocity = agent.velocity.make_dy(0.0);
            agent.on_ground = true;
            agent.fall_flying = false;
            agent.fall_distance = 0.0;
            self.boost_ticks = 0;
            return;
        }

        if agent.velocity.dy < 0.0 {
            agent.fall_distance -= agent.velocity.dy as f32;
        }

        agent.on_ground = supported && !agent.fall_flying && agent.velocity.dy <= 0.0;
        agent.location = next;
    }
}
