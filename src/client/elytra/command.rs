//! What the autopilot reads each tick and what it asks of its host.

use std::{
    fmt::{Debug, Formatter},
    sync::Arc,
};

use interfaces::types::Direction;

use crate::{
    client::{
        pathfind::{context::CostModel, CurrentPath, Goal},
        settings::Settings,
        state::local::AgentState,
    },
    error::PlanError,
    storage::blocks::BlockView,
};

/// A key the autopilot can hold down
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Input {
    Jump,
    Sneak,
    Forward,
    UseItem,
}

/// Actuation and user feedback, implemented by whatever drives the player
pub trait Controls {
    fn set_input(&mut self, input: Input, pressed: bool);
    fn clear_all_inputs(&mut self);
    fn look(&mut self, direction: Direction);

    /// stop the walking path executor mid segment
    fn cancel_segment(&mut self);

    /// status text shown to the user
    fn log_direct(&mut self, message: &str);
    fn notify(&mut self, message: &str, error: bool);
    fn disconnect(&mut self);
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CommandKind {
    /// drop whatever is being walked and take no new goal
    CancelAndSetGoal,
    /// plan toward the goal without walking it yet
    SetGoalAndPause,
    /// keep walking toward the goal
    SetGoalAndPath,
    RequestPause,
}

/// The autopilot's answer to one tick
#[derive(Clone)]
pub struct PathingCommand {
    pub goal: Option<Goal>,
    pub kind: CommandKind,

    /// cost model the walking planner should use instead of its default
    pub context: Option<Arc<dyn CostModel>>,
}

impl Debug for PathingCommand {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PathingCommand")
            .field("goal", &self.goal)
            .field("kind", &self.kind)
            .field("custom_context", &self.context.is_some())
            .finish()
    }
}

impl PathingCommand {
    pub const fn new(goal: Option<Goal>, kind: CommandKind) -> Self {
        Self {
            goal,
            kind,
            context: None,
        }
    }

    pub const fn cancel() -> Self {
        Self::new(None, CommandKind::CancelAndSetGoal)
    }

    pub const fn pause() -> Self {
        Self::new(None, CommandKind::RequestPause)
    }

    pub fn with_context(goal: Goal, kind: CommandKind, context: Arc<dyn CostModel>) -> Self {
        Self {
            goal: Some(goal),
            kind,
            context: Some(context),
        }
    }
}

/// The world as of this tick
#[derive(Copy, Clone)]
pub struct Snapshot<'a> {
    pub agent: &'a AgentState,
    pub settings: &'a Settings,
    pub world: &'a dyn BlockView,
}

pub struct TickInput<'a> {
    pub now: Snapshot<'a>,

    /// the path the walking executor is following, if any
    pub current_path: Option<&'a CurrentPath>,

    /// the last walking plan could not be computed
    pub calc_failed: bool,
    pub safe_to_cancel: bool,
}

/// Sent from planner callbacks and applied on the next tick
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Intent {
    JumpPathReady,
    JumpPathFailed(PlanError),
}

impl From<Result<(), PlanError>> for Intent {
    fn from(result: Result<(), PlanError>) -> Self {
        match result {
            Ok(()) => Intent::JumpPathReady,
            Err(err) => Intent::JumpPathFailed(err),
        }
    }
}

/// An intent and the session generation it was raised for
#[derive(Clone, Debug)]
pub struct Tagged {
    pub generation: u64,
    pub intent: Intent,
}
