//! Elytra autopilot.
//!
//! [`ElytraProcess`] is driven once per tick by its host. It takes off
//! (optionally walking to a ledge first), hands steering to a
//! [`FlightSession`] while gliding, and picks a landing spot once the route
//! runs out or equipment runs low.
//!
//! Planning and session teardown happen on background threads. Anything they
//! have to tell the process is queued as an [`Intent`] and applied at the start
//! of the next tick, so controller state is only ever touched from the tick.

use std::{mem, sync::Arc};

use indexmap::IndexSet;
use interfaces::types::{
    BlockLocation, BlockState, ChunkLocation, Dimension, Direction, ItemKind, Location,
};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info, warn};

use crate::{
    client::{
        elytra::{
            command::{
                CommandKind, Controls, Input, Intent, PathingCommand, Snapshot, Tagged,
                TickInput,
            },
            landing::{LandingSearch, LANDING_COLUMN_HEIGHT},
            session::{FlightBackend, FlightSession, PlanCallback, SessionRequest},
            state::State,
        },
        pathfind::{
            context::{CalculationContext, CostModel, WalkOffContext},
            CurrentPath, Goal, MoveKind,
        },
        settings::Settings,
        state::local::AgentState,
    },
    error::GoalError,
    storage::blocks::BlockView,
};

pub mod command;
pub mod landing;
pub mod session;
pub mod state;

const AUTO_JUMP_FAILURE_MSG: &str = "Failed to compute a walking path to a spot to jump off \
                                     from. Consider starting from a higher location, near an \
                                     overhang. Or, you can disable elytra_auto_jump and just \
                                     manually begin gliding.";

/// the walking planner is asked to get down to this height to find a ledge
const TAKEOFF_Y: i16 = 31;

/// the landing search starts once within this many blocks of the route's end
const PATH_END_RADIUS: f64 = 48.0;

/// fall distance at which the elytra can be opened
const DEPLOY_FALL_DISTANCE: f32 = 1.0;

const SETTLED_SPEED: f64 = 0.001;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum WorldEvent {
    Load,
    Unload,
}

/// Messages already shown during this session
#[derive(Default, Debug)]
struct Notices {
    low_resources: bool,
    searching: bool,
    braking: bool,
}

/// true if the elytra is missing or nearly broken, or fireworks are nearly
/// gone
pub fn should_land_for_safety(agent: &AgentState, settings: &Settings) -> bool {
    let elytra_ok = agent.inventory.chest().is_some_and(|chest| {
        chest.kind == ItemKind::ELYTRA && chest.durability() >= settings.elytra_minimum_durability
    });

    if !elytra_ok {
        return true;
    }

    agent.inventory.count(ItemKind::FIREWORKS) <= settings.elytra_min_fireworks_before_landing
}

pub struct ElytraProcess<B> {
    backend: B,
    state: State,
    going_to_landing_spot: bool,
    landing_spot: Option<BlockLocation>,

    /// arrival has been announced for this session
    reached_goal: bool,
    goal: Option<Goal>,
    session: Option<Box<dyn FlightSession>>,
    predicting_terrain: bool,
    bad_landing_spots: IndexSet<BlockLocation>,

    /// bumped on every reset so intents from old sessions can be dropped
    generation: u64,
    intent_tx: UnboundedSender<Tagged>,
    intent_rx: UnboundedReceiver<Tagged>,
    walk_off: Option<Arc<dyn CostModel>>,
    notices: Notices,
}

impl<B: FlightBackend> ElytraProcess<B> {
    pub fn new(backend: B) -> Self {
        let (intent_tx, intent_rx) = mpsc::unbounded_channel();
        Self {
            backend,
            state: State::default(),
            going_to_landing_spot: false,
            landing_spot: None,
            reached_goal: false,
            goal: None,
            session: None,
            predicting_terrain: false,
            bad_landing_spots: IndexSet::new(),
            generation: 0,
            intent_tx,
            intent_rx,
            walk_off: None,
            notices: Notices::default(),
        }
    }

    pub const fn state(&self) -> State {
        self.state
    }

    pub const fn is_active(&self) -> bool {
        self.session.is_some()
    }

    pub fn current_destination(&self) -> Option<BlockLocation> {
        self.session.as_ref().map(|session| session.destination())
    }

    pub fn landing_spot(&self) -> Option<BlockLocation> {
        self.landing_spot
    }

    pub fn display_name(&self) -> String {
        format!("Elytra - {}", self.state.description())
    }

    /// Only the walk to a ledge may be interrupted
    pub fn is_safe_to_cancel(&self) -> bool {
        !self.is_active() || !matches!(self.state, State::Flying | State::StartFlying)
    }

    fn set_state(&mut self, state: State) {
        if self.state != state {
            info!(from = %self.state, to = %state, "elytra state");
            self.state = state;
        }
    }

    /// Clear every per-session field and drop the session without blocking
    fn reset_fields(&mut self) {
        self.state = State::StartFlying;
        self.going_to_landing_spot = false;
        self.landing_spot = None;
        self.reached_goal = false;
        self.goal = None;
        self.walk_off = None;
        self.notices = Notices::default();
        self.generation += 1;
        self.destroy_session();
    }

    fn destroy_session(&mut self) {
        if let Some(session) = self.session.take() {
            debug!(destination = %session.destination(), "destroying flight session");
            rayon::spawn(move || session.destroy());
        }
    }

    /// Give up control and forget everything about the flight
    pub fn on_lost_control(&mut self) {
        self.reset_fields();
        self.bad_landing_spots.clear();
    }

    /// Fly to `destination`. Does nothing outside the nether.
    pub fn path_to(&mut self, destination: BlockLocation, now: Snapshot<'_>) {
        self.path_to_inner(destination, false, now);
    }

    fn path_to_inner(&mut self, destination: BlockLocation, append: bool, now: Snapshot<'_>) {
        if now.agent.dimension != Dimension::Nether {
            debug!(dimension = %now.agent.dimension, "elytra flight is nether only");
            return;
        }

        // a landing re-path belongs to the same trip
        let trip = append.then(|| (self.state, self.reached_goal, mem::take(&mut self.notices)));
        self.reset_fields();

        if let Some((state, reached_goal, notices)) = trip {
            self.state = state;
            self.reached_goal = reached_goal;
            self.notices = notices;
        }

        self.predicting_terrain = now.settings.elytra_predict_terrain;

        let mut session = self.backend.create(SessionRequest {
            destination,
            append_destination: append,
            seed: now.settings.elytra_nether_seed,
            predict_terrain: self.predicting_terrain,
        });
        session.repack_chunks(now.world);
        session.path_to(now.agent.feet());

        info!(%destination, append, "flight session started");
        self.session = Some(session);
    }

    /// Fly to an xz column (at y = 64) or a block
    pub fn path_to_goal(&mut self, goal: Goal, now: Snapshot<'_>) -> Result<(), GoalError> {
        let destination = match goal {
            Goal::XZ(column) => BlockLocation::new(column.x, 64, column.z),
            Goal::Block(block) => block,
            Goal::YLevel(_) => return Err(GoalError::Unsupported),
        };

        if destination.y <= 0 || destination.y >= 128 {
            return Err(GoalError::OutOfRange(destination.y));
        }

        self.path_to(destination, now);
        Ok(())
    }

    /// Start over toward the same destination
    pub fn reset_state(&mut self, now: Snapshot<'_>) {
        let destination = self.current_destination();
        self.reset_fields();
        if let Some(destination) = destination {
            self.path_to_inner(destination, false, now);
        }
    }

    pub fn repack_chunks(&mut self, world: &dyn BlockView) {
        if let Some(session) = self.session.as_mut() {
            session.repack_chunks(world);
        }
    }

    pub fn landing_spot_is_bad(&mut self, spot: BlockLocation) {
        warn!(%spot, "rejecting landing spot");
        self.bad_landing_spots.insert(spot);
        self.going_to_landing_spot = false;
        self.landing_spot = None;
        self.set_state(State::Flying);
    }

    fn plan_callback(&self) -> PlanCallback {
        let tx = self.intent_tx.clone();
        let generation = self.generation;
        Box::new(move |result| {
            let intent = Intent::from(result);
            // a closed channel means the process is gone and nobody cares
            let _ = tx.send(Tagged { generation, intent });
        })
    }

    fn apply_intents(&mut self, controls: &mut dyn Controls) {
        while let Ok(Tagged { generation, intent }) = self.intent_rx.try_recv() {
            if generation != self.generation {
                debug!(?intent, generation, "dropping intent from an old session");
                continue;
            }

            match intent {
                Intent::JumpPathReady => {
                    if self.state == State::Pause {
                        self.set_state(State::GetToJump);
                    }
                }
                Intent::JumpPathFailed(err) => {
                    warn!(%err, "could not plan a flight from the takeoff point");
                    controls.log_direct(&format!("Failed to compute an elytra path: {err}"));
                    self.on_lost_control();
                }
            }
        }
    }

    fn walk_off_context(&mut self, now: Snapshot<'_>) -> Arc<dyn CostModel> {
        self.walk_off
            .get_or_insert_with(|| {
                let base = CalculationContext::new(now.settings, now.agent, now.world.world_border());
                let model: Arc<dyn CostModel> = Arc::new(WalkOffContext::new(base));
                model
            })
            .clone()
    }

    /// Decide what to do this tick
    pub fn on_tick(&mut self, input: TickInput<'_>, controls: &mut dyn Controls) -> PathingCommand {
        let TickInput {
            now,
            current_path,
            calc_failed,
            safe_to_cancel,
        } = input;
        let Snapshot {
            agent, settings, ..
        } = now;

        self.apply_intents(controls);

        let Some(seed) = self.session.as_ref().map(|session| session.seed()) else {
            return PathingCommand::cancel();
        };

        if seed != settings.elytra_nether_seed {
            controls.log_direct("Nether seed changed, recalculating path");
            self.reset_state(now);
        }

        if self.predicting_terrain != settings.elytra_predict_terrain {
            controls.log_direct("elytra_predict_terrain setting changed, recalculating path");
            self.reset_state(now);
        }

        let Some(session) = self.session.as_mut() else {
            return PathingCommand::cancel();
        };
        session.on_tick(agent);

        if calc_failed {
            self.on_lost_control();
            controls.log_direct(AUTO_JUMP_FAILURE_MSG);
            return PathingCommand::cancel();
        }

        let gliding = agent.fall_flying;

        let mut safety_landing = false;
        if gliding && should_land_for_safety(agent, settings) {
            if settings.elytra_allow_emergency_land {
                if !self.notices.low_resources {
                    controls.log_direct(
                        "Emergency landing - almost out of elytra durability or fireworks",
                    );
                }
                safety_landing = true;
            } else if !self.notices.low_resources {
                controls.log_direct(
                    "almost out of elytra durability or fireworks, but I'm going to continue \
                     since elytra_allow_emergency_land is false",
                );
            }
            self.notices.low_resources = true;
        }

        if gliding && self.state != State::Landing {
            if let Some(command) = self.check_path_end(now, safety_landing, controls) {
                return command;
            }
        }

        if self.state == State::Landing {
            self.steer_to_landing(agent, controls);
        }

        if gliding {
            if self.state != State::Landing {
                self.set_state(State::Flying);
            }
            let landing_mode = self.state == State::Landing;
            self.goal = None;
            controls.clear_all_inputs();
            if let Some(session) = self.session.as_mut() {
                session.tick(agent, landing_mode, controls);
            }
            return PathingCommand::cancel();
        }

        if self.state == State::Landing {
            if agent.horizontal_speed() > SETTLED_SPEED {
                if !self.notices.braking {
                    controls.log_direct(
                        "Landed, but still moving, waiting for velocity to die down...",
                    );
                    self.notices.braking = true;
                }
                controls.set_input(Input::Sneak, true);
                return PathingCommand::pause();
            }

            controls.log_direct("Done :)");
            controls.clear_all_inputs();
            self.on_lost_control();
            return PathingCommand::pause();
        }

        if matches!(self.state, State::Flying | State::StartFlying) {
            let next = if agent.on_ground && settings.elytra_auto_jump {
                State::LocateJump
            } else {
                State::StartFlying
            };
            self.set_state(next);
        }

        match self.state {
            State::LocateJump => self.locate_jump(now, current_path, controls),
            State::Pause => PathingCommand::pause(),
            State::GetToJump => {
                let on_fall = current_path
                    .and_then(CurrentPath::current)
                    .is_some_and(|movement| movement.kind == MoveKind::Fall);

                if agent.fall_distance > DEPLOY_FALL_DISTANCE && !safe_to_cancel && on_fall {
                    self.set_state(State::StartFlying);
                    self.start_flying(agent, safe_to_cancel, controls)
                } else {
                    PathingCommand::new(None, CommandKind::SetGoalAndPath)
                }
            }
            State::StartFlying => self.start_flying(agent, safe_to_cancel, controls),
            State::Flying | State::Landing => PathingCommand::cancel(),
        }
    }

    /// Pick a landing spot near the end of the route and notice arrival
    fn check_path_end(
        &mut self,
        now: Snapshot<'_>,
        safety_landing: bool,
        controls: &mut dyn Controls,
    ) -> Option<PathingCommand> {
        let Snapshot {
            agent,
            settings,
            world,
        } = now;

        let (complete, last) = self
            .session
            .as_ref()
            .map_or((false, None), |session| (session.is_complete(), session.last()));

        if !complete && !safety_landing {
            return None;
        }
        let last = last?;

        let near_end = agent.location.dist2(last.true_center()) < PATH_END_RADIUS * PATH_END_RADIUS;
        let should_search = !self.going_to_landing_spot
            || (safety_landing && self.landing_spot.is_none());

        if (near_end || safety_landing) && should_search {
            if !self.notices.searching {
                controls.log_direct("Path complete, picking a nearby safe landing spot...");
            }

            let found =
                LandingSearch::new(world, settings, &self.bad_landing_spots).find(agent.feet());

            // without a spot we keep circling the end of the route and try
            // again once a safety landing is called for
            match found {
                Some(spot) => {
                    info!(%spot, "landing spot found");
                    self.path_to_inner(spot, true, now);
                    self.landing_spot = Some(spot);
                    if safety_landing {
                        self.set_state(State::Landing);
                    }
                }
                None => warn!("no safe landing spot found"),
            }

            self.going_to_landing_spot = true;
            self.notices.searching = true;
        }

        if agent.location.dist2(last.true_center()) < 1.0 {
            if settings.notification_on_path_complete && !self.reached_goal {
                controls.notify("Pathing complete", false);
            }

            if settings.disconnect_on_arrival && !self.reached_goal {
                self.on_lost_control();
                controls.disconnect();
                return Some(PathingCommand::cancel());
            }

            self.reached_goal = true;

            if self.going_to_landing_spot {
                controls.log_direct("Above the landing spot, landing...");
                self.set_state(State::Landing);
            }
        }

        None
    }

    /// Point at the landing spot without changing pitch, and give up on it if
    /// we have already dropped well below it
    fn steer_to_landing(&mut self, agent: &AgentState, controls: &mut dyn Controls) {
        let end = self
            .landing_spot
            .or_else(|| self.session.as_ref().and_then(|session| session.last()));

        let (true, Some(end)) = (agent.fall_flying, end) else {
            return;
        };

        let from = agent.location;
        let to = Location::new(f64::from(end.x) + 0.5, from.y, f64::from(end.z) + 0.5);
        controls.look(Direction::from(to - from).horizontal());

        if from.y < f64::from(end.y - LANDING_COLUMN_HEIGHT) {
            controls.log_direct("bad landing spot, trying again...");
            self.landing_spot_is_bad(end);
        }
    }

    fn locate_jump(
        &mut self,
        now: Snapshot<'_>,
        current_path: Option<&CurrentPath>,
        controls: &mut dyn Controls,
    ) -> PathingCommand {
        if should_land_for_safety(now.agent, now.settings) {
            controls.log_direct(
                "Not taking off, because elytra durability or fireworks are so low that I would \
                 immediately emergency land anyway.",
            );
            self.on_lost_control();
            return PathingCommand::cancel();
        }

        let goal = *self.goal.get_or_insert(Goal::YLevel(TAKEOFF_Y));

        if let Some(path) = current_path.filter(|path| path.goal() == goal) {
            let Some(fall) = path.path.first_of_kind(MoveKind::Fall) else {
                self.on_lost_control();
                controls.log_direct(AUTO_JUMP_FAILURE_MSG);
                return PathingCommand::cancel();
            };

            let takeoff = fall.src.midpoint(fall.dest);
            debug!(%takeoff, "planning flight from the takeoff point");

            let callback = self.plan_callback();
            if let Some(session) = self.session.as_mut() {
                session.path_to_destination(takeoff, callback);
            }
            self.set_state(State::Pause);
        }

        let context = self.walk_off_context(now);
        PathingCommand::with_context(goal, CommandKind::SetGoalAndPause, context)
    }

    fn start_flying(
        &mut self,
        agent: &AgentState,
        safe_to_cancel: bool,
        controls: &mut dyn Controls,
    ) -> PathingCommand {
        if !safe_to_cancel {
            // the walking executor is ours to interrupt
            controls.cancel_segment();
        }
        controls.clear_all_inputs();
        if agent.fall_distance > DEPLOY_FALL_DISTANCE {
            controls.set_input(Input::Jump, true);
        }
        PathingCommand::cancel()
    }

    pub fn on_world_event(&mut self, event: WorldEvent) {
        if event == WorldEvent::Unload {
            self.on_lost_control();
        }
    }

    pub fn on_chunk_event(&mut self, chunk: ChunkLocation, world: &dyn BlockView) {
        if let Some(session) = self.session.as_mut() {
            session.on_chunk_event(chunk, world);
        }
    }

    pub fn on_block_change(&mut self, location: BlockLocation, state: BlockState) {
        if let Some(session) = self.session.as_mut() {
            session.on_block_change(location, state);
        }
    }

    /// `in_control` is whether this process drove the tick that just ended
    pub fn on_post_tick(&mut self, in_control: bool) {
        if !in_control {
            return;
        }
        if let Some(session) = self.session.as_mut() {
            session.on_post_tick();
        }
    }
}
