//! Flying the autopilot without a server.
//!
//! [`LineBackend`] stands in for a real flight planner: routes are straight
//! lines cut into waypoints, computed on the rayon pool. [`Simulation`] owns a
//! world, a player and [`Physics`], and plays the part of the walking executor
//! by looking a single move ahead for a ledge.

use std::{mem, sync::Arc};

use interfaces::types::{BlockLocation, BlockState, ChunkLocation, Direction, Displacement};
use tokio::sync::oneshot::{self, error::TryRecvError};
use tracing::{debug, info, trace, warn};

use crate::{
    client::{
        elytra::{
            command::{CommandKind, Controls, Input, PathingCommand, Snapshot, TickInput},
            session::{FlightBackend, FlightSession, PlanCallback, SessionRequest},
            ElytraProcess, WorldEvent,
        },
        pathfind::{context::CostModel, moves::MoveContext, CurrentPath, Goal, MoveKind, MoveSequence},
        physics::Physics,
        settings::Settings,
        state::local::AgentState,
    },
    error::{GoalError, PlanError},
    storage::blocks::{BlockView, WorldBlocks},
};

/// distance between consecutive waypoints
const WAYPOINT_SPACING: f64 = 16.0;

/// a waypoint closer than this counts as passed
const WAYPOINT_RADIUS: f64 = 4.0;

/// no fireworks this close to the end of the route
const COAST_DISTANCE: f64 = 64.0;

const FIREWORK_INTERVAL: u32 = 40;

/// steepest climb or dive while cruising
const MAX_CRUISE_PITCH: f32 = 30.0;

const LANDING_PITCH: f32 = 70.0;

type Route = Result<Vec<BlockLocation>, PlanError>;

/// Waypoints every [`WAYPOINT_SPACING`] blocks from `from` to `to`,
/// ending exactly at `to`
fn plan_line(from: BlockLocation, to: BlockLocation) -> Route {
    if !(1..128).contains(&to.y) {
        return Err(PlanError::NoRoute(format!("{to} is outside the nether")));
    }

    let start = from.true_center();
    let delta = to.true_center() - start;
    let legs = (delta.mag() / WAYPOINT_SPACING).ceil().max(1.0) as u32;

    let waypoints = (1..legs)
        .map(|leg| {
            let t = f64::from(leg) / f64::from(legs);
            BlockLocation::from(start + delta * t)
        })
        .chain(std::iter::once(to))
        .collect();

    Ok(waypoints)
}

#[derive(Copy, Clone, Debug, Default)]
pub struct LineBackend;

impl FlightBackend for LineBackend {
    fn create(&mut self, request: SessionRequest) -> Box<dyn FlightSession> {
        Box::new(LineSession::new(request))
    }
}

pub struct LineSession {
    request: SessionRequest,
    route: Vec<BlockLocation>,
    pending: Option<oneshot::Receiver<Route>>,
    waypoint: usize,
    since_firework: u32,
    known_chunks: usize,
}

impl LineSession {
    pub const fn new(request: SessionRequest) -> Self {
        Self {
            request,
            route: Vec::new(),
            pending: None,
            waypoint: 0,
            since_firework: 0,
            known_chunks: 0,
        }
    }

    /// Plan on the rayon pool; `on_done` hears the outcome from the worker
    fn spawn_plan(&mut self, from: BlockLocation, on_done: Option<PlanCallback>) {
        let (tx, rx) = oneshot::channel();
        let to = self.request.destination;

        rayon::spawn(move || {
            let route = plan_line(from, to);
            let status = route.as_ref().map(|_| ()).map_err(Clone::clone);

            // the session was dropped before the plan finished
            let _ = tx.send(route);

            if let Some(on_done) = on_done {
                on_done(status);
            }
        });

        self.pending = Some(rx);
    }

    fn poll_plan(&mut self) {
        let Some(rx) = self.pending.as_mut() else {
            return;
        };

        match rx.try_recv() {
            Ok(Ok(route)) => {
                debug!(waypoints = route.len(), "flight route ready");
                self.route = route;
                self.waypoint = 0;
                self.pending = None;
            }
            Ok(Err(err)) => {
                warn!(%err, "flight planning failed");
                self.pending = None;
            }
            Err(TryRecvError::Empty) => {}
            Err(TryRecvError::Closed) => {
                warn!(err = %PlanError::Dropped, "flight planning failed");
                self.pending = None;
            }
        }
    }

    fn target(&self) -> Option<BlockLocation> {
        self.route
            .get(self.waypoint)
            .or_else(|| self.route.last())
            .copied()
    }
}

impl FlightSession for LineSession {
    fn destination(&self) -> BlockLocation {
        self.request.destination
    }

    fn seed(&self) -> i64 {
        self.request.seed
    }

    fn path_to(&mut self, from: BlockLocation) {
        self.spawn_plan(from, None);
    }

    fn path_to_destination(&mut self, from: BlockLocation, on_done: PlanCallback) {
        self.spawn_plan(from, Some(on_done));
    }

    fn is_complete(&self) -> bool {
        self.pending.is_none() && !self.route.is_empty()
    }

    fn last(&self) -> Option<BlockLocation> {
        self.route.last().copied()
    }

    fn on_tick(&mut self, agent: &AgentState) {
        self.poll_plan();

        let radius2 = WAYPOINT_RADIUS * WAYPOINT_RADIUS;
        while self.waypoint + 1 < self.route.len()
            && agent.location.dist2(self.route[self.waypoint].true_center()) < radius2
        {
            self.waypoint += 1;
            trace!(waypoint = self.waypoint, "next waypoint");
        }
    }

    fn tick(&mut self, agent: &AgentState, landing_mode: bool, controls: &mut dyn Controls) {
        let Some(target) = self.target() else {
            return;
        };

        let mut direction = Direction::from(target.true_center() - agent.location);

        if landing_mode {
            direction.pitch = LANDING_PITCH;
            controls.look(direction);
            return;
        }

        direction.pitch = direction.pitch.clamp(-MAX_CRUISE_PITCH, MAX_CRUISE_PITCH);
        controls.look(direction);

        self.since_firework += 1;
        let remaining = self
            .last()
            .map_or(0.0, |last| agent.location.dist2(last.true_center()).sqrt());

        if self.since_firework >= FIREWORK_INTERVAL && remaining > COAST_DISTANCE {
            controls.set_input(Input::UseItem, true);
            self.since_firework = 0;
        }
    }

    fn repack_chunks(&mut self, _world: &dyn BlockView) {
        debug!(destination = %self.request.destination, "repacking chunks");
    }

    fn on_chunk_event(&mut self, chunk: ChunkLocation, world: &dyn BlockView) {
        if world.is_loaded(chunk.0 << 4, chunk.1 << 4) {
            self.known_chunks += 1;
        } else {
            self.known_chunks = self.known_chunks.saturating_sub(1);
        }
    }

    fn on_block_change(&mut self, location: BlockLocation, state: BlockState) {
        trace!(%location, ?state, "block changed under the route");
    }

    fn on_post_tick(&mut self) {}

    fn destroy(self: Box<Self>) {
        debug!(
            destination = %self.request.destination,
            known_chunks = self.known_chunks,
            "line session destroyed"
        );
    }
}

/// Player controls backed by [`Physics`]; status text goes to the log
#[derive(Debug, Default)]
pub struct SimControls {
    pub physics: Physics,
    pub disconnected: bool,
    pub messages: Vec<String>,
}

impl Controls for SimControls {
    fn set_input(&mut self, input: Input, pressed: bool) {
        self.physics.set_input(input, pressed);
    }

    fn clear_all_inputs(&mut self) {
        self.physics.clear_inputs();
    }

    fn look(&mut self, direction: Direction) {
        self.physics.look(direction);
    }

    fn cancel_segment(&mut self) {
        debug!("walking segment cancelled");
    }

    fn log_direct(&mut self, message: &str) {
        info!(target: "chat", "{message}");
        self.messages.push(message.to_string());
    }

    fn notify(&mut self, message: &str, error: bool) {
        if error {
            warn!(target: "notify", "{message}");
        } else {
            info!(target: "notify", "{message}");
        }
        self.messages.push(message.to_string());
    }

    fn disconnect(&mut self) {
        info!("disconnecting");
        self.disconnected = true;
    }
}

pub struct Simulation {
    pub world: WorldBlocks,
    pub agent: AgentState,
    pub settings: Settings,
    pub controls: SimControls,
    process: ElytraProcess<LineBackend>,
    walking: Option<CurrentPath>,
    calc_failed: bool,
    ticks: u64,
}

impl Simulation {
    pub fn new(world: WorldBlocks, agent: AgentState, settings: Settings) -> Self {
        Self {
            world,
            agent,
            settings,
            controls: SimControls::default(),
            process: ElytraProcess::new(LineBackend),
            walking: None,
            calc_failed: false,
            ticks: 0,
        }
    }

    pub const fn process(&self) -> &ElytraProcess<LineBackend> {
        &self.process
    }

    pub const fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn fly_to(&mut self, goal: Goal) -> Result<(), GoalError> {
        let now = Snapshot {
            agent: &self.agent,
            settings: &self.settings,
            world: &self.world,
        };
        self.process.path_to_goal(goal, now)
    }

    /// The cheapest single move from the player's feet that drops off a
    /// ledge. A real walking planner searches further.
    fn plan_walk(&self, goal: Goal, model: &dyn CostModel) -> Option<CurrentPath> {
        let feet = self.agent.feet();
        let steps = MoveContext::new(model, &self.world).progressions(feet).ok()?;

        let fall = steps
            .into_iter()
            .filter(|step| step.movement.kind == MoveKind::Fall)
            .min_by_key(|step| step.cost)?;

        let sequence = MoveSequence::new(goal, vec![fall.movement]);
        Some(CurrentPath::new(Arc::new(sequence)))
    }

    /// Act on the autopilot's command the way a walking executor would
    fn follow(&mut self, command: &PathingCommand) {
        match command.kind {
            CommandKind::SetGoalAndPause => {
                let (Some(goal), Some(model)) = (command.goal, command.context.as_ref()) else {
                    return;
                };
                if self.walking.as_ref().is_some_and(|path| path.goal() == goal) {
                    return;
                }
                self.walking = self.plan_walk(goal, model.as_ref());
                if self.walking.is_none() {
                    debug!(?goal, "no ledge next to the player");
                    self.calc_failed = true;
                }
            }
            CommandKind::SetGoalAndPath => {
                let Some(movement) = self.walking.as_ref().and_then(CurrentPath::current) else {
                    return;
                };
                let toward: Displacement = movement.dest.center_bottom() - self.agent.location;
                self.controls.look(Direction::from(toward.horizontal()));
                self.controls.set_input(Input::Forward, true);
            }
            CommandKind::CancelAndSetGoal => self.walking = None,
            CommandKind::RequestPause => {}
        }
    }

    /// One game tick: decide, act, move
    pub fn step(&mut self) -> PathingCommand {
        let now = Snapshot {
            agent: &self.agent,
            settings: &self.settings,
            world: &self.world,
        };
        let input = TickInput {
            now,
            current_path: self.walking.as_ref(),
            calc_failed: mem::take(&mut self.calc_failed),
            safe_to_cancel: self.agent.on_ground,
        };

        let command = self.process.on_tick(input, &mut self.controls);
        self.follow(&command);

        self.controls.physics.tick(&mut self.agent, &self.world);
        self.process.on_post_tick(true);
        self.ticks += 1;

        command
    }

    /// Tick until the autopilot lets go or `limit` ticks pass. Returns whether
    /// it let go.
    pub fn run(&mut self, limit: u64) -> bool {
        while self.ticks < limit {
            if !self.process.is_active() || self.controls.disconnected {
                return true;
            }
            self.step();
        }

        !self.process.is_active()
    }

    pub fn unload_world(&mut self) {
        self.process.on_world_event(WorldEvent::Unload);
        self.walking = None;
    }
}

#[cfg(test)]
mod tests {
    use std::{thread, time::Duration};

    use assert_matches::assert_matches;
    use interfaces::types::{BlockLocation, BlockState, Location};
    use more_asserts::assert_lt;

    use crate::{
        client::{
            elytra::{
                session::{FlightSession, SessionRequest},
                state::State,
            },
            pathfind::Goal,
            settings::Settings,
            sim::{plan_line, LineSession, Simulation, WAYPOINT_SPACING},
            state::local::AgentState,
        },
        error::{GoalError, PlanError},
        storage::blocks::WorldBlocks,
    };

    fn flat(radius_in_chunks: i32) -> WorldBlocks {
        let mut world = WorldBlocks::nether();
        let center = BlockLocation::new(0, 30, 0);
        world.load_around(center, radius_in_chunks);
        let edge = radius_in_chunks * 16;
        world.fill(
            BlockLocation::new(-edge, 30, -edge),
            BlockLocation::new(edge, 30, edge),
            BlockState::NETHERRACK,
        );
        world
    }

    #[test]
    fn test_plan_line() {
        let from = BlockLocation::new(0, 60, 0);
        let to = BlockLocation::new(100, 60, 0);
        let route = plan_line(from, to).unwrap();

        assert_eq!(route.last(), Some(&to));
        assert_eq!(route.len(), 7);
        for pair in route.windows(2) {
            assert_lt!(pair[0].dist(pair[1]), WAYPOINT_SPACING + 1.0);
        }

        assert_matches!(
            plan_line(from, BlockLocation::new(0, 130, 0)),
            Err(PlanError::NoRoute(_))
        );
    }

    #[test]
    fn test_session_plans_in_background() {
        let mut session = LineSession::new(SessionRequest {
            destination: BlockLocation::new(50, 60, 0),
            append_destination: false,
            seed: 0,
            predict_terrain: false,
        });
        let agent = AgentState::mock(Location::new(0.5, 60.0, 0.5));

        session.path_to(agent.feet());
        assert!(!session.is_complete());

        for _ in 0..200 {
            session.on_tick(&agent);
            if session.is_complete() {
                break;
            }
            thread::sleep(Duration::from_millis(5));
        }

        assert!(session.is_complete());
        assert_eq!(session.last(), Some(BlockLocation::new(50, 60, 0)));
    }

    #[test]
    fn test_rejects_bad_goals() {
        let mut sim = Simulation::new(
            flat(1),
            AgentState::mock(Location::new(0.5, 31.0, 0.5)),
            Settings::default(),
        );

        assert_matches!(sim.fly_to(Goal::YLevel(40)), Err(GoalError::Unsupported));
        assert_matches!(
            sim.fly_to(Goal::Block(BlockLocation::new(0, 0, 0))),
            Err(GoalError::OutOfRange(0))
        );
        assert!(!sim.process().is_active());
    }

    #[test]
    fn test_flight_lands() {
        let mut agent = AgentState::mock(Location::new(0.5, 70.0, 0.5));
        agent.on_ground = false;
        agent.fall_flying = true;

        let mut sim = Simulation::new(flat(6), agent, Settings::default());
        sim.fly_to(Goal::Block(BlockLocation::new(80, 60, 0))).unwrap();

        // planning is asynchronous so keep ticking with some slack
        let mut landed = false;
        for _ in 0..4000 {
            sim.step();
            if !sim.process().is_active() {
                landed = true;
                break;
            }
            thread::sleep(Duration::from_micros(200));
        }

        assert!(landed);
        assert!(sim.agent.on_ground);
        assert_eq!(sim.agent.location.y, 31.0);
        assert!(sim.controls.messages.iter().any(|message| message == "Done :)"));
    }

    #[test]
    fn test_auto_jump_takes_off() {
        let mut world = WorldBlocks::nether();
        world.load_around(BlockLocation::new(0, 60, 0), 4);

        // a pillar to stand on, high above a floor
        world.fill(
            BlockLocation::new(-64, 10, -64),
            BlockLocation::new(64, 10, 64),
            BlockState::NETHERRACK,
        );
        world.set_block(BlockLocation::new(0, 60, 0), BlockState::NETHERRACK);

        let settings = Settings {
            elytra_auto_jump: true,
            ..Settings::default()
        };
        let agent = AgentState::mock(Location::new(0.5, 61.0, 0.5));
        let mut sim = Simulation::new(world, agent, settings);
        sim.fly_to(Goal::Block(BlockLocation::new(100, 60, 0))).unwrap();

        sim.step();
        assert_eq!(sim.process().state(), State::LocateJump);

        let mut flew = false;
        for _ in 0..400 {
            sim.step();
            if sim.agent.fall_flying {
                flew = true;
                break;
            }
            thread::sleep(Duration::from_micros(500));
        }

        assert!(flew);
        assert_matches!(sim.process().state(), State::StartFlying | State::Flying);
    }

    #[test]
    fn test_no_ledge_gives_up() {
        let settings = Settings {
            elytra_auto_jump: true,
            ..Settings::default()
        };
        let agent = AgentState::mock(Location::new(0.5, 31.0, 0.5));
        let mut sim = Simulation::new(flat(2), agent, settings);
        sim.fly_to(Goal::Block(BlockLocation::new(100, 60, 0))).unwrap();

        assert!(sim.run(10));
        assert!(sim
            .controls
            .messages
            .iter()
            .any(|message| message.starts_with("Failed to compute a walking path")));
    }

    #[test]
    fn test_unload_gives_up() {
        let mut agent = AgentState::mock(Location::new(0.5, 70.0, 0.5));
        agent.fall_flying = true;
        let mut sim = Simulation::new(flat(2), agent, Settings::default());
        sim.fly_to(Goal::Block(BlockLocation::new(20, 60, 0))).unwrap();
        assert!(sim.process().is_active());

        sim.unload_world();
        assert!(!sim.process().is_active());
    }
}
