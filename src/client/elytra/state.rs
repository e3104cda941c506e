use std::fmt::{Display, Formatter};

/// Where the autopilot is in a flight
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum State {
    /// walking toward a ledge that is high enough to glide off of
    LocateJump,
    /// waiting on the flight planner to accept the takeoff point
    Pause,
    GetToJump,
    #[default]
    StartFlying,
    Flying,
    Landing,
}

impl State {
    pub const fn description(self) -> &'static str {
        match self {
            State::LocateJump => "Finding spot to jump off",
            State::Pause => "Waiting for elytra path",
            State::GetToJump => "Walking to takeoff",
            State::StartFlying => "Begin flying",
            State::Flying => "Flying",
            State::Landing => "Landing",
        }
    }
}

impl Display for State {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.description())
    }
}
