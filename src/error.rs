use std::path::PathBuf;

pub type Res<T = ()> = Result<T, Error>;

/// Errors loading the runtime configuration
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("could not read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid settings file {path}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// A background planner could not produce a route
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlanError {
    #[error("no route to {0}")]
    NoRoute(String),
    #[error("the planner was dropped before finishing")]
    Dropped,
}

/// A goal the autopilot refuses to fly to
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GoalError {
    #[error("the goal must be an xz or block goal")]
    Unsupported,
    #[error("the y of the goal ({0}) is not between 0 and 128")]
    OutOfRange(i16),
}

/// World data needed to score a move is not available yet. This is never the
/// same as a forbidden move: callers should retry once the chunk arrives.
#[derive(Debug, Copy, Clone, PartialEq, Eq, thiserror::Error)]
#[error("chunk not loaded")]
pub struct NotLoaded;
