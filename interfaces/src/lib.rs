//! Value types shared between the autopilot, the cost model and whatever host
//! drives them.

pub mod types;
