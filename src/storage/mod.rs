//! Block storage the cost model and landing search read from

pub mod blocks;
pub mod border;
pub mod chunk;
