pub mod inflight;
pub mod recap;
pub mod resolver;
pub mod stats;
