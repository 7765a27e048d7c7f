pub mod error;
pub mod model;
pub mod policy;
pub mod region;
pub mod stats;
pub mod traits;
