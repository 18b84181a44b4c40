// Data models for asset snapshots and scoring output
pub mod asset;

pub use asset::*;
