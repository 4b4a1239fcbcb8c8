pub mod generator;
pub mod sampler;
pub mod templates;
pub mod tiers;

pub use generator::{EngagementError, EngagementGenerator};
