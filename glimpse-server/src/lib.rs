// Library exports for glimpse-server
// This allows other crates in the workspace to use glimpse-server modules

pub mod api;
pub mod config;
pub mod db;
pub mod engagement;
pub mod rng;
pub mod scheduler;
pub mod state;
