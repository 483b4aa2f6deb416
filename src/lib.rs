pub mod constants;
pub mod engine;
pub mod ghost;
pub mod maze;
pub mod motion;
pub mod player;
pub mod rng;
pub mod steering;
pub mod targeting;
pub mod types;
