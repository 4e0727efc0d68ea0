pub mod astar;
pub mod config;
mod error;
mod frontier;
mod graph;
pub mod heuristics;
pub mod rrt;
mod sampling;
mod shape;
mod traits;
mod tree;
mod util;
mod validate;
mod world;

pub use astar::{AStarConfig, GridAStar, Neighborhood};
pub use config::{config_map, ConfigMap, ConfigValue};
pub use error::*;
pub use frontier::*;
pub use graph::*;
pub use heuristics::Heuristic;
pub use rrt::{Extension, Rrt, RrtConfig};
pub use sampling::*;
pub use shape::*;
pub use traits::*;
pub use tree::*;
pub use validate::check_start_goal;
pub use world::*;

use smallvec::SmallVec;

/// A point in the continuous planning space
pub type Configuration = SmallVec<[f32; 4]>;

/// A point on the integer lattice searched by [`GridAStar`]
pub type GridConfiguration = SmallVec<[i32; 4]>;

pub const EPSILON: f32 = 1e-6;
