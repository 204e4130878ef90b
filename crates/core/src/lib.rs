pub mod chunk;
pub mod coords;
pub mod voxel;
mod world;

pub use world::{ImplicitFill, VoxelWorld, WorldConfig, WorldConfigError};
