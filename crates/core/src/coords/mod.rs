mod chunk;
mod voxel;

pub use chunk::*;
pub use voxel::*;
