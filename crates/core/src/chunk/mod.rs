use crate::{
    coords::{Chunk, ChunkVoxel},
    voxel::{self, Kind},
};

mod storage;
pub use storage::*;

/// Iterates over every voxel coordinate inside a chunk, in linear buffer order.
pub fn voxels() -> impl Iterator<Item = ChunkVoxel> {
    (0..Chunk::BUFFER_SIZE).map(ChunkVoxel::from)
}

#[inline]
pub fn is_at_edge(voxel: ChunkVoxel) -> bool {
    voxel.x == 0
        || voxel.y == 0
        || voxel.z == 0
        || voxel.x == Chunk::X_END
        || voxel.y == Chunk::Y_END
        || voxel.z == Chunk::Z_END
}

/// Checks whether the given voxel lies on the chunk face crossed by the given side.
///
/// A voxel on such a face affects the face culling of the chunk across that side.
#[inline]
pub fn touches_side(voxel: ChunkVoxel, side: voxel::Side) -> bool {
    match side {
        voxel::Side::Right => voxel.x == Chunk::X_END,
        voxel::Side::Left => voxel.x == 0,
        voxel::Side::Up => voxel.y == Chunk::Y_END,
        voxel::Side::Down => voxel.y == 0,
        voxel::Side::Front => voxel.z == Chunk::Z_END,
        voxel::Side::Back => voxel.z == 0,
    }
}

/// Voxel data owned by a single chunk.
///
/// A chunk is created lazily on first write and is never destroyed. The dirty flag tracks
/// whether the chunk's generated surfaces still reflect its voxel data.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ChunkData {
    pub(crate) kind: ChunkStorage<Kind>,
    pub(crate) dirty: bool,
}

impl ChunkData {
    pub fn kind(&self) -> &ChunkStorage<Kind> {
        &self.kind
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }
}
