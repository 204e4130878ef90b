use serde::{Deserialize, Serialize};

use crate::{
    coords::{Chunk, ChunkVoxel},
    voxel,
};

pub trait ChunkStorageType:
    Clone + Copy + core::fmt::Debug + Default + PartialEq + Eq + std::hash::Hash
{
}

impl ChunkStorageType for u8 {}
impl ChunkStorageType for u16 {}
impl ChunkStorageType for voxel::Kind {}
impl ChunkStorageType for voxel::FacesOcclusion {}

/// Dense per-chunk storage, a single contiguous buffer addressed by the [`ChunkVoxel`] linear
/// index. Chunks are small and mostly dense, so no sparse packing is attempted.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChunkStorage<T>(Vec<T>);

impl<T: ChunkStorageType> Default for ChunkStorage<T> {
    fn default() -> Self {
        Self(vec![T::default(); Chunk::BUFFER_SIZE])
    }
}

impl<T: ChunkStorageType> PartialEq for ChunkStorage<T> {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl<T: ChunkStorageType> ChunkStorage<T> {
    #[inline]
    pub fn get(&self, voxel: ChunkVoxel) -> T {
        self.0[voxel.to_index()]
    }

    #[inline]
    pub fn set(&mut self, voxel: ChunkVoxel, value: T) {
        self.0[voxel.to_index()] = value;
    }

    pub fn is_default(&self) -> bool {
        let default = T::default();
        self.0.iter().all(|v| *v == default)
    }

    pub fn all<F>(&self, f: F) -> bool
    where
        F: FnMut(&T) -> bool,
    {
        self.0.iter().all(f)
    }
}
