use bevy::math::{IVec3, Vec3};
use serde::{Deserialize, Serialize};

use crate::coords::Voxel;

/// Points to a chunk coordinates in the world in a 3d grid.
///
/// A Chunk is a cubic container with [`Self::BUFFER_SIZE`] voxels.
#[derive(Debug, Default, Hash, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
pub struct Chunk {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl Chunk {
    pub const AXIS_SIZE: usize = 16;
    pub const X_END: u8 = (Self::AXIS_SIZE - 1) as u8;
    pub const Y_END: u8 = (Self::AXIS_SIZE - 1) as u8;
    pub const Z_END: u8 = (Self::AXIS_SIZE - 1) as u8;

    pub const BUFFER_SIZE: usize = Self::AXIS_SIZE * Self::AXIS_SIZE * Self::AXIS_SIZE;

    const X_SHIFT: usize = (Self::AXIS_SIZE.ilog2() + Self::Z_SHIFT as u32) as usize;
    const Z_SHIFT: usize = Self::AXIS_SIZE.ilog2() as usize;
    const Y_SHIFT: usize = 0;

    const X_MASK: usize = (Self::AXIS_SIZE - 1) << Self::X_SHIFT;
    const Z_MASK: usize = (Self::AXIS_SIZE - 1) << Self::Z_SHIFT;
    const Y_MASK: usize = Self::AXIS_SIZE - 1;

    /// Creates a new chunk coordinates.
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Creates a new chunk coordinates pointing to a neighbor chunk at the given direction.
    pub fn neighbor(self, dir: IVec3) -> Self {
        Chunk {
            x: self.x + dir.x,
            y: self.y + dir.y,
            z: self.z + dir.z,
        }
    }

    /// Returns the chunk which contains the given world voxel coordinates.
    ///
    /// This handles negative coordinates, so (-1, 0, 17) will point to chunk (-1, 0, 1).
    #[inline]
    pub fn from_voxel(voxel: Voxel) -> Self {
        Self {
            x: voxel.x.div_euclid(Self::AXIS_SIZE as i32),
            y: voxel.y.div_euclid(Self::AXIS_SIZE as i32),
            z: voxel.z.div_euclid(Self::AXIS_SIZE as i32),
        }
    }

    /// Returns the world coordinates of this chunk's (0, 0, 0) voxel.
    #[inline]
    pub const fn origin(self) -> IVec3 {
        IVec3::new(
            self.x * Self::AXIS_SIZE as i32,
            self.y * Self::AXIS_SIZE as i32,
            self.z * Self::AXIS_SIZE as i32,
        )
    }
}

impl std::fmt::Display for Chunk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("({}, {}, {})", self.x, self.y, self.z))
    }
}

impl From<(i32, i32, i32)> for Chunk {
    fn from(value: (i32, i32, i32)) -> Self {
        Self::new(value.0, value.1, value.2)
    }
}

impl From<IVec3> for Chunk {
    fn from(value: IVec3) -> Self {
        Self::new(value.x, value.y, value.z)
    }
}

impl From<Chunk> for IVec3 {
    fn from(value: Chunk) -> Self {
        Self::new(value.x, value.y, value.z)
    }
}

impl From<Chunk> for Vec3 {
    /// Converts a chunk coordinate to its absolute world position.
    fn from(chunk: Chunk) -> Self {
        chunk.origin().as_vec3()
    }
}

/// Represents a voxel coordinate inside a [`Chunk`]. Since it is a relative coordinate, it can't
/// be negative and is guaranteed to be within chunk bounds.
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy, Hash, Serialize, Deserialize)]
pub struct ChunkVoxel {
    pub x: u8,
    pub y: u8,
    pub z: u8,
}

impl ChunkVoxel {
    #[inline(always)]
    pub const fn new(x: u8, y: u8, z: u8) -> Self {
        Self { x, y, z }
    }

    #[inline]
    /// Try to convert to a valid chunk voxel coordinates. If the given coordinates is outside the
    /// chunk bounds, returns [`None`].
    pub fn try_from_ivec(value: IVec3) -> Option<Self> {
        if value.x >= 0
            && value.x < Chunk::AXIS_SIZE as i32
            && value.y >= 0
            && value.y < Chunk::AXIS_SIZE as i32
            && value.z >= 0
            && value.z < Chunk::AXIS_SIZE as i32
        {
            Some(Self::new(value.x as u8, value.y as u8, value.z as u8))
        } else {
            None
        }
    }

    #[inline(always)]
    /// Converts this 3d coordinates into a 1d coordinate
    pub const fn to_index(self) -> usize {
        (self.x as usize) << Chunk::X_SHIFT
            | (self.y as usize) << Chunk::Y_SHIFT
            | (self.z as usize) << Chunk::Z_SHIFT
    }

    #[inline(always)]
    /// Creates a new 3d coordinates from a 1d coordinate
    pub const fn from_index(index: usize) -> ChunkVoxel {
        ChunkVoxel::new(
            ((index & Chunk::X_MASK) >> Chunk::X_SHIFT) as u8,
            ((index & Chunk::Y_MASK) >> Chunk::Y_SHIFT) as u8,
            ((index & Chunk::Z_MASK) >> Chunk::Z_SHIFT) as u8,
        )
    }

    /// Creates a new chunk voxel coordinates from a world voxel coordinates.
    ///
    /// This converts (1, -1, 17) into (1, 15, 1), since given the world coordinates, that's where
    /// this voxel would be inside its owning chunk.
    #[inline(always)]
    pub fn from_voxel(voxel: Voxel) -> Self {
        let x = voxel.x.rem_euclid(Chunk::AXIS_SIZE as i32) as u8;
        let y = voxel.y.rem_euclid(Chunk::AXIS_SIZE as i32) as u8;
        let z = voxel.z.rem_euclid(Chunk::AXIS_SIZE as i32) as u8;

        Self::new(x, y, z)
    }

    /// Converts this relative coordinate back to a world voxel coordinates, given its owning
    /// chunk.
    #[inline]
    pub fn to_voxel(self, chunk: Chunk) -> Voxel {
        let origin = chunk.origin();
        Voxel::new(
            origin.x + self.x as i32,
            origin.y + self.y as i32,
            origin.z + self.z as i32,
        )
    }
}

impl std::fmt::Display for ChunkVoxel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("({}, {}, {})", self.x, self.y, self.z))
    }
}

impl From<ChunkVoxel> for IVec3 {
    #[inline]
    fn from(value: ChunkVoxel) -> Self {
        IVec3::new(value.x as i32, value.y as i32, value.z as i32)
    }
}

impl From<(u8, u8, u8)> for ChunkVoxel {
    fn from(value: (u8, u8, u8)) -> Self {
        Self::new(value.0, value.1, value.2)
    }
}

impl From<usize> for ChunkVoxel {
    fn from(index: usize) -> Self {
        Self::from_index(index)
    }
}
