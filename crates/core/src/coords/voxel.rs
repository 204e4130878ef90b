use bevy::math::{IVec3, Vec3};
use serde::{Deserialize, Serialize};

/// An absolute voxel coordinate in the world grid.
///
/// Unlike [`super::ChunkVoxel`], this coordinate is unbounded and may be negative.
#[derive(Debug, Default, Hash, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
pub struct Voxel {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl Voxel {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub fn as_vec3(self) -> Vec3 {
        Vec3::new(self.x as f32, self.y as f32, self.z as f32)
    }
}

impl std::fmt::Display for Voxel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("({}, {}, {})", self.x, self.y, self.z))
    }
}

impl From<Vec3> for Voxel {
    /// Rounds a world position down to the voxel which contains it, so (1.1, -0.3, 17.5) becomes
    /// (1, -1, 17).
    fn from(world: Vec3) -> Self {
        Self {
            x: world.x.floor() as i32,
            y: world.y.floor() as i32,
            z: world.z.floor() as i32,
        }
    }
}

impl From<IVec3> for Voxel {
    fn from(value: IVec3) -> Self {
        Self::new(value.x, value.y, value.z)
    }
}

impl From<Voxel> for IVec3 {
    #[inline]
    fn from(value: Voxel) -> Self {
        IVec3::new(value.x, value.y, value.z)
    }
}

impl From<(i32, i32, i32)> for Voxel {
    fn from(value: (i32, i32, i32)) -> Self {
        Self::new(value.0, value.1, value.2)
    }
}

impl std::ops::Add<IVec3> for Voxel {
    type Output = Voxel;

    fn add(self, rhs: IVec3) -> Self::Output {
        Voxel::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}
