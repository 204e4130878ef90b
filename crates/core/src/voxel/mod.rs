use bevy::math::{IVec3, Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::coords::ChunkVoxel;

pub const SIDE_COUNT: usize = 6;

/// An opaque block-type identifier stored per voxel.
///
/// Id 0 is the reserved AIR sentinel meaning "empty"; every other id is resolved by the host to
/// a drawable material.
#[derive(Hash, Default, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Serialize, Deserialize)]
pub struct Kind(u16);

impl Kind {
    pub const AIR: Kind = Kind(0);

    /// Creates a new [`Kind`] with the given id.
    pub const fn id(id: u16) -> Self {
        Kind(id)
    }

    /// Checks if current kind is the AIR [`Kind`], which has id 0.
    #[inline]
    pub const fn is_none(&self) -> bool {
        self.0 == 0
    }
}

impl From<u16> for Kind {
    fn from(v: u16) -> Self {
        Self(v)
    }
}

impl From<Kind> for u16 {
    fn from(v: Kind) -> Self {
        v.0
    }
}

impl std::fmt::Display for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("{}", self.0))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Hash, Default, Serialize, Deserialize)]
pub enum Side {
    #[default]
    Right = 0,
    Left = 1,
    Up = 2,
    Down = 3,
    Front = 4,
    Back = 5,
}

pub const SIDES: [Side; SIDE_COUNT] = [
    Side::Right,
    Side::Left,
    Side::Up,
    Side::Down,
    Side::Front,
    Side::Back,
];

impl Side {
    pub const fn opposite(&self) -> Side {
        match self {
            Side::Right => Side::Left,
            Side::Left => Side::Right,
            Side::Up => Side::Down,
            Side::Down => Side::Up,
            Side::Front => Side::Back,
            Side::Back => Side::Front,
        }
    }

    pub const fn index(&self) -> usize {
        *self as usize
    }

    #[inline]
    pub fn normal(&self) -> Vec3 {
        match self {
            Side::Right => Vec3::X,
            Side::Left => -Vec3::X,
            Side::Up => Vec3::Y,
            Side::Down => -Vec3::Y,
            Side::Front => Vec3::Z,
            Side::Back => -Vec3::Z,
        }
    }

    pub const fn dir(&self) -> IVec3 {
        match self {
            Side::Right => IVec3::X,
            Side::Left => IVec3::NEG_X,
            Side::Up => IVec3::Y,
            Side::Down => IVec3::NEG_Y,
            Side::Front => IVec3::Z,
            Side::Back => IVec3::NEG_Z,
        }
    }
}

/// A bitmask holding, for each of the 6 sides of a voxel, whether the neighbor across that side
/// is solid. An occluded side emits no face when meshing.
#[derive(Hash, Default, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Serialize, Deserialize)]
pub struct FacesOcclusion(u8);

const FULL_OCCLUDED_MASK: u8 = 0b0011_1111;

impl FacesOcclusion {
    pub fn fully_occluded() -> Self {
        Self(FULL_OCCLUDED_MASK)
    }

    pub fn is_fully_occluded(&self) -> bool {
        self.0 & FULL_OCCLUDED_MASK == FULL_OCCLUDED_MASK
    }

    pub fn is_occluded(&self, side: Side) -> bool {
        let mask = 1 << side as usize;
        self.0 & mask == mask
    }

    pub fn set(&mut self, side: Side, occluded: bool) {
        let mask = 1 << side as usize;
        if occluded {
            self.0 |= mask;
        } else {
            self.0 &= !mask;
        }
    }
}

impl From<[bool; SIDE_COUNT]> for FacesOcclusion {
    fn from(v: [bool; SIDE_COUNT]) -> Self {
        let mut result = Self::default();

        for side in SIDES {
            result.set(side, v[side as usize]);
        }

        result
    }
}

/// A single unit quad facing one side of a solid voxel, emitted whenever the neighbor across
/// that side is empty.
#[derive(Default, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Face {
    pub voxel: ChunkVoxel,
    pub side: Side,
    pub kind: Kind,
}

/// A renderable triangle surface, one per distinct [`Kind`] present in a chunk.
///
/// All buffers are kept internally consistent: 4 vertices and 6 indices per quad. The secondary
/// UV channel duplicates the primary one and is reserved for ambient-occlusion sampling on the
/// host side.
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Surface {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub uvs: Vec<Vec2>,
    pub uvs2: Vec<Vec2>,
    pub indices: Vec<u32>,
}

impl Surface {
    pub fn push_quad(&mut self, positions: [Vec3; 4], normal: Vec3, uvs: [Vec2; 4]) {
        let base = self.positions.len() as u32;

        self.positions.extend(positions);
        self.normals.extend([normal; 4]);
        self.uvs.extend(uvs);
        self.uvs2.extend(uvs);
        self.indices
            .extend([base, base + 1, base + 2, base + 2, base + 3, base]);
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    pub fn quad_count(&self) -> usize {
        self.positions.len() / 4
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}
