use bevy::{
    math::{IVec3, Vec2, Vec3},
    platform::collections::HashMap,
};
use voxbox_core::{
    VoxelWorld,
    chunk::{self, ChunkStorage},
    coords::{Chunk, ChunkVoxel},
    voxel::{self, Face, FacesOcclusion, Kind, Surface},
};

// v3               v2
// +-----------+
// v7  / |      v6 / |
// +-----------+   |
// |   |       |   |
// |   +-------|---+
// | /  v0     | /  v1
// +-----------+
// v4           v5
//
// Y
// |
// +---X
// /
// Z

pub const VERTICES: [[f32; 3]; 8] = [
    [0.0, 0.0, 0.0], // v0
    [1.0, 0.0, 0.0], // v1
    [1.0, 1.0, 0.0], // v2
    [0.0, 1.0, 0.0], // v3
    [0.0, 0.0, 1.0], // v4
    [1.0, 0.0, 1.0], // v5
    [1.0, 1.0, 1.0], // v6
    [0.0, 1.0, 1.0], // v7
];

pub const VERTICES_INDICES: [[usize; 4]; 6] = [
    [5, 1, 2, 6], // RIGHT
    [0, 4, 7, 3], // LEFT
    [7, 6, 2, 3], // UP
    [0, 1, 5, 4], // DOWN
    [4, 5, 6, 7], // FRONT
    [1, 0, 3, 2], // BACK
];

/// Every face carries the same normalized quad UVs, duplicated into the secondary channel by
/// [`Surface::push_quad`]. No texture-space continuity across adjacent voxels.
pub const FACE_UVS: [Vec2; 4] = [
    Vec2::new(0.0, 0.0),
    Vec2::new(1.0, 0.0),
    Vec2::new(1.0, 1.0),
    Vec2::new(0.0, 1.0),
];

/// Computes which sides of each voxel in the given chunk border a solid neighbor.
///
/// Neighbors inside the chunk are read from the chunk's own storage; neighbors across a chunk
/// boundary are resolved through [`VoxelWorld::get_block`], which keeps the result correct for
/// implicit fill and world bounds.
pub fn faces_occlusion(
    world: &VoxelWorld,
    chunk: Chunk,
    kind: &ChunkStorage<Kind>,
    faces_occlusion: &mut ChunkStorage<FacesOcclusion>,
) {
    for voxel in chunk::voxels() {
        if kind.get(voxel).is_none() {
            faces_occlusion.set(voxel, FacesOcclusion::fully_occluded());
            continue;
        }

        let mut faces = FacesOcclusion::default();
        for side in voxel::SIDES {
            let neighbor = IVec3::from(voxel) + side.dir();

            let neighbor_kind = match ChunkVoxel::try_from_ivec(neighbor) {
                Some(neighbor_voxel) => kind.get(neighbor_voxel),
                None => world.get_block(voxel.to_voxel(chunk) + side.dir()),
            };

            faces.set(side, !neighbor_kind.is_none());
        }

        faces_occlusion.set(voxel, faces);
    }
}

/// Emits one [`Face`] per non-occluded side of every solid voxel, in linear scan order.
///
/// This is plain face culling: adjacent coplanar quads of the same kind are kept separate, never
/// merged into larger polygons.
pub fn generate_faces(
    kind: &ChunkStorage<Kind>,
    occlusion: &ChunkStorage<FacesOcclusion>,
) -> Vec<Face> {
    const FACES_ESTIMATION: usize = (Chunk::BUFFER_SIZE * voxel::SIDE_COUNT) / 2;

    let mut faces = Vec::with_capacity(FACES_ESTIMATION);

    for voxel in chunk::voxels() {
        let kind = kind.get(voxel);
        if kind.is_none() {
            continue;
        }

        let voxel_occlusion = occlusion.get(voxel);

        for side in voxel::SIDES {
            if voxel_occlusion.is_occluded(side) {
                continue;
            }

            faces.push(Face { voxel, side, kind });
        }
    }

    faces
}

/// Assembles one [`Surface`] per distinct kind present in the given face list.
///
/// Positions are in world space. Each face contributes 4 vertices and 6 indices with a
/// consistent winding for outward-facing normals. Kinds with no face get no surface at all.
pub fn generate_surfaces(chunk: Chunk, faces: &[Face]) -> HashMap<Kind, Surface> {
    let origin = chunk.origin().as_vec3();
    let mut surfaces = HashMap::<Kind, Surface>::default();

    for face in faces {
        let normal = face.side.normal();
        let base = origin + IVec3::from(face.voxel).as_vec3();

        let mut quad = [Vec3::ZERO; 4];
        for (i, vertex) in quad.iter_mut().enumerate() {
            let corner: Vec3 = VERTICES[VERTICES_INDICES[face.side.index()][i]].into();
            *vertex = base + corner;
        }

        surfaces
            .entry(face.kind)
            .or_default()
            .push_quad(quad, normal, FACE_UVS);
    }

    surfaces
}

/// Runs the whole meshing pipeline for one chunk: occlusion pass, face emission and surface
/// assembly. Returns an empty map when the chunk has no materialized storage or no exposed face.
pub fn mesh_chunk(world: &VoxelWorld, chunk: Chunk) -> HashMap<Kind, Surface> {
    let Some(data) = world.chunk(chunk) else {
        return HashMap::default();
    };

    let mut occlusion = ChunkStorage::<FacesOcclusion>::default();
    faces_occlusion(world, chunk, data.kind(), &mut occlusion);

    let faces = generate_faces(data.kind(), &occlusion);
    generate_surfaces(chunk, &faces)
}
