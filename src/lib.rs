//! Chunked voxel world with on-demand surface extraction.
//!
//! [`World`] composes the sparse voxel store ([`voxbox_core`]) with the face-culling mesher
//! ([`voxbox_mesher`]) into the pipeline a host application drives: edits through
//! [`World::set_block`], remeshing either immediately per edit or batched through
//! [`World::rebuild_dirty_chunks`], and the generated surfaces handed off for rendering through
//! [`World::surfaces`].

use bevy::{log::trace, platform::collections::HashMap};

pub use voxbox_core::{
    ImplicitFill, VoxelWorld, WorldConfig, WorldConfigError,
    coords::{Chunk, ChunkVoxel, Voxel},
    voxel::{Kind, Side, Surface},
};
pub use voxbox_mesher as mesher;

/// The voxel pipeline: authoritative storage plus the generated surfaces of every meshed chunk.
///
/// Single-threaded and frame-synchronous: every operation runs to completion before returning,
/// and a remesh replaces a chunk's surface set atomically from the consumer's point of view.
pub struct World {
    store: VoxelWorld,
    surfaces: HashMap<Chunk, HashMap<Kind, Surface>>,
}

impl World {
    pub fn new(config: WorldConfig) -> Result<Self, WorldConfigError> {
        Ok(Self {
            store: VoxelWorld::new(config)?,
            surfaces: HashMap::default(),
        })
    }

    pub fn store(&self) -> &VoxelWorld {
        &self.store
    }

    pub fn get_block(&self, x: i32, y: i32, z: i32) -> Kind {
        self.store.get_block(Voxel::new(x, y, z))
    }

    /// Writes a block and, when `rebuild_now`, synchronously remeshes every chunk dirtied by
    /// this single edit before returning.
    ///
    /// The immediate cadence is meant for single-voxel edits; bulk edits should pass `false` and
    /// invoke [`Self::rebuild_dirty_chunks`] once afterwards, collapsing repeated dirtying of
    /// the same chunk into one remesh.
    pub fn set_block(&mut self, x: i32, y: i32, z: i32, kind: Kind, rebuild_now: bool) {
        let dirtied = self.store.set_block(Voxel::new(x, y, z), kind);

        if rebuild_now {
            for chunk in dirtied {
                self.remesh_chunk(chunk);
            }
        }
    }

    /// O(1) lookup of the topmost solid y in the given column, independent of mesh state.
    pub fn top_y(&self, x: i32, z: i32) -> i32 {
        self.store.top_y(x, z)
    }

    /// Remeshes every currently-dirty chunk exactly once, clearing its dirty state.
    pub fn rebuild_dirty_chunks(&mut self) {
        let dirty = self.store.dirty_chunks();
        let count = dirty.len();

        for chunk in dirty {
            self.remesh_chunk(chunk);
        }

        if count > 0 {
            trace!("[rebuild_dirty_chunks] {count} chunks remeshed");
        }
    }

    /// Regenerates the surfaces of a single chunk from its current voxel data, replacing any
    /// prior surfaces and clearing the chunk's dirty state.
    pub fn remesh_chunk(&mut self, chunk: Chunk) {
        let surfaces = mesher::mesh_chunk(&self.store, chunk);

        if surfaces.is_empty() {
            self.surfaces.remove(&chunk);
        } else {
            self.surfaces.insert(chunk, surfaces);
        }

        self.store.clear_dirty(chunk);
    }

    /// The current surface set of a chunk, one [`Surface`] per kind with at least one exposed
    /// face. [`None`] when the chunk has no renderable geometry.
    ///
    /// Surfaces of a dirty chunk are stale; the host must rebuild before trusting them for
    /// rendering.
    pub fn surfaces(&self, chunk: Chunk) -> Option<&HashMap<Kind, Surface>> {
        self.surfaces.get(&chunk)
    }

    /// Iterates over every chunk which currently has renderable surfaces.
    pub fn surface_chunks(&self) -> impl Iterator<Item = (Chunk, &HashMap<Kind, Surface>)> {
        self.surfaces.iter().map(|(chunk, surfaces)| (*chunk, surfaces))
    }
}
