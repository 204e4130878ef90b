use bevy::{
    log::trace,
    platform::collections::{HashMap, HashSet},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    chunk::{self, ChunkData},
    coords::{Chunk, ChunkVoxel, Voxel},
    voxel::{self, Kind},
};

/// Declares a solid slab spanning the whole world footprint, from the bottom of the world up to
/// and including `top`.
///
/// Reads inside the slab on columns with no materialized chunk return `kind` without allocating
/// any storage; the slab is materialized into a chunk the first time that chunk is written.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImplicitFill {
    pub kind: Kind,
    pub top: i32,
}

/// World bounds and fill policy. Immutable after [`VoxelWorld`] construction.
///
/// The horizontal footprint covers `[0, size_x) x [0, size_z)` and the vertical range is
/// `[min_y, max_y]`, both inclusive of `min_y` and `max_y`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldConfig {
    pub size_x: i32,
    pub size_z: i32,
    pub min_y: i32,
    pub max_y: i32,
    pub implicit_fill: Option<ImplicitFill>,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            size_x: 256,
            size_z: 256,
            min_y: 0,
            max_y: 255,
            implicit_fill: None,
        }
    }
}

impl WorldConfig {
    #[inline]
    pub fn contains(&self, voxel: Voxel) -> bool {
        voxel.x >= 0
            && voxel.x < self.size_x
            && voxel.z >= 0
            && voxel.z < self.size_z
            && voxel.y >= self.min_y
            && voxel.y <= self.max_y
    }

    /// The height-index value of a column with no solid voxel.
    #[inline]
    pub const fn empty_height(&self) -> i32 {
        self.min_y - 1
    }

    fn validate(&self) -> Result<(), WorldConfigError> {
        if self.size_x <= 0 || self.size_z <= 0 {
            return Err(WorldConfigError::InvalidFootprint(self.size_x, self.size_z));
        }

        if self.max_y < self.min_y {
            return Err(WorldConfigError::InvalidVerticalRange(
                self.min_y, self.max_y,
            ));
        }

        if let Some(fill) = &self.implicit_fill {
            if fill.kind.is_none() {
                return Err(WorldConfigError::FillKindAir);
            }
            if fill.top < self.min_y || fill.top > self.max_y {
                return Err(WorldConfigError::FillOutsideBounds(
                    fill.top, self.min_y, self.max_y,
                ));
            }
        }

        Ok(())
    }
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum WorldConfigError {
    #[error("world footprint must be positive, got {0}x{1}")]
    InvalidFootprint(i32, i32),
    #[error("vertical range [{0}, {1}] is inverted")]
    InvalidVerticalRange(i32, i32),
    #[error("implicit fill top {0} is outside the vertical range [{1}, {2}]")]
    FillOutsideBounds(i32, i32, i32),
    #[error("implicit fill kind must not be AIR")]
    FillKindAir,
}

/// Authoritative sparse voxel storage.
///
/// Owns the chunk collection, translates world coordinates to chunk plus local coordinates,
/// maintains the per-column height index and tracks which chunks need remeshing. Out-of-bounds
/// reads return AIR and out-of-bounds writes are silent no-ops, matching a best-effort sandbox
/// edit contract.
#[derive(Debug, Clone)]
pub struct VoxelWorld {
    config: WorldConfig,
    chunks: HashMap<Chunk, ChunkData>,
    height: Vec<i32>,
    dirty: HashSet<Chunk>,
}

impl VoxelWorld {
    pub fn new(config: WorldConfig) -> Result<Self, WorldConfigError> {
        config.validate()?;

        let columns = (config.size_x * config.size_z) as usize;
        let initial_height = match &config.implicit_fill {
            Some(fill) => fill.top,
            None => config.empty_height(),
        };

        Ok(Self {
            chunks: HashMap::default(),
            height: vec![initial_height; columns],
            dirty: HashSet::default(),
            config,
        })
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// Returns the block kind at the given coordinates.
    ///
    /// Out-of-bounds coordinates resolve to AIR. Coordinates inside the implicit fill with no
    /// materialized chunk resolve to the fill kind.
    pub fn get_block(&self, voxel: Voxel) -> Kind {
        if !self.config.contains(voxel) {
            return Kind::AIR;
        }

        match self.chunks.get(&Chunk::from_voxel(voxel)) {
            Some(data) => data.kind.get(ChunkVoxel::from_voxel(voxel)),
            None => match &self.config.implicit_fill {
                Some(fill) if voxel.y <= fill.top => fill.kind,
                _ => Kind::AIR,
            },
        }
    }

    /// Writes the block kind at the given coordinates and returns every chunk dirtied by the
    /// write, the owning chunk first.
    ///
    /// Out-of-bounds writes are dropped silently. Re-setting a voxel to its current value is a
    /// no-op and dirties nothing. A write on a chunk-boundary face also dirties the existing
    /// neighbor chunk across that face, since face culling on both sides depends on it.
    pub fn set_block(&mut self, voxel: Voxel, kind: Kind) -> Vec<Chunk> {
        if !self.config.contains(voxel) {
            trace!("[set_block] Dropping out-of-bounds write at {voxel}");
            return vec![];
        }

        if self.get_block(voxel) == kind {
            return vec![];
        }

        let chunk = Chunk::from_voxel(voxel);
        let local = ChunkVoxel::from_voxel(voxel);

        let data = self
            .chunks
            .entry(chunk)
            .or_insert_with(|| materialize(&self.config, chunk));
        data.kind.set(local, kind);
        data.dirty = true;
        self.dirty.insert(chunk);

        let mut dirtied = vec![chunk];
        for side in voxel::SIDES {
            if !chunk::touches_side(local, side) {
                continue;
            }

            let neighbor = chunk.neighbor(side.dir());
            if let Some(neighbor_data) = self.chunks.get_mut(&neighbor) {
                neighbor_data.dirty = true;
                self.dirty.insert(neighbor);
                dirtied.push(neighbor);
            }
        }

        self.update_height(voxel, kind);

        dirtied
    }

    /// Returns the y of the topmost solid voxel in the given column, or
    /// [`WorldConfig::empty_height`] if the column has none. O(1).
    pub fn top_y(&self, x: i32, z: i32) -> i32 {
        if x < 0 || x >= self.config.size_x || z < 0 || z >= self.config.size_z {
            return self.config.empty_height();
        }

        self.height[self.column_index(x, z)]
    }

    pub fn chunk(&self, chunk: Chunk) -> Option<&ChunkData> {
        self.chunks.get(&chunk)
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_dirty(&self, chunk: Chunk) -> bool {
        self.dirty.contains(&chunk)
    }

    /// Returns a snapshot of every currently-dirty chunk, in deterministic order.
    pub fn dirty_chunks(&self) -> Vec<Chunk> {
        let mut chunks = self.dirty.iter().copied().collect::<Vec<_>>();
        chunks.sort_unstable_by_key(|chunk| (chunk.x, chunk.y, chunk.z));
        chunks
    }

    /// Clears the dirty state of the given chunk, after its surfaces were regenerated.
    pub fn clear_dirty(&mut self, chunk: Chunk) {
        self.dirty.remove(&chunk);
        if let Some(data) = self.chunks.get_mut(&chunk) {
            data.dirty = false;
        }
    }

    #[inline]
    fn column_index(&self, x: i32, z: i32) -> usize {
        (x * self.config.size_z + z) as usize
    }

    fn update_height(&mut self, voxel: Voxel, kind: Kind) {
        let index = self.column_index(voxel.x, voxel.z);
        let top = self.height[index];

        if !kind.is_none() {
            if voxel.y > top {
                self.height[index] = voxel.y;
            }
        } else if voxel.y == top {
            // The column top was removed. Rescan downwards for the next solid voxel; the scan is
            // bounded by the vertical extent and lands on the empty sentinel when it runs out.
            let mut y = voxel.y - 1;
            while y >= self.config.min_y
                && self.get_block(Voxel::new(voxel.x, y, voxel.z)).is_none()
            {
                y -= 1;
            }
            self.height[index] = y;
        }
    }
}

/// Creates the backing storage of a freshly written chunk, seeding it with the implicit fill
/// voxels the world was pretending existed until now.
fn materialize(config: &WorldConfig, chunk: Chunk) -> ChunkData {
    let mut data = ChunkData::default();

    if let Some(fill) = &config.implicit_fill {
        for local in chunk::voxels() {
            let voxel = local.to_voxel(chunk);
            if config.contains(voxel) && voxel.y <= fill.top {
                data.kind.set(local, fill.kind);
            }
        }
    }

    data
}

#[cfg(test)]
mod tests {
    use super::*;

    const STONE: Kind = Kind::id(1);
    const METAL: Kind = Kind::id(7);

    fn small_world() -> VoxelWorld {
        VoxelWorld::new(WorldConfig {
            size_x: 64,
            size_z: 64,
            min_y: 0,
            max_y: 63,
            implicit_fill: None,
        })
        .unwrap()
    }

    #[test]
    fn config_validation() {
        assert_eq!(
            VoxelWorld::new(WorldConfig {
                size_x: 0,
                ..Default::default()
            })
            .unwrap_err(),
            WorldConfigError::InvalidFootprint(0, 256)
        );

        assert_eq!(
            VoxelWorld::new(WorldConfig {
                min_y: 10,
                max_y: 9,
                ..Default::default()
            })
            .unwrap_err(),
            WorldConfigError::InvalidVerticalRange(10, 9)
        );

        assert_eq!(
            VoxelWorld::new(WorldConfig {
                implicit_fill: Some(ImplicitFill {
                    kind: STONE,
                    top: 300,
                }),
                ..Default::default()
            })
            .unwrap_err(),
            WorldConfigError::FillOutsideBounds(300, 0, 255)
        );

        assert_eq!(
            VoxelWorld::new(WorldConfig {
                implicit_fill: Some(ImplicitFill {
                    kind: Kind::AIR,
                    top: 4,
                }),
                ..Default::default()
            })
            .unwrap_err(),
            WorldConfigError::FillKindAir
        );
    }

    #[test]
    fn set_get_round_trip() {
        let mut world = small_world();

        world.set_block(Voxel::new(1, 2, 3), STONE);
        assert_eq!(world.get_block(Voxel::new(1, 2, 3)), STONE);

        world.set_block(Voxel::new(1, 2, 3), Kind::AIR);
        assert_eq!(world.get_block(Voxel::new(1, 2, 3)), Kind::AIR);
    }

    #[test]
    fn chunk_creation_is_lazy_and_idempotent() {
        let mut world = small_world();
        assert_eq!(world.chunk_count(), 0);

        world.set_block(Voxel::new(1, 2, 3), STONE);
        assert_eq!(world.chunk_count(), 1);

        world.set_block(Voxel::new(4, 5, 6), METAL);
        assert_eq!(world.chunk_count(), 1, "Writes in the same chunk reuse it");

        world.set_block(Voxel::new(20, 2, 3), STONE);
        assert_eq!(world.chunk_count(), 2);
    }

    #[test]
    fn out_of_bounds_write_is_noop() {
        let mut world = small_world();

        assert!(world.set_block(Voxel::new(0, 64, 0), STONE).is_empty());
        assert!(world.set_block(Voxel::new(0, -1, 0), STONE).is_empty());
        assert!(world.set_block(Voxel::new(-1, 0, 0), STONE).is_empty());
        assert!(world.set_block(Voxel::new(64, 0, 0), STONE).is_empty());
        assert!(world.set_block(Voxel::new(0, 0, 64), STONE).is_empty());

        assert_eq!(world.chunk_count(), 0, "No chunk should be created");
        assert!(world.dirty_chunks().is_empty());
    }

    #[test]
    fn out_of_bounds_read_is_air() {
        let world = small_world();
        assert_eq!(world.get_block(Voxel::new(-1, 0, 0)), Kind::AIR);
        assert_eq!(world.get_block(Voxel::new(0, 100, 0)), Kind::AIR);
    }

    #[test]
    fn same_value_write_dirties_nothing() {
        let mut world = small_world();

        let dirtied = world.set_block(Voxel::new(1, 1, 1), STONE);
        assert_eq!(dirtied, vec![Chunk::new(0, 0, 0)]);
        world.clear_dirty(Chunk::new(0, 0, 0));

        let dirtied = world.set_block(Voxel::new(1, 1, 1), STONE);
        assert!(dirtied.is_empty());
        assert!(!world.is_dirty(Chunk::new(0, 0, 0)));

        let dirtied = world.set_block(Voxel::new(2, 2, 2), Kind::AIR);
        assert!(dirtied.is_empty(), "Writing AIR over AIR is a no-op");
        assert_eq!(world.chunk_count(), 1);
    }

    #[test]
    fn boundary_write_dirties_existing_neighbor() {
        let mut world = small_world();

        // Materialize both chunks first, then start from a clean state.
        world.set_block(Voxel::new(17, 1, 1), STONE);
        world.set_block(Voxel::new(1, 1, 1), STONE);
        for chunk in world.dirty_chunks() {
            world.clear_dirty(chunk);
        }

        // Local x == 0 of chunk (1, 0, 0).
        let dirtied = world.set_block(Voxel::new(16, 1, 1), STONE);
        assert_eq!(dirtied, vec![Chunk::new(1, 0, 0), Chunk::new(0, 0, 0)]);
        assert!(world.is_dirty(Chunk::new(1, 0, 0)));
        assert!(world.is_dirty(Chunk::new(0, 0, 0)));
    }

    #[test]
    fn boundary_write_skips_absent_neighbor() {
        let mut world = small_world();

        let dirtied = world.set_block(Voxel::new(16, 1, 1), STONE);
        assert_eq!(
            dirtied,
            vec![Chunk::new(1, 0, 0)],
            "No neighbor chunk exists, so only the owning chunk is dirtied"
        );
    }

    #[test]
    fn corner_write_dirties_one_neighbor_per_face() {
        let mut world = small_world();

        world.set_block(Voxel::new(1, 17, 1), STONE);
        world.set_block(Voxel::new(17, 1, 1), STONE);
        world.set_block(Voxel::new(1, 1, 17), STONE);
        world.set_block(Voxel::new(1, 1, 1), STONE);
        for chunk in world.dirty_chunks() {
            world.clear_dirty(chunk);
        }

        let dirtied = world.set_block(Voxel::new(16, 16, 16), STONE);
        assert_eq!(dirtied.len(), 4, "Owning chunk plus one neighbor per axis");
        assert_eq!(dirtied[0], Chunk::new(1, 1, 1));
        assert!(dirtied.contains(&Chunk::new(0, 1, 1)));
        assert!(dirtied.contains(&Chunk::new(1, 0, 1)));
        assert!(dirtied.contains(&Chunk::new(1, 1, 0)));
    }

    #[test]
    fn top_y_tracks_placement_and_removal() {
        let mut world = small_world();
        assert_eq!(world.top_y(5, 5), world.config().empty_height());

        world.set_block(Voxel::new(5, 3, 5), STONE);
        assert_eq!(world.top_y(5, 5), 3);

        world.set_block(Voxel::new(5, 10, 5), METAL);
        assert_eq!(world.top_y(5, 5), 10);

        // Removing below the top does not change it.
        world.set_block(Voxel::new(5, 3, 5), Kind::AIR);
        assert_eq!(world.top_y(5, 5), 10);

        // Removing the top rescans down to the next solid voxel.
        world.set_block(Voxel::new(5, 3, 5), STONE);
        world.set_block(Voxel::new(5, 10, 5), Kind::AIR);
        assert_eq!(world.top_y(5, 5), 3);

        world.set_block(Voxel::new(5, 3, 5), Kind::AIR);
        assert_eq!(world.top_y(5, 5), world.config().empty_height());
    }

    #[test]
    fn top_y_out_of_bounds() {
        let world = small_world();
        assert_eq!(world.top_y(-1, 0), world.config().empty_height());
        assert_eq!(world.top_y(0, 64), world.config().empty_height());
    }

    #[test]
    fn implicit_fill_reads_without_materializing() {
        let world = VoxelWorld::new(WorldConfig {
            size_x: 64,
            size_z: 64,
            min_y: 0,
            max_y: 63,
            implicit_fill: Some(ImplicitFill {
                kind: STONE,
                top: 7,
            }),
        })
        .unwrap();

        assert_eq!(world.get_block(Voxel::new(30, 0, 30)), STONE);
        assert_eq!(world.get_block(Voxel::new(30, 7, 30)), STONE);
        assert_eq!(world.get_block(Voxel::new(30, 8, 30)), Kind::AIR);
        assert_eq!(world.chunk_count(), 0, "Reads must not allocate storage");
        assert_eq!(world.top_y(30, 30), 7);
    }

    #[test]
    fn implicit_fill_materializes_on_first_write() {
        let mut world = VoxelWorld::new(WorldConfig {
            size_x: 64,
            size_z: 64,
            min_y: 0,
            max_y: 63,
            implicit_fill: Some(ImplicitFill {
                kind: STONE,
                top: 7,
            }),
        })
        .unwrap();

        world.set_block(Voxel::new(3, 7, 3), Kind::AIR);
        assert_eq!(world.chunk_count(), 1);

        // The dig took the slab voxel out but left the rest of the chunk filled.
        assert_eq!(world.get_block(Voxel::new(3, 7, 3)), Kind::AIR);
        assert_eq!(world.get_block(Voxel::new(3, 6, 3)), STONE);
        assert_eq!(world.get_block(Voxel::new(4, 7, 3)), STONE);
        assert_eq!(world.top_y(3, 3), 6);

        // Neighboring columns in unmaterialized chunks are untouched.
        assert_eq!(world.get_block(Voxel::new(30, 7, 30)), STONE);
        assert_eq!(world.top_y(30, 30), 7);
    }

    #[test]
    fn implicit_fill_dig_through_chunk_boundary() {
        let mut world = VoxelWorld::new(WorldConfig {
            size_x: 64,
            size_z: 64,
            min_y: 0,
            max_y: 63,
            implicit_fill: Some(ImplicitFill {
                kind: STONE,
                top: 16,
            }),
        })
        .unwrap();

        // Dig the whole column top-down across the chunk boundary at y == 16.
        world.set_block(Voxel::new(3, 16, 3), Kind::AIR);
        assert_eq!(world.top_y(3, 3), 15);

        world.set_block(Voxel::new(3, 15, 3), Kind::AIR);
        assert_eq!(
            world.top_y(3, 3),
            14,
            "Rescan must see the fill below the materialized chunk"
        );
    }
}
