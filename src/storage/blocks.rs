use std::{collections::HashMap, ops::Range};

use interfaces::types::{BlockLocation, BlockState, ChunkLocation};
use itertools::iproduct;

use crate::{
    error::NotLoaded,
    storage::{border::WorldBorder, chunk::ChunkColumn},
};

/// Read access to the blocks of a world. Implementations must be usable from
/// background planning threads.
pub trait BlockView: Send + Sync {
    /// `None` if the chunk holding `location` is not loaded
    fn block_at(&self, location: BlockLocation) -> Option<BlockState>;

    fn is_loaded(&self, x: i32, z: i32) -> bool;

    /// The heights blocks can exist at
    fn y_range(&self) -> Range<i16>;

    fn world_border(&self) -> WorldBorder {
        WorldBorder::default()
    }

    fn get(&self, location: BlockLocation) -> Result<BlockState, NotLoaded> {
        self.block_at(location).ok_or(NotLoaded)
    }
}

pub struct WorldBlocks {
    storage: HashMap<ChunkLocation, ChunkColumn>,
    y_range: Range<i16>,
    border: WorldBorder,
}

impl Default for WorldBlocks {
    fn default() -> Self {
        Self::new(0..256)
    }
}

impl WorldBlocks {
    pub fn new(y_range: Range<i16>) -> Self {
        Self {
            storage: HashMap::new(),
            y_range,
            border: WorldBorder::default(),
        }
    }

    /// A world as tall as the nether
    pub fn nether() -> Self {
        Self::new(0..128)
    }

    #[must_use]
    pub fn with_border(mut self, border: WorldBorder) -> Self {
        self.border = border;
        self
    }

    fn height(&self) -> usize {
        usize::try_from(self.y_range.end - self.y_range.start).unwrap_or_default()
    }

    pub fn add_column(&mut self, location: ChunkLocation, column: ChunkColumn) {
        self.storage.insert(location, column);
    }

    /// Load an all-air column unless one is already loaded
    pub fn load_empty(&mut self, location: ChunkLocation) {
        let height = self.height();
        self.storage
            .entry(location)
            .or_insert_with(|| ChunkColumn::empty(height));
    }

    pub fn unload(&mut self, location: ChunkLocation) -> Option<ChunkColumn> {
        self.storage.remove(&location)
    }

    fn split(&self, location: BlockLocation) -> Option<(ChunkLocation, u8, usize, u8)> {
        let BlockLocation { x, y, z } = location;
        if !self.y_range.contains(&y) {
            return None;
        }

        let chunk_x = x >> 4;
        let chunk_z = z >> 4;

        let x = (x - (chunk_x << 4)) as u8;
        let z = (z - (chunk_z << 4)) as u8;
        let y = (y - self.y_range.start) as usize;

        Some((ChunkLocation(chunk_x, chunk_z), x, y, z))
    }

    pub fn get_block(&self, location: BlockLocation) -> Option<BlockState> {
        let chunk = ChunkLocation::from(location);
        let column = self.storage.get(&chunk)?;

        // above or below the world is air
        let Some((_, x, y, z)) = self.split(location) else {
            return Some(BlockState::AIR);
        };

        Some(column.get_block(x, y, z))
    }

    /// Returns false if the chunk is not loaded or `location` is outside the
    /// world's height
    pub fn set_block(&mut self, location: BlockLocation, block: BlockState) -> bool {
        let Some((chunk, x, y, z)) = self.split(location) else {
            return false;
        };

        match self.storage.get_mut(&chunk) {
            None => false,
            Some(column) => column.set_block(x, y, z, block),
        }
    }

    /// Fill the box spanned by two corners (inclusive), loading any chunk
    /// the box touches
    pub fn fill(&mut self, from: BlockLocation, to: BlockLocation, block: BlockState) {
        let (min_x, max_x) = (from.x.min(to.x), from.x.max(to.x));
        let (min_y, max_y) = (from.y.min(to.y), from.y.max(to.y));
        let (min_z, max_z) = (from.z.min(to.z), from.z.max(to.z));

        for (cx, cz) in iproduct!((min_x >> 4)..=(max_x >> 4), (min_z >> 4)..=(max_z >> 4)) {
            self.load_empty(ChunkLocation(cx, cz));
        }

        for (x, y, z) in iproduct!(min_x..=max_x, min_y..=max_y, min_z..=max_z) {
            self.set_block(BlockLocation::new(x, y, z), block);
        }
    }

    /// Load every chunk within `radius` chunks of the one holding `center`
    pub fn load_around(&mut self, center: BlockLocation, radius: i32) {
        let ChunkLocation(cx, cz) = ChunkLocation::from(center);
        for (x, z) in iproduct!(cx - radius..=cx + radius, cz - radius..=cz + radius) {
            self.load_empty(ChunkLocation(x, z));
        }
    }
}

impl BlockView for WorldBlocks {
    fn block_at(&self, location: BlockLocation) -> Option<BlockState> {
        self.get_block(location)
    }

    fn is_loaded(&self, x: i32, z: i32) -> bool {
        self.storage.contains_key(&ChunkLocation(x >> 4, z >> 4))
    }

    fn y_range(&self) -> Range<i16> {
        self.y_range.clone()
    }

    fn world_border(&self) -> WorldBorder {
        self.border
    }
}
