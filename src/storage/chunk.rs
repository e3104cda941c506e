use interfaces::types::BlockState;

const SECTION_HEIGHT: usize = 16;
const SECTION_WIDTH: usize = 16;
const SECTION_ELEMENTS: usize = SECTION_HEIGHT * SECTION_WIDTH * SECTION_WIDTH;

#[derive(Clone)]
pub struct ChunkSection {
    states: Box<[BlockState; SECTION_ELEMENTS]>,
}

impl Default for ChunkSection {
    fn default() -> Self {
        Self {
            states: Box::new([BlockState::AIR; SECTION_ELEMENTS]),
        }
    }
}

impl ChunkSection {
    const fn idx(x: u8, y: u8, z: u8) -> usize {
        ((y as usize * SECTION_HEIGHT) + z as usize) * SECTION_WIDTH + x as usize
    }

    fn get_block(&self, x: u8, y: u8, z: u8) -> BlockState {
        self.states[Self::idx(x, y, z)]
    }

    fn set_block(&mut self, x: u8, y: u8, z: u8, state: BlockState) {
        self.states[Self::idx(x, y, z)] = state;
    }
}

/// A 16 wide column of sections. `y` is relative to the bottom of the world.
/// Missing sections are all air.
#[derive(Clone, Default)]
pub struct ChunkColumn {
    sections: Vec<Option<ChunkSection>>,
}

impl ChunkColumn {
    /// An all-air column tall enough to hold `height` blocks
    pub fn empty(height: usize) -> Self {
        let count = height.div_ceil(SECTION_HEIGHT);
        Self {
            sections: vec![None; count],
        }
    }

    pub fn get_block(&self, x: u8, y: usize, z: u8) -> BlockState {
        let section_idx = y / SECTION_HEIGHT;
        match self.sections.get(section_idx) {
            Some(Some(section)) => section.get_block(x, (y % SECTION_HEIGHT) as u8, z),
            _ => BlockState::AIR,
        }
    }

    /// Returns false if `y` is above the column
    pub fn set_block(&mut self, x: u8, y: usize, z: u8, state: BlockState) -> bool {
        let section_idx = y / SECTION_HEIGHT;
        let Some(slot) = self.sections.get_mut(section_idx) else {
            return false;
        };

        if slot.is_none() && state == BlockState::AIR {
            return true;
        }

        slot.get_or_insert_with(ChunkSection::default).set_block(
            x,
            (y % SECTION_HEIGHT) as u8,
            z,
            state,
        );
        true
    }
}
