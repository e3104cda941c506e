//! Finding somewhere safe to put an elytra down.
//!
//! Columns are searched nearest first (horizontally) and highest first within
//! the same distance, so the descent is short and stays clear of terrain.

use std::{
    cmp::Reverse,
    collections::{BinaryHeap, HashSet},
};

use indexmap::IndexSet;
use interfaces::types::{BlockKind, BlockLocation};
use itertools::iproduct;
use tracing::debug;

use crate::{
    client::{pathfind::MinHeapNode, settings::Settings},
    storage::blocks::BlockView,
};

/// clear air required above the landing surface
pub const LANDING_COLUMN_HEIGHT: i16 = 15;

/// half the width of the clear cube at the top of the landing column
const AIR_BUBBLE_RADIUS: i32 = 4;

pub struct LandingSearch<'a> {
    world: &'a dyn BlockView,
    allow_nether_fortress: bool,
    rejected: &'a IndexSet<BlockLocation>,
}

impl<'a> LandingSearch<'a> {
    pub fn new(
        world: &'a dyn BlockView,
        settings: &Settings,
        rejected: &'a IndexSet<BlockLocation>,
    ) -> Self {
        Self {
            world,
            allow_nether_fortress: settings.elytra_allow_land_on_nether_fortress,
            rejected,
        }
    }

    fn is_safe_kind(&self, kind: BlockKind) -> bool {
        kind == BlockKind::NETHERRACK
            || kind == BlockKind::GRAVEL
            || (kind == BlockKind::NETHER_BRICK && self.allow_nether_fortress)
    }

    fn is_safe(&self, location: BlockLocation) -> bool {
        self.world
            .block_at(location)
            .is_some_and(|state| self.is_safe_kind(state.kind()))
    }

    /// unloaded blocks are never air
    fn is_air(&self, location: BlockLocation) -> bool {
        self.world
            .block_at(location)
            .is_some_and(|state| state.is_air())
    }

    fn in_bounds(&self, location: BlockLocation) -> bool {
        self.world.y_range().contains(&location.y)
    }

    fn is_at_edge(&self, surface: BlockLocation) -> bool {
        iproduct!(-1..=1, -1..=1)
            .filter(|&(dx, dz)| (dx, dz) != (0, 0))
            .any(|(dx, dz)| {
                let neighbor = BlockLocation::new(surface.x + dx, surface.y, surface.z + dz);
                !self.is_safe(neighbor)
            })
    }

    fn is_column_air(&self, surface: BlockLocation, height: i16) -> bool {
        (1..=height).all(|dy| self.is_air(surface.add_y(dy)))
    }

    fn has_air_bubble(&self, center: BlockLocation) -> bool {
        let r = AIR_BUBBLE_RADIUS;
        iproduct!(-r..=r, -r..=r, -r..=r).all(|(dx, dy, dz)| {
            let Ok(dy) = i16::try_from(dy) else {
                return false;
            };
            let at = BlockLocation::new(center.x + dx, center.y + dy, center.z + dz);
            self.is_air(at)
        })
    }

    /// Walk down from `from` to the first non-air block. Returns it if it is a
    /// safe surface away from any edge. Every cell passed is remembered in
    /// `checked`; reaching one again means another branch already scanned the
    /// rest of this column.
    fn check_landing_spot(
        &self,
        from: BlockLocation,
        checked: &mut HashSet<BlockLocation>,
    ) -> Option<BlockLocation> {
        let bottom = self.world.y_range().start;
        let mut at = from;

        while at.y >= bottom {
            if !checked.insert(at) {
                return None;
            }

            let state = self.world.block_at(at)?;

            if self.is_safe_kind(state.kind()) {
                return (!self.is_at_edge(at)).then_some(at);
            }

            if !state.is_air() {
                return None;
            }

            at = at.below();
        }

        // void
        None
    }

    /// The top of a clear landing column, or `None` if no loaded column
    /// qualifies
    pub fn find(&self, start: BlockLocation) -> Option<BlockLocation> {
        let score = |location: BlockLocation| {
            (location.dist2_horizontal(start), Reverse(location.y))
        };

        let mut queue = BinaryHeap::new();
        let mut visited = HashSet::new();
        let mut checked = HashSet::new();

        queue.push(MinHeapNode::new(start, score(start)));
        visited.insert(start);

        while let Some(MinHeapNode { contents: at, .. }) = queue.pop() {
            if !self.world.is_loaded(at.x, at.z) || !self.in_bounds(at) || !self.is_air(at) {
                continue;
            }

            if let Some(surface) = self.check_landing_spot(at, &mut checked) {
                let top = surface.add_y(LANDING_COLUMN_HEIGHT);
                if self.is_column_air(surface, LANDING_COLUMN_HEIGHT)
                    && self.has_air_bubble(top)
                    && !self.rejected.contains(&top)
                {
                    debug!(%surface, %top, "found landing spot");
                    return Some(top);
                }
            }

            let neighbors = [
                at.north(),
                at.east(),
                at.south(),
                at.west(),
                at.above(),
                at.below(),
            ];

            for neighbor in neighbors {
                if visited.insert(neighbor) {
                    queue.push(MinHeapNode::new(neighbor, score(neighbor)));
                }
            }
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use indexmap::IndexSet;
    use interfaces::types::{BlockLocation, BlockState};

    use crate::{
        client::{elytra::landing::LandingSearch, settings::Settings},
        storage::blocks::WorldBlocks,
    };

    const ABOVE: BlockLocation = BlockLocation::new(0, 40, 0);

    /// a square netherrack plateau at y = 10 with `half` blocks on each side
    /// of the origin
    fn plateau(half: i32) -> WorldBlocks {
        let mut world = WorldBlocks::nether();
        world.load_around(ABOVE, 1);
        world.fill(
            BlockLocation::new(-half, 10, -half),
            BlockLocation::new(half, 10, half),
            BlockState::NETHERRACK,
        );
        world
    }

    #[test]
    fn test_flat_plateau() {
        let world = plateau(1);
        let rejected = IndexSet::new();
        let search = LandingSearch::new(&world, &Settings::default(), &rejected);

        assert_eq!(search.find(ABOVE), Some(BlockLocation::new(0, 25, 0)));
    }

    #[test]
    fn test_lava_neighbor() {
        let mut world = plateau(3);
        world.set_block(BlockLocation::new(1, 10, 0), BlockState::LAVA);
        let rejected = IndexSet::new();
        let search = LandingSearch::new(&world, &Settings::default(), &rejected);

        // the origin borders lava and so does every column next to it except
        // the one on the far side
        assert_eq!(search.find(ABOVE), Some(BlockLocation::new(-1, 25, 0)));
    }

    #[test]
    fn test_rejected_spot() {
        let world = plateau(2);
        let mut rejected = IndexSet::new();
        rejected.insert(BlockLocation::new(0, 25, 0));
        let search = LandingSearch::new(&world, &Settings::default(), &rejected);

        let found = search.find(ABOVE).unwrap();
        assert_ne!(found, BlockLocation::new(0, 25, 0));
        assert_eq!(found.y, 25);
        assert_eq!(found.dist2_horizontal(ABOVE), 1);
    }

    #[test]
    fn test_start_above_corner() {
        let world = plateau(1);
        let rejected = IndexSet::new();
        let search = LandingSearch::new(&world, &Settings::default(), &rejected);

        let corner = BlockLocation::new(1, 40, 1);
        assert_eq!(search.find(corner), Some(BlockLocation::new(0, 25, 0)));
    }

    #[test]
    fn test_unsafe_surface() {
        let mut world = WorldBlocks::nether();
        world.load_around(ABOVE, 1);
        world.fill(
            BlockLocation::new(-2, 10, -2),
            BlockLocation::new(2, 10, 2),
            BlockState::NETHER_BRICK,
        );
        let rejected = IndexSet::new();

        let search = LandingSearch::new(&world, &Settings::default(), &rejected);
        assert_eq!(search.find(ABOVE), None);

        let fortress = Settings {
            elytra_allow_land_on_nether_fortress: true,
            ..Settings::default()
        };
        let search = LandingSearch::new(&world, &fortress, &rejected);
        assert_eq!(search.find(ABOVE), Some(BlockLocation::new(0, 25, 0)));
    }

    #[test]
    fn test_equal_distance_prefers_higher() {
        let mut world = WorldBlocks::nether();
        world.load_around(ABOVE, 1);
        for x in [-5, 5] {
            world.fill(
                BlockLocation::new(x - 1, 10, -1),
                BlockLocation::new(x + 1, 10, 1),
                BlockState::NETHERRACK,
            );
        }

        // both columns qualify, but the east one can only be reached from
        // below its overhang
        world.set_block(BlockLocation::new(5, 45, 0), BlockState::GLOWSTONE);
        world.set_block(BlockLocation::new(-5, 60, 0), BlockState::GLOWSTONE);

        let rejected = IndexSet::new();
        let search = LandingSearch::new(&world, &Settings::default(), &rejected);
        assert_eq!(search.find(ABOVE), Some(BlockLocation::new(-5, 25, 0)));

        // with the west column taken the east one is next
        let rejected = IndexSet::from([BlockLocation::new(-5, 25, 0)]);
        let search = LandingSearch::new(&world, &Settings::default(), &rejected);
        assert_eq!(search.find(ABOVE), Some(BlockLocation::new(5, 25, 0)));
    }

    #[test]
    fn test_low_ceiling() {
        let mut world = plateau(2);
        world.set_block(BlockLocation::new(0, 20, 0), BlockState::GLOWSTONE);
        let rejected = IndexSet::new();
        let search = LandingSearch::new(&world, &Settings::default(), &rejected);

        // the glowstone caps the origin's column but sits below the bubble
        // of its neighbors
        let found = search.find(ABOVE).unwrap();
        assert_ne!(found, BlockLocation::new(0, 25, 0));
        assert_eq!(found.dist2_horizontal(ABOVE), 1);
    }
}
