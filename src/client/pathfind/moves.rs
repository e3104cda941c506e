//! Scores single moves against a world.
//!
//! Every scorer returns `Err(NotLoaded)` if it needed a block from a chunk
//! that is not loaded, so that a planner can come back to the node later
//! instead of treating it as a wall.

use std::f64::consts::SQRT_2;

use interfaces::types::{BlockKind, BlockLocation, BlockState, CardinalDirection, Change};
use smallvec::SmallVec;

use crate::{
    client::pathfind::{
        context::{CalculationContext, CostModel},
        costs::{
            fall_n_blocks_cost, Cost, BREAK_HARDNESS_TICKS, CENTER_AFTER_FALL_COST,
            GLIDE_ONE_BLOCK_COST, JUMP_ONE_BLOCK_COST, SNEAK_ONE_BLOCK_COST,
            SPRINT_MULTIPLIER, SPRINT_ONE_BLOCK_COST, WALK_OFF_BLOCK_COST,
            WALK_ONE_BLOCK_COST, WALK_ONE_IN_WATER_COST, WALK_ONE_OVER_SOUL_SAND_COST,
        },
        MoveKind, Movement,
    },
    error::NotLoaded,
    storage::blocks::BlockView,
};

/// A scored move
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Step {
    pub movement: Movement,
    pub cost: Cost,
}

impl Step {
    const fn new(kind: MoveKind, src: BlockLocation, dest: BlockLocation, cost: Cost) -> Self {
        Self {
            movement: Movement::new(kind, src, dest),
            cost,
        }
    }

    const fn forbidden(kind: MoveKind, src: BlockLocation, dest: BlockLocation) -> Self {
        Self::new(kind, src, dest, Cost::Infinite)
    }
}

pub type Scored = Result<Step, NotLoaded>;

/// Hand-mining hardness. `None` cannot be broken.
fn hardness(kind: BlockKind) -> Option<f64> {
    let hardness = match kind.id() {
        7 | 90 | 119 | 120 | 166 => return None, // bedrock, portals, barrier
        0 => 0.0,
        18 => 0.2,
        20 | 89 => 0.3,
        87 => 0.4,
        3 | 12 | 88 => 0.5,
        2 | 13 => 0.6,
        1 => 1.5,
        4 | 112 => 2.0,
        49 => 50.0,
        _ => 1.0,
    };
    Some(hardness)
}

/// air and the like: nothing to collide with, nothing to swim in
fn is_open(state: BlockState) -> bool {
    !state.is_water() && !state.is_lava() && state.no_motion_effect()
}

/// Step offset `dist` blocks from `from` along a horizontal direction
const fn offset(from: BlockLocation, change: Change, dist: i32) -> BlockLocation {
    BlockLocation::new(
        from.x + change.dx * dist,
        from.y,
        from.z + change.dz * dist,
    )
}

pub struct MoveContext<'a> {
    pub model: &'a dyn CostModel,
    pub world: &'a dyn BlockView,
}

impl<'a> MoveContext<'a> {
    pub fn new(model: &'a dyn CostModel, world: &'a dyn BlockView) -> Self {
        Self { model, world }
    }

    fn base(&self) -> &CalculationContext {
        self.model.base()
    }

    fn can_walk_on(&self, state: BlockState) -> bool {
        if state.is_water() {
            let base = self.base();
            return base.assume_walk_on_water || (base.frost_walker > 0 && state.is_still_water());
        }
        state.full_block() && !state.kind().is_dangerous()
    }

    fn mining_cost(&self, location: BlockLocation, state: BlockState) -> Cost {
        if state.kind().is_liquid() {
            return Cost::Infinite;
        }
        let Some(hardness) = hardness(state.kind()) else {
            return Cost::Infinite;
        };
        let multiplier = self.model.break_cost_multiplier_at(location, state);
        Cost::ticks(hardness * BREAK_HARDNESS_TICKS) * multiplier
            + self.base().break_block_additional_cost
    }

    /// zero if the player fits through `location`, the time to mine it if it
    /// has to go, [`Cost::Infinite`] if it cannot
    fn clear_cost(&self, location: BlockLocation) -> Result<Cost, NotLoaded> {
        let state = self.world.get(location)?;
        if state.is_lava() {
            return Ok(Cost::Infinite);
        }
        if state.walk_through() {
            return Ok(Cost::ZERO);
        }
        Ok(self.mining_cost(location, state))
    }

    fn build_limit_blocks(&self, head: BlockLocation) -> bool {
        head.y >= self.world.y_range().end && !self.base().allow_jump_at_build_limit
    }

    /// Walk one block on the same level, breaking what is in the way and
    /// bridging over gaps
    pub fn traverse(&self, from: BlockLocation, direction: CardinalDirection) -> Scored {
        let dest = from + direction.unit_change();
        let forbidden = Step::forbidden(MoveKind::Traverse, from, dest);
        let base = self.base();

        let floor = self.world.get(dest.below())?;
        let legs = self.world.get(dest)?;

        if floor.kind().is_dangerous() && !floor.is_lava() {
            return Ok(forbidden);
        }

        let clear = self.clear_cost(dest)? + self.clear_cost(dest.above())?;
        if clear.is_infinite() {
            return Ok(forbidden);
        }

        let in_water = legs.is_water() || self.world.get(from)?.is_water();
        let mut walk = if in_water {
            base.water_walk_speed
        } else if floor.kind() == BlockKind::SOUL_SAND {
            WALK_ONE_OVER_SOUL_SAND_COST
        } else {
            WALK_ONE_BLOCK_COST
        };

        if self.can_walk_on(floor) {
            if floor.is_water() && !in_water {
                walk += base.walk_on_water_one_penalty;
            }
            if base.can_sprint && !in_water && clear == Cost::ZERO {
                walk *= SPRINT_MULTIPLIER;
            }
            return Ok(Step::new(MoveKind::Traverse, from, dest, clear + walk));
        }

        // bridge by sneaking to the edge and placing against our own floor
        if floor.is_lava() || !floor.walk_through() {
            return Ok(forbidden);
        }
        let against = self.world.get(from.below())?;
        if !against.full_block() {
            return Ok(forbidden);
        }

        let place = self.model.cost_of_placing_at(dest.below(), floor);
        let cost = clear + place + SNEAK_ONE_BLOCK_COST;
        Ok(Step::new(MoveKind::Traverse, from, dest, cost))
    }

    /// Jump up onto the next block
    pub fn ascend(&self, from: BlockLocation, direction: CardinalDirection) -> Scored {
        let step_on = from + direction.unit_change();
        let dest = step_on.above();
        let forbidden = Step::forbidden(MoveKind::Ascend, from, dest);
        let base = self.base();

        if self.build_limit_blocks(dest.above()) {
            return Ok(forbidden);
        }

        let new_floor = self.world.get(step_on)?;
        let place = if self.can_walk_on(new_floor) {
            Cost::ZERO
        } else if new_floor.walk_through() && !new_floor.is_lava() {
            let support = self.world.get(step_on.below())?;
            if !support.full_block() {
                return Ok(forbidden);
            }
            self.model.cost_of_placing_at(step_on, new_floor)
        } else {
            return Ok(forbidden);
        };

        let clear = self.clear_cost(from.above().above())?
            + self.clear_cost(dest)?
            + self.clear_cost(dest.above())?;

        let jump = WALK_ONE_BLOCK_COST.max(*JUMP_ONE_BLOCK_COST) + base.jump_penalty;
        Ok(Step::new(MoveKind::Ascend, from, dest, place + clear + jump))
    }

    /// Walk off the edge and drop down. Short drops are descends; drops of at
    /// least the model's minimum fall height are falls.
    pub fn fall(&self, from: BlockLocation, direction: CardinalDirection) -> Scored {
        let column = from + direction.unit_change();
        let base = self.base();

        let clear = self.clear_cost(column)? + self.clear_cost(column.above())?;
        if clear.is_infinite() {
            return Ok(Step::forbidden(MoveKind::Descend, from, column.below()));
        }

        let kind_for = |drop: i16| {
            if drop < self.model.min_fall_height() {
                MoveKind::Descend
            } else {
                MoveKind::Fall
            }
        };

        let bottom = self.world.y_range().start;
        let mut y = column.y - 1;

        loop {
            if y < bottom {
                // the void
                return Ok(Step::forbidden(MoveKind::Fall, from, column.below()));
            }

            let at = BlockLocation::new(column.x, y, column.z);
            let state = self.world.get(at)?;

            if state.is_water() {
                if base.assume_walk_on_water {
                    return Ok(Step::forbidden(MoveKind::Descend, from, at));
                }
                let drop = column.y - y;
                let cost = clear + WALK_OFF_BLOCK_COST + fall_n_blocks_cost(drop);
                return Ok(Step::new(kind_for(drop), from, at, cost));
            }

            if state.is_lava() {
                let drop = column.y - y;
                if !self.model.allow_fall_into_lava() {
                    return Ok(Step::forbidden(kind_for(drop), from, at));
                }
                let cost = clear + WALK_OFF_BLOCK_COST + fall_n_blocks_cost(drop);
                return Ok(Step::new(kind_for(drop), from, at, cost));
            }

            if state.walk_through() {
                y -= 1;
                continue;
            }

            let dest = at.above();
            let drop = column.y - dest.y;

            // no drop at all is a traverse
            if drop == 0 || !self.can_walk_on(state) {
                return Ok(Step::forbidden(kind_for(drop), from, dest));
            }

            let mut cost =
                clear + WALK_OFF_BLOCK_COST + fall_n_blocks_cost(drop) + CENTER_AFTER_FALL_COST;

            if drop > self.model.max_fall_height_no_water() {
                if !base.has_water_bucket || drop > base.max_fall_height_bucket {
                    return Ok(Step::forbidden(kind_for(drop), from, dest));
                }
                cost += self.model.place_bucket_cost();
            }

            return Ok(Step::new(kind_for(drop), from, dest, cost));
        }
    }

    /// Mine the block below and drop into its place
    pub fn downward(&self, from: BlockLocation) -> Scored {
        let dest = from.below();
        let forbidden = Step::forbidden(MoveKind::Downward, from, dest);

        if !self.base().allow_downward {
            return Ok(forbidden);
        }

        let below = self.world.get(dest)?;
        if below.walk_through() || !self.can_walk_on(self.world.get(dest.below())?) {
            return Ok(forbidden);
        }

        let cost = self.mining_cost(dest, below) + fall_n_blocks_cost(1);
        Ok(Step::new(MoveKind::Downward, from, dest, cost))
    }

    /// Jump and place a block underneath
    pub fn pillar(&self, from: BlockLocation) -> Scored {
        let dest = from.above();
        let forbidden = Step::forbidden(MoveKind::Pillar, from, dest);

        if self.build_limit_blocks(dest.above()) {
            return Ok(forbidden);
        }

        let here = self.world.get(from)?;
        if here.is_water() || !self.world.get(from.below())?.full_block() {
            return Ok(forbidden);
        }

        let clear = self.clear_cost(dest.above())?;
        let place = self.model.cost_of_placing_at(from, here);
        let cost = clear + place + *JUMP_ONE_BLOCK_COST + self.base().jump_penalty;
        Ok(Step::new(MoveKind::Pillar, from, dest, cost))
    }

    fn parkour_cost(dist: i32) -> f64 {
        match dist {
            4 => SPRINT_ONE_BLOCK_COST * 4.0,
            dist => WALK_ONE_BLOCK_COST * f64::from(dist),
        }
    }

    /// Jump over a gap of one to three blocks
    pub fn parkour(&self, from: BlockLocation, direction: CardinalDirection) -> Scored {
        let change = direction.unit_change();
        let base = self.base();
        let max_dist = if base.can_sprint { 4 } else { 3 };
        let forbidden = Step::forbidden(MoveKind::Parkour, from, offset(from, change, 2));

        if !base.allow_parkour {
            return Ok(forbidden);
        }

        let first = offset(from, change, 1);
        if self.can_walk_on(self.world.get(first.below())?) {
            // there is no gap
            return Ok(forbidden);
        }
        if !is_open(self.world.get(from.above().above())?) {
            return Ok(forbidden);
        }

        let penalty = base.jump_penalty;

        for dist in 1..=max_dist {
            let column = offset(from, change, dist);
            let legs = self.world.get(column)?;

            if (2..=3).contains(&dist) && base.allow_parkour_ascend && self.can_walk_on(legs) {
                let clear = is_open(self.world.get(column.above())?)
                    && is_open(self.world.get(column.above().above())?);
                if !clear {
                    return Ok(forbidden);
                }
                let cost = Cost::ticks(Self::parkour_cost(dist) + penalty);
                return Ok(Step::new(MoveKind::Parkour, from, column.above(), cost));
            }

            let clear = is_open(legs)
                && is_open(self.world.get(column.above())?)
                && is_open(self.world.get(column.above().above())?);
            if !clear {
                return Ok(forbidden);
            }

            if dist >= 2 && self.can_walk_on(self.world.get(column.below())?) {
                let cost = Cost::ticks(Self::parkour_cost(dist) + penalty);
                return Ok(Step::new(MoveKind::Parkour, from, column, cost));
            }
        }

        if base.allow_parkour_place {
            let column = offset(from, change, max_dist);
            let floor = self.world.get(column.below())?;
            if floor.walk_through() && !floor.is_lava() {
                let place = self.model.cost_of_placing_at(column.below(), floor);
                let cost = place + Self::parkour_cost(max_dist) + penalty;
                return Ok(Step::new(MoveKind::Parkour, from, column, cost));
            }
        }

        Ok(forbidden)
    }

    /// Walk diagonally, optionally stepping one block up or down
    pub fn diagonal(&self, from: BlockLocation, dx: i32, dz: i32) -> Scored {
        let dest = BlockLocation::new(from.x + dx, from.y, from.z + dz);
        let forbidden = Step::forbidden(MoveKind::Diagonal, from, dest);
        let base = self.base();

        let side_clear = |side: BlockLocation| -> Result<bool, NotLoaded> {
            Ok(is_open(self.world.get(side)?) && is_open(self.world.get(side.above())?))
        };

        let side_a = BlockLocation::new(from.x + dx, from.y, from.z);
        let side_b = BlockLocation::new(from.x, from.y, from.z + dz);
        if !side_clear(side_a)? && !side_clear(side_b)? {
            return Ok(forbidden);
        }

        let mut walk = WALK_ONE_BLOCK_COST * SQRT_2;
        if base.can_sprint {
            walk *= SPRINT_MULTIPLIER;
        }

        let legs = self.world.get(dest)?;

        if self.can_walk_on(legs) {
            if !base.allow_diagonal_ascend
                || !is_open(self.world.get(from.above().above())?)
                || !side_clear(dest.above())?
                || self.build_limit_blocks(dest.above().above())
            {
                return Ok(forbidden);
            }
            let cost = Cost::ticks(walk.max(*JUMP_ONE_BLOCK_COST) + base.jump_penalty);
            return Ok(Step::new(MoveKind::Diagonal, from, dest.above(), cost));
        }

        if !side_clear(dest)? {
            return Ok(forbidden);
        }

        let floor = self.world.get(dest.below())?;
        if self.can_walk_on(floor) {
            return Ok(Step::new(MoveKind::Diagonal, from, dest, Cost::ticks(walk)));
        }

        if base.allow_diagonal_descend && is_open(floor) {
            let lower = self.world.get(dest.below().below())?;
            if self.can_walk_on(lower) {
                let cost = Cost::ticks(walk) + fall_n_blocks_cost(1);
                return Ok(Step::new(MoveKind::Diagonal, from, dest.below(), cost));
            }
        }

        Ok(forbidden)
    }

    /// Swim straight up or down
    pub fn swim(&self, from: BlockLocation, up: bool) -> Scored {
        let dest = if up { from.above() } else { from.below() };
        let forbidden = Step::forbidden(MoveKind::Swim, from, dest);

        if !self.world.get(from)?.is_water() {
            return Ok(forbidden);
        }

        let there = self.world.get(dest)?;
        let passable = if up {
            there.is_water() || (is_open(there) && is_open(self.world.get(dest.above())?))
        } else {
            there.is_water()
        };

        if !passable {
            return Ok(forbidden);
        }
        Ok(Step::new(
            MoveKind::Swim,
            from,
            dest,
            Cost::ticks(WALK_ONE_IN_WATER_COST),
        ))
    }

    /// Glide in a straight line. Anything but air along the way is a wall.
    pub fn glide(&self, from: BlockLocation, to: BlockLocation) -> Scored {
        let dist = from.dist(to);
        let steps = dist.ceil().max(1.0) as u32;
        let (start, end) = (from.true_center(), to.true_center());

        for i in 0..=steps {
            let t = f64::from(i) / f64::from(steps);
            let point = start + (end - start) * t;
            if !self.world.get(BlockLocation::from(point))?.is_air() {
                return Ok(Step::forbidden(MoveKind::Glide, from, to));
            }
        }

        Ok(Step::new(
            MoveKind::Glide,
            from,
            to,
            Cost::ticks(dist * GLIDE_ONE_BLOCK_COST),
        ))
    }

    /// Make moves along the previous path cheaper so a replan does not
    /// wander off for a marginal gain
    pub fn favor_backtrack(&self, cost: Cost, on_previous_path: bool) -> Cost {
        if on_previous_path {
            cost * self.base().backtrack_cost_favoring_coefficient
        } else {
            cost
        }
    }

    /// Every legal walking move from `from`
    pub fn progressions(&self, from: BlockLocation) -> Result<SmallVec<[Step; 24]>, NotLoaded> {
        let mut steps: SmallVec<[Step; 24]> = SmallVec::new();

        for direction in CardinalDirection::ALL {
            steps.push(self.traverse(from, direction)?);
            steps.push(self.ascend(from, direction)?);
            steps.push(self.fall(from, direction)?);
            steps.push(self.parkour(from, direction)?);
        }

        for (dx, dz) in [(1, 1), (1, -1), (-1, 1), (-1, -1)] {
            steps.push(self.diagonal(from, dx, dz)?);
        }

        steps.push(self.downward(from)?);
        steps.push(self.pillar(from)?);
        steps.push(self.swim(from, true)?);
        steps.push(self.swim(from, false)?);

        steps.retain(|step| step.cost.is_finite());
        Ok(steps)
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use interfaces::types::{
        BlockKind, BlockLocation, BlockState, CardinalDirection, Dimension, ItemKind,
    };
    use more_asserts::*;

    use crate::{
        client::{
            pathfind::{
                context::{CalculationContext, WalkOffContext},
                costs::{Cost, SPRINT_MULTIPLIER, WALK_ONE_BLOCK_COST},
                moves::MoveContext,
                MoveKind,
            },
            settings::Settings,
            state::{inventory::ItemStack, local::AgentState},
        },
        error::NotLoaded,
        storage::{blocks::WorldBlocks, border::WorldBorder},
    };

    const START: BlockLocation = BlockLocation::new(0, 41, 0);

    /// a netherrack platform at y = 40 from x -8..=8, z -8..=8, with a cliff
    /// on the east side
    fn platform() -> WorldBlocks {
        let mut world = WorldBlocks::nether();
        world.load_around(START, 2);
        world.fill(
            BlockLocation::new(-8, 40, -8),
            BlockLocation::new(0, 40, 8),
            BlockState::NETHERRACK,
        );
        world
    }

    fn context(settings: &Settings, agent: &AgentState) -> CalculationContext {
        CalculationContext::new(settings, agent, WorldBorder::default())
    }

    fn agent() -> AgentState {
        AgentState::mock(START.center_bottom())
    }

    #[test]
    fn test_traverse_flat() {
        let world = platform();
        let ctx = context(&Settings::default(), &agent());
        let moves = MoveContext::new(&ctx, &world);

        let step = moves.traverse(START, CardinalDirection::West).unwrap();
        assert_eq!(step.movement.dest, BlockLocation::new(-1, 41, 0));
        assert_lt!(
            (step.cost.value().unwrap() - WALK_ONE_BLOCK_COST * SPRINT_MULTIPLIER).abs(),
            1e-9
        );
    }

    #[test]
    fn test_traverse_obstructed() {
        let mut world = platform();
        world.set_block(BlockLocation::new(-1, 42, 0), BlockState::NETHERRACK);
        let agent = agent();

        let no_break = Settings {
            allow_break: false,
            ..Settings::default()
        };
        let ctx = context(&no_break, &agent);
        let step = MoveContext::new(&ctx, &world)
            .traverse(START, CardinalDirection::West)
            .unwrap();
        assert!(step.cost.is_infinite());

        let ctx = context(&Settings::default(), &agent);
        let step = MoveContext::new(&ctx, &world)
            .traverse(START, CardinalDirection::West)
            .unwrap();
        assert_gt!(step.cost, Cost::ticks(WALK_ONE_BLOCK_COST));
        assert!(step.cost.is_finite());
    }

    #[test]
    fn test_bridge_needs_blocks() {
        let world = platform();
        let mut agent = agent();

        let ctx = context(&Settings::default(), &agent);
        let step = MoveContext::new(&ctx, &world)
            .traverse(START, CardinalDirection::East)
            .unwrap();
        assert!(step.cost.is_infinite());

        agent.inventory.add(
            37,
            ItemStack::new(ItemKind::from(BlockKind::NETHERRACK), 64),
        );
        let ctx = context(&Settings::default(), &agent);
        let step = MoveContext::new(&ctx, &world)
            .traverse(START, CardinalDirection::East)
            .unwrap();
        assert_gt!(step.cost, Cost::ticks(20.0));
        assert!(step.cost.is_finite());
    }

    #[test]
    fn test_unloaded_is_not_forbidden() {
        let mut world = WorldBlocks::nether();
        world.fill(
            BlockLocation::new(0, 40, 0),
            BlockLocation::new(15, 40, 15),
            BlockState::NETHERRACK,
        );
        let ctx = context(&Settings::default(), &agent());
        let moves = MoveContext::new(&ctx, &world);

        // west of x = 0 is another, unloaded chunk
        let from = BlockLocation::new(0, 41, 5);
        assert_matches!(moves.traverse(from, CardinalDirection::West), Err(NotLoaded));
        assert_matches!(moves.progressions(from), Err(NotLoaded));
        assert!(moves.progressions(BlockLocation::new(7, 41, 7)).is_ok());
    }

    #[test]
    fn test_cliff_fall() {
        let mut world = platform();
        world.fill(
            BlockLocation::new(1, 25, -8),
            BlockLocation::new(8, 25, 8),
            BlockState::NETHERRACK,
        );
        let agent = agent();
        let base = context(&Settings::default(), &agent);

        // 15 blocks is too far to walk off normally
        let step = MoveContext::new(&base, &world)
            .fall(START, CardinalDirection::East)
            .unwrap();
        assert_eq!(step.movement.kind, MoveKind::Fall);
        assert_eq!(step.movement.dest, BlockLocation::new(1, 26, 0));
        assert!(step.cost.is_infinite());

        let walk_off = WalkOffContext::new(base);
        let step = MoveContext::new(&walk_off, &world)
            .fall(START, CardinalDirection::East)
            .unwrap();
        assert_eq!(step.movement.kind, MoveKind::Fall);
        assert!(step.cost.is_finite());
    }

    #[test]
    fn test_short_drop_is_descend() {
        let mut world = platform();
        world.fill(
            BlockLocation::new(1, 38, -8),
            BlockLocation::new(8, 38, 8),
            BlockState::NETHERRACK,
        );
        let base = context(&Settings::default(), &agent());

        let step = MoveContext::new(&base, &world)
            .fall(START, CardinalDirection::East)
            .unwrap();
        assert_eq!(step.movement.kind, MoveKind::Descend);
        assert_eq!(step.movement.dest, BlockLocation::new(1, 39, 0));
        assert!(step.cost.is_finite());

        // still only a descend when taking off
        let walk_off = WalkOffContext::new(base);
        let step = MoveContext::new(&walk_off, &world)
            .fall(START, CardinalDirection::East)
            .unwrap();
        assert_eq!(step.movement.kind, MoveKind::Descend);
    }

    #[test]
    fn test_fall_into_lava() {
        let mut world = platform();
        world.fill(
            BlockLocation::new(1, 39, -8),
            BlockLocation::new(8, 39, 8),
            BlockState::LAVA,
        );
        let base = context(&Settings::default(), &agent());

        let step = MoveContext::new(&base, &world)
            .fall(START, CardinalDirection::East)
            .unwrap();
        assert!(step.cost.is_infinite());

        let walk_off = WalkOffContext::new(base);
        let step = MoveContext::new(&walk_off, &world)
            .fall(START, CardinalDirection::East)
            .unwrap();
        assert!(step.cost.is_finite());
    }

    #[test]
    fn test_fall_into_water_and_bucket() {
        let mut world = WorldBlocks::new(0..256);
        world.load_around(START, 2);
        world.fill(
            BlockLocation::new(-8, 40, -8),
            BlockLocation::new(0, 40, 8),
            BlockState::STONE,
        );
        world.fill(
            BlockLocation::new(1, 30, -8),
            BlockLocation::new(8, 30, 8),
            BlockState::STONE,
        );

        let mut agent = agent();
        agent.dimension = Dimension::Overworld;
        let ctx = context(&Settings::default(), &agent);
        let step = MoveContext::new(&ctx, &world)
            .fall(START, CardinalDirection::East)
            .unwrap();
        assert!(step.cost.is_infinite());

        agent.inventory.add(40, ItemStack::new(ItemKind::WATER_BUCKET, 1));
        let ctx = context(&Settings::default(), &agent);
        let step = MoveContext::new(&ctx, &world)
            .fall(START, CardinalDirection::East)
            .unwrap();
        assert!(step.cost.is_finite());

        world.set_block(BlockLocation::new(1, 31, 0), BlockState::WATER);
        agent.inventory.remove(40);
        let ctx = context(&Settings::default(), &agent);
        let step = MoveContext::new(&ctx, &world)
            .fall(START, CardinalDirection::East)
            .unwrap();
        assert_eq!(step.movement.dest, BlockLocation::new(1, 31, 0));
        assert!(step.cost.is_finite());
    }

    #[test]
    fn test_void() {
        let world = platform();
        let walk_off = WalkOffContext::new(context(&Settings::default(), &agent()));
        let step = MoveContext::new(&walk_off, &world)
            .fall(START, CardinalDirection::East)
            .unwrap();
        assert!(step.cost.is_infinite());
    }

    #[test]
    fn test_ascend_and_swim() {
        let mut world = platform();
        world.set_block(BlockLocation::new(0, 41, -1), BlockState::NETHERRACK);
        world.set_block(BlockLocation::new(-3, 41, 0), BlockState::WATER);
        world.set_block(BlockLocation::new(-3, 42, 0), BlockState::WATER);
        let ctx = context(&Settings::default(), &agent());
        let moves = MoveContext::new(&ctx, &world);

        let step = moves.ascend(START, CardinalDirection::North).unwrap();
        assert_eq!(step.movement.dest, BlockLocation::new(0, 42, -1));
        assert!(step.cost.is_finite());

        let water = BlockLocation::new(-3, 41, 0);
        assert!(moves.swim(water, true).unwrap().cost.is_finite());
        assert!(moves.swim(water, false).unwrap().cost.is_infinite());
        assert!(moves.swim(START, true).unwrap().cost.is_infinite());
    }

    #[test]
    fn test_glide() {
        let mut world = platform();
        let ctx = context(&Settings::default(), &agent());

        let from = BlockLocation::new(-5, 60, 0);
        let to = BlockLocation::new(5, 60, 0);
        let step = MoveContext::new(&ctx, &world).glide(from, to).unwrap();
        assert!(step.cost.is_finite());

        world.set_block(BlockLocation::new(0, 60, 0), BlockState::GLOWSTONE);
        let step = MoveContext::new(&ctx, &world).glide(from, to).unwrap();
        assert!(step.cost.is_infinite());
    }

    #[test]
    fn test_parkour() {
        let mut world = platform();
        world.fill(
            BlockLocation::new(3, 40, -8),
            BlockLocation::new(8, 40, 8),
            BlockState::NETHERRACK,
        );

        let agent = agent();
        let ctx = context(&Settings::default(), &agent);
        let step = MoveContext::new(&ctx, &world)
            .parkour(START, CardinalDirection::East)
            .unwrap();
        assert!(step.cost.is_infinite());

        let settings = Settings {
            allow_parkour: true,
            ..Settings::default()
        };
        let ctx = context(&settings, &agent);
        let step = MoveContext::new(&ctx, &world)
            .parkour(START, CardinalDirection::East)
            .unwrap();
        assert_eq!(step.movement.dest, BlockLocation::new(3, 41, 0));
        assert!(step.cost.is_finite());
    }

    #[test]
    fn test_backtrack() {
        let world = platform();
        let ctx = context(&Settings::default(), &agent());
        let moves = MoveContext::new(&ctx, &world);

        assert_eq!(moves.favor_backtrack(Cost::ticks(10.0), true), Cost::ticks(5.0));
        assert_eq!(moves.favor_backtrack(Cost::ticks(10.0), false), Cost::ticks(10.0));
        assert!(moves.favor_backtrack(Cost::Infinite, true).is_infinite());
    }

    #[test]
    fn test_progressions_on_platform() {
        let world = platform();
        let ctx = context(&Settings::default(), &agent());
        let steps = MoveContext::new(&ctx, &world)
            .progressions(BlockLocation::new(-4, 41, 0))
            .unwrap();

        assert!(steps.iter().all(|step| step.cost.is_finite()));
        let traverses = steps
            .iter()
            .filter(|step| step.movement.kind == MoveKind::Traverse)
            .count();
        assert_eq!(traverses, 4);
    }
}
