use std::fmt::Debug;

use interfaces::types::{
    Attribute, BlockKind, BlockLocation, BlockState, Dimension, Enchantment, ItemKind,
};

use crate::{
    client::{
        pathfind::costs::{Cost, WALK_ONE_BLOCK_COST, WALK_ONE_IN_WATER_COST},
        settings::Settings,
        state::local::AgentState,
    },
    storage::border::WorldBorder,
};

/// The legality side of scoring moves. The scalar parts of a move (walking,
/// falling, jumping) live in [`crate::client::pathfind::moves`]; these hooks
/// decide whether a block may be changed at all.
///
/// Implementations are immutable once built and shared between the control
/// thread and background planners.
pub trait CostModel: Send + Sync + Debug {
    /// The shared, general purpose settings snapshot
    fn base(&self) -> &CalculationContext;

    fn cost_of_placing_at(&self, location: BlockLocation, current: BlockState) -> Cost;

    /// `1.0` if the block may be broken, [`Cost::Infinite`] if not
    fn break_cost_multiplier_at(&self, location: BlockLocation, current: BlockState) -> Cost;

    /// placing water to survive a fall
    fn place_bucket_cost(&self) -> Cost;

    fn allow_fall_into_lava(&self) -> bool;

    /// a drop shorter than this is a descend rather than a fall
    fn min_fall_height(&self) -> i16;

    fn max_fall_height_no_water(&self) -> i16;
}

/// Everything a planning run needs to know about the player and settings,
/// captured once so that every move in a path is scored the same way
#[derive(Debug, Clone)]
pub struct CalculationContext {
    pub has_throwaway: bool,
    pub has_water_bucket: bool,
    pub can_sprint: bool,
    place_block_cost: f64,
    pub allow_break: bool,
    pub allow_break_anyway: Vec<BlockKind>,
    pub allow_parkour: bool,
    pub allow_parkour_place: bool,
    pub allow_jump_at_build_limit: bool,
    pub allow_parkour_ascend: bool,
    pub assume_walk_on_water: bool,
    pub frost_walker: u16,
    pub allow_diagonal_descend: bool,
    pub allow_diagonal_ascend: bool,
    pub allow_downward: bool,
    pub max_fall_height_no_water: i16,
    pub max_fall_height_bucket: i16,
    pub water_walk_speed: f64,
    pub break_block_additional_cost: f64,
    pub backtrack_cost_favoring_coefficient: f64,
    pub jump_penalty: f64,
    pub walk_on_water_one_penalty: f64,
    pub world_border: WorldBorder,
}

impl CalculationContext {
    pub fn new(settings: &Settings, agent: &AgentState, world_border: WorldBorder) -> Self {
        let inventory = &agent.inventory;

        let has_throwaway = settings.allow_place && inventory.has_throwaway();
        let has_water_bucket = settings.allow_water_bucket_fall
            && inventory.hotbar_has(ItemKind::WATER_BUCKET)
            && agent.dimension != Dimension::Nether;
        let can_sprint = settings.allow_sprint && agent.food > 6;

        let frost_walker = agent
            .enchantment_levels(Enchantment::FROST_WALKER)
            .max()
            .unwrap_or(0);

        // the first water efficiency bonus found wins
        let water_speed_multiplier = inventory
            .equipped()
            .flat_map(|stack| stack.enchantments.iter())
            .find_map(|enchantment| {
                enchantment
                    .attribute_effects()
                    .iter()
                    .find(|effect| effect.attribute == Attribute::WaterMovementEfficiency)
                    .map(|effect| effect.amount.calculate(enchantment.lvl))
            })
            .map_or(0.0, f64::from)
            .clamp(0.0, 1.0);

        let water_walk_speed = WALK_ONE_IN_WATER_COST * (1.0 - water_speed_multiplier)
            + WALK_ONE_BLOCK_COST * water_speed_multiplier;

        Self {
            has_throwaway,
            has_water_bucket,
            can_sprint,
            place_block_cost: settings.block_placement_penalty,
            allow_break: settings.allow_break,
            allow_break_anyway: settings.allow_break_anyway.clone(),
            allow_parkour: settings.allow_parkour,
            allow_parkour_place: settings.allow_parkour_place,
            allow_jump_at_build_limit: settings.allow_jump_at_build_limit,
            allow_parkour_ascend: settings.allow_parkour_ascend,
            assume_walk_on_water: settings.assume_walk_on_water,
            frost_walker,
            allow_diagonal_descend: settings.allow_diagonal_descend,
            allow_diagonal_ascend: settings.allow_diagonal_ascend,
            allow_downward: settings.allow_downward,
            max_fall_height_no_water: settings.max_fall_height_no_water,
            max_fall_height_bucket: settings.max_fall_height_bucket,
            water_walk_speed,
            break_block_additional_cost: settings.block_break_additional_penalty,
            backtrack_cost_favoring_coefficient: settings.backtrack_cost_favoring_coefficient,
            jump_penalty: settings.jump_penalty,
            walk_on_water_one_penalty: settings.walk_on_water_one_penalty,
            world_border,
        }
    }

    /// Hook for claim/spawn protection. Nothing is protected yet.
    pub const fn is_possibly_protected(&self, _location: BlockLocation) -> bool {
        false
    }
}

impl CostModel for CalculationContext {
    fn base(&self) -> &CalculationContext {
        self
    }

    fn cost_of_placing_at(&self, location: BlockLocation, _current: BlockState) -> Cost {
        // has_throwaway is only set when placing is allowed
        if !self.has_throwaway
            || self.is_possibly_protected(location)
            || !self.world_border.can_place_at(location.x, location.z)
        {
            return Cost::Infinite;
        }
        Cost::ticks(self.place_block_cost)
    }

    fn break_cost_multiplier_at(&self, location: BlockLocation, current: BlockState) -> Cost {
        if !self.allow_break && !self.allow_break_anyway.contains(&current.kind()) {
            return Cost::Infinite;
        }
        if self.is_possibly_protected(location) {
            return Cost::Infinite;
        }
        Cost::ticks(1.0)
    }

    fn place_bucket_cost(&self) -> Cost {
        Cost::ticks(self.place_block_cost)
    }

    fn allow_fall_into_lava(&self) -> bool {
        false
    }

    fn min_fall_height(&self) -> i16 {
        3
    }

    fn max_fall_height_no_water(&self) -> i16 {
        self.max_fall_height_no_water
    }
}

/// Scores the walk to a ledge to glide off of. The world may not be changed
/// and any fall counts as long as it is high enough to open the elytra.
#[derive(Debug, Clone)]
pub struct WalkOffContext {
    inner: CalculationContext,
}

impl WalkOffContext {
    pub const MIN_FALL_HEIGHT: i16 = 8;
    pub const MAX_FALL_HEIGHT: i16 = 10_000;

    pub const fn new(inner: CalculationContext) -> Self {
        Self { inner }
    }
}

impl CostModel for WalkOffContext {
    fn base(&self) -> &CalculationContext {
        &self.inner
    }

    fn cost_of_placing_at(&self, _location: BlockLocation, _current: BlockState) -> Cost {
        Cost::Infinite
    }

    fn break_cost_multiplier_at(&self, _location: BlockLocation, _current: BlockState) -> Cost {
        Cost::Infinite
    }

    fn place_bucket_cost(&self) -> Cost {
        Cost::Infinite
    }

    fn allow_fall_into_lava(&self) -> bool {
        true
    }

    fn min_fall_height(&self) -> i16 {
        Self::MIN_FALL_HEIGHT
    }

    fn max_fall_height_no_water(&self) -> i16 {
        Self::MAX_FALL_HEIGHT
    }
}

#[cfg(test)]
mod tests {
    use interfaces::types::{
        BlockKind, BlockLocation, BlockState, Dimension, Enchantment, ItemKind, Location,
    };
    use itertools::iproduct;
    use more_asserts::*;

    use crate::{
        client::{
            pathfind::{
                context::{CalculationContext, CostModel, WalkOffContext},
                costs::{Cost, WALK_ONE_BLOCK_COST, WALK_ONE_IN_WATER_COST},
            },
            settings::Settings,
            state::{
                inventory::{EquipmentSlot, ItemStack},
                local::AgentState,
            },
        },
        storage::border::WorldBorder,
    };

    fn builder() -> AgentState {
        let mut agent = AgentState::mock(Location::new(0.5, 64.0, 0.5));
        agent.inventory.add(
            37,
            ItemStack::new(ItemKind::from(BlockKind::NETHERRACK), 64),
        );
        agent
    }

    fn border() -> WorldBorder {
        WorldBorder::centered(0.0, 0.0, 200.0)
    }

    fn sample_locations() -> impl Iterator<Item = BlockLocation> {
        iproduct!((-150..150).step_by(7), [0_i16, 64, 127], (-150..150).step_by(11))
            .map(|(x, y, z)| BlockLocation::new(x, y, z))
    }

    #[test]
    fn test_place_disabled() {
        let settings = Settings {
            allow_place: false,
            ..Settings::default()
        };
        let ctx = CalculationContext::new(&settings, &builder(), border());

        for loc in sample_locations() {
            assert!(ctx.cost_of_placing_at(loc, BlockState::AIR).is_infinite());
        }
    }

    #[test]
    fn test_place_no_blocks() {
        let ctx = CalculationContext::new(
            &Settings::default(),
            &AgentState::mock(Location::default()),
            border(),
        );
        assert!(ctx
            .cost_of_placing_at(BlockLocation::new(0, 64, 0), BlockState::AIR)
            .is_infinite());
    }

    #[test]
    fn test_place_outside_border() {
        let ctx = CalculationContext::new(&Settings::default(), &builder(), border());

        assert_eq!(
            ctx.cost_of_placing_at(BlockLocation::new(0, 64, 0), BlockState::AIR),
            Cost::ticks(20.0)
        );

        for loc in sample_locations() {
            if !border().can_place_at(loc.x, loc.z) {
                assert!(ctx.cost_of_placing_at(loc, BlockState::AIR).is_infinite());
            }
        }

        assert!(ctx
            .cost_of_placing_at(BlockLocation::new(120, 64, 0), BlockState::AIR)
            .is_infinite());
        assert!(ctx
            .cost_of_placing_at(BlockLocation::new(99, 64, 0), BlockState::AIR)
            .is_infinite());
    }

    #[test]
    fn test_break_iff() {
        for (allow_break, listed) in iproduct!([false, true], [false, true]) {
            let settings = Settings {
                allow_break,
                allow_break_anyway: if listed {
                    vec![BlockKind::NETHERRACK]
                } else {
                    vec![BlockKind::GRAVEL]
                },
                ..Settings::default()
            };
            let ctx = CalculationContext::new(&settings, &builder(), border());
            let cost = ctx.break_cost_multiplier_at(
                BlockLocation::new(3, 40, 3),
                BlockState::NETHERRACK,
            );

            assert_eq!(cost.is_infinite(), !allow_break && !listed);
            if cost.is_finite() {
                assert_eq!(cost, Cost::ticks(1.0));
            }
        }
    }

    #[test]
    fn test_derived_equipment() {
        let mut agent = builder();
        agent.food = 6;
        agent.inventory.add(38, ItemStack::new(ItemKind::WATER_BUCKET, 1));

        let ctx = CalculationContext::new(&Settings::default(), &agent, border());
        assert!(!ctx.can_sprint);
        // no buckets in the nether
        assert!(!ctx.has_water_bucket);
        assert_eq!(ctx.frost_walker, 0);
        assert_lt!((ctx.water_walk_speed - WALK_ONE_IN_WATER_COST).abs(), 1e-9);

        agent.dimension = Dimension::Overworld;
        agent.food = 20;
        let ctx = CalculationContext::new(&Settings::default(), &agent, border());
        assert!(ctx.can_sprint);
        assert!(ctx.has_water_bucket);
    }

    #[test]
    fn test_enchantment_scan() {
        let mut agent = builder();
        agent.inventory.set_equipment(
            EquipmentSlot::Feet,
            Some(
                ItemStack::new(ItemKind(313), 1)
                    .with_enchantment(Enchantment::new(Enchantment::DEPTH_STRIDER, 3))
                    .with_enchantment(Enchantment::new(Enchantment::FROST_WALKER, 1)),
            ),
        );
        agent.inventory.set_equipment(
            EquipmentSlot::MainHand,
            Some(
                ItemStack::new(ItemKind(278), 1)
                    .with_enchantment(Enchantment::new(Enchantment::FROST_WALKER, 2)),
            ),
        );

        let ctx = CalculationContext::new(&Settings::default(), &agent, border());
        assert_eq!(ctx.frost_walker, 2);

        // depth strider 3 walks in water like on land
        assert_lt!((ctx.water_walk_speed - WALK_ONE_BLOCK_COST).abs(), 1e-6);
    }

    #[test]
    fn test_walk_off() {
        let settings = Settings {
            allow_break: true,
            ..Settings::default()
        };
        let base = CalculationContext::new(&settings, &builder(), border());
        let walk_off = WalkOffContext::new(base.clone());
        let loc = BlockLocation::new(0, 64, 0);

        assert!(base.cost_of_placing_at(loc, BlockState::AIR).is_finite());
        assert!(walk_off.cost_of_placing_at(loc, BlockState::AIR).is_infinite());
        assert!(walk_off
            .break_cost_multiplier_at(loc, BlockState::NETHERRACK)
            .is_infinite());
        assert!(walk_off.place_bucket_cost().is_infinite());

        assert!(walk_off.allow_fall_into_lava());
        assert!(!base.allow_fall_into_lava());
        assert_eq!(walk_off.min_fall_height(), 8);
        assert_eq!(walk_off.max_fall_height_no_water(), 10_000);

        // the rest is shared
        assert_eq!(walk_off.base().jump_penalty, base.jump_penalty);
        assert_eq!(walk_off.base().frost_walker, base.frost_walker);
    }
}
