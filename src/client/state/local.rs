use interfaces::types::{
    BlockLocation, Dimension, Displacement, Enchantment, ItemKind, Location,
};

use crate::client::state::inventory::{EquipmentSlot, ItemStack, PlayerInventory};

/// A snapshot of the player, rebuilt by the host every tick
#[derive(Debug, Clone)]
pub struct AgentState {
    pub location: Location,
    pub velocity: Displacement,
    pub fall_distance: f32,
    pub on_ground: bool,
    /// gliding with an elytra
    pub fall_flying: bool,
    pub dimension: Dimension,
    pub food: u8,
    pub inventory: PlayerInventory,
}

impl AgentState {
    /// A fed player standing at `location` in the nether wearing an elytra
    /// with a stack of fireworks
    pub fn mock(location: Location) -> AgentState {
        let mut inventory = PlayerInventory::default();
        inventory.set_equipment(
            EquipmentSlot::Chest,
            Some(ItemStack::new(ItemKind::ELYTRA, 1)),
        );
        inventory.add(36, ItemStack::new(ItemKind::FIREWORKS, 64));

        AgentState {
            location,
            velocity: Displacement::default(),
            fall_distance: 0.0,
            on_ground: true,
            fall_flying: false,
            dimension: Dimension::Nether,
            food: 20,
            inventory,
        }
    }

    pub fn feet(&self) -> BlockLocation {
        BlockLocation::from(self.location)
    }

    pub fn horizontal_speed(&self) -> f64 {
        self.velocity.horizontal().mag()
    }

    /// Levels of `id` on every worn or held item
    pub fn enchantment_levels(&self, id: u16) -> impl Iterator<Item = u16> + '_ {
        self.inventory
            .equipped()
            .flat_map(|stack| stack.enchantments.iter())
            .filter(move |enchantment| enchantment.id == id)
            .map(|enchantment: &Enchantment| enchantment.lvl)
    }
}
