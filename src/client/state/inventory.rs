use interfaces::types::{Enchantment, ItemKind};
use smallvec::SmallVec;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemStack {
    pub kind: ItemKind,
    pub count: u8,
    pub damage: u16,
    pub enchantments: SmallVec<[Enchantment; 2]>,
}

impl ItemStack {
    pub fn new(kind: ItemKind, count: u8) -> ItemStack {
        Self {
            kind,
            count,
            damage: 0,
            enchantments: SmallVec::new(),
        }
    }

    #[must_use]
    pub fn with_damage(mut self, damage: u16) -> ItemStack {
        self.damage = damage;
        self
    }

    #[must_use]
    pub fn with_enchantment(mut self, enchantment: Enchantment) -> ItemStack {
        self.enchantments.push(enchantment);
        self
    }

    /// uses left before the item breaks
    pub const fn durability(&self) -> u16 {
        self.kind.max_damage().saturating_sub(self.damage)
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum EquipmentSlot {
    MainHand,
    OffHand,
    Feet,
    Legs,
    Chest,
    Head,
}

impl EquipmentSlot {
    pub const ALL: [EquipmentSlot; 6] = {
        use EquipmentSlot::*;
        [MainHand, OffHand, Feet, Legs, Chest, Head]
    };
}

const HOTBAR: std::ops::Range<usize> = 36..45;
const STORAGE: std::ops::Range<usize> = 9..45;
const OFFHAND: usize = 45;

/// The player window of 1.12: crafting (0..5), armour (5..9), storage
/// (9..36), hotbar (36..45) and the offhand (45)
#[derive(Debug, Clone)]
pub struct PlayerInventory {
    slots: [Option<ItemStack>; 46],
    selected: u8,
}

impl Default for PlayerInventory {
    fn default() -> Self {
        const NONE: Option<ItemStack> = None;
        Self {
            slots: [NONE; 46],
            selected: 0,
        }
    }
}

impl PlayerInventory {
    pub fn hotbar(&self) -> &[Option<ItemStack>] {
        &self.slots[HOTBAR]
    }

    const fn slot_idx(&self, slot: EquipmentSlot) -> usize {
        match slot {
            EquipmentSlot::MainHand => HOTBAR.start + self.selected as usize,
            EquipmentSlot::OffHand => OFFHAND,
            EquipmentSlot::Feet => 8,
            EquipmentSlot::Legs => 7,
            EquipmentSlot::Chest => 6,
            EquipmentSlot::Head => 5,
        }
    }

    pub fn equipment(&self, slot: EquipmentSlot) -> Option<&ItemStack> {
        self.slots[self.slot_idx(slot)].as_ref()
    }

    pub fn set_equipment(&mut self, slot: EquipmentSlot, stack: Option<ItemStack>) {
        let idx = self.slot_idx(slot);
        self.slots[idx] = stack;
    }

    pub fn chest(&self) -> Option<&ItemStack> {
        self.equipment(EquipmentSlot::Chest)
    }

    pub fn chest_mut(&mut self) -> Option<&mut ItemStack> {
        let idx = self.slot_idx(EquipmentSlot::Chest);
        self.slots[idx].as_mut()
    }

    /// Everything currently worn or held, in [`EquipmentSlot::ALL`] order
    pub fn equipped(&self) -> impl Iterator<Item = &ItemStack> + '_ {
        EquipmentSlot::ALL
            .into_iter()
            .filter_map(|slot| self.equipment(slot))
    }

    pub fn hotbar_has(&self, kind: ItemKind) -> bool {
        self.hotbar().iter().flatten().any(|stack| stack.kind == kind)
    }

    /// How many of `kind` are in the storage and hotbar slots
    pub fn count(&self, kind: ItemKind) -> u32 {
        self.slots[STORAGE]
            .iter()
            .flatten()
            .filter(|stack| stack.kind == kind)
            .map(|stack| u32::from(stack.count))
            .sum()
    }

    /// if there is a block in the hotbar we do not mind losing
    pub fn has_throwaway(&self) -> bool {
        self.hotbar()
            .iter()
            .flatten()
            .filter_map(|stack| stack.kind.block())
            .any(|kind| kind.throw_away_block())
    }

    /// Take one of `kind` from the storage and hotbar slots
    pub fn consume(&mut self, kind: ItemKind) -> bool {
        let Some(slot) = self.slots[STORAGE]
            .iter_mut()
            .find(|slot| slot.as_ref().is_some_and(|stack| stack.kind == kind))
        else {
            return false;
        };

        let emptied = match slot {
            Some(stack) => {
                stack.count = stack.count.saturating_sub(1);
                stack.count == 0
            }
            None => false,
        };

        if emptied {
            *slot = None;
        }
        true
    }

    pub fn remove(&mut self, idx: usize) {
        self.slots[idx] = None;
    }

    pub fn add(&mut self, idx: usize, stack: ItemStack) {
        self.slots[idx] = Some(stack);
    }
}
