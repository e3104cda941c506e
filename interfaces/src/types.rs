use std::{
    f32::consts::PI,
    fmt::{Debug, Display, Formatter},
    ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub},
};

use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Copy, Clone, Default, PartialEq)]
pub struct Location {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Location {
    pub const fn new(x: f64, y: f64, z: f64) -> Location {
        Location { x, y, z }
    }

    pub fn dist2(&self, loc: Location) -> f64 {
        let dx = loc.x - self.x;
        let dy = loc.y - self.y;
        let dz = loc.z - self.z;
        dx * dx + dy * dy + dz * dz
    }

    pub fn add_y(&self, dy: f64) -> Location {
        Location::new(self.x, self.y + dy, self.z)
    }

    /// The same location with `y` replaced
    pub fn with_y(&self, y: f64) -> Location {
        Location::new(self.x, y, self.z)
    }
}

impl Add<Displacement> for Location {
    type Output = Location;

    fn add(self, rhs: Displacement) -> Self::Output {
        Location {
            x: self.x + rhs.dx,
            y: self.y + rhs.dy,
            z: self.z + rhs.dz,
        }
    }
}

impl AddAssign<Displacement> for Location {
    fn add_assign(&mut self, rhs: Displacement) {
        self.x += rhs.dx;
        self.y += rhs.dy;
        self.z += rhs.dz;
    }
}

impl Sub<Location> for Location {
    type Output = Displacement;

    fn sub(self, rhs: Location) -> Self::Output {
        Displacement {
            dx: self.x - rhs.x,
            dy: self.y - rhs.y,
            dz: self.z - rhs.z,
        }
    }
}

impl Sub<Displacement> for Location {
    type Output = Location;

    fn sub(self, rhs: Displacement) -> Self::Output {
        let Displacement { dx, dy, dz } = rhs;
        Self {
            x: self.x - dx,
            y: self.y - dy,
            z: self.z - dz,
        }
    }
}

impl Display for Location {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("[{:.2} {:.2} {:.2}]", self.x, self.y, self.z))
    }
}

impl From<Location> for BlockLocation {
    fn from(location: Location) -> Self {
        let Location { x, y, z } = location;
        BlockLocation::from_flts(x, y, z)
    }
}

#[derive(Serialize, Deserialize, Debug, Copy, Clone, Default, PartialEq)]
pub struct Displacement {
    pub dx: f64,
    pub dy: f64,
    pub dz: f64,
}

impl Displacement {
    pub const EPSILON_Y: Displacement = Displacement::new(0., 0.01, 0.);

    pub const fn new(dx: f64, dy: f64, dz: f64) -> Displacement {
        Displacement { dx, dy, dz }
    }

    pub fn make_dy(&self, dy: f64) -> Displacement {
        Self {
            dx: self.dx,
            dy,
            dz: self.dz,
        }
    }

    /// Drop the vertical component
    pub fn horizontal(&self) -> Displacement {
        self.make_dy(0.0)
    }

    pub fn mag(&self) -> f64 {
        self.mag2().sqrt()
    }

    pub fn mag2(&self) -> f64 {
        let Displacement { dx, dy, dz } = *self;
        dx * dx + dy * dy + dz * dz
    }
}

impl Display for Displacement {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!(
            "[{:.2} {:.2} {:.2}]",
            self.dx, self.dy, self.dz
        ))
    }
}

impl Neg for Displacement {
    type Output = Displacement;

    fn neg(self) -> Self::Output {
        self * (-1.0)
    }
}

impl Add for Displacement {
    type Output = Displacement;

    fn add(self, rhs: Self) -> Self::Output {
        Self {
            dx: self.dx + rhs.dx,
            dy: self.dy + rhs.dy,
            dz: self.dz + rhs.dz,
        }
    }
}

impl Sub for Displacement {
    type Output = Displacement;

    fn sub(self, rhs: Self) -> Self::Output {
        self + (-rhs)
    }
}

impl MulAssign<f64> for Displacement {
    fn mul_assign(&mut self, rhs: f64) {
        self.dx *= rhs;
        self.dy *= rhs;
        self.dz *= rhs;
    }
}

impl Mul<f64> for Displacement {
    type Output = Displacement;

    fn mul(self, rhs: f64) -> Self::Output {
        Self {
            dx: self.dx * rhs,
            dy: self.dy * rhs,
            dz: self.dz * rhs,
        }
    }
}

impl From<Change> for Displacement {
    fn from(change: Change) -> Self {
        Self {
            dx: f64::from(change.dx),
            dy: f64::from(change.dy),
            dz: f64::from(change.dz),
        }
    }
}

#[derive(Serialize, Deserialize, Copy, Clone, Default, Debug, PartialEq)]
pub struct Direction {
    /// wiki.vg:
    /// yaw is measured in degrees, and does not follow classical trigonometry
    /// rules. The unit circle of yaw on the XZ-plane starts at (0, 1) and
    /// turns counterclockwise, with 90 at (-1, 0), 180 at (0,-1) and 270 at (1,
    /// 0). Additionally, yaw is not clamped to between 0 and 360 degrees;
    /// any number is valid, including negative numbers and numbers greater than
    /// 360.
    pub yaw: f32,
    pub pitch: f32,
}

impl Direction {
    pub const DOWN: Direction = Direction {
        yaw: 90.,
        pitch: 90.,
    };

    pub fn unit_vector(&self) -> Displacement {
        let pitch = self.pitch.to_radians();
        let yaw = self.yaw.to_radians();

        let x = -pitch.cos() * yaw.sin();
        let y = -pitch.sin();
        let z = pitch.cos() * yaw.cos();

        Displacement::new(f64::from(x), f64::from(y), f64::from(z))
    }

    pub fn horizontal(&self) -> Direction {
        let mut res = *self;
        res.pitch = 0.0;
        res
    }
}

impl From<Displacement> for Direction {
    fn from(displacement: Displacement) -> Self {
        const EPSILON: f32 = 0.1;

        let Displacement { dx, dy, dz } = displacement;
        let (dx, dy, dz) = (dx as f32, dy as f32, dz as f32);
        let r = (dx * dx + dy * dy + dz * dz).sqrt();
        let mut yaw = -dx.atan2(dz) / PI * 180.0;

        if yaw < 0.0 {
            yaw += 360.0;
        }

        if yaw.abs() < EPSILON {
            yaw = 0.0;
        }

        let pitch = if r == 0.0 {
            0.0
        } else {
            -(dy / r).asin() / PI * 180.0
        };

        Direction { yaw, pitch }
    }
}

#[derive(Serialize, Deserialize, Debug, Copy, Clone, Eq, PartialEq)]
pub enum Dimension {
    Nether,
    Overworld,
    End,
}

impl Display for Dimension {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let to_write = match self {
            Dimension::Nether => "nether",
            Dimension::Overworld => "overworld",
            Dimension::End => "end",
        };
        f.write_str(to_write)
    }
}

#[derive(Copy, Clone, Debug)]
pub struct Change {
    pub dx: i32,
    pub dy: i16,
    pub dz: i32,
}

impl Change {
    pub const fn new(dx: i32, dy: i16, dz: i32) -> Change {
        Change { dx, dy, dz }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum CardinalDirection {
    North,
    South,
    West,
    East,
}

impl CardinalDirection {
    pub const ALL: [CardinalDirection; 4] = {
        use CardinalDirection::*;
        [North, South, East, West]
    };

    pub const fn unit_change(self) -> Change {
        match self {
            CardinalDirection::North => Change::new(0, 0, -1),
            CardinalDirection::South => Change::new(0, 0, 1),
            CardinalDirection::West => Change::new(-1, 0, 0),
            CardinalDirection::East => Change::new(1, 0, 0),
        }
    }
}

#[derive(Serialize, Deserialize, Copy, Clone, Debug, Hash, Eq, PartialEq)]
pub struct ChunkLocation(pub i32, pub i32);

impl From<BlockLocation> for ChunkLocation {
    fn from(loc: BlockLocation) -> Self {
        Self(loc.x >> 4, loc.z >> 4)
    }
}

impl From<Location> for ChunkLocation {
    fn from(loc: Location) -> Self {
        let block_loc = BlockLocation::from(loc);
        Self::from(block_loc)
    }
}

/// A block location stored by (x,z) = i32, y = i16. y is signed to preserve
/// compatibility with newer versions, where the world height can be much
/// higher and goes to negative values.
#[derive(
    Copy, Clone, Debug, Hash, PartialOrd, PartialEq, Ord, Eq, Default, Serialize, Deserialize,
)]
pub struct BlockLocation {
    pub x: i32,
    pub y: i16,
    pub z: i32,
}

impl Add<Change> for BlockLocation {
    type Output = BlockLocation;

    fn add(self, rhs: Change) -> Self::Output {
        BlockLocation::new(self.x + rhs.dx, self.y + rhs.dy, self.z + rhs.dz)
    }
}

impl BlockLocation {
    pub const fn new(x: i32, y: i16, z: i32) -> BlockLocation {
        BlockLocation { x, y, z }
    }

    pub const fn below(&self) -> BlockLocation {
        self.add_y(-1)
    }

    pub const fn above(&self) -> BlockLocation {
        self.add_y(1)
    }

    pub const fn add_y(&self, dy: i16) -> BlockLocation {
        let &BlockLocation { x, y, z } = self;
        Self { x, y: y + dy, z }
    }

    pub fn north(&self) -> BlockLocation {
        *self + CardinalDirection::North.unit_change()
    }

    pub fn south(&self) -> BlockLocation {
        *self + CardinalDirection::South.unit_change()
    }

    pub fn east(&self) -> BlockLocation {
        *self + CardinalDirection::East.unit_change()
    }

    pub fn west(&self) -> BlockLocation {
        *self + CardinalDirection::West.unit_change()
    }

    pub fn from_flts(x: impl num::Float, y: impl num::Float, z: impl num::Float) -> BlockLocation {
        let x = num::cast(x.floor()).unwrap_or(i32::MAX);
        // an invalid height lands far below any world so it reads as void
        let y = num::cast(y.floor()).unwrap_or(i16::MIN);
        let z = num::cast(z.floor()).unwrap_or(i32::MAX);
        BlockLocation::new(x, y, z)
    }

    pub fn center_bottom(&self) -> Location {
        Location {
            x: f64::from(self.x) + 0.5,
            y: f64::from(self.y),
            z: f64::from(self.z) + 0.5,
        }
    }

    pub fn true_center(&self) -> Location {
        Location {
            x: f64::from(self.x) + 0.5,
            y: f64::from(self.y) + 0.5,
            z: f64::from(self.z) + 0.5,
        }
    }

    pub fn abs_dif(&self, other: BlockLocation) -> (u32, u16, u32) {
        let dx = self.x.abs_diff(other.x);
        let dy = self.y.abs_diff(other.y);
        let dz = self.z.abs_diff(other.z);
        (dx, dy, dz)
    }

    pub fn dist2(&self, other: BlockLocation) -> f64 {
        let (dx, dy, dz) = self.abs_dif(other);
        let (dx, dy, dz) = (f64::from(dx), f64::from(dy), f64::from(dz));
        dx * dx + dy * dy + dz * dz
    }

    pub fn dist(&self, other: BlockLocation) -> f64 {
        self.dist2(other).sqrt()
    }

    /// The squared distance ignoring height
    pub fn dist2_horizontal(&self, other: BlockLocation) -> u64 {
        BlockLocation2D::from(*self).dist2(BlockLocation2D::from(other))
    }

    /// The midpoint of two block locations, rounding toward zero like integer
    /// division does
    pub fn midpoint(&self, other: BlockLocation) -> BlockLocation {
        BlockLocation::new(
            (self.x + other.x) / 2,
            (self.y + other.y) / 2,
            (self.z + other.z) / 2,
        )
    }
}

impl Display for BlockLocation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("[{}, {}, {}]", self.x, self.y, self.z))
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Serialize, Deserialize)]
pub struct BlockLocation2D {
    pub x: i32,
    pub z: i32,
}

impl BlockLocation2D {
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    pub fn dist2(self, other: BlockLocation2D) -> u64 {
        let dx = u64::from(self.x.abs_diff(other.x));
        let dz = u64::from(self.z.abs_diff(other.z));
        dx * dx + dz * dz
    }
}

impl From<BlockLocation> for BlockLocation2D {
    fn from(loc: BlockLocation) -> Self {
        Self { x: loc.x, z: loc.z }
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct BlockKind(pub u32);

impl From<u32> for BlockKind {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl BlockKind {
    pub const AIR: BlockKind = BlockKind(0);
    pub const STONE: BlockKind = BlockKind(1);
    pub const DIRT: BlockKind = BlockKind(3);
    pub const COBBLESTONE: BlockKind = BlockKind(4);
    pub const BEDROCK: BlockKind = BlockKind(7);
    pub const FLOWING_WATER: BlockKind = BlockKind(8);
    pub const WATER: BlockKind = BlockKind(9);
    pub const FLOWING_LAVA: BlockKind = BlockKind(10);
    pub const LAVA: BlockKind = BlockKind(11);
    pub const GRAVEL: BlockKind = BlockKind(13);
    pub const LEAVES: BlockKind = BlockKind(18);
    pub const GLASS: BlockKind = BlockKind(20);
    pub const LADDER: BlockKind = BlockKind(65);
    pub const ICE: BlockKind = BlockKind(79);
    pub const NETHERRACK: BlockKind = BlockKind(87);
    pub const SOUL_SAND: BlockKind = BlockKind(88);
    pub const GLOWSTONE: BlockKind = BlockKind(89);
    pub const NETHER_BRICK: BlockKind = BlockKind(112);
    pub const FROSTED_ICE: BlockKind = BlockKind(212);
    pub const MAGMA: BlockKind = BlockKind(213);

    #[inline]
    pub const fn id(self) -> u32 {
        self.0
    }

    pub const fn is_air(self) -> bool {
        self.0 == Self::AIR.0
    }

    pub const fn is_water(self) -> bool {
        matches!(self.0, 8 | 9)
    }

    pub const fn is_lava(self) -> bool {
        matches!(self.0, 10 | 11)
    }

    pub const fn is_liquid(self) -> bool {
        self.is_water() || self.is_lava()
    }

    /// blocks which hurt or trap when stood on or fallen into
    pub const fn is_dangerous(self) -> bool {
        self.is_lava() || matches!(self.0, 30 | 51 | 81 | 213) // web, fire, cactus, magma
    }

    /// A block that is cheap to place and lose (used for bridging)
    pub const fn throw_away_block(self) -> bool {
        matches!(self.0, 3 | 4 | 87) // dirt, cobblestone, netherrack
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct BlockState(pub u32);

impl Debug for BlockState {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("{}:{}", self.0 >> 4, self.0 % 16))
    }
}

impl From<BlockKind> for BlockState {
    fn from(kind: BlockKind) -> Self {
        Self::of(kind)
    }
}

impl BlockState {
    pub const AIR: BlockState = BlockState::of(BlockKind::AIR);
    pub const WATER: BlockState = BlockState::of(BlockKind::WATER);
    pub const LAVA: BlockState = BlockState::of(BlockKind::LAVA);
    pub const STONE: BlockState = BlockState::of(BlockKind::STONE);
    pub const BEDROCK: BlockState = BlockState::of(BlockKind::BEDROCK);
    pub const GRAVEL: BlockState = BlockState::of(BlockKind::GRAVEL);
    pub const NETHERRACK: BlockState = BlockState::of(BlockKind::NETHERRACK);
    pub const SOUL_SAND: BlockState = BlockState::of(BlockKind::SOUL_SAND);
    pub const NETHER_BRICK: BlockState = BlockState::of(BlockKind::NETHER_BRICK);
    pub const GLOWSTONE: BlockState = BlockState::of(BlockKind::GLOWSTONE);

    pub const fn of(kind: BlockKind) -> BlockState {
        BlockState(kind.0 << 4)
    }

    pub const fn from_id(id: u32, data: u16) -> BlockState {
        BlockState((id << 4) + data as u32)
    }

    pub const fn id(&self) -> u32 {
        self.0 >> 4
    }

    pub const fn kind(&self) -> BlockKind {
        BlockKind(self.id())
    }

    pub const fn metadata(&self) -> u8 {
        (self.0 & 0b1111) as u8
    }

    pub const fn is_air(&self) -> bool {
        self.kind().is_air()
    }

    pub const fn is_water(&self) -> bool {
        self.kind().is_water()
    }

    /// still water (metadata 0) can be frozen by frost walker
    pub const fn is_still_water(&self) -> bool {
        self.is_water() && self.metadata() == 0
    }

    pub const fn is_lava(&self) -> bool {
        self.kind().is_lava()
    }

    pub fn full_block(&self) -> bool {
        matches!(self.id(),
            1..=5 | 7 | 12..=25 | 29 | 33 | 35 | 41..=43 | 45..=49 | 52 | 56..=58 | 60..=62 | 73 | 74 |
            78..=80 | // snow, ice
            82 | // clay
            84 | 86 | 87 | 88 | 89 | 91 | 95 |
            97..=100 |
            103 | 110 | 112 | 118 | 121 | 123..=125 |
            129 | 133 | 137..=138 | 155 | 159 | 161 | 162 |
            165 | 166 |
            168..=170 |
            172..=174 |
            179 | 181 | 199..=202 |
            204 | 206 | 208..=255
        )
    }

    pub fn walk_through(&self) -> bool {
        self.is_water() || self.no_motion_effect()
    }

    pub fn no_motion_effect(&self) -> bool {
        matches!(
            self.id(),
            0 | // air
            6 | // sapling
            27 | 28 | // rail
            31 | // grass/fern/dead shrub
            37 | 38 | // flower
            39 | 40 | // mushroom
            50 | // torch
            59 | // wheat
            66 | 68 | 69 | 70 | 72 | 75 | 76 | 77 | 83 |
            104 | 105 | 106 |
            115 | 119 |
            175..=177
        )
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct ItemKind(pub u32);

impl ItemKind {
    pub const BUCKET: ItemKind = ItemKind(325);
    pub const WATER_BUCKET: ItemKind = ItemKind(326);
    pub const FIREWORKS: ItemKind = ItemKind(401);
    pub const ELYTRA: ItemKind = ItemKind(443);

    #[inline]
    pub const fn id(self) -> u32 {
        self.0
    }

    /// the item id of a block item is the block id
    pub const fn block(self) -> Option<BlockKind> {
        if self.0 < 256 {
            Some(BlockKind(self.0))
        } else {
            None
        }
    }

    pub const fn max_damage(self) -> u16 {
        match self.0 {
            443 => 432,
            _ => 0,
        }
    }
}

impl From<BlockKind> for ItemKind {
    fn from(kind: BlockKind) -> Self {
        Self(kind.0)
    }
}

#[derive(Serialize, Deserialize, Debug, Copy, Clone, Eq, PartialEq)]
pub enum Attribute {
    MovementSpeed,
    WaterMovementEfficiency,
}

/// An amount that scales with enchantment level
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq)]
pub struct LevelBased {
    pub base: f32,
    pub per_level_above_first: f32,
}

impl LevelBased {
    pub fn calculate(self, lvl: u16) -> f32 {
        self.base + self.per_level_above_first * f32::from(lvl.saturating_sub(1))
    }
}

#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq)]
pub struct AttributeEffect {
    pub attribute: Attribute,
    pub amount: LevelBased,
}

#[derive(Serialize, Deserialize, Debug, Copy, Clone, Eq, PartialEq)]
pub struct Enchantment {
    pub lvl: u16,
    pub id: u16,
}

impl Enchantment {
    pub const DEPTH_STRIDER: u16 = 8;
    pub const FROST_WALKER: u16 = 9;
    pub const EFFICIENCY: u16 = 32;

    const DEPTH_STRIDER_EFFECTS: [AttributeEffect; 1] = [AttributeEffect {
        attribute: Attribute::WaterMovementEfficiency,
        amount: LevelBased {
            base: 1.0 / 3.0,
            per_level_above_first: 1.0 / 3.0,
        },
    }];

    pub const fn new(id: u16, lvl: u16) -> Self {
        Self { lvl, id }
    }

    pub fn efficiency(self) -> Option<u16> {
        (self.id == Self::EFFICIENCY).then_some(self.lvl)
    }

    pub fn frost_walker(self) -> Option<u16> {
        (self.id == Self::FROST_WALKER).then_some(self.lvl)
    }

    /// attribute modifiers granted while the enchanted item is equipped
    pub fn attribute_effects(self) -> &'static [AttributeEffect] {
        match self.id {
            Self::DEPTH_STRIDER => &Self::DEPTH_STRIDER_EFFECTS,
            _ => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use more_asserts::*;

    use crate::types::{
        Attribute, BlockLocation, BlockState, Direction, Displacement, Enchantment, Location,
    };

    #[test]
    fn test_block_location_from_location() {
        let loc = Location::new(-0.5, 64.9, 3.2);
        assert_eq!(BlockLocation::from(loc), BlockLocation::new(-1, 64, 3));
    }

    #[test]
    fn test_midpoint() {
        let a = BlockLocation::new(0, 70, 0);
        let b = BlockLocation::new(1, 60, 3);
        assert_eq!(a.midpoint(b), BlockLocation::new(0, 65, 1));
    }

    #[test]
    fn test_direction_east() {
        let dir = Direction::from(Displacement::new(1., 0., 0.));
        assert_lt!((dir.yaw - 270.0).abs(), 0.01);
        assert_lt!(dir.pitch.abs(), 0.01);
    }

    #[test]
    fn test_states() {
        assert!(BlockState::LAVA.is_lava());
        assert!(BlockState::WATER.is_still_water());
        assert!(BlockState::NETHERRACK.full_block());
        assert!(BlockState::AIR.is_air());
        assert!(!BlockState::AIR.full_block());
    }

    #[test]
    fn test_depth_strider_effect() {
        let ench = Enchantment::new(Enchantment::DEPTH_STRIDER, 3);
        let effect = ench.attribute_effects()[0];
        assert_eq!(effect.attribute, Attribute::WaterMovementEfficiency);
        assert_lt!((effect.amount.calculate(ench.lvl) - 1.0).abs(), 0.0001);
    }
}
