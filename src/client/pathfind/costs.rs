//! Movement costs measured in ticks

use std::{
    cmp::Ordering,
    fmt::{Display, Formatter},
    iter::Sum,
    ops::{Add, AddAssign, Mul},
};

use float_ord::FloatOrd;
use once_cell::sync::Lazy;

/// The cost of a move. [`Cost::Infinite`] means the move is forbidden and
/// must never be taken, no matter how expensive the alternatives are.
#[derive(Copy, Clone, Debug)]
pub enum Cost {
    Finite(f64),
    Infinite,
}

impl Cost {
    pub const ZERO: Cost = Cost::Finite(0.0);

    /// Anything that is not a non-negative real number is forbidden
    pub fn ticks(value: f64) -> Cost {
        if value.is_finite() && value >= 0.0 {
            Cost::Finite(value)
        } else {
            Cost::Infinite
        }
    }

    pub const fn is_infinite(self) -> bool {
        matches!(self, Cost::Infinite)
    }

    pub const fn is_finite(self) -> bool {
        !self.is_infinite()
    }

    pub const fn value(self) -> Option<f64> {
        match self {
            Cost::Finite(value) => Some(value),
            Cost::Infinite => None,
        }
    }
}

impl Default for Cost {
    fn default() -> Self {
        Self::ZERO
    }
}

impl Ord for Cost {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Cost::Finite(a), Cost::Finite(b)) => FloatOrd(*a).cmp(&FloatOrd(*b)),
            (Cost::Finite(_), Cost::Infinite) => Ordering::Less,
            (Cost::Infinite, Cost::Finite(_)) => Ordering::Greater,
            (Cost::Infinite, Cost::Infinite) => Ordering::Equal,
        }
    }
}

impl PartialOrd for Cost {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Cost {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Cost {}

impl Add for Cost {
    type Output = Cost;

    fn add(self, rhs: Self) -> Self::Output {
        match (self, rhs) {
            (Cost::Finite(a), Cost::Finite(b)) => Cost::ticks(a + b),
            _ => Cost::Infinite,
        }
    }
}

impl Add<f64> for Cost {
    type Output = Cost;

    fn add(self, rhs: f64) -> Self::Output {
        self + Cost::ticks(rhs)
    }
}

impl AddAssign for Cost {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Mul<f64> for Cost {
    type Output = Cost;

    fn mul(self, rhs: f64) -> Self::Output {
        match self {
            Cost::Finite(a) => Cost::ticks(a * rhs),
            Cost::Infinite => Cost::Infinite,
        }
    }
}

impl Mul<Cost> for Cost {
    type Output = Cost;

    fn mul(self, rhs: Cost) -> Self::Output {
        match rhs {
            Cost::Finite(b) => self * b,
            Cost::Infinite => Cost::Infinite,
        }
    }
}

impl Sum for Cost {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Cost::ZERO, Add::add)
    }
}

impl Display for Cost {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Cost::Finite(value) => f.write_fmt(format_args!("{value:.2}")),
            Cost::Infinite => f.write_str("inf"),
        }
    }
}

pub const WALK_ONE_BLOCK_COST: f64 = 20.0 / 4.317;
pub const WALK_ONE_IN_WATER_COST: f64 = 20.0 / 2.2;
pub const WALK_ONE_OVER_SOUL_SAND_COST: f64 = WALK_ONE_BLOCK_COST * 2.0;
pub const SNEAK_ONE_BLOCK_COST: f64 = 20.0 / 1.3;
pub const SPRINT_ONE_BLOCK_COST: f64 = 20.0 / 5.612;
pub const SPRINT_MULTIPLIER: f64 = SPRINT_ONE_BLOCK_COST / WALK_ONE_BLOCK_COST;

/// walking off the edge of a block, before the fall starts
pub const WALK_OFF_BLOCK_COST: f64 = WALK_ONE_BLOCK_COST * 0.8;

/// re-centering on the block that was landed on
pub const CENTER_AFTER_FALL_COST: f64 = WALK_ONE_BLOCK_COST - WALK_OFF_BLOCK_COST;

/// 20 blocks per second while boosted with fireworks is about 33.5 m/s
pub const GLIDE_ONE_BLOCK_COST: f64 = 20.0 / 33.5;

/// hand-breaking one unit of hardness takes 30 ticks
pub const BREAK_HARDNESS_TICKS: f64 = 30.0;

const FALL_TABLE_LEN: usize = 4097;

/// vertical speed after `ticks` ticks of free fall, in blocks per tick
fn velocity(ticks: i32) -> f64 {
    (0.98_f64.powi(ticks) - 1.0) * -3.92
}

/// ticks needed to free fall `distance` blocks
pub fn distance_to_ticks(distance: f64) -> f64 {
    if distance <= 0.0 {
        return 0.0;
    }

    let mut remaining = distance;
    let mut ticks = 0;
    loop {
        let fall = velocity(ticks + 1);
        if remaining <= fall {
            return f64::from(ticks) + remaining / fall;
        }
        remaining -= fall;
        ticks += 1;
    }
}

static FALL_N_BLOCKS_COST: Lazy<[f64; FALL_TABLE_LEN]> =
    Lazy::new(|| std::array::from_fn(|n| distance_to_ticks(n as f64)));

pub static FALL_1_25_BLOCKS_COST: Lazy<f64> = Lazy::new(|| distance_to_ticks(1.25));
pub static FALL_0_25_BLOCKS_COST: Lazy<f64> = Lazy::new(|| distance_to_ticks(0.25));

/// the time spent rising during a jump that clears one block
pub static JUMP_ONE_BLOCK_COST: Lazy<f64> =
    Lazy::new(|| *FALL_1_25_BLOCKS_COST - *FALL_0_25_BLOCKS_COST);

/// ticks to fall `blocks` blocks. Heights outside the table are forbidden.
pub fn fall_n_blocks_cost(blocks: i16) -> Cost {
    usize::try_from(blocks)
        .ok()
        .and_then(|blocks| FALL_N_BLOCKS_COST.get(blocks))
        .map_or(Cost::Infinite, |&ticks| Cost::ticks(ticks))
}

#[cfg(test)]
mod tests {
    use more_asserts::*;

    use crate::client::pathfind::costs::{
        distance_to_ticks, fall_n_blocks_cost, Cost, JUMP_ONE_BLOCK_COST,
        SPRINT_ONE_BLOCK_COST, WALK_ONE_BLOCK_COST, WALK_ONE_IN_WATER_COST,
    };

    #[test]
    fn test_infinite_absorbs() {
        let cost = Cost::ticks(3.0) + Cost::Infinite;
        assert!(cost.is_infinite());
        assert!((Cost::Infinite * 0.5).is_infinite());
        assert_eq!(Cost::ticks(1.0) + 2.0, Cost::ticks(3.0));

        let total: Cost = [1.0, 2.0, 3.0].into_iter().map(Cost::ticks).sum();
        assert_eq!(total, Cost::ticks(6.0));
    }

    #[test]
    fn test_ordering() {
        assert_lt!(Cost::ticks(1_000_000.0), Cost::Infinite);
        assert_lt!(Cost::ZERO, Cost::ticks(0.1));
        assert_eq!(Cost::Infinite, Cost::Infinite);

        // nothing numeric sneaks in as forbidden or legal
        assert!(Cost::ticks(f64::INFINITY).is_infinite());
        assert!(Cost::ticks(f64::NAN).is_infinite());
        assert!(Cost::ticks(-1.0).is_infinite());
    }

    #[test]
    fn test_speeds() {
        assert_lt!(SPRINT_ONE_BLOCK_COST, WALK_ONE_BLOCK_COST);
        assert_lt!(WALK_ONE_BLOCK_COST, WALK_ONE_IN_WATER_COST);
    }

    #[test]
    fn test_fall_table() {
        assert_eq!(fall_n_blocks_cost(0), Cost::ZERO);

        // the first tick falls 0.0784 blocks
        assert_lt!((distance_to_ticks(0.0784) - 1.0).abs(), 1e-9);

        let mut previous = Cost::ZERO;
        for n in 1..50 {
            let cost = fall_n_blocks_cost(n);
            assert_gt!(cost, previous);
            previous = cost;
        }

        assert!(fall_n_blocks_cost(5000).is_infinite());
        assert!(fall_n_blocks_cost(-1).is_infinite());

        assert_gt!(*JUMP_ONE_BLOCK_COST, 0.0);
        assert_lt!(*JUMP_ONE_BLOCK_COST, WALK_ONE_BLOCK_COST);
    }
}
