//! Movement costs and the plans produced from them.
//!
//! The search that turns a [`context::CostModel`] and a [`Goal`] into a
//! [`MoveSequence`] lives outside this crate; this module defines what it
//! consumes and what it hands back.

use std::{cmp::Ordering, sync::Arc};

use interfaces::types::{BlockLocation, BlockLocation2D};
use serde::{Deserialize, Serialize};

use crate::client::pathfind::{
    costs::WALK_ONE_BLOCK_COST,
    traits::{GoalCheck, Heuristic},
};

pub mod context;
pub mod costs;
pub mod moves;
pub mod traits;

/// Pops the smallest score first out of a [`std::collections::BinaryHeap`]
pub struct MinHeapNode<T, C: Ord> {
    pub contents: T,
    pub score: C,
}

impl<T, C: Ord> MinHeapNode<T, C> {
    pub const fn new(contents: T, score: C) -> MinHeapNode<T, C> {
        Self { contents, score }
    }
}

impl<T: Clone, C: Clone + Ord> Clone for MinHeapNode<T, C> {
    fn clone(&self) -> Self {
        MinHeapNode {
            contents: self.contents.clone(),
            score: self.score.clone(),
        }
    }
}

impl<T, C: Ord> Ord for MinHeapNode<T, C> {
    fn cmp(&self, other: &Self) -> Ordering {
        other.score.cmp(&self.score)
    }
}

impl<T, C: Ord> PartialOrd for MinHeapNode<T, C> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T, C: Ord> PartialEq for MinHeapNode<T, C> {
    fn eq(&self, other: &Self) -> bool {
        self.score.eq(&other.score)
    }
}

impl<T, C: Ord> Eq for MinHeapNode<T, C> {}

/// Where a plan is trying to get to
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Goal {
    /// stand in this exact block
    Block(BlockLocation),
    /// any height above this column
    XZ(BlockLocation2D),
    /// any block at this height
    YLevel(i16),
}

impl GoalCheck<BlockLocation> for Goal {
    fn is_goal(&self, input: &BlockLocation) -> bool {
        match *self {
            Goal::Block(goal) => goal == *input,
            Goal::XZ(goal) => goal == BlockLocation2D::from(*input),
            Goal::YLevel(y) => y == input.y,
        }
    }
}

impl Heuristic<BlockLocation> for Goal {
    fn heuristic(&self, input: &BlockLocation) -> f64 {
        match *self {
            Goal::Block(goal) => goal.dist(*input) * WALK_ONE_BLOCK_COST,
            Goal::XZ(goal) => {
                (BlockLocation2D::from(*input).dist2(goal) as f64).sqrt() * WALK_ONE_BLOCK_COST
            }
            Goal::YLevel(y) => f64::from(y.abs_diff(input.y)) * WALK_ONE_BLOCK_COST,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum MoveKind {
    Traverse,
    Diagonal,
    Ascend,
    Descend,
    /// a drop of at least the model's minimum fall height
    Fall,
    Downward,
    Pillar,
    Parkour,
    Swim,
    Glide,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Movement {
    pub kind: MoveKind,
    pub src: BlockLocation,
    pub dest: BlockLocation,
}

impl Movement {
    pub const fn new(kind: MoveKind, src: BlockLocation, dest: BlockLocation) -> Self {
        Self { kind, src, dest }
    }
}

/// A finished plan
#[derive(Clone, Debug, PartialEq)]
pub struct MoveSequence {
    goal: Goal,
    movements: Vec<Movement>,
}

impl MoveSequence {
    pub fn new(goal: Goal, movements: Vec<Movement>) -> Self {
        Self { goal, movements }
    }

    pub const fn goal(&self) -> Goal {
        self.goal
    }

    pub fn movements(&self) -> &[Movement] {
        &self.movements
    }

    pub fn first_of_kind(&self, kind: MoveKind) -> Option<Movement> {
        self.movements.iter().copied().find(|movement| movement.kind == kind)
    }
}

/// A plan being walked, and how far along it the player is
#[derive(Clone, Debug)]
pub struct CurrentPath {
    pub path: Arc<MoveSequence>,
    pub position: usize,
}

impl CurrentPath {
    pub const fn new(path: Arc<MoveSequence>) -> Self {
        Self { path, position: 0 }
    }

    pub fn goal(&self) -> Goal {
        self.path.goal()
    }

    pub fn current(&self) -> Option<Movement> {
        self.path.movements().get(self.position).copied()
    }

    pub fn is_exhausted(&self) -> bool {
        self.position >= self.path.movements().len()
    }

    pub fn advance(&mut self) {
        self.position += 1;
    }
}
