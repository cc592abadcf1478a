//! Lane identifiers, per-lane sensor state, and the fixed four-lane table.
//!
//! The junction always has exactly four approaches. Rather than keying lane
//! data by string, every per-lane collection is a [`LaneTable`] with one
//! field per approach, and every iteration over a table visits the lanes in
//! the order given by [`LaneId::ALL`]: North, South, East, West. Arbitration
//! relies on that order for its determinism.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Lane identifiers
// ---------------------------------------------------------------------------

/// One approach of the four-way junction.
///
/// The derived ordering matches [`LaneId::ALL`], so a `BTreeMap<LaneId, _>`
/// iterates in the same order as a [`LaneTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum LaneId {
    /// Northern approach.
    North,
    /// Southern approach.
    South,
    /// Eastern approach.
    East,
    /// Western approach.
    West,
}

impl LaneId {
    /// Every lane, in the fixed evaluation order.
    pub const ALL: [Self; 4] = [Self::North, Self::South, Self::East, Self::West];

    /// Human-readable lane name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::North => "North",
            Self::South => "South",
            Self::East => "East",
            Self::West => "West",
        }
    }
}

impl core::fmt::Display for LaneId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Lane state and result
// ---------------------------------------------------------------------------

/// Raw sensor reading for one lane at one evaluation cycle.
///
/// `density` is a queue-size proxy in 0--100 and `wait` is the number of
/// seconds the lane has been held at red, in 0--120. Range checks happen at
/// the controller boundary, not here, so a deserialized value may still be
/// rejected there.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct LaneState {
    /// Queue density (0--100).
    pub density: f64,
    /// Seconds spent waiting at red (0--120).
    pub wait: f64,
    /// Whether an emergency vehicle is queued in this lane.
    #[serde(default)]
    pub emergency: bool,
}

impl LaneState {
    /// Create a lane state from its three raw inputs.
    pub const fn new(density: f64, wait: f64, emergency: bool) -> Self {
        Self {
            density,
            wait,
            emergency,
        }
    }

    /// A lane with nothing queued and no wait.
    pub const fn idle() -> Self {
        Self::new(0.0, 0.0, false)
    }
}

/// Controller output for one lane, produced once per evaluation cycle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct LaneResult {
    /// Crisp priority score (0--100).
    pub priority: f64,
    /// Crisp green-light duration in seconds (10--90).
    pub green_duration: f64,
    /// The input that produced this result.
    pub state: LaneState,
}

// ---------------------------------------------------------------------------
// Fixed four-lane table
// ---------------------------------------------------------------------------

/// One value per approach, stored in named fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct LaneTable<T> {
    /// Value for [`LaneId::North`].
    pub north: T,
    /// Value for [`LaneId::South`].
    pub south: T,
    /// Value for [`LaneId::East`].
    pub east: T,
    /// Value for [`LaneId::West`].
    pub west: T,
}

impl<T> LaneTable<T> {
    /// Build a table from its four values.
    pub const fn new(north: T, south: T, east: T, west: T) -> Self {
        Self {
            north,
            south,
            east,
            west,
        }
    }

    /// Build a table by calling `f` once per lane, in [`LaneId::ALL`] order.
    pub fn from_fn(mut f: impl FnMut(LaneId) -> T) -> Self {
        let north = f(LaneId::North);
        let south = f(LaneId::South);
        let east = f(LaneId::East);
        let west = f(LaneId::West);
        Self::new(north, south, east, west)
    }

    /// Borrow the value for `lane`.
    pub const fn get(&self, lane: LaneId) -> &T {
        match lane {
            LaneId::North => &self.north,
            LaneId::South => &self.south,
            LaneId::East => &self.east,
            LaneId::West => &self.west,
        }
    }

    /// Mutably borrow the value for `lane`.
    pub const fn get_mut(&mut self, lane: LaneId) -> &mut T {
        match lane {
            LaneId::North => &mut self.north,
            LaneId::South => &mut self.south,
            LaneId::East => &mut self.east,
            LaneId::West => &mut self.west,
        }
    }

    /// Iterate `(lane, value)` pairs in the fixed evaluation order.
    pub fn iter(&self) -> impl Iterator<Item = (LaneId, &T)> {
        LaneId::ALL.into_iter().map(move |lane| (lane, self.get(lane)))
    }

    /// Transform every value, visiting lanes in the fixed evaluation order.
    pub fn map<U>(&self, mut f: impl FnMut(LaneId, &T) -> U) -> LaneTable<U> {
        LaneTable::from_fn(|lane| f(lane, self.get(lane)))
    }

    /// Fallible [`map`](Self::map). Stops at the first lane whose closure
    /// fails; later lanes are not visited.
    pub fn try_map<U, E>(
        &self,
        mut f: impl FnMut(LaneId, &T) -> Result<U, E>,
    ) -> Result<LaneTable<U>, E> {
        let north = f(LaneId::North, &self.north)?;
        let south = f(LaneId::South, &self.south)?;
        let east = f(LaneId::East, &self.east)?;
        let west = f(LaneId::West, &self.west)?;
        Ok(LaneTable::new(north, south, east, west))
    }

    /// Copy the table into an ordered map keyed by lane.
    pub fn to_map(&self) -> BTreeMap<LaneId, T>
    where
        T: Clone,
    {
        self.iter().map(|(lane, value)| (lane, value.clone())).collect()
    }
}
