#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Desert Command engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! snapshots, and respond exclusively with new command batches.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Desert Command.";

/// Three-component vector used for world-space positions and directions.
///
/// Treated as a value type: the math helpers return new vectors instead of
/// mutating in place.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    /// Component along the east-west axis.
    pub x: f32,
    /// Component along the vertical axis.
    pub y: f32,
    /// Component along the north-south axis.
    pub z: f32,
}

impl Vec3 {
    /// Vector with every component set to zero.
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    /// Creates a new vector from its components.
    #[must_use]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Creates a point on the ground plane (y = 0).
    #[must_use]
    pub const fn ground(x: f32, z: f32) -> Self {
        Self::new(x, 0.0, z)
    }

    /// Component-wise sum of two vectors.
    #[must_use]
    pub fn add(self, other: Self) -> Self {
        Self::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }

    /// Component-wise difference of two vectors.
    #[must_use]
    pub fn subtract(self, other: Self) -> Self {
        Self::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }

    /// Vector scaled by the provided factor.
    #[must_use]
    pub fn scale(self, factor: f32) -> Self {
        Self::new(self.x * factor, self.y * factor, self.z * factor)
    }

    /// Euclidean length of the vector.
    #[must_use]
    pub fn length(self) -> f32 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    /// Distance between two points.
    #[must_use]
    pub fn distance_to(self, other: Self) -> f32 {
        other.subtract(self).length()
    }

    /// Unit-length copy of the vector.
    ///
    /// A zero-length input yields [`Vec3::ZERO`] rather than dividing by
    /// zero, so degenerate directions stay finite.
    #[must_use]
    pub fn normalized(self) -> Self {
        let length = self.length();
        if length == 0.0 {
            return Self::ZERO;
        }
        self.scale(1.0 / length)
    }

    /// Vector from `self` to `other` projected onto `self`'s horizontal
    /// plane. The y component is always zero.
    #[must_use]
    pub fn horizontal_to(self, other: Self) -> Self {
        Self::new(other.x - self.x, 0.0, other.z - self.z)
    }
}

/// Unique identifier assigned to a unit at creation.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UnitId(String);

impl UnitId {
    /// Creates a new unit identifier from the provided value.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Retrieves the textual representation of the identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Identifies the player that controls a unit.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerId(String);

impl PlayerId {
    /// Creates a new player identifier from the provided value.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Retrieves the textual representation of the identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Replaces the motion tuning applied when units seek their targets.
    ConfigureMotion {
        /// Seek speed measured in world units per second.
        speed: f32,
        /// Distance below which a unit counts as having arrived.
        arrival_threshold: f32,
    },
    /// Replaces the bounds that commanded destinations are clamped into.
    ConfigureBounds {
        /// Half the side length of the square playable region.
        half_extent: f32,
        /// Margin kept between destinations and the region edge.
        padding: f32,
    },
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Requests exclusive selection of a single unit.
    SelectUnit {
        /// Identifier of the unit to select, or `None` to deselect all.
        unit_id: Option<UnitId>,
    },
    /// Requests a move order for every currently selected unit.
    MoveSelectedUnits {
        /// Destination in world space, clamped by the world before use.
        target: Vec3,
    },
    /// Requests a move order for one unit regardless of selection.
    OrderUnit {
        /// Identifier of the unit receiving the order.
        unit_id: UnitId,
        /// Destination in world space, clamped by the world before use.
        target: Vec3,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Confirms that a unit advanced along its seek line.
    UnitMoved {
        /// Identifier of the unit that moved.
        unit_id: UnitId,
        /// Position the unit occupied before the tick.
        from: Vec3,
        /// Position the unit occupies after the tick.
        to: Vec3,
    },
    /// Confirms that a unit reached its destination and stopped.
    UnitArrived {
        /// Identifier of the unit that arrived.
        unit_id: UnitId,
        /// Position the unit holds now that its order is cleared.
        position: Vec3,
    },
    /// Announces the outcome of a selection request.
    SelectionChanged {
        /// Identifier of the unit that is now selected, if any matched.
        unit_id: Option<UnitId>,
    },
    /// Confirms that a clamped move order was assigned to a unit.
    MoveOrdered {
        /// Identifier of the unit that received the order.
        unit_id: UnitId,
        /// Destination recorded on the unit after clamping.
        target: Vec3,
    },
}
