//! Core types for the intersection simulation
//!
//! These are standalone types that don't depend on the CLI or any log sink.

use std::fmt;
use std::str::FromStr;

use crate::simulation::error::SimError;

/// Logical simulation time in ticks (one tick = one simulated second)
pub type Tick = u64;

/// A unique identifier for vehicles
///
/// Simple wrapper around a u32 for type safety. Ids are assigned
/// monotonically starting at 1, so 0 never identifies a real vehicle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VehicleId(pub u32);

impl fmt::Display for VehicleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The four approaches feeding the intersection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
    ];

    /// Stable index into per-direction storage
    pub fn index(self) -> usize {
        match self {
            Direction::North => 0,
            Direction::South => 1,
            Direction::East => 2,
            Direction::West => 3,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::North => "North",
            Direction::South => "South",
            Direction::East => "East",
            Direction::West => "West",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "north" | "n" => Ok(Direction::North),
            "south" | "s" => Ok(Direction::South),
            "east" | "e" => Ok(Direction::East),
            "west" | "w" => Ok(Direction::West),
            other => Err(format!("unknown direction '{}'", other)),
        }
    }
}

/// Type of vehicle in the simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VehicleType {
    Car,
    Bus,
    Bike,
    /// Ambulance, fire truck, etc. Jumps to the front of its queue.
    Emergency,
}

impl VehicleType {
    pub fn is_emergency(self) -> bool {
        matches!(self, VehicleType::Emergency)
    }

    /// Single-letter tag used in queue snapshot lines
    pub fn glyph(self) -> char {
        match self {
            VehicleType::Car => 'C',
            VehicleType::Bus => 'B',
            VehicleType::Bike => 'K',
            VehicleType::Emergency => 'E',
        }
    }
}

impl fmt::Display for VehicleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            VehicleType::Car => "Car",
            VehicleType::Bus => "Bus",
            VehicleType::Bike => "Bike",
            VehicleType::Emergency => "Emergency",
        };
        write!(f, "{}", name)
    }
}

/// Which way a vehicle intends to turn at the intersection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnDirection {
    Left,
    Right,
    Straight,
}

impl fmt::Display for TurnDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TurnDirection::Left => "Left",
            TurnDirection::Right => "Right",
            TurnDirection::Straight => "Straight",
        };
        write!(f, "{}", name)
    }
}

/// State of the traffic light governing one queue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightState {
    Red,
    Green,
}

impl fmt::Display for LightState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LightState::Red => "Red",
            LightState::Green => "Green",
        };
        write!(f, "{}", name)
    }
}

/// Whether a queue carries traffic toward or away from the intersection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaneKind {
    Outbound,
    Returning,
}

impl fmt::Display for LaneKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LaneKind::Outbound => "outbound",
            LaneKind::Returning => "return",
        };
        write!(f, "{}", name)
    }
}

/// A vehicle waiting at or crossing the intersection
///
/// Immutable once created. Owned by exactly one queue at a time and moved
/// on dequeue/enqueue; `Clone` exists only so the traffic history can keep
/// an independent snapshot after the vehicle itself is gone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vehicle {
    pub id: VehicleId,
    pub vehicle_type: VehicleType,
    pub arrival_tick: Tick,
    pub origin: Direction,
    pub turn: TurnDirection,
}

impl Vehicle {
    pub fn new(
        id: VehicleId,
        vehicle_type: VehicleType,
        arrival_tick: Tick,
        origin: Direction,
        turn: TurnDirection,
    ) -> Self {
        Self {
            id,
            vehicle_type,
            arrival_tick,
            origin,
            turn,
        }
    }

    /// Guard against corrupted data escaping the generation step.
    ///
    /// Arrival ticks are unsigned so the negative-time case is
    /// unrepresentable; only the id range needs checking.
    pub fn validate(&self) -> Result<(), SimError> {
        if self.id.0 == 0 {
            return Err(SimError::InvalidVehicle {
                id: self.id,
                reason: "vehicle id must be positive",
            });
        }
        Ok(())
    }
}
