//! Error taxonomy for the simulation core
//!
//! Every variant here is recoverable: the controller drops the offending
//! vehicle (or skips the step) and the run continues. Fatal failures such
//! as losing the log file are host concerns and surface as `anyhow::Error`
//! from the binary instead.

use thiserror::Error;

use crate::simulation::types::{Direction, VehicleId};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SimError {
    /// Admission refused; the vehicle is dropped, never retried.
    #[error("{direction} queue is full (capacity {capacity})")]
    QueueFull {
        direction: Direction,
        capacity: usize,
    },

    /// Dequeue attempted on an empty queue; the caller skips this tick.
    #[error("{0} queue is empty")]
    EmptyQueue(Direction),

    /// Corrupted vehicle data; the vehicle is dropped and logged.
    #[error("invalid data for vehicle {id}: {reason}")]
    InvalidVehicle {
        id: VehicleId,
        reason: &'static str,
    },
}
