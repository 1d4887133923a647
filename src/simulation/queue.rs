//! Per-approach vehicle queues
//!
//! Each approach owns a FIFO of vehicles plus the light state and the
//! effective light durations for its direction. Emergency vehicles insert
//! at the front and ignore the capacity bound; everyone else appends at
//! the back or is refused.

use std::collections::VecDeque;

use crate::simulation::congestion::LightDurations;
use crate::simulation::error::SimError;
use crate::simulation::history::TrafficHistory;
use crate::simulation::types::{Direction, LightState, Vehicle, VehicleId, VehicleType};

#[derive(Debug)]
pub struct ApproachQueue {
    direction: Direction,
    vehicles: VecDeque<Vehicle>,
    capacity: usize,
    light: LightState,
    base_green: u32,
    base_red: u32,
    current_green: u32,
    current_red: u32,
    jam_threshold: f64,
}

impl ApproachQueue {
    pub fn new(
        direction: Direction,
        capacity: usize,
        base_green: u32,
        base_red: u32,
        jam_threshold: f64,
    ) -> Self {
        Self {
            direction,
            vehicles: VecDeque::with_capacity(capacity),
            capacity,
            light: LightState::Red,
            base_green,
            base_red,
            current_green: base_green.max(1),
            current_red: base_red.max(1),
            jam_threshold,
        }
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn len(&self) -> usize {
        self.vehicles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vehicles.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.vehicles.len() >= self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn light(&self) -> LightState {
        self.light
    }

    pub fn set_light(&mut self, light: LightState) {
        self.light = light;
    }

    pub fn base_green(&self) -> u32 {
        self.base_green
    }

    pub fn base_red(&self) -> u32 {
        self.base_red
    }

    pub fn current_green(&self) -> u32 {
        self.current_green
    }

    pub fn current_red(&self) -> u32 {
        self.current_red
    }

    /// Overwrite the effective durations with this tick's adjusted values
    pub fn apply_durations(&mut self, durations: LightDurations) {
        self.current_green = durations.green;
        self.current_red = durations.red;
    }

    /// A queue counts as jammed at or above the configured fraction of
    /// its capacity
    pub fn detect_congestion(&self) -> bool {
        self.vehicles.len() as f64 >= self.capacity as f64 * self.jam_threshold
    }

    /// Add a vehicle.
    ///
    /// Emergency vehicles insert at the front unconditionally, so several
    /// arriving in the same tick stack in reverse arrival order (the last
    /// one inserted ends up frontmost). That is the defined behavior, not
    /// a FIFO-among-emergencies guarantee. Everyone else appends at the
    /// back or is refused when the queue is at capacity; a successful
    /// ordinary insertion also records a history entry.
    pub fn enqueue(
        &mut self,
        vehicle: Vehicle,
        history: &mut TrafficHistory,
    ) -> Result<(), SimError> {
        if vehicle.vehicle_type.is_emergency() {
            self.vehicles.push_front(vehicle);
            return Ok(());
        }
        if self.is_full() {
            return Err(SimError::QueueFull {
                direction: self.direction,
                capacity: self.capacity,
            });
        }
        history.push(&vehicle);
        self.vehicles.push_back(vehicle);
        Ok(())
    }

    /// Remove and return the front vehicle
    pub fn dequeue(&mut self) -> Result<Vehicle, SimError> {
        self.vehicles
            .pop_front()
            .ok_or(SimError::EmptyQueue(self.direction))
    }

    /// Front-to-back view of the waiting vehicles
    pub fn iter(&self) -> impl Iterator<Item = &Vehicle> {
        self.vehicles.iter()
    }

    /// (id, type) pairs front-to-back, for snapshot events
    pub fn roster(&self) -> Vec<(VehicleId, VehicleType)> {
        self.vehicles
            .iter()
            .map(|v| (v.id, v.vehicle_type))
            .collect()
    }
}

/// The two queues serving one direction: traffic heading toward the
/// intersection and traffic leaving it after crossing. Keeping them apart
/// stops a released vehicle from re-entering its own approach in the same
/// tick.
#[derive(Debug)]
pub struct Lane {
    pub outbound: ApproachQueue,
    pub returning: ApproachQueue,
}

impl Lane {
    pub fn new(
        direction: Direction,
        capacity: usize,
        base_green: u32,
        base_red: u32,
        jam_threshold: f64,
    ) -> Self {
        Self {
            outbound: ApproachQueue::new(direction, capacity, base_green, base_red, jam_threshold),
            returning: ApproachQueue::new(direction, capacity, base_green, base_red, jam_threshold),
        }
    }
}
