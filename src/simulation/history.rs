//! Append-only record of vehicles that moved through the system
//!
//! Stored as a stack so inspection reads most-recent-first, matching the
//! way the interactive menu prints it.

use crate::simulation::types::Vehicle;

#[derive(Debug, Default)]
pub struct TrafficHistory {
    entries: Vec<Vehicle>,
}

impl TrafficHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an independent snapshot; the live vehicle stays wherever it is
    pub fn push(&mut self, vehicle: &Vehicle) {
        self.entries.push(vehicle.clone());
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries most-recent-first
    pub fn iter(&self) -> impl Iterator<Item = &Vehicle> {
        self.entries.iter().rev()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
