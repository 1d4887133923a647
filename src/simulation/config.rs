//! Simulation configuration
//!
//! Defaults mirror the classic console setup: a four-slot queue per
//! approach, a 2s/4s light cycle and an 80% chance of a new vehicle each
//! second, one in five of them an emergency vehicle.

use crate::simulation::types::{Direction, Tick};

/// Tunable parameters for one simulation run
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// Maximum vehicles per queue for non-priority admission
    pub queue_capacity: usize,
    /// Percent chance a generated vehicle is an emergency vehicle
    pub emergency_chance: u32,
    /// Percent chance of generating a vehicle on any given tick
    pub generation_probability: u32,
    /// Base green light duration in ticks
    pub base_green: u32,
    /// Base red light duration in ticks
    pub base_red: u32,
    /// Extra green ticks granted while an approach is jammed
    pub green_boost: u32,
    /// Red ticks removed while an approach is jammed
    pub red_reduction: u32,
    /// Occupancy fraction of capacity at which a queue counts as jammed
    pub jam_threshold: f64,
    /// Total simulated duration in ticks
    pub duration: Tick,
    /// Ticks the clock advances per pipeline pass (one vehicle crossing)
    pub pass_through: Tick,
    /// Maximum vehicles released per green queue per tick
    pub release_batch: usize,
    /// Send every generated vehicle to this approach instead of a random one
    pub target_direction: Option<Direction>,
    /// RNG seed for reproducible runs; `None` draws from entropy
    pub seed: Option<u64>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            queue_capacity: 4,
            emergency_chance: 20,
            generation_probability: 80,
            base_green: 2,
            base_red: 4,
            green_boost: 1,
            red_reduction: 1,
            jam_threshold: 0.75,
            duration: 20,
            pass_through: 1,
            release_batch: 1,
            target_direction: None,
            seed: None,
        }
    }
}
