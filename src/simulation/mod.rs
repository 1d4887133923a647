//! Single-intersection traffic simulation core
//!
//! Everything here runs without the CLI: vehicles arrive on four
//! approaches, wait in per-direction queues, and cross when their light
//! turns green, with emergency priority and congestion-adaptive timing.
//! The host loop drives `IntersectionController` once per logical tick.

mod config;
mod congestion;
mod controller;
mod error;
mod events;
mod history;
mod phase;
mod queue;
mod stats;
mod types;

pub use config::SimConfig;
pub use congestion::{CongestionPolicy, LightDurations};
pub use controller::{IntersectionController, StopSignal};
pub use error::SimError;
pub use events::{
    render_history_entry, EventSink, FileSink, LogSink, MemorySink, MultiSink, TrafficEvent,
};
pub use history::TrafficHistory;
pub use phase::{Phase, PhaseChange, PhaseKind, PhaseScheduler};
pub use queue::{ApproachQueue, Lane};
pub use stats::SimulationStats;
pub use types::{
    Direction, LaneKind, LightState, Tick, TurnDirection, Vehicle, VehicleId, VehicleType,
};
