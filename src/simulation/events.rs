//! Structured tick events and the sinks that record them
//!
//! The core emits discrete events (kind + fields) and leaves all text
//! formatting to the sink implementations, so the same run can feed the
//! console logger, the append-only log file and test inspection at once.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use log::{info, warn};

use crate::simulation::error::SimError;
use crate::simulation::phase::PhaseKind;
use crate::simulation::types::{
    Direction, LaneKind, LightState, Tick, TurnDirection, Vehicle, VehicleId, VehicleType,
};

/// One observable thing that happened during a tick
#[derive(Debug, Clone, PartialEq)]
pub enum TrafficEvent {
    /// A generated vehicle entered an outbound queue
    VehicleAdmitted {
        id: VehicleId,
        vehicle_type: VehicleType,
        direction: Direction,
        turn: TurnDirection,
    },
    /// Admission refused; the vehicle was dropped
    VehicleRejected {
        id: VehicleId,
        vehicle_type: VehicleType,
        direction: Direction,
        error: SimError,
    },
    /// A vehicle crossed the intersection into a return lane
    VehicleReleased {
        id: VehicleId,
        from: Direction,
        to: Direction,
        waited: Tick,
    },
    /// The chosen return lane was full; the vehicle was dropped
    VehicleLost { id: VehicleId, to: Direction },
    /// Corrupted vehicle data was detected and the vehicle dropped
    VehicleInvalid { id: VehicleId, error: SimError },
    /// The scheduler rotated to the next phase
    PhaseChanged { from: PhaseKind, to: PhaseKind },
    /// An approach crossed its jam threshold this tick
    CongestionDetected {
        direction: Direction,
        size: usize,
        capacity: usize,
    },
    /// Full state of one queue at the end of a tick
    QueueSnapshot {
        direction: Direction,
        lane: LaneKind,
        light: LightState,
        size: usize,
        capacity: usize,
        congested: bool,
        green: u32,
        red: u32,
        vehicles: Vec<(VehicleId, VehicleType)>,
    },
}

/// Receives every event the controller emits, in per-tick order
pub trait EventSink {
    fn record(&mut self, now: Tick, event: &TrafficEvent);
}

/// Routes events through the `log` crate (snapshots at debug level so the
/// default filter stays readable)
#[derive(Debug, Default)]
pub struct LogSink;

impl EventSink for LogSink {
    fn record(&mut self, now: Tick, event: &TrafficEvent) {
        match event {
            TrafficEvent::VehicleAdmitted {
                id,
                vehicle_type,
                direction,
                turn,
            } => info!(
                "t={} vehicle {} ({}, turning {}) joined the {} queue",
                now, id, vehicle_type, turn, direction
            ),
            TrafficEvent::VehicleRejected {
                id,
                vehicle_type,
                direction,
                error,
            } => warn!(
                "t={} vehicle {} ({}) rejected from {}: {}",
                now, id, vehicle_type, direction, error
            ),
            TrafficEvent::VehicleReleased {
                id,
                from,
                to,
                waited,
            } => info!(
                "t={} vehicle {} crossed from {} to the {} return lane after waiting {} ticks",
                now, id, from, to, waited
            ),
            TrafficEvent::VehicleLost { id, to } => {
                warn!("t={} vehicle {} lost ({} return lane full)", now, id, to)
            }
            TrafficEvent::VehicleInvalid { id, error } => {
                warn!("t={} vehicle {} dropped: {}", now, id, error)
            }
            TrafficEvent::PhaseChanged { from, to } => {
                info!("t={} phase change: {} -> {}", now, from, to)
            }
            TrafficEvent::CongestionDetected {
                direction,
                size,
                capacity,
            } => info!(
                "t={} congestion on {} ({}/{} vehicles)",
                now, direction, size, capacity
            ),
            TrafficEvent::QueueSnapshot { .. } => {
                log::debug!("t={} {}", now, render_snapshot(event))
            }
        }
    }
}

/// Append-only text log, one logical-tick-stamped line per event
///
/// The original console tool kept a `traffic_simulation.log` beside the
/// process; this is the same idea with the simulated clock instead of
/// wall-clock timestamps.
pub struct FileSink {
    file: File,
    write_failed: bool,
}

impl FileSink {
    pub fn create(path: &Path) -> Result<Self> {
        let file = File::create(path)
            .with_context(|| format!("creating simulation log file {}", path.display()))?;
        Ok(Self {
            file,
            write_failed: false,
        })
    }

    fn write_line(&mut self, now: Tick, line: &str) {
        if self.write_failed {
            return;
        }
        if let Err(e) = writeln!(self.file, "[t={}] {}", now, line) {
            log::error!("simulation log write failed, further entries dropped: {}", e);
            self.write_failed = true;
        }
    }
}

impl EventSink for FileSink {
    fn record(&mut self, now: Tick, event: &TrafficEvent) {
        let line = match event {
            TrafficEvent::VehicleAdmitted {
                id,
                vehicle_type,
                direction,
                turn,
            } => format!(
                "vehicle {} ({}, turning {}) admitted to {}",
                id, vehicle_type, turn, direction
            ),
            TrafficEvent::VehicleRejected { id, direction, error, .. } => {
                format!("vehicle {} rejected from {}: {}", id, direction, error)
            }
            TrafficEvent::VehicleReleased {
                id,
                from,
                to,
                waited,
            } => format!(
                "vehicle {} released from {} to {} return lane (waited {})",
                id, from, to, waited
            ),
            TrafficEvent::VehicleLost { id, to } => {
                format!("vehicle {} lost ({} return lane full)", id, to)
            }
            TrafficEvent::VehicleInvalid { id, error } => {
                format!("vehicle {} dropped: {}", id, error)
            }
            TrafficEvent::PhaseChanged { from, to } => {
                format!("phase change: {} -> {}", from, to)
            }
            TrafficEvent::CongestionDetected {
                direction,
                size,
                capacity,
            } => format!("congestion detected on {} ({}/{})", direction, size, capacity),
            TrafficEvent::QueueSnapshot { .. } => render_snapshot(event),
        };
        self.write_line(now, &line);
    }
}

/// Collects events in memory; used by tests and the interactive host
#[derive(Debug, Default)]
pub struct MemorySink {
    pub events: Vec<(Tick, TrafficEvent)>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl EventSink for MemorySink {
    fn record(&mut self, now: Tick, event: &TrafficEvent) {
        self.events.push((now, event.clone()));
    }
}

/// Fans each event out to every wrapped sink in order
pub struct MultiSink {
    sinks: Vec<Box<dyn EventSink>>,
}

impl MultiSink {
    pub fn new(sinks: Vec<Box<dyn EventSink>>) -> Self {
        Self { sinks }
    }
}

impl EventSink for MultiSink {
    fn record(&mut self, now: Tick, event: &TrafficEvent) {
        for sink in &mut self.sinks {
            sink.record(now, event);
        }
    }
}

/// Render a queue snapshot as a single summary line, ending with the
/// ordered vehicle list front-to-back
fn render_snapshot(event: &TrafficEvent) -> String {
    let TrafficEvent::QueueSnapshot {
        direction,
        lane,
        light,
        size,
        capacity,
        congested,
        green,
        red,
        vehicles,
    } = event
    else {
        return String::new();
    };

    let mut line = format!(
        "{} {} | light {} | {}/{} | jam {} | green {} red {} |",
        direction,
        lane,
        light,
        size,
        capacity,
        if *congested { "yes" } else { "no" },
        green,
        red
    );
    for (id, vehicle_type) in vehicles {
        line.push_str(&format!(" [{}{}] ->", vehicle_type.glyph(), id));
    }
    line.push_str(" end");
    line
}

/// Render one history entry the way the interactive menu prints it
pub fn render_history_entry(position: usize, vehicle: &Vehicle) -> String {
    format!(
        "{}. vehicle {} | {} | from {} | turning {} | arrived t={}",
        position,
        vehicle.id,
        vehicle.vehicle_type,
        vehicle.origin,
        vehicle.turn,
        vehicle.arrival_tick
    )
}
