//! Traffic-light phase rotation
//!
//! The intersection cycles through a fixed sequence of phases, each
//! granting green to one opposing pair of approaches. The cycle is an
//! array plus a modular read pointer; rotation never shrinks it and no
//! phase is ever skipped, congestion only stretches residency.

use std::fmt;

use crate::simulation::congestion::LightDurations;
use crate::simulation::types::{Direction, Tick};

/// Which opposing pair of approaches holds the green light
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseKind {
    NorthSouthGreen,
    EastWestGreen,
}

impl PhaseKind {
    /// The two approaches this phase lets through
    pub fn directions(self) -> [Direction; 2] {
        match self {
            PhaseKind::NorthSouthGreen => [Direction::North, Direction::South],
            PhaseKind::EastWestGreen => [Direction::East, Direction::West],
        }
    }
}

impl fmt::Display for PhaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PhaseKind::NorthSouthGreen => "North-South green",
            PhaseKind::EastWestGreen => "East-West green",
        };
        write!(f, "{}", name)
    }
}

/// One entry in the cycle, carrying the effective durations recomputed
/// each tick by the congestion policy
#[derive(Debug, Clone, Copy)]
pub struct Phase {
    pub kind: PhaseKind,
    pub green: u32,
    pub red: u32,
}

impl Phase {
    pub fn new(kind: PhaseKind, green: u32, red: u32) -> Self {
        Self { kind, green, red }
    }
}

/// What a rotation changed, for event reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseChange {
    pub from: PhaseKind,
    pub to: PhaseKind,
}

#[derive(Debug)]
pub struct PhaseScheduler {
    phases: Vec<Phase>,
    current: usize,
    phase_start: Tick,
}

impl PhaseScheduler {
    /// Standard two-phase cycle: North-South green first, then East-West
    pub fn new(base_green: u32, base_red: u32) -> Self {
        Self::with_cycle(vec![
            Phase::new(PhaseKind::NorthSouthGreen, base_green, base_red),
            Phase::new(PhaseKind::EastWestGreen, base_green, base_red),
        ])
    }

    /// Build from an explicit cycle (at least one phase)
    pub fn with_cycle(phases: Vec<Phase>) -> Self {
        assert!(!phases.is_empty(), "phase cycle cannot be empty");
        Self {
            phases,
            current: 0,
            phase_start: 0,
        }
    }

    pub fn current(&self) -> &Phase {
        &self.phases[self.current]
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn cycle_len(&self) -> usize {
        self.phases.len()
    }

    pub fn phase_start(&self) -> Tick {
        self.phase_start
    }

    /// Overwrite the active phase's effective durations for this tick
    pub fn set_current_durations(&mut self, durations: LightDurations) {
        let phase = &mut self.phases[self.current];
        phase.green = durations.green;
        phase.red = durations.red;
    }

    /// True when the active phase has held its green for its full duration
    pub fn should_advance(&self, now: Tick) -> bool {
        now.saturating_sub(self.phase_start) >= Tick::from(self.current().green)
    }

    /// Rotate to the next phase in cycle order and restart its clock
    pub fn advance(&mut self, now: Tick) -> PhaseChange {
        let from = self.current().kind;
        self.current = (self.current + 1) % self.phases.len();
        self.phase_start = now;
        PhaseChange {
            from,
            to: self.current().kind,
        }
    }
}
