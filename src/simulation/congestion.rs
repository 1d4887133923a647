//! Congestion-adaptive light duration calculator

use crate::simulation::queue::ApproachQueue;

/// Effective (green, red) durations for one phase, in ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LightDurations {
    pub green: u32,
    pub red: u32,
}

/// Pure duration adjustment from queue occupancy
///
/// The adjustment is recomputed from base values every tick rather than
/// compounding, so durations snap back as soon as the jam clears.
/// Occupancy hovering at the threshold makes the output oscillate between
/// the two values; that is accepted behavior.
#[derive(Debug, Clone, Copy)]
pub struct CongestionPolicy {
    green_boost: u32,
    red_reduction: u32,
}

impl CongestionPolicy {
    pub fn new(green_boost: u32, red_reduction: u32) -> Self {
        Self {
            green_boost,
            red_reduction,
        }
    }

    /// Compute this tick's durations for a phase from the queue(s) it
    /// governs. Base values come from the first queue; a jam on either
    /// queue triggers the boost. Both outputs clamp at 1 so a large
    /// reduction can never produce a zero or negative light.
    pub fn adjust(&self, a: &ApproachQueue, b: Option<&ApproachQueue>) -> LightDurations {
        let jammed = a.detect_congestion() || b.is_some_and(|q| q.detect_congestion());
        if jammed {
            LightDurations {
                green: (a.base_green() + self.green_boost).max(1),
                red: a.base_red().saturating_sub(self.red_reduction).max(1),
            }
        } else {
            LightDurations {
                green: a.base_green().max(1),
                red: a.base_red().max(1),
            }
        }
    }
}
