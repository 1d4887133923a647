//! Cumulative counters for one simulation run

/// Everything the final report needs, updated as the tick pipeline runs
#[derive(Debug, Clone, Default)]
pub struct SimulationStats {
    pub vehicles_generated: u32,
    pub vehicles_admitted: u32,
    pub vehicles_rejected: u32,
    pub vehicles_released: u32,
    pub vehicles_lost: u32,
    pub vehicles_invalid: u32,
    pub phase_changes: u32,
    /// Sum of (release tick - arrival tick) over released vehicles
    pub total_wait_ticks: u64,
    pub ticks_run: u64,
}

impl SimulationStats {
    /// Mean wait of released vehicles, in ticks
    pub fn average_wait(&self) -> f64 {
        if self.vehicles_released == 0 {
            0.0
        } else {
            self.total_wait_ticks as f64 / self.vehicles_released as f64
        }
    }

    /// Multi-line report block for the end of a run
    pub fn summary(&self) -> String {
        format!(
            "Ticks run: {}\n\
             Vehicles generated: {}\n\
             Vehicles admitted: {}\n\
             Vehicles rejected: {}\n\
             Vehicles released: {}\n\
             Vehicles lost: {}\n\
             Vehicles dropped invalid: {}\n\
             Phase changes: {}\n\
             Average wait: {:.1} ticks",
            self.ticks_run,
            self.vehicles_generated,
            self.vehicles_admitted,
            self.vehicles_rejected,
            self.vehicles_released,
            self.vehicles_lost,
            self.vehicles_invalid,
            self.phase_changes,
            self.average_wait()
        )
    }
}
