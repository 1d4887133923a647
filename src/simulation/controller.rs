//! The intersection controller: per-tick orchestration of generation,
//! admission, phase rotation, release and logging
//!
//! The whole pipeline runs on a single logical thread. Under a fixed seed
//! the event stream is fully deterministic because every step draws from
//! the controller-owned RNG in the same order each tick.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::simulation::config::SimConfig;
use crate::simulation::congestion::CongestionPolicy;
use crate::simulation::events::{EventSink, TrafficEvent};
use crate::simulation::history::TrafficHistory;
use crate::simulation::phase::PhaseScheduler;
use crate::simulation::queue::Lane;
use crate::simulation::stats::SimulationStats;
use crate::simulation::types::{
    Direction, LaneKind, LightState, Tick, TurnDirection, Vehicle, VehicleId, VehicleType,
};

/// Cooperative stop flag, observed only at tick boundaries so a stop never
/// leaves partial-tick effects behind
#[derive(Debug, Clone, Default)]
pub struct StopSignal(Arc<AtomicBool>);

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request_stop(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

pub struct IntersectionController {
    config: SimConfig,
    /// One lane pair per direction, indexed by `Direction::index`
    lanes: Vec<Lane>,
    scheduler: PhaseScheduler,
    policy: CongestionPolicy,
    history: TrafficHistory,
    stats: SimulationStats,
    /// Seeded RNG for reproducible runs
    rng: Option<StdRng>,
    next_vehicle_id: u32,
    now: Tick,
}

impl IntersectionController {
    pub fn new(config: SimConfig) -> Self {
        let lanes = Direction::ALL
            .iter()
            .map(|&direction| {
                Lane::new(
                    direction,
                    config.queue_capacity,
                    config.base_green,
                    config.base_red,
                    config.jam_threshold,
                )
            })
            .collect();

        let scheduler = PhaseScheduler::new(config.base_green, config.base_red);
        let policy = CongestionPolicy::new(config.green_boost, config.red_reduction);
        let rng = config.seed.map(StdRng::seed_from_u64);

        let mut controller = Self {
            config,
            lanes,
            scheduler,
            policy,
            history: TrafficHistory::new(),
            stats: SimulationStats::default(),
            rng,
            next_vehicle_id: 1,
            now: 0,
        };
        controller.apply_phase_lights();
        controller
    }

    /// Get a random value in the given range, using the seeded RNG if one
    /// was configured
    fn random_range(&mut self, range: std::ops::Range<u32>) -> u32 {
        match &mut self.rng {
            Some(rng) => rng.random_range(range),
            None => rand::rng().random_range(range),
        }
    }

    pub fn now(&self) -> Tick {
        self.now
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn history(&self) -> &TrafficHistory {
        &self.history
    }

    pub fn stats(&self) -> &SimulationStats {
        &self.stats
    }

    pub fn lanes(&self) -> &[Lane] {
        &self.lanes
    }

    pub fn lane(&self, direction: Direction) -> &Lane {
        &self.lanes[direction.index()]
    }

    pub fn scheduler(&self) -> &PhaseScheduler {
        &self.scheduler
    }

    /// Run the full tick pipeline until the configured duration elapses or
    /// a stop is requested. Stops only take effect between ticks.
    pub fn run(&mut self, sink: &mut dyn EventSink, stop: &StopSignal) {
        while self.now < self.config.duration {
            if stop.is_stopped() {
                log::info!("stop requested, halting at tick {}", self.now);
                break;
            }
            self.step(sink);
        }
    }

    /// One pass of the tick pipeline: durations, generation, rotation,
    /// release, snapshots, clock advance
    pub fn step(&mut self, sink: &mut dyn EventSink) {
        self.refresh_durations(sink);

        if self.random_range(0..100) < self.config.generation_probability {
            let vehicle = self.generate_vehicle();
            self.stats.vehicles_generated += 1;
            self.admit(vehicle, sink);
        }

        if self.scheduler.should_advance(self.now) {
            let change = self.scheduler.advance(self.now);
            self.apply_phase_lights();
            self.stats.phase_changes += 1;
            sink.record(
                self.now,
                &TrafficEvent::PhaseChanged {
                    from: change.from,
                    to: change.to,
                },
            );
        }

        self.release_green(sink);
        self.emit_snapshots(sink);

        self.stats.ticks_run += 1;
        self.now += self.config.pass_through.max(1);
    }

    /// Recompute the active phase's durations from its two approaches and
    /// mirror the result into those queues for snapshot reporting
    fn refresh_durations(&mut self, sink: &mut dyn EventSink) {
        let [a, b] = self.scheduler.current().kind.directions();
        let (ai, bi) = (a.index(), b.index());

        for i in [ai, bi] {
            let queue = &self.lanes[i].outbound;
            if queue.detect_congestion() {
                sink.record(
                    self.now,
                    &TrafficEvent::CongestionDetected {
                        direction: queue.direction(),
                        size: queue.len(),
                        capacity: queue.capacity(),
                    },
                );
            }
        }

        let durations = self
            .policy
            .adjust(&self.lanes[ai].outbound, Some(&self.lanes[bi].outbound));
        self.scheduler.set_current_durations(durations);
        self.lanes[ai].outbound.apply_durations(durations);
        self.lanes[bi].outbound.apply_durations(durations);
    }

    /// Draw a fresh vehicle: type weighted by the emergency chance, turn
    /// uniform, origin fixed by config or uniform over the approaches
    fn generate_vehicle(&mut self) -> Vehicle {
        const ORDINARY: [VehicleType; 3] =
            [VehicleType::Car, VehicleType::Bus, VehicleType::Bike];
        const TURNS: [TurnDirection; 3] = [
            TurnDirection::Left,
            TurnDirection::Right,
            TurnDirection::Straight,
        ];

        let vehicle_type = if self.random_range(0..100) < self.config.emergency_chance {
            VehicleType::Emergency
        } else {
            ORDINARY[self.random_range(0..3) as usize]
        };
        let turn = TURNS[self.random_range(0..3) as usize];
        let origin = match self.config.target_direction {
            Some(direction) => direction,
            None => Direction::ALL[self.random_range(0..4) as usize],
        };

        let id = VehicleId(self.next_vehicle_id);
        self.next_vehicle_id += 1;
        Vehicle::new(id, vehicle_type, self.now, origin, turn)
    }

    /// Admit a vehicle into its origin's outbound queue. Failures drop the
    /// vehicle and log it; they never end the run. Returns whether the
    /// vehicle made it in.
    pub fn admit(&mut self, vehicle: Vehicle, sink: &mut dyn EventSink) -> bool {
        if let Err(error) = vehicle.validate() {
            self.stats.vehicles_invalid += 1;
            sink.record(
                self.now,
                &TrafficEvent::VehicleInvalid {
                    id: vehicle.id,
                    error,
                },
            );
            return false;
        }

        let (id, vehicle_type, direction, turn) =
            (vehicle.id, vehicle.vehicle_type, vehicle.origin, vehicle.turn);
        match self.lanes[direction.index()]
            .outbound
            .enqueue(vehicle, &mut self.history)
        {
            Ok(()) => {
                self.stats.vehicles_admitted += 1;
                sink.record(
                    self.now,
                    &TrafficEvent::VehicleAdmitted {
                        id,
                        vehicle_type,
                        direction,
                        turn,
                    },
                );
                true
            }
            Err(error) => {
                self.stats.vehicles_rejected += 1;
                sink.record(
                    self.now,
                    &TrafficEvent::VehicleRejected {
                        id,
                        vehicle_type,
                        direction,
                        error,
                    },
                );
                false
            }
        }
    }

    /// Release up to the configured batch from every green approach and
    /// transfer each vehicle into a random return lane
    fn release_green(&mut self, sink: &mut dyn EventSink) {
        for i in 0..self.lanes.len() {
            if self.lanes[i].outbound.light() != LightState::Green {
                continue;
            }

            for _ in 0..self.config.release_batch.max(1) {
                let vehicle = match self.lanes[i].outbound.dequeue() {
                    Ok(vehicle) => vehicle,
                    // empty queue: nothing to release this tick
                    Err(_) => break,
                };

                if let Err(error) = vehicle.validate() {
                    self.stats.vehicles_invalid += 1;
                    sink.record(
                        self.now,
                        &TrafficEvent::VehicleInvalid {
                            id: vehicle.id,
                            error,
                        },
                    );
                    continue;
                }

                let dest = self.random_range(0..self.lanes.len() as u32) as usize;
                let to = self.lanes[dest].returning.direction();

                if self.lanes[dest].returning.is_full() {
                    self.stats.vehicles_lost += 1;
                    sink.record(
                        self.now,
                        &TrafficEvent::VehicleLost {
                            id: vehicle.id,
                            to,
                        },
                    );
                    continue;
                }

                let id = vehicle.id;
                let from = vehicle.origin;
                let waited = self.now.saturating_sub(vehicle.arrival_tick);
                match self.lanes[dest]
                    .returning
                    .enqueue(vehicle, &mut self.history)
                {
                    Ok(()) => {
                        self.stats.vehicles_released += 1;
                        self.stats.total_wait_ticks += waited;
                        sink.record(
                            self.now,
                            &TrafficEvent::VehicleReleased {
                                id,
                                from,
                                to,
                                waited,
                            },
                        );
                    }
                    Err(_) => {
                        // fullness was checked above; treat a refusal as a loss
                        self.stats.vehicles_lost += 1;
                        sink.record(self.now, &TrafficEvent::VehicleLost { id, to });
                    }
                }
            }
        }
    }

    /// Set every approach light from the active phase: the phase's pair
    /// goes green, the orthogonal pair red. Return lanes hold no light.
    fn apply_phase_lights(&mut self) {
        let green_pair = self.scheduler.current().kind.directions();
        for lane in &mut self.lanes {
            let light = if green_pair.contains(&lane.outbound.direction()) {
                LightState::Green
            } else {
                LightState::Red
            };
            lane.outbound.set_light(light);
        }
    }

    /// Emit the end-of-tick state of every queue
    fn emit_snapshots(&self, sink: &mut dyn EventSink) {
        for lane in &self.lanes {
            for (kind, queue) in [
                (LaneKind::Outbound, &lane.outbound),
                (LaneKind::Returning, &lane.returning),
            ] {
                sink.record(
                    self.now,
                    &TrafficEvent::QueueSnapshot {
                        direction: queue.direction(),
                        lane: kind,
                        light: queue.light(),
                        size: queue.len(),
                        capacity: queue.capacity(),
                        congested: queue.detect_congestion(),
                        green: queue.current_green(),
                        red: queue.current_red(),
                        vehicles: queue.roster(),
                    },
                );
            }
        }
    }
}
