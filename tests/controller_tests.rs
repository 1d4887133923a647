//! End-to-end controller behavior: tick pipeline, invariants, determinism

use junction_sim::simulation::{
    ApproachQueue, CongestionPolicy, Direction, IntersectionController, LightDurations,
    LightState, MemorySink, SimConfig, StopSignal, TrafficEvent, TrafficHistory, TurnDirection,
    Vehicle, VehicleId, VehicleType,
};

fn car(id: u32, origin: Direction) -> Vehicle {
    Vehicle::new(
        VehicleId(id),
        VehicleType::Car,
        0,
        origin,
        TurnDirection::Straight,
    )
}

/// Config with no random arrivals, for tests that admit vehicles by hand
fn quiet_config() -> SimConfig {
    SimConfig {
        generation_probability: 0,
        seed: Some(1),
        ..SimConfig::default()
    }
}

#[test]
fn test_adaptive_duration_scenario() {
    // capacity 4, threshold 0.75, base 2/4, boost 1, reduction 1
    let policy = CongestionPolicy::new(1, 1);
    let mut q = ApproachQueue::new(Direction::North, 4, 2, 4, 0.75);
    let mut history = TrafficHistory::new();

    for id in 1..=3 {
        q.enqueue(car(id, Direction::North), &mut history).unwrap();
    }
    assert!(q.detect_congestion());
    assert_eq!(policy.adjust(&q, None), LightDurations { green: 3, red: 3 });

    q.enqueue(car(4, Direction::North), &mut history).unwrap();
    assert!(q.is_full());

    assert!(q.enqueue(car(5, Direction::North), &mut history).is_err());
    assert_eq!(q.len(), 4);

    let emergency = Vehicle::new(
        VehicleId(6),
        VehicleType::Emergency,
        0,
        Direction::North,
        TurnDirection::Straight,
    );
    q.enqueue(emergency, &mut history).unwrap();
    assert_eq!(q.len(), 5);
    assert_eq!(q.dequeue().unwrap().id, VehicleId(6));
}

#[test]
fn test_opposing_pairs_are_never_both_green() {
    let config = SimConfig {
        seed: Some(42),
        duration: 40,
        ..SimConfig::default()
    };
    let mut controller = IntersectionController::new(config);
    let mut sink = MemorySink::new();

    let check = |controller: &IntersectionController| {
        let north = controller.lane(Direction::North).outbound.light();
        let south = controller.lane(Direction::South).outbound.light();
        let east = controller.lane(Direction::East).outbound.light();
        let west = controller.lane(Direction::West).outbound.light();
        assert_eq!(north, south);
        assert_eq!(east, west);
        assert_ne!(north, east);
    };

    check(&controller);
    for _ in 0..40 {
        controller.step(&mut sink);
        check(&controller);
    }
}

#[test]
fn test_initial_phase_gives_north_south_the_green() {
    let controller = IntersectionController::new(quiet_config());
    assert_eq!(
        controller.lane(Direction::North).outbound.light(),
        LightState::Green
    );
    assert_eq!(
        controller.lane(Direction::East).outbound.light(),
        LightState::Red
    );
}

#[test]
fn test_same_seed_reproduces_the_event_stream() {
    let config = SimConfig {
        seed: Some(123),
        ..SimConfig::default()
    };

    let mut first = MemorySink::new();
    let mut a = IntersectionController::new(config.clone());
    a.run(&mut first, &StopSignal::new());

    let mut second = MemorySink::new();
    let mut b = IntersectionController::new(config);
    b.run(&mut second, &StopSignal::new());

    assert!(!first.events.is_empty());
    assert_eq!(first.events, second.events);
    assert_eq!(a.stats().vehicles_released, b.stats().vehicles_released);
}

#[test]
fn test_stop_signal_halts_at_the_tick_boundary() {
    let mut controller = IntersectionController::new(SimConfig::default());
    let mut sink = MemorySink::new();

    let stop = StopSignal::new();
    stop.request_stop();
    controller.run(&mut sink, &stop);

    assert_eq!(controller.stats().ticks_run, 0);
    assert_eq!(controller.now(), 0);
    assert!(sink.events.is_empty());
}

#[test]
fn test_vehicle_ids_are_monotonic_from_one() {
    let config = SimConfig {
        seed: Some(7),
        generation_probability: 100,
        duration: 20,
        ..SimConfig::default()
    };
    let mut controller = IntersectionController::new(config);
    let mut sink = MemorySink::new();
    controller.run(&mut sink, &StopSignal::new());

    let ids: Vec<u32> = sink
        .events
        .iter()
        .filter_map(|(_, event)| match event {
            TrafficEvent::VehicleAdmitted { id, .. }
            | TrafficEvent::VehicleRejected { id, .. } => Some(id.0),
            _ => None,
        })
        .collect();

    assert_eq!(ids.len(), 20);
    assert_eq!(ids.first(), Some(&1));
    assert!(ids.windows(2).all(|pair| pair[1] > pair[0]));
}

#[test]
fn test_releases_read_most_recent_first_in_history() {
    let mut controller = IntersectionController::new(quiet_config());
    let mut sink = MemorySink::new();

    assert!(controller.admit(car(1, Direction::North), &mut sink));
    assert!(controller.admit(car(2, Direction::North), &mut sink));

    // North holds the green from tick 0 and releases one vehicle per tick
    controller.step(&mut sink);
    controller.step(&mut sink);

    let ids: Vec<u32> = controller.history().iter().map(|v| v.id.0).collect();
    assert_eq!(ids, vec![2, 1, 2, 1]);

    assert_eq!(controller.stats().vehicles_released, 2);
    // vehicle 1 crossed immediately, vehicle 2 waited one tick
    assert_eq!(controller.stats().total_wait_ticks, 1);
    assert!((controller.stats().average_wait() - 0.5).abs() < f64::EPSILON);
}

#[test]
fn test_emergency_admitted_to_full_queue_is_released_first() {
    let mut controller = IntersectionController::new(quiet_config());
    let mut sink = MemorySink::new();

    for id in 1..=4 {
        assert!(controller.admit(car(id, Direction::North), &mut sink));
    }
    let emergency = Vehicle::new(
        VehicleId(5),
        VehicleType::Emergency,
        0,
        Direction::North,
        TurnDirection::Left,
    );
    assert!(controller.admit(emergency, &mut sink));
    assert_eq!(controller.lane(Direction::North).outbound.len(), 5);

    controller.step(&mut sink);

    let first_release = sink.events.iter().find_map(|(_, event)| match event {
        TrafficEvent::VehicleReleased { id, .. } => Some(id.0),
        _ => None,
    });
    assert_eq!(first_release, Some(5));
}

#[test]
fn test_admission_to_full_queue_is_rejected_and_logged() {
    let mut controller = IntersectionController::new(quiet_config());
    let mut sink = MemorySink::new();

    for id in 1..=4 {
        assert!(controller.admit(car(id, Direction::East), &mut sink));
    }
    assert!(!controller.admit(car(5, Direction::East), &mut sink));

    assert_eq!(controller.lane(Direction::East).outbound.len(), 4);
    assert_eq!(controller.stats().vehicles_rejected, 1);
    assert!(sink.events.iter().any(|(_, event)| matches!(
        event,
        TrafficEvent::VehicleRejected { id: VehicleId(5), .. }
    )));
}

#[test]
fn test_invalid_vehicle_is_dropped_and_logged() {
    let mut controller = IntersectionController::new(quiet_config());
    let mut sink = MemorySink::new();

    let bogus = Vehicle::new(
        VehicleId(0),
        VehicleType::Car,
        0,
        Direction::West,
        TurnDirection::Right,
    );
    assert!(!controller.admit(bogus, &mut sink));

    assert_eq!(controller.stats().vehicles_invalid, 1);
    assert!(controller.lane(Direction::West).outbound.is_empty());
    assert!(sink.events.iter().any(|(_, event)| matches!(
        event,
        TrafficEvent::VehicleInvalid { id: VehicleId(0), .. }
    )));
}

#[test]
fn test_congestion_event_emitted_for_jammed_active_approach() {
    let mut controller = IntersectionController::new(quiet_config());
    let mut sink = MemorySink::new();

    // jam the active (green) North approach, then run one tick
    for id in 1..=3 {
        assert!(controller.admit(car(id, Direction::North), &mut sink));
    }
    controller.step(&mut sink);

    assert!(sink.events.iter().any(|(_, event)| matches!(
        event,
        TrafficEvent::CongestionDetected {
            direction: Direction::North,
            size: 3,
            capacity: 4,
        }
    )));
}

#[test]
fn test_run_executes_the_configured_number_of_ticks() {
    let config = SimConfig {
        seed: Some(3),
        duration: 15,
        ..SimConfig::default()
    };
    let mut controller = IntersectionController::new(config);
    let mut sink = MemorySink::new();
    controller.run(&mut sink, &StopSignal::new());

    assert_eq!(controller.stats().ticks_run, 15);
    assert_eq!(controller.now(), 15);
}
