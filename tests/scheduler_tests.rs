//! Congestion policy and phase scheduler behavior

use junction_sim::simulation::{
    ApproachQueue, CongestionPolicy, Direction, LightDurations, PhaseKind, PhaseScheduler,
    TrafficHistory, TurnDirection, Vehicle, VehicleId, VehicleType,
};

fn fill(queue: &mut ApproachQueue, count: u32) {
    let mut history = TrafficHistory::new();
    for id in 1..=count {
        let v = Vehicle::new(
            VehicleId(id),
            VehicleType::Car,
            0,
            queue.direction(),
            TurnDirection::Straight,
        );
        queue.enqueue(v, &mut history).expect("queue has room");
    }
}

#[test]
fn test_durations_default_to_base_without_congestion() {
    let policy = CongestionPolicy::new(1, 1);
    let q = ApproachQueue::new(Direction::North, 4, 2, 4, 0.75);

    let d = policy.adjust(&q, None);
    assert_eq!(d, LightDurations { green: 2, red: 4 });
}

#[test]
fn test_jam_boosts_green_and_cuts_red() {
    let policy = CongestionPolicy::new(1, 1);
    let mut q = ApproachQueue::new(Direction::North, 4, 2, 4, 0.75);
    fill(&mut q, 3);

    let d = policy.adjust(&q, None);
    assert_eq!(d, LightDurations { green: 3, red: 3 });
}

#[test]
fn test_jam_on_either_paired_queue_triggers_the_boost() {
    let policy = CongestionPolicy::new(1, 1);
    let a = ApproachQueue::new(Direction::North, 4, 2, 4, 0.75);
    let mut b = ApproachQueue::new(Direction::South, 4, 2, 4, 0.75);
    fill(&mut b, 3);

    let d = policy.adjust(&a, Some(&b));
    assert_eq!(d, LightDurations { green: 3, red: 3 });
}

#[test]
fn test_durations_never_drop_below_one() {
    // a reduction larger than the base red must clamp, not underflow
    let policy = CongestionPolicy::new(1, 10);
    let mut q = ApproachQueue::new(Direction::North, 4, 2, 4, 0.75);
    fill(&mut q, 4);

    let d = policy.adjust(&q, None);
    assert_eq!(d.red, 1);
    assert!(d.green >= 1);
}

#[test]
fn test_adjustment_is_recomputed_not_sticky() {
    let policy = CongestionPolicy::new(1, 1);
    let mut q = ApproachQueue::new(Direction::North, 4, 2, 4, 0.75);
    fill(&mut q, 3);
    assert_eq!(policy.adjust(&q, None), LightDurations { green: 3, red: 3 });

    // drain below the threshold and the very next adjustment is back to base
    q.dequeue().unwrap();
    assert_eq!(policy.adjust(&q, None), LightDurations { green: 2, red: 4 });
}

#[test]
fn test_phase_holds_until_green_elapses() {
    let scheduler = PhaseScheduler::new(2, 4);
    assert!(!scheduler.should_advance(0));
    assert!(!scheduler.should_advance(1));
    assert!(scheduler.should_advance(2));
}

#[test]
fn test_advance_rotates_and_restarts_the_phase_clock() {
    let mut scheduler = PhaseScheduler::new(2, 4);
    assert_eq!(scheduler.current().kind, PhaseKind::NorthSouthGreen);

    let change = scheduler.advance(2);
    assert_eq!(change.from, PhaseKind::NorthSouthGreen);
    assert_eq!(change.to, PhaseKind::EastWestGreen);
    assert_eq!(scheduler.phase_start(), 2);
    assert!(!scheduler.should_advance(3));
}

#[test]
fn test_cycle_position_is_modular_in_the_transition_count() {
    let mut scheduler = PhaseScheduler::new(1, 1);
    let transitions = 5;
    for i in 0..transitions {
        scheduler.advance(i as u64);
    }
    assert_eq!(
        scheduler.current_index(),
        transitions % scheduler.cycle_len()
    );
    assert_eq!(scheduler.current().kind, PhaseKind::EastWestGreen);
}

#[test]
fn test_rotation_never_shrinks_the_cycle() {
    let mut scheduler = PhaseScheduler::new(1, 1);
    for i in 0..10 {
        scheduler.advance(i);
    }
    assert_eq!(scheduler.cycle_len(), 2);
}
