//! Integration tests for the restaurant facade.
//!
//! Each test drives a [`Restaurant`] only through its public API: phase
//! signals, ticks, deliveries, and operator commands. Arrivals are spawned
//! directly so the floor layout decides every outcome.

#![allow(clippy::unwrap_used, clippy::float_cmp, clippy::panic)]

use bistro_core::config::BistroConfig;
use bistro_core::kitchen::{Kitchen, StubKitchen};
use bistro_core::operator::OperatorCommand;
use bistro_core::{Restaurant, TickSummary};
use bistro_floor::SeatDefinition;
use bistro_types::{
    CustomerProfile, CustomerRarity, CustomerStateName, FaultKind, LifecycleEvent, Point,
    ServicePhase,
};

const DT: f64 = 0.25;

fn fast_profile(patience_secs: f64) -> CustomerProfile {
    CustomerProfile {
        id: "tester".to_owned(),
        display_name: "Tester".to_owned(),
        rarity: CustomerRarity::Normal,
        speed: 100.0,
        patience_secs,
        eat_secs: 1.0,
    }
}

/// A floor with `seats` seats and a line of `queue_max`, automatic
/// arrivals effectively disabled.
fn floor_config(seats: usize, queue_max: usize) -> BistroConfig {
    let mut config = BistroConfig::default();
    config.floor.seats = [2.0, 4.0, 6.0, 8.0]
        .into_iter()
        .take(seats)
        .map(|x| SeatDefinition {
            stop_point: Point::new(x, 2.0),
            seat_point: Point::new(x, 3.0),
        })
        .collect();
    config.floor.queue.max_len = queue_max;
    config.profiles = vec![fast_profile(20.0)];
    config.admission.initial_delay_secs = 1000.0;
    config
}

fn open(config: &BistroConfig) -> Restaurant {
    let mut restaurant = Restaurant::new(config).unwrap();
    assert!(restaurant.set_phase(ServicePhase::Opening));
    assert!(restaurant.set_phase(ServicePhase::Operating));
    restaurant
}

/// Tick until `done` holds, collecting every summary. Panics after
/// `max_ticks`.
fn tick_until(
    restaurant: &mut Restaurant,
    max_ticks: usize,
    mut done: impl FnMut(&Restaurant, &TickSummary) -> bool,
) -> Vec<TickSummary> {
    let mut summaries = Vec::new();
    for _ in 0..max_ticks {
        let summary = restaurant.run_tick(DT).unwrap();
        restaurant.audit().unwrap();
        let finished = done(restaurant, &summary);
        summaries.push(summary);
        if finished {
            return summaries;
        }
    }
    panic!("condition not reached within {max_ticks} ticks");
}

fn all_events(summaries: &[TickSummary]) -> Vec<LifecycleEvent> {
    summaries.iter().flat_map(|s| s.events.iter().cloned()).collect()
}

#[test]
fn six_arrivals_fill_seats_then_line_then_reject() {
    let config = floor_config(3, 2);
    let mut restaurant = open(&config);
    for _ in 0..6 {
        assert!(restaurant.spawn_now(false).is_some());
    }

    restaurant.run_tick(DT).unwrap();
    restaurant.audit().unwrap();

    let floor = restaurant.floor();
    assert_eq!(floor.free_seat_count(), 0);
    assert_eq!(floor.queue_len(), 2);
    assert_eq!(restaurant.fault_counts().get(&FaultKind::ResourceExhausted), Some(&1));

    let angry = restaurant
        .customers()
        .filter(|c| c.state() == CustomerStateName::AngryLeaving)
        .count();
    assert_eq!(angry, 1);
}

#[test]
fn served_customer_pays_and_is_counted() {
    let config = floor_config(1, 2);
    let mut restaurant = open(&config);
    let id = restaurant.spawn_now(false).unwrap();

    tick_until(&mut restaurant, 20, |r, _| {
        r.customer(id).is_some_and(|c| c.state() == CustomerStateName::Ordering)
    });
    assert_eq!(restaurant.counters().visited, 1);

    let pending = restaurant.pending_orders();
    let order = pending.first().unwrap().order.clone();
    assert_eq!(pending.first().unwrap().customer, id);
    assert_eq!(
        restaurant.serve(id, order.id),
        bistro_customers::ServeOutcome::Accepted
    );
    assert!(restaurant.pending_orders().is_empty());

    let summaries = tick_until(&mut restaurant, 100, |_, s| s.departed.contains(&id));
    let events = all_events(&summaries);
    assert!(events.iter().any(|e| matches!(
        e,
        LifecycleEvent::PaymentCompleted { customer, amount } if *customer == id && *amount == order.cost
    )));

    let counters = restaurant.counters();
    assert_eq!(counters.served, 1);
    assert_eq!(counters.earnings, u64::from(order.cost));
    assert_eq!(restaurant.total_earnings(), u64::from(order.cost));
    assert_eq!(restaurant.active_count(), 0);
    assert_eq!(restaurant.floor().free_seat_count(), 1);
}

#[test]
fn departure_promotes_the_head_of_the_line() {
    let config = floor_config(1, 2);
    let mut restaurant = open(&config);
    let first = restaurant.spawn_now(false).unwrap();
    let second = restaurant.spawn_now(false).unwrap();

    tick_until(&mut restaurant, 20, |r, _| {
        r.customer(first).is_some_and(|c| c.state() == CustomerStateName::Ordering)
    });
    assert_eq!(restaurant.floor().queue_position(second), Some(0));

    let order = restaurant.pending_orders().first().unwrap().order.id;
    restaurant.serve(first, order);

    tick_until(&mut restaurant, 100, |r, _| {
        r.customer(second).is_some_and(|c| c.state() == CustomerStateName::Ordering)
    });
    assert_eq!(restaurant.floor().queue_len(), 0);
    assert_eq!(
        restaurant.customer(second).and_then(|c| c.seat()),
        restaurant.floor().seat_of(second)
    );
    assert!(restaurant.floor().seat_of(second).is_some());
}

#[test]
fn closing_evicts_the_line_and_drains_once() {
    let config = floor_config(1, 2);
    let mut restaurant = open(&config);
    for _ in 0..3 {
        restaurant.spawn_now(false);
    }
    restaurant.run_tick(DT).unwrap();
    assert_eq!(restaurant.floor().queue_len(), 2);

    assert!(restaurant.set_phase(ServicePhase::Closing));
    assert_eq!(restaurant.floor().queue_len(), 0);
    assert!(!restaurant.is_admitting());
    assert!(restaurant.is_draining());

    // The drain must finish before a new day can open.
    assert!(!restaurant.set_phase(ServicePhase::Opening));

    let summaries = tick_until(&mut restaurant, 1000, |r, _| !r.is_draining());
    let drained = all_events(&summaries)
        .into_iter()
        .filter(|e| matches!(e, LifecycleEvent::AllCustomersDeparted { .. }))
        .count();
    assert_eq!(drained, 1);
    assert_eq!(restaurant.active_count(), 0);

    // Further ticks never repeat the signal.
    let later = restaurant.run_tick(DT).unwrap();
    assert!(later.events.is_empty());
    assert!(restaurant.set_phase(ServicePhase::Opening));
}

#[test]
fn round_timer_expires_once_and_clamps() {
    let mut config = floor_config(1, 2);
    config.round.time_limit_secs = 5.0;
    let mut restaurant = open(&config);

    let summaries = tick_until(&mut restaurant, 40, |r, _| r.elapsed_secs() >= r.limit_secs());
    let expired = all_events(&summaries)
        .into_iter()
        .filter(|e| matches!(e, LifecycleEvent::RoundTimerExpired { .. }))
        .count();
    assert_eq!(expired, 1);
    assert_eq!(restaurant.elapsed_secs(), 5.0);

    for _ in 0..10 {
        let summary = restaurant.run_tick(DT).unwrap();
        assert!(summary.events.is_empty());
    }
    assert_eq!(restaurant.elapsed_secs(), 5.0);
}

#[test]
fn reduced_mode_pauses_timer_and_arrivals() {
    let mut config = floor_config(3, 2);
    config.admission.initial_delay_secs = 0.0;
    let mut restaurant = open(&config);
    restaurant.apply(OperatorCommand::SetReducedMode(true));

    for _ in 0..20 {
        restaurant.run_tick(DT).unwrap();
    }
    assert_eq!(restaurant.elapsed_secs(), 0.0);
    assert_eq!(restaurant.active_count(), 0);

    restaurant.apply(OperatorCommand::SetReducedMode(false));
    restaurant.run_tick(DT).unwrap();
    assert_eq!(restaurant.elapsed_secs(), DT);
}

#[test]
fn restart_round_counts_the_present_customer() {
    let config = floor_config(1, 2);
    let mut restaurant = open(&config);
    restaurant.spawn_now(true);
    for _ in 0..8 {
        restaurant.run_tick(DT).unwrap();
    }

    restaurant.apply(OperatorCommand::RestartRound);
    assert_eq!(restaurant.counters().visited, 1);
    assert_eq!(restaurant.counters().served, 0);
    assert_eq!(restaurant.elapsed_secs(), 0.0);
    assert!(restaurant.is_admitting());
}

#[test]
fn force_close_sends_everyone_home() {
    let config = floor_config(2, 2);
    let mut restaurant = open(&config);
    for _ in 0..3 {
        restaurant.spawn_now(false);
    }
    for _ in 0..4 {
        restaurant.run_tick(DT).unwrap();
    }

    restaurant.apply(OperatorCommand::ForceClose);
    let summaries = tick_until(&mut restaurant, 50, |r, _| r.active_count() == 0);
    let events = all_events(&summaries);
    assert!(events.iter().any(|e| matches!(e, LifecycleEvent::RoundTimerExpired { .. })));
    assert_eq!(restaurant.counters().served, 0);
}

#[test]
fn despawn_all_clears_floor_without_events() {
    let config = floor_config(1, 2);
    let mut restaurant = open(&config);
    for _ in 0..3 {
        restaurant.spawn_now(false);
    }
    restaurant.run_tick(DT).unwrap();

    restaurant.apply(OperatorCommand::DespawnAll);
    assert_eq!(restaurant.active_count(), 0);
    assert_eq!(restaurant.floor().free_seat_count(), 1);
    assert_eq!(restaurant.floor().queue_len(), 0);
    restaurant.audit().unwrap();
}

#[test]
fn restore_earnings_rolls_back_the_round() {
    let config = floor_config(1, 2);
    let mut restaurant = Restaurant::new(&config).unwrap();
    restaurant.set_total_earnings(100);
    restaurant.set_phase(ServicePhase::Opening);
    restaurant.set_phase(ServicePhase::Operating);
    let id = restaurant.spawn_now(false).unwrap();
    tick_until(&mut restaurant, 20, |r, _| {
        r.customer(id).is_some_and(|c| c.state() == CustomerStateName::Ordering)
    });
    let order = restaurant.pending_orders().first().unwrap().order.id;
    restaurant.serve(id, order);
    tick_until(&mut restaurant, 100, |_, s| s.departed.contains(&id));
    assert!(restaurant.total_earnings() > 100);

    restaurant.apply(OperatorCommand::RestoreEarnings);
    assert_eq!(restaurant.total_earnings(), 100);
}

#[test]
fn invalid_steps_are_rejected() {
    let config = floor_config(1, 2);
    let mut restaurant = open(&config);
    assert!(restaurant.run_tick(-1.0).is_err());
    assert!(restaurant.run_tick(f64::NAN).is_err());
    assert!(restaurant.run_tick(f64::INFINITY).is_err());
    assert_eq!(restaurant.tick(), 0);
    assert_eq!(restaurant.run_tick(0.0).unwrap().tick, 1);
}

#[test]
fn floor_without_seats_is_rejected() {
    let config = floor_config(0, 2);
    assert!(Restaurant::new(&config).is_err());
}

#[test]
fn missing_profiles_are_counted_not_fatal() {
    let mut config = floor_config(1, 2);
    config.profiles.clear();
    let mut restaurant = open(&config);
    assert!(restaurant.spawn_now(false).is_none());
    assert_eq!(restaurant.fault_counts().get(&FaultKind::ConfigurationMissing), Some(&1));
}

#[test]
fn busy_day_keeps_every_invariant() {
    let mut config = BistroConfig::default();
    config.round.time_limit_secs = 60.0;
    config.admission.initial_delay_secs = 0.5;
    config.admission.min_interval_secs = 0.5;
    config.admission.max_interval_secs = 1.5;
    let mut restaurant = open(&config);
    let mut kitchen = StubKitchen::new(config.kitchen.cook_secs);
    let mut drained = 0_usize;

    for _ in 0..10_000 {
        let summary = restaurant.run_tick(DT).unwrap();
        restaurant.audit().unwrap();
        assert!(summary.active_customers <= config.admission.max_customers);
        assert!(summary.queue_len <= restaurant.max_queue_len());

        for delivery in kitchen.prepare(DT, &restaurant.pending_orders()) {
            restaurant.serve(delivery.customer, delivery.order);
        }

        if summary
            .events
            .iter()
            .any(|e| matches!(e, LifecycleEvent::RoundTimerExpired { .. }))
        {
            assert!(restaurant.set_phase(ServicePhase::Closing));
        }
        drained = drained.saturating_add(
            summary
                .events
                .iter()
                .filter(|e| matches!(e, LifecycleEvent::AllCustomersDeparted { .. }))
                .count(),
        );
        if drained > 0 {
            break;
        }
    }

    assert_eq!(drained, 1);
    assert_eq!(restaurant.active_count(), 0);
    let counters = restaurant.counters();
    assert!(counters.visited > 0);
    assert!(counters.served <= counters.visited);
}

#[test]
fn same_seed_same_day() {
    let config = BistroConfig::default();
    let trace = |config: &BistroConfig| {
        let mut restaurant = open(config);
        (0..400)
            .map(|_| {
                let summary = restaurant.run_tick(DT).unwrap();
                (summary.active_customers, summary.queue_len, restaurant.counters())
            })
            .collect::<Vec<_>>()
    };
    assert_eq!(trace(&config), trace(&config));
}
