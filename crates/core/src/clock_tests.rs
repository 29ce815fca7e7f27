// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Groundwork Contributors

use super::*;

#[test]
fn system_clock_returns_increasing_time() {
    let clock = SystemClock;
    let t1 = clock.now();
    std::thread::sleep(Duration::from_millis(1));
    let t2 = clock.now();
    assert!(t2 > t1);
}

#[test]
fn fake_clock_can_be_advanced() {
    let clock = FakeClock::new();
    let t1 = clock.now();
    clock.advance(Duration::from_secs(60));
    let t2 = clock.now();
    assert!(t2.duration_since(t1) >= Duration::from_secs(60));
}

#[test]
fn fake_clock_sleep_advances_without_blocking() {
    let clock = FakeClock::new();
    let t1 = clock.now();
    clock.sleep(Duration::from_secs(3600));
    assert!(clock.now().duration_since(t1) >= Duration::from_secs(3600));
}

#[test]
fn fake_clock_counts_sleeps() {
    let clock = FakeClock::new();
    clock.sleep(Duration::from_secs(5));
    clock.sleep(Duration::from_secs(5));
    assert_eq!(clock.sleep_count(), 2);
    assert_eq!(clock.total_slept(), Duration::from_secs(10));
}

#[test]
fn fake_clock_is_cloneable_and_shared() {
    let clock1 = FakeClock::new();
    let clock2 = clock1.clone();
    clock2.sleep(Duration::from_secs(30));
    assert_eq!(clock1.sleep_count(), 1);
}
