use super::*;

#[test]
fn manual_clock_clones_share_time() {
    let a = ManualClock::new(Duration::from_millis(5));
    let b = a.clone();
    a.advance(Duration::from_millis(10));
    assert_eq!(b.now(), Duration::from_millis(15));
    b.set(Duration::from_secs(2));
    assert_eq!(a.now_ms(), 2000.0);
}

#[test]
fn now_ms_is_exact_for_whole_milliseconds() {
    let c = ManualClock::new(Duration::from_millis(300));
    assert_eq!(c.now_ms(), 300.0);
    c.advance(Duration::from_micros(500));
    assert_eq!(c.now_ms(), 300.5);
}

#[test]
fn system_clock_is_monotonic() {
    let c = SystemClock::new();
    let a = c.now();
    let b = c.now();
    assert!(b >= a);
}
