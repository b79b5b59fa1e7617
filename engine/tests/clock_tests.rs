use std::time::Duration;

use engine::clock::GameClock;

#[test]
fn long_frame_yields_two_ticks_and_keeps_residual() {
    let mut clock = GameClock::new(Duration::from_millis(200));
    assert_eq!(clock.advance(Duration::from_millis(450)), 2);
    assert_eq!(clock.residual(), Duration::from_millis(50));
}

#[test]
fn tick_count_depends_only_on_total_time() {
    let mut jittery = GameClock::new(Duration::from_millis(200));
    let frames = [13u64, 187, 300, 500];
    let ticks: u32 = frames
        .iter()
        .map(|ms| jittery.advance(Duration::from_millis(*ms)))
        .sum();

    let mut single = GameClock::new(Duration::from_millis(200));
    assert_eq!(ticks, single.advance(Duration::from_secs(1)));
    assert_eq!(ticks, 5);
    assert_eq!(jittery.total_ticks(), 5);
    assert_eq!(jittery.residual(), Duration::ZERO);
}

#[test]
fn reset_discards_accumulated_time() {
    let mut clock = GameClock::new(Duration::from_millis(200));
    clock.advance(Duration::from_millis(150));
    clock.reset();
    assert_eq!(clock.advance(Duration::from_millis(100)), 0);
    assert_eq!(clock.residual(), Duration::from_millis(100));
}
