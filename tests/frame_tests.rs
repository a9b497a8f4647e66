//! Frame Clock Tests
//!
//! Tests for:
//! - Start guard
//! - Frame throttling and delta reporting

use folio::renderer::FrameClock;

#[test]
fn start_only_once() {
    let mut clock = FrameClock::new(60.0);
    assert!(!clock.is_started());
    assert!(clock.start());
    assert!(clock.is_started());
    assert!(!clock.start());
}

#[test]
fn default_is_sixty_fps() {
    let clock = FrameClock::default();
    assert!((clock.interval() - 1000.0 / 60.0).abs() < 1e-9);
}

#[test]
fn early_frames_are_dropped() {
    let mut clock = FrameClock::new(60.0);

    assert_eq!(clock.tick(5.0), None);
    assert_eq!(clock.tick(20.0), Some(0.0), "First accepted frame has no delta");
    assert_eq!(clock.tick(30.0), None);
    assert_eq!(clock.tick(40.0), Some(20.0));
    assert_eq!(clock.frame_count(), 2);
}

#[test]
fn delta_measures_from_last_accepted_frame() {
    let mut clock = FrameClock::new(50.0);

    assert_eq!(clock.tick(100.0), Some(0.0));
    assert_eq!(clock.tick(110.0), None);
    assert_eq!(clock.tick(125.0), Some(25.0));
}

#[test]
fn zero_frame_rate_accepts_every_frame() {
    let mut clock = FrameClock::new(0.0);
    assert_eq!(clock.interval(), 0.0);
    assert_eq!(clock.tick(0.0), Some(0.0));
    assert_eq!(clock.tick(1.0), Some(1.0));
    assert_eq!(clock.tick(1.5), Some(0.5));
    assert_eq!(clock.frame_count(), 3);
}
