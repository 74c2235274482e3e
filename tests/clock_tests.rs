// Host-side tests for frame timing.

use instant::{Duration, Instant};
use rolling_soon_web::clock::FrameClock;

#[test]
fn tick_reports_delta_and_periodic_rate() {
    let t0 = Instant::now();
    let mut clock = FrameClock::new(t0);

    let (dt, fps) = clock.tick(t0 + Duration::from_millis(16));
    assert_eq!(dt, Duration::from_millis(16));
    assert!(fps.is_none());

    for s in 1..5 {
        let (_, fps) = clock.tick(t0 + Duration::from_secs(s));
        assert!(fps.is_none());
    }
    let (dt, fps) = clock.tick(t0 + Duration::from_secs(5));
    assert_eq!(dt, Duration::from_secs(1));
    let fps = fps.expect("rate after five seconds");
    assert!((fps - 6.0 / 5.0).abs() < 1e-4);

    let (_, fps) = clock.tick(t0 + Duration::from_secs(6));
    assert!(fps.is_none());
}
