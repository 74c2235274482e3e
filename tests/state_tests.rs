// Host-side tests for page state records and the loading banner.

use rolling_soon_web::state::*;
use rolling_soon_web::unlock::{InteractionKind, UnlockGate};

#[test]
fn playback_flags_only_move_forward() {
    let mut s = PlaybackState::default();
    assert!(!s.wants_unlock());
    assert!(s.mark_loaded());
    assert!(!s.mark_loaded());
    assert!(s.wants_unlock());
    assert!(s.mark_playing());
    assert!(!s.wants_unlock());
    assert!(s.toggle_muted());
    assert!(!s.toggle_muted());
}

#[test]
fn readiness_first_terminal_transition_wins() {
    let mut r = SceneReadiness::default();
    assert!(r.mark_failed("Failed to load 3D model"));
    assert!(!r.mark_model_loaded());
    assert!(!r.model_loaded());
    assert_eq!(r.error(), Some("Failed to load 3D model"));

    let mut r = SceneReadiness::default();
    assert!(r.mark_model_loaded());
    assert!(!r.mark_failed("late"));
    assert_eq!(r.error(), None);
}

#[test]
fn lifecycle_runs_once_and_dispose_is_idempotent() {
    let mut l = SceneLifecycle::default();
    assert_eq!(l.state(), Lifecycle::Uninitialized);
    assert!(!l.is_rendering());
    assert!(l.start());
    assert!(!l.start());
    assert!(l.is_rendering());
    assert!(l.dispose());
    assert!(!l.dispose());
    assert!(l.is_disposed());
    assert!(!l.start());
}

#[test]
fn banner_names_what_is_still_loading() {
    let mut r = SceneReadiness::default();
    let b = LoadingBanner::derive(&r, false);
    assert_eq!(b.text().as_deref(), Some("Loading... Model Audio"));
    assert_eq!(
        LoadingBanner::derive(&r, true).text().as_deref(),
        Some("Loading... Model")
    );
    r.mark_model_loaded();
    assert_eq!(
        LoadingBanner::derive(&r, false).text().as_deref(),
        Some("Loading... Audio")
    );
    let ready = LoadingBanner::derive(&r, true);
    assert_eq!(ready, LoadingBanner::Hidden);
    assert_eq!(ready.text(), None);
}

#[test]
fn banner_error_overrides_loading() {
    let mut r = SceneReadiness::default();
    r.mark_failed("Failed to load 3D model");
    for audio in [false, true] {
        let b = LoadingBanner::derive(&r, audio);
        assert!(b.is_error());
        assert_eq!(b.text().as_deref(), Some("Error: Failed to load 3D model"));
    }
}

#[test]
fn cancel_token_is_shared_between_clones() {
    let a = CancelToken::new();
    let b = a.clone();
    assert!(!b.is_cancelled());
    a.cancel();
    assert!(b.is_cancelled());
}

#[test]
fn interaction_names_round_trip() {
    for kind in InteractionKind::ALL {
        assert_eq!(InteractionKind::from_event_name(kind.event_name()), Some(kind));
    }
    assert_eq!(InteractionKind::from_event_name("scroll"), None);
}

#[test]
fn unlock_gate_resolves_once() {
    let mut g = UnlockGate::new();
    assert!(g.is_armed());
    assert!(g.fire(InteractionKind::KeyDown));
    assert!(!g.fire(InteractionKind::Click));
    assert!(!g.cancel());
    assert_eq!(g.outcome(), Some(InteractionKind::KeyDown));

    let mut g = UnlockGate::new();
    assert!(g.cancel());
    assert!(!g.fire(InteractionKind::Click));
    assert_eq!(g.outcome(), None);
}
