//! Playback decisions for the background track, kept apart from the media element.

use crate::state::PlaybackState;
use crate::unlock::InteractionKind;

/// The subset of a media element the page drives.
pub trait MediaControl {
    fn is_paused(&self) -> bool;
    /// Ask the element to start. The outcome arrives asynchronously and is only logged.
    fn request_play(&self, reason: &str);
    fn set_muted(&self, muted: bool);
}

/// Mute toggle: a paused track is asked to play first, then muted flips whatever
/// the play attempt does.
pub fn toggle_mute(media: &impl MediaControl, state: &mut PlaybackState) -> bool {
    if media.is_paused() {
        media.request_play("mute toggle");
    }
    let muted = state.toggle_muted();
    media.set_muted(muted);
    muted
}

/// Start playback for the first qualifying interaction. Returns whether play was requested.
pub fn unlock_playback(
    media: &impl MediaControl,
    state: &PlaybackState,
    kind: InteractionKind,
) -> bool {
    if !state.wants_unlock() {
        log::info!(
            "[audio] {} ignored (loaded={}, playing={})",
            kind.event_name(),
            state.loaded(),
            state.playing()
        );
        return false;
    }
    media.request_play(kind.event_name());
    true
}
