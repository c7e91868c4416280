//! Pause / resume of track scrolling with page visibility.

use crate::render::TrackSurface;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AnimationState {
    #[default]
    Running,
    Paused,
}

impl AnimationState {
    /// Value for the CSS `animation-play-state` property.
    pub fn css_value(self) -> &'static str {
        match self {
            AnimationState::Running => "running",
            AnimationState::Paused => "paused",
        }
    }

    pub fn for_visibility(hidden: bool) -> Self {
        if hidden { AnimationState::Paused } else { AnimationState::Running }
    }
}

/// Hidden pauses every track; visible resumes them unless auto-scroll is off.
/// Card contents are never touched.
pub fn apply_visibility<T: TrackSurface>(hidden: bool, tracks: &mut [T], auto_scroll: bool) -> AnimationState {
    let state = if auto_scroll { AnimationState::for_visibility(hidden) } else { AnimationState::Paused };
    for track in tracks.iter_mut() {
        track.set_animation_state(state);
    }
    state
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{CardModel, MemoryTrack};

    #[test]
    fn test_hidden_then_visible_restores_running() {
        let mut tracks = vec![MemoryTrack::default(), MemoryTrack::default()];
        tracks[0].replace_cards(&[CardModel::new("/a", "A", "a.png")]);
        let before = tracks[0].cards().to_vec();

        assert_eq!(apply_visibility(true, &mut tracks, true), AnimationState::Paused);
        assert!(tracks.iter().all(|t| t.animation_state() == AnimationState::Paused));
        assert_eq!(apply_visibility(false, &mut tracks, true), AnimationState::Running);
        assert!(tracks.iter().all(|t| t.animation_state() == AnimationState::Running));
        assert_eq!(tracks[0].cards(), before.as_slice());
    }

    #[test]
    fn test_auto_scroll_off_stays_paused() {
        let mut tracks = vec![MemoryTrack::default()];
        apply_visibility(false, &mut tracks, false);
        assert_eq!(tracks[0].animation_state(), AnimationState::Paused);
    }

    #[test]
    fn test_css_values() {
        assert_eq!(AnimationState::Paused.css_value(), "paused");
        assert_eq!(AnimationState::for_visibility(false).css_value(), "running");
    }
}
