//! Card renderer.
//!
//! `CardModel` is the pure description of one card; a [`TrackSurface`] turns a
//! slice of them into whatever the track is made of. Rendering always replaces
//! the whole track so repeated renders never accumulate.

use crate::catalog::GameRecord;
use crate::visibility::AnimationState;

pub const UNKNOWN_GAME: &str = "Unknown Game";
pub const CARD_CLASS: &str = "carousel-game-card";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CardModel {
    pub url: String,
    pub name: String,
    pub image: String,
}

impl CardModel {
    pub fn new(url: &str, name: &str, image: &str) -> Self {
        Self { url: url.to_string(), name: name.to_string(), image: image.to_string() }
    }

    /// Missing name / image fall back to placeholders.
    pub fn from_record(record: &GameRecord, placeholder_image: &str) -> Self {
        let name = if record.name.trim().is_empty() { UNKNOWN_GAME } else { record.name.as_str() };
        let image = record
            .image
            .as_deref()
            .filter(|i| !i.trim().is_empty())
            .unwrap_or(placeholder_image);
        Self::new(&record.url, name, image)
    }
}

/// One scrolling strip of cards.
pub trait TrackSurface {
    /// Discard everything in the track and show `cards` instead.
    fn replace_cards(&mut self, cards: &[CardModel]);
    fn cards(&self) -> &[CardModel];
    fn set_animation_state(&mut self, state: AnimationState);
    fn animation_state(&self) -> AnimationState;
}

/// Track kept in memory; what the DOM track mirrors.
#[derive(Clone, Debug, Default)]
pub struct MemoryTrack {
    cards: Vec<CardModel>,
    state: AnimationState,
    renders: usize,
}

impl MemoryTrack {
    /// How many times the track was (re)rendered.
    pub fn renders(&self) -> usize {
        self.renders
    }
}

impl TrackSurface for MemoryTrack {
    fn replace_cards(&mut self, cards: &[CardModel]) {
        self.cards = cards.to_vec();
        self.renders += 1;
    }
    fn cards(&self) -> &[CardModel] {
        &self.cards
    }
    fn set_animation_state(&mut self, state: AnimationState) {
        self.state = state;
    }
    fn animation_state(&self) -> AnimationState {
        self.state
    }
}

/// Render one planned sequence per track. Extra plans or tracks are ignored.
/// Returns the number of cards written.
pub fn render_plan<T: TrackSurface>(plan: &[Vec<GameRecord>], tracks: &mut [T], placeholder_image: &str) -> usize {
    if plan.len() != tracks.len() {
        log::warn!("{} planned tracks for {} track surfaces", plan.len(), tracks.len());
    }
    plan.iter()
        .zip(tracks.iter_mut())
        .map(|(records, track)| {
            let cards: Vec<CardModel> =
                records.iter().map(|r| CardModel::from_record(r, placeholder_image)).collect();
            track.replace_cards(&cards);
            cards.len()
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallbacks() {
        let card = CardModel::from_record(&GameRecord::new("", "/x"), "ph.png");
        assert_eq!(card.name, UNKNOWN_GAME);
        assert_eq!(card.image, "ph.png");
        let card = CardModel::from_record(&GameRecord::new("X", "/x").with_image("x.png"), "ph.png");
        assert_eq!((card.name.as_str(), card.image.as_str()), ("X", "x.png"));
    }

    #[test]
    fn test_render_replaces_not_appends() {
        let plan = vec![vec![GameRecord::new("A", "/a"), GameRecord::new("A", "/a")]];
        let mut tracks = vec![MemoryTrack::default()];
        assert_eq!(render_plan(&plan, &mut tracks, "ph.png"), 2);
        let once = tracks[0].cards().to_vec();
        render_plan(&plan, &mut tracks, "ph.png");
        assert_eq!(tracks[0].cards(), once.as_slice());
        assert_eq!(tracks[0].renders(), 2);
    }
}
