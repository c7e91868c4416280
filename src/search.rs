//! Listing grids (games, apps) and the name search over them.

use crate::catalog::GameRecord;

/// Records a grid can show: both name and url present.
pub fn listable(catalog: &[GameRecord]) -> impl Iterator<Item = &GameRecord> {
    catalog.iter().filter(|g| !g.name.is_empty() && !g.url.is_empty())
}

/// Case-insensitive substring match on the name. Blank query lists everything.
pub fn search_games<'a>(catalog: &'a [GameRecord], query: &str) -> Vec<&'a GameRecord> {
    let needle = query.trim().to_lowercase();
    listable(catalog).filter(|g| needle.is_empty() || g.name.to_lowercase().contains(&needle)).collect()
}

/// Static shape of one listing grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridSpec {
    pub list_id: &'static str,
    pub card_class: &'static str,
    pub placeholder_image: &'static str,
    pub empty_text: &'static str,
    /// Cards can be focused and opened with Enter.
    pub keyboard: bool,
}

pub const GAMES_GRID: GridSpec = GridSpec {
    list_id: "game-list",
    card_class: "game-card",
    placeholder_image: "https://via.placeholder.com/250x250?text=Game",
    empty_text: "No games found.",
    keyboard: true,
};

pub const APPS_GRID: GridSpec = GridSpec {
    list_id: "app-list",
    card_class: "app-card",
    placeholder_image: "https://via.placeholder.com/250x250?text=App",
    empty_text: "No apps found.",
    keyboard: false,
};

impl GridSpec {
    /// The record's image, or this grid's placeholder when it is blank.
    pub fn image_for<'a>(&'a self, record: &'a GameRecord) -> &'a str {
        record.image.as_deref().filter(|i| !i.trim().is_empty()).unwrap_or(self.placeholder_image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Vec<GameRecord> {
        vec![
            GameRecord::new("Slope", "/g/slope"),
            GameRecord::new("Slither", "/g/slither"),
            GameRecord::new("Tetris", "/g/tetris"),
            GameRecord::new("Broken", ""),
        ]
    }

    #[test]
    fn test_case_insensitive_trimmed() {
        let hits: Vec<_> = search_games(&catalog(), "  SL ").iter().map(|g| g.name.clone()).collect();
        assert_eq!(hits, vec!["Slope", "Slither"]);
    }

    #[test]
    fn test_blank_query_lists_valid_only() {
        assert_eq!(search_games(&catalog(), "").len(), 3);
        assert!(search_games(&catalog(), "broken").is_empty());
    }

    #[test]
    fn test_blank_image_uses_grid_placeholder() {
        let blank = GameRecord::new("A", "/a").with_image("  ");
        assert_eq!(GAMES_GRID.image_for(&blank), GAMES_GRID.placeholder_image);
        assert_eq!(APPS_GRID.image_for(&GameRecord::new("B", "/b")), APPS_GRID.placeholder_image);
        let art = GameRecord::new("C", "/c").with_image("c.png");
        assert_eq!(GAMES_GRID.image_for(&art), "c.png");
    }

    #[test]
    fn test_grids_differ_in_target_and_wording() {
        assert_eq!((GAMES_GRID.list_id, GAMES_GRID.empty_text), ("game-list", "No games found."));
        assert_eq!((APPS_GRID.list_id, APPS_GRID.empty_text), ("app-list", "No apps found."));
        assert!(GAMES_GRID.keyboard && !APPS_GRID.keyboard);
    }
}
