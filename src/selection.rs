//! Selection & shuffle: which records go on which track, in what order.
//!
//! Every function works on copies; the source catalog is never touched.

use rand::Rng;
use rand::seq::SliceRandom;
use std::collections::HashSet;

use crate::catalog::GameRecord;
use crate::config::{CarouselConfig, TrackLayout};

/// Drop excluded names, empty identities and identity duplicates (first wins).
pub fn filter_playable(catalog: &[GameRecord], excluded: &[String]) -> Vec<GameRecord> {
    let mut seen = HashSet::new();
    catalog
        .iter()
        .filter(|g| !excluded.iter().any(|n| *n == g.name))
        .filter(|g| !g.identity().is_empty())
        .filter(|g| seen.insert(g.identity().to_string()))
        .cloned()
        .collect()
}

/// Uniform shuffle of a copy, truncated to `desired`.
pub fn select<R: Rng + ?Sized>(filtered: &[GameRecord], desired: usize, rng: &mut R) -> Vec<GameRecord> {
    let mut pool = filtered.to_vec();
    pool.shuffle(rng);
    pool.truncate(desired.min(filtered.len()));
    pool
}

/// `selected ++ selected`, so the strip can wrap without a visible seam.
pub fn duplicate_for_loop(selected: &[GameRecord]) -> Vec<GameRecord> {
    let mut looped = Vec::with_capacity(selected.len() * 2);
    looped.extend_from_slice(selected);
    looped.extend_from_slice(selected);
    looped
}

/// One looped sequence per track of `config.layout`.
pub fn plan_tracks<R: Rng + ?Sized>(
    catalog: &[GameRecord],
    config: &CarouselConfig,
    rng: &mut R,
) -> Vec<Vec<GameRecord>> {
    let filtered = filter_playable(catalog, &config.excluded_names);
    match &config.layout {
        TrackLayout::Single { .. } => {
            vec![duplicate_for_loop(&select(&filtered, config.desired_count, rng))]
        }
        TrackLayout::Split { .. } => {
            let shuffled = select(&filtered, filtered.len(), rng);
            let (top, bottom) = split_halves(&shuffled);
            let top: Vec<_> = top.iter().take(config.desired_count).cloned().collect();
            let bottom: Vec<_> = bottom.iter().take(config.desired_count).cloned().collect();
            vec![duplicate_for_loop(&top), duplicate_for_loop(&bottom)]
        }
    }
}

// Top takes the extra record on odd counts; a single record feeds both.
fn split_halves(shuffled: &[GameRecord]) -> (&[GameRecord], &[GameRecord]) {
    if shuffled.len() == 1 {
        return (shuffled, shuffled);
    }
    shuffled.split_at(shuffled.len().div_ceil(2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn games(names: &[&str]) -> Vec<GameRecord> {
        names.iter().map(|n| GameRecord::new(n, &format!("/{n}.html"))).collect()
    }

    #[test]
    fn test_filter_drops_feedback_and_duplicates() {
        let mut cat = games(&["A", "Feedback", "B"]);
        cat.push(GameRecord::new("A again", "/A.html"));
        cat.push(GameRecord::new("", ""));
        let out = filter_playable(&cat, &["Feedback".to_string()]);
        let names: Vec<_> = out.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B"]);
    }

    #[test]
    fn test_feedback_match_is_exact() {
        let cat = games(&["feedback", "Feedback Form"]);
        assert_eq!(filter_playable(&cat, &["Feedback".to_string()]).len(), 2);
    }

    #[test]
    fn test_select_caps_and_keeps_source() {
        let cat = games(&["A", "B", "C", "D", "E"]);
        let before = cat.clone();
        let mut rng = StdRng::seed_from_u64(7);
        let picked = select(&cat, 3, &mut rng);
        assert_eq!(picked.len(), 3);
        assert!(picked.iter().all(|g| cat.contains(g)));
        assert_eq!(cat, before);
        assert_eq!(select(&cat, 99, &mut rng).len(), 5);
    }

    #[test]
    fn test_duplicate_mirrors() {
        let sel = games(&["A", "B"]);
        let looped = duplicate_for_loop(&sel);
        assert_eq!(looped.len(), 4);
        assert_eq!(looped[..2], looped[2..]);
    }

    #[test]
    fn test_split_halves_are_disjoint() {
        let cat = games(&["A", "B", "C", "D", "E"]);
        let mut rng = StdRng::seed_from_u64(11);
        let plan = plan_tracks(&cat, &CarouselConfig::split(), &mut rng);
        assert_eq!(plan.len(), 2);
        assert_eq!(plan[0].len(), 6); // 3 doubled
        assert_eq!(plan[1].len(), 4); // 2 doubled
        let top: HashSet<_> = plan[0].iter().map(|g| g.identity()).collect();
        assert!(plan[1].iter().all(|g| !top.contains(g.identity())));
    }

    #[test]
    fn test_split_single_record_feeds_both_tracks() {
        let cat = games(&["Solo"]);
        let mut rng = StdRng::seed_from_u64(1);
        let plan = plan_tracks(&cat, &CarouselConfig::split(), &mut rng);
        assert_eq!(plan[0], plan[1]);
        assert_eq!(plan[0].len(), 2);
    }

    #[test]
    fn test_split_caps_each_half() {
        let names: Vec<String> = (0..50).map(|i| format!("G{i}")).collect();
        let refs: Vec<&str> = names.iter().map(|s| s.as_str()).collect();
        let mut rng = StdRng::seed_from_u64(3);
        let plan = plan_tracks(&games(&refs), &CarouselConfig::split(), &mut rng);
        assert_eq!(plan[0].len(), 20);
        assert_eq!(plan[1].len(), 20);
    }
}
