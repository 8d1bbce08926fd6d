use std::collections::{HashMap, HashSet};

use crate::models::{CatalogItem, Preferences, Recommendations, ScoredItem};
use crate::services::scoring::COMFORT_VIEW_COUNT;

/// Maximum number of items in a flat list and in each binge list
pub const MAX_RESULTS: usize = 3;

/// Drops disqualified items and sorts the rest by descending score
///
/// The sort is stable, so equal scores keep their pre-filter order.
pub fn rank(scored: Vec<ScoredItem>) -> Vec<ScoredItem> {
    let mut ranked: Vec<ScoredItem> = scored.into_iter().filter(|s| !s.disqualified).collect();
    ranked.sort_by(|a, b| b.score.cmp(&a.score));
    ranked
}

/// Binge-mode selection: franchise-aware movies and series-distinct shows
pub fn select_binge(ranked: &[ScoredItem]) -> Recommendations {
    Recommendations::Binge {
        movies: select_binge_movies(ranked),
        shows: select_binge_shows(ranked),
    }
}

/// Best member of every multi-title franchise first, then standalone movies
/// in score order until the list is full
fn select_binge_movies(ranked: &[ScoredItem]) -> Vec<CatalogItem> {
    let movies: Vec<&ScoredItem> = ranked.iter().filter(|s| s.item.is_movie()).collect();

    let mut franchise_sizes: HashMap<String, usize> = HashMap::new();
    for movie in &movies {
        *franchise_sizes.entry(movie.item.series_key()).or_insert(0) += 1;
    }

    let mut picked_franchises: HashSet<String> = HashSet::new();
    let mut franchise_picks: Vec<&ScoredItem> = Vec::new();
    let mut standalone: Vec<&ScoredItem> = Vec::new();

    for movie in movies {
        let key = movie.item.series_key();
        if franchise_sizes.get(&key).copied().unwrap_or(0) > 1 {
            // Ranked order means the first member seen is the highest scoring
            if picked_franchises.insert(key) {
                franchise_picks.push(movie);
            }
        } else {
            standalone.push(movie);
        }
    }

    tracing::debug!(
        franchises = franchise_picks.len(),
        standalone = standalone.len(),
        "Binge movie candidates grouped"
    );

    franchise_picks
        .into_iter()
        .chain(standalone)
        .take(MAX_RESULTS)
        .map(|s| s.item.clone())
        .collect()
}

fn select_binge_shows(ranked: &[ScoredItem]) -> Vec<CatalogItem> {
    let mut seen_series: HashSet<String> = HashSet::new();
    ranked
        .iter()
        .filter(|s| s.item.is_show())
        .filter(|s| seen_series.insert(s.item.series_key()))
        .take(MAX_RESULTS)
        .map(|s| s.item.clone())
        .collect()
}

/// Normal-mode selection: comfort prefix, fallback, then the diversity pass
pub fn select_normal(
    ranked: &[ScoredItem],
    prefiltered: &[CatalogItem],
    preferences: &Preferences,
) -> Recommendations {
    let mut candidates = if preferences.comfort_mode {
        with_comfort_prefix(ranked, prefiltered)
    } else {
        ranked.iter().map(|s| s.item.clone()).collect()
    };

    if candidates.is_empty() {
        tracing::debug!("No scored candidates, falling back to pre-filtered items");
        candidates = prefiltered.iter().take(MAX_RESULTS).cloned().collect();
    }

    Recommendations::Normal {
        items: diversify(candidates, preferences),
    }
}

/// Most-watched rewatch candidates first, followed by the ranked list
fn with_comfort_prefix(ranked: &[ScoredItem], prefiltered: &[CatalogItem]) -> Vec<CatalogItem> {
    let mut comfort: Vec<&CatalogItem> = prefiltered
        .iter()
        .filter(|item| item.view_count >= COMFORT_VIEW_COUNT)
        .collect();
    comfort.sort_by(|a, b| b.view_count.cmp(&a.view_count));
    comfort.truncate(MAX_RESULTS);

    let comfort_ids: HashSet<_> = comfort.iter().map(|item| item.id.clone()).collect();

    comfort
        .into_iter()
        .cloned()
        .chain(
            ranked
                .iter()
                .filter(|s| !comfort_ids.contains(&s.item.id))
                .map(|s| s.item.clone()),
        )
        .collect()
}

/// Keeps format-compatible items and one entry per show series
fn diversify(candidates: Vec<CatalogItem>, preferences: &Preferences) -> Vec<CatalogItem> {
    let mut seen_series: HashSet<String> = HashSet::new();
    candidates
        .into_iter()
        .filter(|item| preferences.format.admits(item.content_type))
        .filter(|item| !item.is_show() || seen_series.insert(item.series_key()))
        .take(MAX_RESULTS)
        .collect()
}
