use std::collections::BTreeSet;

use crate::models::{normalize_tag, CatalogItem, ContentType, Preferences, TimeBudget};

/// Longest runtime accepted for an "under an hour" session. Five minutes of
/// slack over the bucket so near-hour films and long episodes still qualify.
pub const UNDER_1H_MAX_MINUTES: u32 = 65;

/// Drops items that cannot satisfy the session's hard constraints
///
/// Shows with the wrong format are kept on purpose; the scorer disqualifies
/// them so they remain visible in score logs.
pub fn prefilter(catalog: &[CatalogItem], preferences: &Preferences) -> Vec<CatalogItem> {
    let wanted_genres: BTreeSet<String> = preferences
        .genres
        .iter()
        .map(|g| normalize_tag(g))
        .filter(|g| !g.is_empty())
        .collect();

    let kept: Vec<CatalogItem> = catalog
        .iter()
        .filter(|item| passes_time_and_format(item, preferences))
        .filter(|item| passes_genre_overlap(item, &wanted_genres))
        .cloned()
        .collect();

    tracing::debug!(
        catalog = catalog.len(),
        kept = kept.len(),
        "Pre-filter complete"
    );

    kept
}

fn passes_time_and_format(item: &CatalogItem, preferences: &Preferences) -> bool {
    let under_1h = preferences.time_budget == TimeBudget::Under1h;
    let duration = item.duration_minutes;

    match item.content_type {
        // Episode runtimes are unreliable, so only the short bucket filters
        // shows, and an unknown runtime does not qualify.
        ContentType::Show => !under_1h || (duration > 0 && duration <= UNDER_1H_MAX_MINUTES),
        ContentType::Movie => {
            let short_enough = !under_1h || duration <= UNDER_1H_MAX_MINUTES;
            short_enough && preferences.format.admits(ContentType::Movie)
        }
    }
}

fn passes_genre_overlap(item: &CatalogItem, wanted: &BTreeSet<String>) -> bool {
    wanted.is_empty() || item.genres.iter().any(|g| wanted.contains(&normalize_tag(g)))
}
