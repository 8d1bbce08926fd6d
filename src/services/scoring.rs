use chrono::{DateTime, TimeDelta, Utc};
use rand::{Rng, RngCore};
use std::collections::BTreeSet;

use crate::models::{
    normalize_tag, Affinity, CatalogItem, FeedbackMap, FeedbackSignal, Preferences, ScoredItem,
    TimeBudget, TraitCategory,
};
use crate::services::mood::{MoodDefinition, MoodTaxonomy};

/// Added to the score of an item that violates the strict format preference
pub const FORMAT_MISMATCH_PENALTY: i32 = -1000;

/// Items recommended within this many days are penalized
pub const RECENCY_WINDOW_DAYS: i64 = 7;

/// View count from which an item counts as a comfort rewatch
pub const COMFORT_VIEW_COUNT: u32 = 3;

/// Source of the random addends used in scoring
///
/// Every `rand` generator is a source; tests can supply fixed sequences.
pub trait RandomSource {
    /// A uniform integer in `low..=high`
    fn roll(&mut self, low: i32, high: i32) -> i32;
}

impl<R: RngCore> RandomSource for R {
    fn roll(&mut self, low: i32, high: i32) -> i32 {
        self.gen_range(low..=high)
    }
}

/// Computes one integer desirability score per item
///
/// Every contribution is independent and additive. The only randomness is
/// the surprise bonus and the tie-break term, both drawn from the
/// `RandomSource` passed to [`Scorer::score`].
pub struct Scorer<'a> {
    preferences: &'a Preferences,
    moods: Vec<&'a MoodDefinition>,
    feedback: Option<&'a FeedbackMap>,
    affinity: Option<&'a Affinity>,
    now: DateTime<Utc>,
    /// User genres plus the genres implied by the selected moods
    target_genres: BTreeSet<String>,
}

impl<'a> Scorer<'a> {
    pub fn new(
        preferences: &'a Preferences,
        taxonomy: &'a MoodTaxonomy,
        now: DateTime<Utc>,
    ) -> Self {
        let moods = taxonomy.resolve(&preferences.moods);

        let mut target_genres: BTreeSet<String> = preferences
            .genres
            .iter()
            .map(|g| normalize_tag(g))
            .filter(|g| !g.is_empty())
            .collect();
        for mood in &moods {
            target_genres.extend(mood.genres.iter().map(|g| normalize_tag(g)));
        }

        Self {
            preferences,
            moods,
            feedback: None,
            affinity: None,
            now,
            target_genres,
        }
    }

    pub fn with_feedback(mut self, feedback: Option<&'a FeedbackMap>) -> Self {
        self.feedback = feedback;
        self
    }

    pub fn with_affinity(mut self, affinity: Option<&'a Affinity>) -> Self {
        self.affinity = affinity;
        self
    }

    /// Scores every item, preserving input order
    pub fn score_all(
        &self,
        items: Vec<CatalogItem>,
        rng: &mut dyn RandomSource,
    ) -> Vec<ScoredItem> {
        items.into_iter().map(|item| self.score(item, rng)).collect()
    }

    pub fn score(&self, item: CatalogItem, rng: &mut dyn RandomSource) -> ScoredItem {
        let genres = item.normalized_genres();
        let disqualified = !self.preferences.format.admits(item.content_type);

        let mut score = 0;
        if disqualified {
            score += FORMAT_MISMATCH_PENALTY;
        }
        score += self.time_fit(&item);
        score += self.genre_match(&genres);
        score += freshness(item.view_count);
        score += self.feedback_adjustment(&item);
        score += self.mood_keywords(&item.summary);
        score += self.mood_conflicts(&genres);
        score += self.comfort(&item);
        score += self.affinity_adjustment(&item, &genres);
        score += self.surprise(&genres, rng);
        score += self.recency(&item);
        score += rng.roll(1, 5);

        tracing::trace!(id = %item.id, title = %item.title, score, disqualified, "Scored item");

        ScoredItem {
            item,
            score,
            disqualified,
        }
    }

    fn time_fit(&self, item: &CatalogItem) -> i32 {
        let d = item.duration_minutes;
        match self.preferences.time_budget {
            TimeBudget::Under1h => {
                let mut fit = if d > 65 {
                    -30
                } else if d <= 45 {
                    20
                } else if d <= 60 {
                    10
                } else {
                    0
                };
                if item.is_show() && d <= 65 {
                    fit += 10;
                }
                fit
            }
            TimeBudget::OneToTwoH => match d {
                80..=130 => 20,
                65..=79 | 131..=150 => 10,
                _ => -10,
            },
            TimeBudget::TwoPlusH => {
                if d > 130 {
                    30
                } else if d >= 110 {
                    10
                } else {
                    0
                }
            }
            // Binge sessions favour fresh series over duration fit
            TimeBudget::OpenEnded if item.is_show() => freshness(item.view_count),
            TimeBudget::OpenEnded | TimeBudget::Unconstrained => 0,
        }
    }

    fn genre_match(&self, genres: &BTreeSet<String>) -> i32 {
        let matches = genres.intersection(&self.target_genres).count() as i32;
        if matches == 0 {
            return 0;
        }

        let mut bonus = 10 + 5 * (matches - 1);
        if matches as usize == self.target_genres.len() {
            bonus += 20;
        }
        // Partial credit when only one of several wanted genres is present
        if matches == 1 && self.target_genres.len() > 1 {
            bonus -= 5;
        }
        bonus
    }

    fn feedback_adjustment(&self, item: &CatalogItem) -> i32 {
        match self.feedback.and_then(|f| f.get(&item.id)) {
            Some(FeedbackSignal::Up) => 10,
            Some(FeedbackSignal::Down) => -15,
            None => 0,
        }
    }

    fn mood_keywords(&self, summary: &str) -> i32 {
        if summary.is_empty() {
            return 0;
        }
        let summary = summary.to_lowercase();
        5 * self
            .moods
            .iter()
            .filter(|mood| mood.matches_summary(&summary))
            .count() as i32
    }

    fn mood_conflicts(&self, genres: &BTreeSet<String>) -> i32 {
        -10 * self
            .moods
            .iter()
            .filter(|mood| mood.conflicts_with(genres))
            .count() as i32
    }

    fn comfort(&self, item: &CatalogItem) -> i32 {
        if self.preferences.comfort_mode && item.view_count >= COMFORT_VIEW_COUNT {
            30
        } else {
            0
        }
    }

    fn affinity_adjustment(&self, item: &CatalogItem, genres: &BTreeSet<String>) -> i32 {
        let Some(affinity) = self.affinity else {
            return 0;
        };
        let shares = |values: Option<&BTreeSet<String>>, against: &BTreeSet<String>| {
            values.is_some_and(|v| !v.is_disjoint(against))
        };
        let shares_genre = |values: Option<&BTreeSet<String>>| {
            values.is_some_and(|v| any_genre_in(genres, v))
        };

        let mut adjustment = 0;
        if shares_genre(affinity.liked(TraitCategory::Genres)) {
            adjustment += 6;
        }
        if shares(affinity.liked(TraitCategory::Directors), &item.directors) {
            adjustment += 4;
        }
        if shares(affinity.liked(TraitCategory::Cast), &item.cast) {
            adjustment += 2;
        }
        if shares_genre(affinity.disliked(TraitCategory::Genres)) {
            adjustment -= 8;
        }
        if shares(affinity.disliked(TraitCategory::Directors), &item.directors) {
            adjustment -= 5;
        }
        if shares(affinity.disliked(TraitCategory::Cast), &item.cast) {
            adjustment -= 3;
        }
        adjustment
    }

    fn surprise(&self, genres: &BTreeSet<String>, rng: &mut dyn RandomSource) -> i32 {
        if !self.preferences.surprise {
            return 0;
        }

        let mut bonus = rng.roll(0, 5);
        let liked_genres = self.affinity.and_then(|a| a.liked(TraitCategory::Genres));
        if let Some(liked) = liked_genres {
            if !any_genre_in(genres, liked) {
                bonus += rng.roll(0, 8);
            }
        }
        bonus
    }

    fn recency(&self, item: &CatalogItem) -> i32 {
        match item.last_recommended_at {
            Some(at) if self.now.signed_duration_since(at) < recency_window() => -15,
            _ => 0,
        }
    }
}

fn recency_window() -> TimeDelta {
    TimeDelta::days(RECENCY_WINDOW_DAYS)
}

fn freshness(view_count: u32) -> i32 {
    match view_count {
        0 => 10,
        1..=2 => 5,
        _ => 0,
    }
}

fn any_genre_in(genres: &BTreeSet<String>, values: &BTreeSet<String>) -> bool {
    values.iter().any(|v| genres.contains(&normalize_tag(v)))
}
