use chrono::{DateTime, Utc};

use crate::models::{Affinity, CatalogItem, FeedbackMap, Preferences, Recommendations, ScoredItem};
use crate::services::{
    history::stamp_recommended,
    mood::MoodTaxonomy,
    prefilter::prefilter,
    ranking::{rank, select_binge, select_normal},
    scoring::{RandomSource, Scorer},
};

/// Generates mood-aware watch recommendations for one session
///
/// Runs pre-filter, scoring, ranking/diversification and history stamping
/// over an in-memory snapshot of the catalog. Each call is independent; the
/// only state carried between calls is `last_recommended_at`, which the
/// caller must write back into its catalog.
pub struct Recommender<'a> {
    catalog: &'a [CatalogItem],
    preferences: &'a Preferences,
    taxonomy: &'a MoodTaxonomy,
    feedback: Option<&'a FeedbackMap>,
    affinity: Option<&'a Affinity>,
}

impl<'a> Recommender<'a> {
    /// Creates a recommender over the given catalog and session preferences
    pub fn new(
        catalog: &'a [CatalogItem],
        preferences: &'a Preferences,
        taxonomy: &'a MoodTaxonomy,
    ) -> Self {
        Self {
            catalog,
            preferences,
            taxonomy,
            feedback: None,
            affinity: None,
        }
    }

    pub fn with_feedback(mut self, feedback: &'a FeedbackMap) -> Self {
        self.feedback = Some(feedback);
        self
    }

    pub fn with_affinity(mut self, affinity: &'a Affinity) -> Self {
        self.affinity = Some(affinity);
        self
    }

    /// Pre-filters and scores the catalog without ranking
    ///
    /// Disqualified items are included, which makes this useful for
    /// inspecting why an item did not surface.
    pub fn score_candidates(
        &self,
        rng: &mut dyn RandomSource,
        now: DateTime<Utc>,
    ) -> (Vec<CatalogItem>, Vec<ScoredItem>) {
        let prefiltered = prefilter(self.catalog, self.preferences);
        let scorer = Scorer::new(self.preferences, self.taxonomy, now)
            .with_feedback(self.feedback)
            .with_affinity(self.affinity);
        let scored = scorer.score_all(prefiltered.clone(), rng);
        (prefiltered, scored)
    }

    /// Runs the full pipeline and returns stamped recommendations
    pub fn recommend(&self, rng: &mut dyn RandomSource, now: DateTime<Utc>) -> Recommendations {
        let (prefiltered, scored) = self.score_candidates(rng, now);
        let ranked = rank(scored);

        for candidate in ranked.iter().take(10) {
            tracing::debug!(
                id = %candidate.item.id,
                title = %candidate.item.title,
                score = candidate.score,
                "Top candidate"
            );
        }

        let selection = if self.preferences.is_binge() {
            select_binge(&ranked)
        } else {
            select_normal(&ranked, &prefiltered, self.preferences)
        };

        tracing::info!(
            catalog = self.catalog.len(),
            candidates = prefiltered.len(),
            ranked = ranked.len(),
            selected = selection.len(),
            binge = self.preferences.is_binge(),
            "Recommendations selected"
        );

        stamp_recommended(selection, now)
    }
}
