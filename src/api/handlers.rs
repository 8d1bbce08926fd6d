use axum::{extract::State, http::StatusCode, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::{AppError, AppResult};
use crate::models::{
    build_feedback_map, Affinity, CatalogItem, FeedbackMap, FeedbackRecord, OnboardingAnswers,
    Preferences, Recommendations, ScoredItem,
};
use crate::services::{MoodTaxonomy, Recommender};

use super::state::AppStateInner;
use super::AppState;

// Request/Response types

#[derive(Debug, Deserialize)]
pub struct RecommendationRequest {
    pub preferences: Preferences,
    /// Explicit liked/disliked traits
    #[serde(default)]
    pub affinity: Option<Affinity>,
    /// Used for affinity when no explicit affinity is given
    #[serde(default)]
    pub onboarding: Option<OnboardingAnswers>,
    /// Per-item overrides on top of the stored feedback
    #[serde(default)]
    pub feedback: FeedbackMap,
}

impl RecommendationRequest {
    fn resolved_affinity(&self) -> Option<Affinity> {
        self.affinity
            .clone()
            .or_else(|| self.onboarding.as_ref().map(Affinity::from))
    }
}

#[derive(Debug, Serialize)]
pub struct CatalogUpdateResponse {
    pub added: usize,
    pub total: usize,
}

#[derive(Debug, Serialize)]
pub struct ScoresResponse {
    pub candidates: usize,
    pub scores: Vec<ScoredItem>,
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Get the whole catalog
pub async fn get_catalog(State(state): State<AppState>) -> Json<Vec<CatalogItem>> {
    let inner = state.inner.read().await;
    Json(inner.catalog.clone())
}

/// Merge items into the catalog
pub async fn add_catalog_items(
    State(state): State<AppState>,
    Json(items): Json<Vec<CatalogItem>>,
) -> Json<CatalogUpdateResponse> {
    let mut inner = state.inner.write().await;
    let received = items.len();
    let added = inner.merge_items(items);

    tracing::info!(received, added, total = inner.catalog.len(), "Catalog updated");

    Json(CatalogUpdateResponse {
        added,
        total: inner.catalog.len(),
    })
}

/// Get recorded feedback
pub async fn get_feedback(State(state): State<AppState>) -> Json<Vec<FeedbackRecord>> {
    let inner = state.inner.read().await;
    Json(inner.feedback.clone())
}

/// Record a rating for a catalog item
pub async fn add_feedback(
    State(state): State<AppState>,
    Json(record): Json<FeedbackRecord>,
) -> AppResult<(StatusCode, Json<FeedbackRecord>)> {
    if !(1..=5).contains(&record.rating) {
        return Err(AppError::InvalidInput(format!(
            "Rating must be between 1 and 5, got {}",
            record.rating
        )));
    }

    let mut inner = state.inner.write().await;
    if !inner.catalog.iter().any(|item| item.id == record.media_id) {
        return Err(AppError::NotFound(format!(
            "Catalog item {} not found",
            record.media_id
        )));
    }

    tracing::info!(
        media_id = %record.media_id,
        rating = record.rating,
        signal = ?record.signal(),
        "Feedback recorded"
    );

    inner.feedback.push(record.clone());
    Ok((StatusCode::CREATED, Json(record)))
}

/// Recommend up to three items (or a binge set) and remember the picks
pub async fn recommend(
    State(state): State<AppState>,
    Json(request): Json<RecommendationRequest>,
) -> Json<Recommendations> {
    let mut inner = state.inner.write().await;
    let recommendations = run_recommendation(&mut inner, &state.taxonomy, &request, Utc::now());
    Json(recommendations)
}

/// Score every pre-filtered candidate without selecting, for diagnostics
pub async fn score_candidates(
    State(state): State<AppState>,
    Json(request): Json<RecommendationRequest>,
) -> Json<ScoresResponse> {
    let inner = state.inner.read().await;
    let feedback = merged_feedback(&inner, &request);
    let affinity = request.resolved_affinity();

    let mut recommender = Recommender::new(&inner.catalog, &request.preferences, &state.taxonomy)
        .with_feedback(&feedback);
    if let Some(affinity) = affinity.as_ref() {
        recommender = recommender.with_affinity(affinity);
    }

    let mut rng = rand::thread_rng();
    let (prefiltered, mut scores) = recommender.score_candidates(&mut rng, Utc::now());
    scores.sort_by(|a, b| b.score.cmp(&a.score));

    Json(ScoresResponse {
        candidates: prefiltered.len(),
        scores,
    })
}

fn merged_feedback(inner: &AppStateInner, request: &RecommendationRequest) -> FeedbackMap {
    let mut feedback = build_feedback_map(&inner.feedback);
    feedback.extend(request.feedback.iter().map(|(id, signal)| (id.clone(), *signal)));
    feedback
}

/// Runs the pipeline against the stored catalog and persists the stamps
fn run_recommendation(
    inner: &mut AppStateInner,
    taxonomy: &MoodTaxonomy,
    request: &RecommendationRequest,
    now: DateTime<Utc>,
) -> Recommendations {
    let feedback = merged_feedback(inner, request);
    let affinity = request.resolved_affinity();

    let mut recommender =
        Recommender::new(&inner.catalog, &request.preferences, taxonomy).with_feedback(&feedback);
    if let Some(affinity) = affinity.as_ref() {
        recommender = recommender.with_affinity(affinity);
    }

    let mut rng = rand::thread_rng();
    let recommendations = recommender.recommend(&mut rng, now);

    inner.record_recommended(recommendations.items());
    recommendations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FeedbackSignal, FormatPreference, ItemId, TimeBudget};

    fn request(preferences: Preferences) -> RecommendationRequest {
        RecommendationRequest {
            preferences,
            affinity: None,
            onboarding: None,
            feedback: FeedbackMap::new(),
        }
    }

    #[tokio::test]
    async fn test_run_recommendation_persists_stamps() {
        let state = AppState::with_catalog(vec![
            CatalogItem::movie("1", "Heat").with_duration(100),
            CatalogItem::movie("2", "Alien").with_duration(117),
        ]);
        let now = Utc::now();
        let prefs = Preferences::new(TimeBudget::OneToTwoH, FormatPreference::Movie);

        let mut inner = state.inner.write().await;
        let recs = run_recommendation(&mut inner, &state.taxonomy, &request(prefs), now);

        assert_eq!(recs.len(), 2);
        assert!(inner
            .catalog
            .iter()
            .all(|item| item.last_recommended_at == Some(now)));
    }

    #[tokio::test]
    async fn test_request_feedback_overrides_stored() {
        let state = AppState::with_catalog(vec![CatalogItem::movie("1", "Heat")]);
        let mut inner = state.inner.write().await;
        inner.feedback.push(FeedbackRecord {
            media_id: ItemId::new("1"),
            rating: 5,
            would_watch_again: true,
            watched_to_completion: true,
        });

        let mut req = request(Preferences::default());
        req.feedback.insert(ItemId::new("1"), FeedbackSignal::Down);

        let merged = merged_feedback(&inner, &req);
        assert_eq!(merged.get(&ItemId::new("1")), Some(&FeedbackSignal::Down));
    }

    #[test]
    fn test_onboarding_used_when_no_affinity() {
        let mut req = request(Preferences::default());
        req.onboarding = Some(OnboardingAnswers {
            favorite_genres: vec!["Drama".to_string()],
            ..Default::default()
        });
        assert!(req.resolved_affinity().is_some());

        req.affinity = Some(Affinity::new());
        assert_eq!(req.resolved_affinity(), Some(Affinity::new()));
    }
}
