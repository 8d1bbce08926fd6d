use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

use super::{normalize_tag, ItemId};

/// Thumbs up / thumbs down derived from a user's ratings
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackSignal {
    Up,
    Down,
}

/// Per-item feedback passed into the pipeline
pub type FeedbackMap = HashMap<ItemId, FeedbackSignal>;

/// A raw feedback entry recorded after the user watched or rated something
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeedbackRecord {
    pub media_id: ItemId,
    /// Star rating, 1-5
    pub rating: u8,
    #[serde(default)]
    pub would_watch_again: bool,
    #[serde(default)]
    pub watched_to_completion: bool,
}

impl FeedbackRecord {
    /// The signal this record contributes, if any
    ///
    /// A high rating or a rewatch intent counts as up. A low rating only
    /// counts as down when the user would not watch it again.
    pub fn signal(&self) -> Option<FeedbackSignal> {
        if self.rating >= 4 || self.would_watch_again {
            Some(FeedbackSignal::Up)
        } else if self.rating <= 2 && !self.would_watch_again {
            Some(FeedbackSignal::Down)
        } else {
            None
        }
    }
}

/// Folds feedback records into a map, later records overriding earlier ones
///
/// A neutral record (e.g. a 3-star rating) does not clear an earlier signal.
pub fn build_feedback_map(records: &[FeedbackRecord]) -> FeedbackMap {
    let mut map = FeedbackMap::new();
    for record in records {
        if let Some(signal) = record.signal() {
            map.insert(record.media_id.clone(), signal);
        }
    }
    map
}

/// Trait categories used for similarity bonuses
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TraitCategory {
    Genres,
    Directors,
    Cast,
}

/// Liked and disliked trait values for similarity scoring
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Affinity {
    #[serde(default)]
    pub liked: HashMap<TraitCategory, BTreeSet<String>>,
    #[serde(default)]
    pub disliked: HashMap<TraitCategory, BTreeSet<String>>,
}

impl Affinity {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn like<I, S>(mut self, category: TraitCategory, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.liked
            .entry(category)
            .or_default()
            .extend(values.into_iter().map(Into::into));
        self
    }

    pub fn dislike<I, S>(mut self, category: TraitCategory, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.disliked
            .entry(category)
            .or_default()
            .extend(values.into_iter().map(Into::into));
        self
    }

    pub fn liked(&self, category: TraitCategory) -> Option<&BTreeSet<String>> {
        self.liked.get(&category)
    }

    pub fn disliked(&self, category: TraitCategory) -> Option<&BTreeSet<String>> {
        self.disliked.get(&category)
    }
}

/// Answers collected when a user first sets up their profile
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct OnboardingAnswers {
    #[serde(default)]
    pub favorite_titles: Vec<String>,
    #[serde(default)]
    pub favorite_genres: Vec<String>,
    #[serde(default)]
    pub disliked_genres: Vec<String>,
    #[serde(default)]
    pub preferred_content_type: Option<String>,
    #[serde(default)]
    pub preferred_duration: Option<u32>,
}

impl From<&OnboardingAnswers> for Affinity {
    fn from(answers: &OnboardingAnswers) -> Self {
        let mut affinity = Affinity::new();
        if !answers.favorite_genres.is_empty() {
            affinity = affinity.like(
                TraitCategory::Genres,
                answers.favorite_genres.iter().map(|g| normalize_tag(g)),
            );
        }
        if !answers.disliked_genres.is_empty() {
            affinity = affinity.dislike(
                TraitCategory::Genres,
                answers.disliked_genres.iter().map(|g| normalize_tag(g)),
            );
        }
        affinity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, rating: u8, would_watch_again: bool) -> FeedbackRecord {
        FeedbackRecord {
            media_id: ItemId::new(id),
            rating,
            would_watch_again,
            watched_to_completion: true,
        }
    }

    #[test]
    fn test_high_rating_is_up() {
        assert_eq!(record("a", 4, false).signal(), Some(FeedbackSignal::Up));
        assert_eq!(record("a", 5, false).signal(), Some(FeedbackSignal::Up));
    }

    #[test]
    fn test_rewatch_intent_overrides_low_rating() {
        assert_eq!(record("a", 1, true).signal(), Some(FeedbackSignal::Up));
    }

    #[test]
    fn test_low_rating_is_down() {
        assert_eq!(record("a", 2, false).signal(), Some(FeedbackSignal::Down));
    }

    #[test]
    fn test_neutral_rating_has_no_signal() {
        assert_eq!(record("a", 3, false).signal(), None);
    }

    #[test]
    fn test_build_feedback_map_later_wins_and_neutral_keeps() {
        let records = vec![
            record("a", 5, false),
            record("a", 1, false),
            record("b", 5, false),
            record("b", 3, false),
        ];
        let map = build_feedback_map(&records);
        assert_eq!(map.get(&ItemId::new("a")), Some(&FeedbackSignal::Down));
        assert_eq!(map.get(&ItemId::new("b")), Some(&FeedbackSignal::Up));
    }

    #[test]
    fn test_affinity_from_onboarding() {
        let answers = OnboardingAnswers {
            favorite_genres: vec!["Comedy".to_string()],
            disliked_genres: vec![" Horror ".to_string()],
            ..Default::default()
        };
        let affinity = Affinity::from(&answers);
        assert!(affinity.liked(TraitCategory::Genres).unwrap().contains("comedy"));
        assert!(affinity.disliked(TraitCategory::Genres).unwrap().contains("horror"));
        assert!(affinity.liked(TraitCategory::Directors).is_none());
    }

    #[test]
    fn test_affinity_deserialize() {
        let affinity: Affinity = serde_json::from_str(
            r#"{"liked":{"directors":["Greta Gerwig"]},"disliked":{"cast":["Nobody"]}}"#,
        )
        .unwrap();
        assert!(affinity
            .liked(TraitCategory::Directors)
            .unwrap()
            .contains("Greta Gerwig"));
        assert!(affinity.disliked(TraitCategory::Cast).is_some());
    }
}
