mod catalog_item;
mod feedback;
mod preferences;
mod recommendation;

pub use catalog_item::{normalize_tag, CatalogItem, ContentType, ItemId};
pub use feedback::{
    build_feedback_map, Affinity, FeedbackMap, FeedbackRecord, FeedbackSignal, OnboardingAnswers,
    TraitCategory,
};
pub use preferences::{FormatPreference, Preferences, TimeBudget};
pub use recommendation::{Recommendations, ScoredItem};
