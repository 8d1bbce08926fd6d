use chrono::{DateTime, Utc};

use crate::models::Recommendations;

/// Stamps every recommended item with `last_recommended_at = now`
///
/// Works on the owned output copies only. Persisting the stamps back into
/// the catalog is the caller's job.
pub fn stamp_recommended(recommendations: Recommendations, now: DateTime<Utc>) -> Recommendations {
    recommendations.map_items(|item| item.with_last_recommended_at(Some(now)))
}
