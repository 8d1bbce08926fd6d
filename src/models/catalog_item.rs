use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt::Display;

/// Stable identifier for a catalog item (e.g. a Plex rating key)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub String);

impl ItemId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ItemId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Type of content
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Movie,
    Show,
}

/// Trims and lowercases a genre or tag for comparison
pub fn normalize_tag(value: &str) -> String {
    value.trim().to_lowercase()
}

/// One movie or show in the candidate catalog
///
/// Items are treated as immutable values: every `with_*` method consumes the
/// item and returns an updated copy, so a pipeline stage never mutates an item
/// another stage still holds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogItem {
    pub id: ItemId,
    pub title: String,
    #[serde(rename = "type")]
    pub content_type: ContentType,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub genres: BTreeSet<String>,
    #[serde(default)]
    pub directors: BTreeSet<String>,
    #[serde(default)]
    pub cast: BTreeSet<String>,
    /// Runtime in minutes, 0 when unknown
    #[serde(default)]
    pub duration_minutes: u32,
    /// How many times the user has already watched this item
    #[serde(default)]
    pub view_count: u32,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub poster_url: Option<String>,
    /// Franchise or series the item belongs to (episodes, sequels)
    #[serde(default)]
    pub series_title: Option<String>,
    #[serde(default)]
    pub last_recommended_at: Option<DateTime<Utc>>,
    /// Distribution services carrying the item (e.g. "Plex", "Netflix")
    #[serde(default)]
    pub platforms: BTreeSet<String>,
}

impl CatalogItem {
    /// Creates an item with no metadata beyond its identity
    pub fn new(id: impl Into<String>, title: impl Into<String>, content_type: ContentType) -> Self {
        Self {
            id: ItemId::new(id),
            title: title.into(),
            content_type,
            year: None,
            genres: BTreeSet::new(),
            directors: BTreeSet::new(),
            cast: BTreeSet::new(),
            duration_minutes: 0,
            view_count: 0,
            summary: String::new(),
            poster_url: None,
            series_title: None,
            last_recommended_at: None,
            platforms: BTreeSet::new(),
        }
    }

    pub fn movie(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self::new(id, title, ContentType::Movie)
    }

    pub fn show(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self::new(id, title, ContentType::Show)
    }

    pub fn with_genres<I, S>(mut self, genres: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.genres = genres.into_iter().map(|g| normalize_tag(g.as_ref())).collect();
        self
    }

    pub fn with_directors<I, S>(mut self, directors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.directors = directors.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_cast<I, S>(mut self, cast: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.cast = cast.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_duration(mut self, minutes: u32) -> Self {
        self.duration_minutes = minutes;
        self
    }

    pub fn with_view_count(mut self, view_count: u32) -> Self {
        self.view_count = view_count;
        self
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = summary.into();
        self
    }

    pub fn with_series_title(mut self, series_title: impl Into<String>) -> Self {
        self.series_title = Some(series_title.into());
        self
    }

    pub fn with_year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    pub fn with_platforms<I, S>(mut self, platforms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.platforms = platforms.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_last_recommended_at(mut self, at: Option<DateTime<Utc>>) -> Self {
        self.last_recommended_at = at;
        self
    }

    pub fn is_movie(&self) -> bool {
        self.content_type == ContentType::Movie
    }

    pub fn is_show(&self) -> bool {
        self.content_type == ContentType::Show
    }

    /// Grouping key for franchise/series deduplication
    ///
    /// Uses the series title when present, otherwise the item's own title,
    /// lowercased.
    pub fn series_key(&self) -> String {
        self.series_title
            .as_deref()
            .unwrap_or(&self.title)
            .to_lowercase()
    }

    /// Item genres trimmed and lowercased, regardless of how they were loaded
    pub fn normalized_genres(&self) -> BTreeSet<String> {
        self.genres.iter().map(|g| normalize_tag(g)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_id_display() {
        let id = ItemId::new("plex-4821");
        assert_eq!(format!("{}", id), "plex-4821");
    }

    #[test]
    fn test_item_id_serde_transparent() {
        let id = ItemId::new("42");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, r#""42""#);
    }

    #[test]
    fn test_with_genres_normalizes() {
        let item = CatalogItem::movie("1", "Paddington 2").with_genres([" Comedy", "FAMILY "]);
        assert!(item.genres.contains("comedy"));
        assert!(item.genres.contains("family"));
    }

    #[test]
    fn test_series_key_prefers_series_title() {
        let episode = CatalogItem::show("e1", "Pilot").with_series_title("The Bear");
        assert_eq!(episode.series_key(), "the bear");

        let standalone = CatalogItem::movie("m1", "Heat");
        assert_eq!(standalone.series_key(), "heat");
    }

    #[test]
    fn test_with_last_recommended_at_leaves_original_untouched() {
        let original = CatalogItem::movie("1", "Heat");
        let stamped = original.clone().with_last_recommended_at(Some(Utc::now()));
        assert!(original.last_recommended_at.is_none());
        assert!(stamped.last_recommended_at.is_some());
    }

    #[test]
    fn test_content_type_serialization() {
        let item = CatalogItem::show("7", "Severance");
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["type"], "show");
        assert_eq!(json["id"], "7");
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let item: CatalogItem =
            serde_json::from_str(r#"{"id":"9","title":"Alien","type":"movie"}"#).unwrap();
        assert_eq!(item.duration_minutes, 0);
        assert_eq!(item.view_count, 0);
        assert!(item.summary.is_empty());
        assert!(item.series_title.is_none());
    }
}
