use std::collections::{BTreeSet, HashMap};

/// Genres, summary keywords and conflicting genres associated with a mood
#[derive(Debug, Clone, PartialEq)]
pub struct MoodDefinition {
    pub genres: BTreeSet<String>,
    /// Substrings matched case-insensitively against item summaries
    pub keywords: Vec<String>,
    pub conflicting_genres: BTreeSet<String>,
}

impl MoodDefinition {
    fn new(genres: &[&str], keywords: &[&str], conflicting_genres: &[&str]) -> Self {
        Self {
            genres: genres.iter().map(|g| g.to_string()).collect(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            conflicting_genres: conflicting_genres.iter().map(|g| g.to_string()).collect(),
        }
    }

    /// Whether any keyword occurs in `summary` (already lowercased)
    pub fn matches_summary(&self, summary: &str) -> bool {
        self.keywords.iter().any(|k| summary.contains(k.as_str()))
    }

    pub fn conflicts_with(&self, genres: &BTreeSet<String>) -> bool {
        !self.conflicting_genres.is_disjoint(genres)
    }
}

/// Immutable mood tag → definition table
///
/// Built once at startup and shared by reference. Lookups of unknown tags
/// return `None` so clients can send tags the server does not know yet.
#[derive(Debug, Clone)]
pub struct MoodTaxonomy {
    moods: HashMap<String, MoodDefinition>,
}

impl Default for MoodTaxonomy {
    fn default() -> Self {
        Self::standard()
    }
}

impl MoodTaxonomy {
    /// The four canonical moods offered by the client
    pub fn standard() -> Self {
        let mut moods = HashMap::new();
        moods.insert(
            "light_funny".to_string(),
            MoodDefinition::new(
                &["comedy", "family", "animation"],
                &[
                    "funny", "witty", "light", "humor", "hilarious", "feel-good", "uplifting",
                    "charming", "quirky",
                ],
                &["horror", "thriller", "war"],
            ),
        );
        moods.insert(
            "intense".to_string(),
            MoodDefinition::new(
                &["action", "thriller", "crime", "war"],
                &[
                    "intense", "gripping", "suspense", "adrenaline", "high-stakes", "explosive",
                    "danger", "chase", "battle",
                ],
                &["animation", "family", "comedy"],
            ),
        );
        moods.insert(
            "emotional".to_string(),
            MoodDefinition::new(
                &["drama", "romance"],
                &[
                    "emotional", "heartfelt", "poignant", "tearjerker", "moving", "touching",
                    "love", "relationship", "loss",
                ],
                &["action", "war", "horror"],
            ),
        );
        moods.insert(
            "dramatic".to_string(),
            MoodDefinition::new(
                &["mystery", "history", "music", "fantasy", "science fiction"],
                &[
                    "dramatic", "twist", "mystery", "historical", "epic", "musical",
                    "fantastical", "sci-fi", "imaginative", "legendary",
                ],
                &["animation", "family", "comedy"],
            ),
        );
        Self { moods }
    }

    /// Builds a taxonomy from arbitrary definitions
    pub fn from_definitions<I>(definitions: I) -> Self
    where
        I: IntoIterator<Item = (String, MoodDefinition)>,
    {
        Self {
            moods: definitions.into_iter().collect(),
        }
    }

    pub fn get(&self, tag: &str) -> Option<&MoodDefinition> {
        self.moods.get(tag)
    }

    /// Known definitions for the given tags, unknown tags skipped
    pub fn resolve<'a, I>(&'a self, tags: I) -> Vec<&'a MoodDefinition>
    where
        I: IntoIterator<Item = &'a String>,
    {
        tags.into_iter().filter_map(|tag| self.get(tag)).collect()
    }

    pub fn len(&self) -> usize {
        self.moods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moods.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_has_four_moods() {
        let taxonomy = MoodTaxonomy::standard();
        assert_eq!(taxonomy.len(), 4);
        for tag in ["light_funny", "intense", "emotional", "dramatic"] {
            let mood = taxonomy.get(tag).unwrap();
            assert!(!mood.genres.is_empty());
            assert!(!mood.keywords.is_empty());
            assert!(!mood.conflicting_genres.is_empty());
        }
    }

    #[test]
    fn test_unknown_tag_is_ignored() {
        let taxonomy = MoodTaxonomy::standard();
        let tags = vec!["cozy".to_string(), "intense".to_string()];
        let resolved = taxonomy.resolve(&tags);
        assert_eq!(resolved.len(), 1);
        assert!(resolved[0].genres.contains("thriller"));
    }

    #[test]
    fn test_matches_summary() {
        let taxonomy = MoodTaxonomy::standard();
        let light = taxonomy.get("light_funny").unwrap();
        assert!(light.matches_summary("a quirky road trip"));
        assert!(!light.matches_summary("a bleak siege"));
    }

    #[test]
    fn test_conflicts_with() {
        let taxonomy = MoodTaxonomy::standard();
        let emotional = taxonomy.get("emotional").unwrap();
        let genres: BTreeSet<String> = ["war".to_string(), "drama".to_string()].into();
        assert!(emotional.conflicts_with(&genres));
    }
}
