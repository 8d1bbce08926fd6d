use serde::{Deserialize, Serialize};

use super::CatalogItem;

/// A catalog item paired with its desirability score
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ScoredItem {
    pub item: CatalogItem,
    pub score: i32,
    /// Set when the item violates the strict format preference. A
    /// disqualified item never reaches the output regardless of score.
    pub disqualified: bool,
}

/// Final output of one pipeline run
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Recommendations {
    /// Flat ranked list, at most 3 items
    Normal { items: Vec<CatalogItem> },
    /// Open-ended sessions: up to 3 franchise-distinct movies and 3
    /// series-distinct shows
    Binge {
        movies: Vec<CatalogItem>,
        shows: Vec<CatalogItem>,
    },
}

impl Recommendations {
    /// All recommended items, movies before shows in binge mode
    pub fn items(&self) -> Vec<&CatalogItem> {
        match self {
            Recommendations::Normal { items } => items.iter().collect(),
            Recommendations::Binge { movies, shows } => movies.iter().chain(shows.iter()).collect(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Recommendations::Normal { items } => items.len(),
            Recommendations::Binge { movies, shows } => movies.len() + shows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Applies `f` to every item, keeping the output shape
    pub fn map_items<F>(self, mut f: F) -> Self
    where
        F: FnMut(CatalogItem) -> CatalogItem,
    {
        match self {
            Recommendations::Normal { items } => Recommendations::Normal {
                items: items.into_iter().map(&mut f).collect(),
            },
            Recommendations::Binge { movies, shows } => Recommendations::Binge {
                movies: movies.into_iter().map(&mut f).collect(),
                shows: shows.into_iter().map(&mut f).collect(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normal_serialization() {
        let recs = Recommendations::Normal {
            items: vec![CatalogItem::movie("1", "Heat")],
        };
        let json = serde_json::to_value(&recs).unwrap();
        assert_eq!(json["mode"], "normal");
        assert_eq!(json["items"][0]["title"], "Heat");
    }

    #[test]
    fn test_binge_items_flatten_movies_first() {
        let recs = Recommendations::Binge {
            movies: vec![CatalogItem::movie("m", "Heat")],
            shows: vec![CatalogItem::show("s", "Severance")],
        };
        let titles: Vec<&str> = recs.items().iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["Heat", "Severance"]);
        assert_eq!(recs.len(), 2);

        let json = serde_json::to_value(&recs).unwrap();
        assert_eq!(json["mode"], "binge");
        assert_eq!(json["shows"][0]["type"], "show");
    }
}
