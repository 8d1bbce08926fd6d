use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::ContentType;

/// How much time the user has for this session
///
/// Parsing is permissive: unknown values become `Unconstrained` rather than an
/// error, so new client options degrade to "no time preference".
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum TimeBudget {
    #[serde(rename = "under_1h")]
    Under1h,
    OneToTwoH,
    TwoPlusH,
    /// Binge mode
    OpenEnded,
    Unconstrained,
}

impl From<&str> for TimeBudget {
    fn from(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "under_1h" => TimeBudget::Under1h,
            "one_to_two_h" | "1_2h" => TimeBudget::OneToTwoH,
            "two_plus_h" | "2plus" => TimeBudget::TwoPlusH,
            "open_ended" | "open" => TimeBudget::OpenEnded,
            _ => TimeBudget::Unconstrained,
        }
    }
}

impl From<String> for TimeBudget {
    fn from(value: String) -> Self {
        TimeBudget::from(value.as_str())
    }
}

/// Requested content format
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum FormatPreference {
    Movie,
    Show,
    Any,
}

impl FormatPreference {
    /// The content type this format strictly requires, if any
    pub fn required_type(&self) -> Option<ContentType> {
        match self {
            FormatPreference::Movie => Some(ContentType::Movie),
            FormatPreference::Show => Some(ContentType::Show),
            FormatPreference::Any => None,
        }
    }

    /// Whether an item of `content_type` is allowed by this format
    pub fn admits(&self, content_type: ContentType) -> bool {
        self.required_type().map_or(true, |t| t == content_type)
    }
}

impl From<&str> for FormatPreference {
    fn from(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "movie" => FormatPreference::Movie,
            "show" => FormatPreference::Show,
            _ => FormatPreference::Any,
        }
    }
}

impl From<String> for FormatPreference {
    fn from(value: String) -> Self {
        FormatPreference::from(value.as_str())
    }
}

/// One user's session intent
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Preferences {
    pub time_budget: TimeBudget,
    /// Mood tags, e.g. "light_funny"
    #[serde(default)]
    pub moods: BTreeSet<String>,
    /// Extra genre constraint, empty means unconstrained
    #[serde(default)]
    pub genres: BTreeSet<String>,
    pub format: FormatPreference,
    #[serde(default)]
    pub comfort_mode: bool,
    #[serde(default)]
    pub surprise: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self::new(TimeBudget::OneToTwoH, FormatPreference::Any)
    }
}

impl Preferences {
    /// Creates preferences with no moods, genres or toggles
    pub fn new(time_budget: TimeBudget, format: FormatPreference) -> Self {
        Self {
            time_budget,
            moods: BTreeSet::new(),
            genres: BTreeSet::new(),
            format,
            comfort_mode: false,
            surprise: false,
        }
    }

    pub fn with_moods<I, S>(mut self, moods: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.moods = moods.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_genres<I, S>(mut self, genres: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.genres = genres.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_comfort_mode(mut self, comfort_mode: bool) -> Self {
        self.comfort_mode = comfort_mode;
        self
    }

    /// Toggles the surprise pick without touching the rest of the session
    pub fn with_surprise(mut self, surprise: bool) -> Self {
        self.surprise = surprise;
        self
    }

    pub fn is_binge(&self) -> bool {
        self.time_budget == TimeBudget::OpenEnded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_budget_accepts_short_forms() {
        assert_eq!(TimeBudget::from("1_2h"), TimeBudget::OneToTwoH);
        assert_eq!(TimeBudget::from("2plus"), TimeBudget::TwoPlusH);
        assert_eq!(TimeBudget::from("open"), TimeBudget::OpenEnded);
        assert_eq!(TimeBudget::from("under_1h"), TimeBudget::Under1h);
    }

    #[test]
    fn test_unknown_values_are_permissive() {
        assert_eq!(TimeBudget::from("whenever"), TimeBudget::Unconstrained);
        assert_eq!(FormatPreference::from("documentary"), FormatPreference::Any);
    }

    #[test]
    fn test_preferences_deserialize() {
        let prefs: Preferences = serde_json::from_str(
            r#"{"time_budget":"open_ended","moods":["intense"],"format":"show"}"#,
        )
        .unwrap();
        assert!(prefs.is_binge());
        assert_eq!(prefs.format, FormatPreference::Show);
        assert!(prefs.genres.is_empty());
        assert!(!prefs.comfort_mode);
    }

    #[test]
    fn test_time_budget_serialization() {
        let json = serde_json::to_string(&TimeBudget::OneToTwoH).unwrap();
        assert_eq!(json, "\"one_to_two_h\"");
        let json = serde_json::to_string(&TimeBudget::Under1h).unwrap();
        assert_eq!(json, "\"under_1h\"");
    }

    #[test]
    fn test_format_admits() {
        assert!(FormatPreference::Any.admits(ContentType::Show));
        assert!(FormatPreference::Movie.admits(ContentType::Movie));
        assert!(!FormatPreference::Movie.admits(ContentType::Show));
    }

    #[test]
    fn test_with_surprise_keeps_other_fields() {
        let prefs = Preferences::new(TimeBudget::TwoPlusH, FormatPreference::Movie)
            .with_moods(["emotional"])
            .with_surprise(true);
        assert!(prefs.surprise);
        assert!(prefs.moods.contains("emotional"));
        assert_eq!(prefs.time_budget, TimeBudget::TwoPlusH);
    }
}
