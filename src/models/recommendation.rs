use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

/// One watched title with its rating, genres and review
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Recommendation {
    pub id: u64,
    pub title: String,
    pub year: Option<i32>,
    pub rating: u8,
    /// Genre names in the order they were entered
    #[serde(default)]
    pub genres: Vec<String>,
    pub watched_date: NaiveDate,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub poster_url: Option<String>,
    /// Where it was watched (cinema, streaming service, ...)
    #[serde(default, deserialize_with = "empty_as_none")]
    pub platform: Option<String>,
    /// Markdown source of the review
    pub review: String,
    #[serde(default)]
    pub watched: bool,
    #[serde(default)]
    pub rewatch: bool,
    #[serde(with = "timestamp")]
    pub added_at: DateTime<Utc>,
}

impl Recommendation {
    /// Builds a new record from validated input
    pub fn new(id: u64, input: RecommendationInput, added_at: DateTime<Utc>) -> Self {
        Self {
            id,
            title: input.title,
            year: input.year,
            rating: input.rating,
            genres: input.genres,
            watched_date: input.watched_date,
            poster_url: input.poster_url,
            platform: input.platform,
            review: input.review,
            watched: input.watched,
            rewatch: input.rewatch,
            added_at,
        }
    }

    /// Overwrites every editable field, leaving `id` and `added_at` untouched
    pub fn apply(&mut self, input: RecommendationInput) {
        self.title = input.title;
        self.year = input.year;
        self.rating = input.rating;
        self.genres = input.genres;
        self.watched_date = input.watched_date;
        self.poster_url = input.poster_url;
        self.platform = input.platform;
        self.review = input.review;
        self.watched = input.watched;
        self.rewatch = input.rewatch;
    }
}

/// Typed, not yet validated contents of the add/edit form
#[derive(Debug, Clone, PartialEq, Validate)]
pub struct RecommendationInput {
    #[validate(length(min = 1, message = "This field is required."))]
    pub title: String,

    #[validate(range(min = 1900, message = "Number must be at least 1900."))]
    pub year: Option<i32>,

    #[validate(range(min = 1, max = 10, message = "Not a valid choice."))]
    pub rating: u8,

    pub genres: Vec<String>,

    pub watched_date: NaiveDate,

    #[validate(url(message = "Invalid URL."))]
    pub poster_url: Option<String>,

    pub platform: Option<String>,

    #[validate(length(min = 1, message = "This field is required."))]
    pub review: String,

    pub watched: bool,

    pub rewatch: bool,
}

fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

/// Serde adapter for `added_at`.
///
/// Writes RFC 3339 in UTC. Reads RFC 3339 or a naive ISO-8601 datetime
/// without an offset, which older data files contain; naive values are UTC.
pub(crate) mod timestamp {
    use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::AutoSi, true))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).map_err(serde::de::Error::custom)
    }

    pub fn parse(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
        match DateTime::parse_from_rfc3339(raw) {
            Ok(dt) => Ok(dt.with_timezone(&Utc)),
            Err(_) => NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f").map(|n| n.and_utc()),
        }
    }
}
