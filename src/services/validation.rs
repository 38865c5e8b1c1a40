use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;
use validator::Validate;

use crate::models::{Recommendation, RecommendationInput};

const REQUIRED: &str = "This field is required.";
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Field name -> messages for a rejected form
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Messages for `field`, empty when it passed
    pub fn get(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn has(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// Adds the messages of `other` for fields not already flagged here
    fn merge_missing(&mut self, other: FieldErrors) {
        for (field, messages) in other.0 {
            self.0.entry(field).or_insert(messages);
        }
    }
}

impl From<validator::ValidationErrors> for FieldErrors {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut out = FieldErrors::new();
        for (field, list) in errors.field_errors() {
            for error in list.iter() {
                let message = error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("Invalid value ({}).", error.code));
                out.add(&field.to_string(), message);
            }
        }
        out
    }
}

/// Checks the declared constraints of `input` plus non-blank text fields
pub fn check(input: &RecommendationInput) -> Result<(), FieldErrors> {
    let mut errors = match input.validate() {
        Ok(()) => FieldErrors::new(),
        Err(e) => FieldErrors::from(e),
    };

    if input.title.trim().is_empty() && !errors.has("title") {
        errors.add("title", REQUIRED);
    }
    if input.review.trim().is_empty() && !errors.has("review") {
        errors.add("review", REQUIRED);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Splits a comma separated list of genre names, dropping blanks
pub fn split_genres(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|g| !g.is_empty())
        .map(str::to_string)
        .collect()
}

/// Raw add/edit form as submitted by the browser
///
/// Keeps the submitted text so a rejected form can be shown again as typed.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RecommendationForm {
    pub title: String,
    pub year: String,
    pub rating: String,
    /// Genres picked from the registry
    pub genres: Vec<String>,
    /// Comma separated genres typed by hand
    pub new_genres: String,
    pub watched_date: String,
    pub poster_url: String,
    pub platform: String,
    pub review: String,
    pub watched: bool,
    pub rewatch: bool,
}

impl RecommendationForm {
    /// Empty add form: watched today, watched box ticked
    pub fn blank(today: NaiveDate) -> Self {
        Self {
            watched_date: today.format(DATE_FORMAT).to_string(),
            watched: true,
            ..Self::default()
        }
    }

    /// Builds the form from urlencoded pairs; `genres` may repeat
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut form = Self::default();
        for (key, value) in pairs {
            match key.as_str() {
                "title" => form.title = value,
                "year" => form.year = value,
                "rating" => form.rating = value,
                "genres" => form.genres.push(value),
                "new_genres" => form.new_genres = value,
                "watched_date" => form.watched_date = value,
                "poster_url" => form.poster_url = value,
                "platform" => form.platform = value,
                "review" => form.review = value,
                "watched" => form.watched = is_checked(&value),
                "rewatch" => form.rewatch = is_checked(&value),
                _ => {}
            }
        }
        form
    }

    /// Coerces the submitted text into a validated [`RecommendationInput`].
    ///
    /// `registered` is the genre registry; picked genres must come from it.
    pub fn parse(&self, registered: &[String]) -> Result<RecommendationInput, FieldErrors> {
        let mut errors = FieldErrors::new();

        let year = match self.year.trim() {
            "" => None,
            raw => match raw.parse::<i32>() {
                Ok(year) => Some(year),
                Err(_) => {
                    errors.add("year", "Not a valid integer value.");
                    None
                }
            },
        };

        let rating = match self.rating.trim() {
            "" => {
                errors.add("rating", REQUIRED);
                None
            }
            raw => match raw.parse::<u8>() {
                Ok(rating) => Some(rating),
                Err(_) => {
                    errors.add("rating", "Not a valid choice.");
                    None
                }
            },
        };

        let watched_date = match self.watched_date.trim() {
            "" => {
                errors.add("watched_date", REQUIRED);
                None
            }
            raw => match NaiveDate::parse_from_str(raw, DATE_FORMAT) {
                Ok(date) => Some(date),
                Err(_) => {
                    errors.add("watched_date", "Not a valid date value.");
                    None
                }
            },
        };

        for picked in &self.genres {
            if !registered.contains(picked) {
                errors.add("genres", format!("'{}' is not a valid choice.", picked));
            }
        }

        let mut genres: Vec<String> = Vec::new();
        for name in self.genres.iter().cloned().chain(split_genres(&self.new_genres)) {
            if !genres.contains(&name) {
                genres.push(name);
            }
        }

        // Free text is stored as typed; only blankness is judged trimmed
        let input = RecommendationInput {
            title: self.title.clone(),
            year,
            // Placeholders only matter when coercion already failed
            rating: rating.unwrap_or(1),
            genres,
            watched_date: watched_date.unwrap_or_default(),
            poster_url: non_blank(&self.poster_url),
            platform: non_blank(&self.platform),
            review: self.review.clone(),
            watched: self.watched,
            rewatch: self.rewatch,
        };

        if let Err(constraint_errors) = check(&input) {
            errors.merge_missing(constraint_errors);
        }

        if errors.is_empty() {
            Ok(input)
        } else {
            Err(errors)
        }
    }
}

impl From<&Recommendation> for RecommendationForm {
    fn from(rec: &Recommendation) -> Self {
        Self {
            title: rec.title.clone(),
            year: rec.year.map(|y| y.to_string()).unwrap_or_default(),
            rating: rec.rating.to_string(),
            genres: rec.genres.clone(),
            new_genres: String::new(),
            watched_date: rec.watched_date.format(DATE_FORMAT).to_string(),
            poster_url: rec.poster_url.clone().unwrap_or_default(),
            platform: rec.platform.clone().unwrap_or_default(),
            review: rec.review.clone(),
            watched: rec.watched,
            rewatch: rec.rewatch,
        }
    }
}

fn is_checked(value: &str) -> bool {
    !matches!(value.trim(), "" | "false")
}

fn non_blank(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}
