use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Recommendation, RecommendationInput};

/// Default number of records on one listing page
pub const DEFAULT_PAGE_SIZE: usize = 6;

/// The whole persisted dataset
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Document {
    /// Id handed to the next created record
    pub next_id: u64,
    /// Sorted, duplicate-free genre registry
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub recommendations: Vec<Recommendation>,
}

impl Default for Document {
    fn default() -> Self {
        Self {
            next_id: 1,
            genres: Vec::new(),
            recommendations: Vec::new(),
        }
    }
}

/// One page of the listing, newest first
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Page {
    pub items: Vec<Recommendation>,
    pub page: usize,
    pub per_page: usize,
    pub has_more: bool,
}

impl Document {
    /// Adds genre names missing from the registry and keeps it sorted.
    ///
    /// Names are trimmed; blank names are ignored. Returns how many were added.
    pub fn register_genres<'a, I>(&mut self, names: I) -> usize
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut added = 0;
        for name in names {
            let name = name.trim();
            if name.is_empty() || self.genres.iter().any(|g| g == name) {
                continue;
            }
            self.genres.push(name.to_string());
            added += 1;
        }
        self.genres.sort();
        self.genres.dedup();
        added
    }

    /// Appends a record built from `input` under the next free id
    pub fn insert(
        &mut self,
        input: RecommendationInput,
        added_at: DateTime<Utc>,
    ) -> Recommendation {
        self.register_genres(input.genres.iter().map(String::as_str));

        // A hand-edited file may carry a stale counter
        let id = match self.recommendations.iter().map(|r| r.id).max() {
            Some(max) if max >= self.next_id => max + 1,
            _ => self.next_id,
        };

        let rec = Recommendation::new(id, input, added_at);
        self.recommendations.push(rec.clone());
        self.next_id = id + 1;
        rec
    }

    /// Replaces the editable fields of record `id`; `None` if it doesn't exist
    pub fn update(&mut self, id: u64, input: RecommendationInput) -> Option<Recommendation> {
        let idx = self.recommendations.iter().position(|r| r.id == id)?;
        self.register_genres(input.genres.iter().map(String::as_str));

        let rec = &mut self.recommendations[idx];
        rec.apply(input);
        Some(rec.clone())
    }

    /// Removes record `id`, returning it if it was present
    pub fn remove(&mut self, id: u64) -> Option<Recommendation> {
        let idx = self.recommendations.iter().position(|r| r.id == id)?;
        Some(self.recommendations.remove(idx))
    }

    pub fn get(&self, id: u64) -> Option<&Recommendation> {
        self.recommendations.iter().find(|r| r.id == id)
    }

    /// Records ordered by `added_at` descending; ties keep insertion order
    fn newest_first<F>(&self, mut keep: F) -> Vec<&Recommendation>
    where
        F: FnMut(&Recommendation) -> bool,
    {
        let mut recs: Vec<&Recommendation> =
            self.recommendations.iter().filter(|r| keep(r)).collect();
        recs.sort_by(|a, b| b.added_at.cmp(&a.added_at));
        recs
    }

    /// Slices the newest-first listing into 1-based pages
    pub fn page(&self, page: usize, per_page: usize) -> Page {
        let page = page.max(1);
        let per_page = per_page.max(1);
        let recs = self.newest_first(|_| true);

        let start = (page - 1).saturating_mul(per_page);
        let end = start.saturating_add(per_page);

        let items = recs
            .iter()
            .skip(start)
            .take(per_page)
            .map(|r| (*r).clone())
            .collect();

        Page {
            items,
            page,
            per_page,
            has_more: end < recs.len(),
        }
    }

    /// Case-insensitive substring match on titles, newest first
    pub fn search(&self, query: &str) -> Vec<Recommendation> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }

        self.newest_first(|r| r.title.to_lowercase().contains(&needle))
            .into_iter()
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate, TimeZone};

    fn input(title: &str, genres: &[&str]) -> RecommendationInput {
        RecommendationInput {
            title: title.to_string(),
            year: Some(2000),
            rating: 7,
            genres: genres.iter().map(|g| g.to_string()).collect(),
            watched_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            poster_url: None,
            platform: None,
            review: "Fine.".to_string(),
            watched: true,
            rewatch: false,
        }
    }

    fn at(minutes: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::minutes(minutes)
    }

    fn with_titles(titles: &[&str]) -> Document {
        let mut doc = Document::default();
        for (i, title) in titles.iter().enumerate() {
            doc.insert(input(title, &[]), at(i as i64));
        }
        doc
    }

    #[test]
    fn test_default_document() {
        let doc = Document::default();
        assert_eq!(doc.next_id, 1);
        assert!(doc.genres.is_empty());
        assert!(doc.recommendations.is_empty());
    }

    #[test]
    fn test_insert_assigns_next_id() {
        let mut doc = Document::default();
        let first = doc.insert(input("Heat", &[]), at(0));
        let second = doc.insert(input("Ronin", &[]), at(1));

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(doc.next_id, 3);
        assert_eq!(doc.recommendations.len(), 2);
    }

    #[test]
    fn test_insert_repairs_stale_counter() {
        let mut doc = with_titles(&["Heat", "Ronin"]);
        doc.next_id = 1;

        let rec = doc.insert(input("Collateral", &[]), at(5));
        assert_eq!(rec.id, 3);
        assert_eq!(doc.next_id, 4);
    }

    #[test]
    fn test_register_genres_sorted_and_deduplicated() {
        let mut doc = Document::default();
        doc.register_genres(["Thriller", " Drama ", ""]);
        let added = doc.register_genres(["Drama", "Action", "Thriller"]);

        assert_eq!(added, 1);
        assert_eq!(doc.genres, vec!["Action", "Drama", "Thriller"]);
    }

    #[test]
    fn test_insert_and_update_register_genres() {
        let mut doc = Document::default();
        let rec = doc.insert(input("Alien", &["Sci-Fi", "Horror"]), at(0));
        assert_eq!(doc.genres, vec!["Horror", "Sci-Fi"]);

        doc.update(rec.id, input("Alien", &["Horror", "Classic"])).unwrap();
        assert_eq!(doc.genres, vec!["Classic", "Horror", "Sci-Fi"]);
    }

    #[test]
    fn test_update_missing_returns_none() {
        let mut doc = with_titles(&["Heat"]);
        assert!(doc.update(42, input("Nope", &[])).is_none());
        assert_eq!(doc.recommendations[0].title, "Heat");
    }

    #[test]
    fn test_remove() {
        let mut doc = with_titles(&["Heat", "Ronin"]);
        let before = doc.clone();

        assert!(doc.remove(99).is_none());
        assert_eq!(doc, before);

        let removed = doc.remove(1).unwrap();
        assert_eq!(removed.title, "Heat");
        assert_eq!(doc.recommendations.len(), 1);
        assert_eq!(doc.next_id, 3);
    }

    #[test]
    fn test_page_splits_newest_first() {
        let titles: Vec<String> = (1..=10).map(|i| format!("Film {}", i)).collect();
        let refs: Vec<&str> = titles.iter().map(String::as_str).collect();
        let doc = with_titles(&refs);

        let first = doc.page(1, 6);
        let names: Vec<&str> = first.items.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(
            names,
            vec!["Film 10", "Film 9", "Film 8", "Film 7", "Film 6", "Film 5"]
        );
        assert!(first.has_more);

        let second = doc.page(2, 6);
        let names: Vec<&str> = second.items.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(names, vec!["Film 4", "Film 3", "Film 2", "Film 1"]);
        assert!(!second.has_more);
    }

    #[test]
    fn test_page_out_of_range() {
        let doc = with_titles(&["Heat"]);

        let page = doc.page(5, 6);
        assert!(page.items.is_empty());
        assert!(!page.has_more);

        let clamped = doc.page(0, 6);
        assert_eq!(clamped.page, 1);
        assert_eq!(clamped.items.len(), 1);
    }

    #[test]
    fn test_page_exact_fit_has_no_more() {
        let doc = with_titles(&["A", "B", "C", "D", "E", "F"]);
        let page = doc.page(1, DEFAULT_PAGE_SIZE);
        assert_eq!(page.items.len(), 6);
        assert!(!page.has_more);
    }

    #[test]
    fn test_search_case_insensitive_newest_first() {
        let doc = with_titles(&["The Matrix", "Heat", "Matrix Reloaded", "Amélie"]);

        let hits = doc.search("matrix");
        let names: Vec<&str> = hits.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(names, vec!["Matrix Reloaded", "The Matrix"]);

        assert_eq!(doc.search("MATRIX").len(), 2);
        assert!(doc.search("godfather").is_empty());
        assert!(doc.search("   ").is_empty());
    }

    #[test]
    fn test_search_ignores_review_text() {
        let mut doc = Document::default();
        let mut rec = input("Heat", &[]);
        rec.review = "Better than The Matrix".to_string();
        doc.insert(rec, at(0));

        assert!(doc.search("matrix").is_empty());
    }

    #[test]
    fn test_ties_keep_insertion_order() {
        let mut doc = Document::default();
        doc.insert(input("First", &[]), at(0));
        doc.insert(input("Second", &[]), at(0));

        let page = doc.page(1, 6);
        assert_eq!(page.items[0].title, "First");
        assert_eq!(page.items[1].title, "Second");
    }
}
