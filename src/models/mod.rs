mod document;
mod recommendation;

pub use document::{Document, Page, DEFAULT_PAGE_SIZE};
pub use recommendation::{Recommendation, RecommendationInput};
