pub mod genres;
pub mod recommendations;
pub mod validation;

pub use genres::GenreRegistry;
pub use recommendations::RecommendationService;
pub use validation::{FieldErrors, RecommendationForm};

/// Result of a request-level operation that isn't a server failure
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Success(T),
    /// The submitted input broke a constraint; nothing was persisted
    Invalid(FieldErrors),
    /// No record with the requested id
    NotFound,
}
