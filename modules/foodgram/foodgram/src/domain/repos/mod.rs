//! Persistence contracts used by the domain services.
//!
//! All methods accept `conn: &C`, a plain connection or a transaction, so the
//! services decide the transactional boundary.

mod ingredients_repo;
mod recipes_repo;
mod relations_repo;
mod users_repo;

pub use ingredients_repo::IngredientsRepository;
pub use recipes_repo::{RecipeQuery, RecipesRepository};
pub use relations_repo::{RecipeRelation, RelationsRepository};
pub use users_repo::{NewUserRecord, UsersRepository};

/// Offset window of an ordered listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub offset: u64,
    pub limit: u64,
}
