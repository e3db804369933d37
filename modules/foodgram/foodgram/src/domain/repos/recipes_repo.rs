use std::collections::HashMap;

use async_trait::async_trait;
use foodgram_sdk::{IngredientAmount, NewRecipe, Recipe, RecipePatch, RecipeShort, ShoppingListLine};
use sea_orm::ConnectionTrait;

use crate::domain::error::DomainError;
use crate::domain::repos::Window;
use crate::domain::views::Paged;

/// Resolved listing filter; relation filters carry the caller id.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecipeQuery {
    pub author: Option<i64>,
    pub favorited_by: Option<i64>,
    pub in_cart_of: Option<i64>,
}

/// The recipe ledger: recipes and their ingredient sets.
#[async_trait]
pub trait RecipesRepository: Send + Sync {
    async fn get<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        id: i64,
    ) -> Result<Option<Recipe>, DomainError>;

    async fn author_of<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        id: i64,
    ) -> Result<Option<i64>, DomainError>;

    /// Newest first.
    async fn list_page<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        query: RecipeQuery,
        window: Window,
    ) -> Result<Paged<Recipe>, DomainError>;

    /// Insert the recipe row only; returns its id.
    async fn insert<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        author_id: i64,
        recipe: &NewRecipe,
    ) -> Result<i64, DomainError>;

    /// Apply the scalar fields of `patch`; ingredients are ignored here.
    async fn update_fields<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        id: i64,
        patch: &RecipePatch,
    ) -> Result<(), DomainError>;

    /// Replace the whole ingredient set of a recipe.
    async fn replace_ingredients<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        recipe_id: i64,
        items: &[IngredientAmount],
    ) -> Result<(), DomainError>;

    /// Delete the recipe with its ingredient rows and relation rows.
    async fn delete<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        id: i64,
    ) -> Result<bool, DomainError>;

    /// Newest-first short forms of one author's recipes.
    async fn short_by_author<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        author_id: i64,
        limit: Option<u64>,
    ) -> Result<Vec<RecipeShort>, DomainError>;

    async fn count_by_authors<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        author_ids: &[i64],
    ) -> Result<HashMap<i64, u64>, DomainError>;

    /// Cart contents of `user_id` grouped by (name, unit) with summed amounts.
    async fn shopping_list<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        user_id: i64,
    ) -> Result<Vec<ShoppingListLine>, DomainError>;
}
