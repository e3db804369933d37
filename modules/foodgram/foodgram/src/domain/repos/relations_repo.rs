use std::collections::HashSet;

use async_trait::async_trait;
use foodgram_sdk::User;
use sea_orm::ConnectionTrait;

use crate::domain::error::DomainError;
use crate::domain::repos::Window;
use crate::domain::views::Paged;

/// User-to-recipe join tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecipeRelation {
    Favorite,
    ShoppingCart,
}

/// Favorites, shopping carts and subscriptions.
///
/// `add_*` returns `false` when the pair already exists, as reported by the
/// unique constraint; `remove_*` returns `false` when nothing was deleted.
#[async_trait]
pub trait RelationsRepository: Send + Sync {
    async fn add_recipe<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        kind: RecipeRelation,
        user_id: i64,
        recipe_id: i64,
    ) -> Result<bool, DomainError>;

    async fn remove_recipe<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        kind: RecipeRelation,
        user_id: i64,
        recipe_id: i64,
    ) -> Result<bool, DomainError>;

    /// Which of `recipe_ids` are in the user's `kind` relation.
    async fn recipes_among<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        kind: RecipeRelation,
        user_id: i64,
        recipe_ids: &[i64],
    ) -> Result<HashSet<i64>, DomainError>;

    async fn subscribe<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        user_id: i64,
        author_id: i64,
    ) -> Result<bool, DomainError>;

    async fn unsubscribe<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        user_id: i64,
        author_id: i64,
    ) -> Result<bool, DomainError>;

    /// Which of `author_ids` the user follows.
    async fn subscribed_among<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        user_id: i64,
        author_ids: &[i64],
    ) -> Result<HashSet<i64>, DomainError>;

    /// Followed authors in subscription order.
    async fn authors_page<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        user_id: i64,
        window: Window,
    ) -> Result<Paged<User>, DomainError>;
}
