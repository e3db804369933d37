use std::collections::HashSet;

use async_trait::async_trait;
use foodgram_sdk::{Ingredient, NewIngredient};
use sea_orm::ConnectionTrait;

use crate::domain::error::DomainError;

#[async_trait]
pub trait IngredientsRepository: Send + Sync {
    /// Catalog ordered by name; `name_prefix` matches case-insensitively at the start.
    async fn search<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        name_prefix: Option<&str>,
    ) -> Result<Vec<Ingredient>, DomainError>;

    async fn get<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        id: i64,
    ) -> Result<Option<Ingredient>, DomainError>;

    /// Subset of `ids` present in the catalog.
    async fn existing_ids<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        ids: &[i64],
    ) -> Result<HashSet<i64>, DomainError>;

    /// Insert unless `(name, measurement_unit)` exists. Returns whether a row was created.
    async fn insert_if_missing<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        item: &NewIngredient,
    ) -> Result<bool, DomainError>;
}
