use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use foodgram_db::is_unique_violation;
use foodgram_sdk::User;
use sea_orm::{
    ActiveValue, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect,
};

use crate::domain::error::DomainError;
use crate::domain::repos::{RecipeRelation, RelationsRepository, Window};
use crate::domain::views::Paged;

use super::db::db_err;
use super::entity::{favorite, shopping_cart, subscription, user};

/// SeaORM-backed favorites, shopping carts and subscriptions.
#[derive(Clone, Default)]
pub struct OrmRelationsRepository;

impl OrmRelationsRepository {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

fn inserted(res: Result<(), sea_orm::DbErr>) -> Result<bool, DomainError> {
    match res {
        Ok(()) => Ok(true),
        Err(e) if is_unique_violation(&e) => Ok(false),
        Err(e) => Err(db_err(e)),
    }
}

#[async_trait]
impl RelationsRepository for OrmRelationsRepository {
    async fn add_recipe<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        kind: RecipeRelation,
        user_id: i64,
        recipe_id: i64,
    ) -> Result<bool, DomainError> {
        let res = match kind {
            RecipeRelation::Favorite => favorite::Entity::insert(favorite::ActiveModel {
                id: ActiveValue::NotSet,
                user_id: ActiveValue::Set(user_id),
                recipe_id: ActiveValue::Set(recipe_id),
            })
            .exec(conn)
            .await
            .map(|_| ()),
            RecipeRelation::ShoppingCart => {
                shopping_cart::Entity::insert(shopping_cart::ActiveModel {
                    id: ActiveValue::NotSet,
                    user_id: ActiveValue::Set(user_id),
                    recipe_id: ActiveValue::Set(recipe_id),
                })
                .exec(conn)
                .await
                .map(|_| ())
            }
        };
        inserted(res)
    }

    async fn remove_recipe<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        kind: RecipeRelation,
        user_id: i64,
        recipe_id: i64,
    ) -> Result<bool, DomainError> {
        let res = match kind {
            RecipeRelation::Favorite => {
                favorite::Entity::delete_many()
                    .filter(favorite::Column::UserId.eq(user_id))
                    .filter(favorite::Column::RecipeId.eq(recipe_id))
                    .exec(conn)
                    .await
            }
            RecipeRelation::ShoppingCart => {
                shopping_cart::Entity::delete_many()
                    .filter(shopping_cart::Column::UserId.eq(user_id))
                    .filter(shopping_cart::Column::RecipeId.eq(recipe_id))
                    .exec(conn)
                    .await
            }
        }
        .map_err(db_err)?;
        Ok(res.rows_affected > 0)
    }

    async fn recipes_among<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        kind: RecipeRelation,
        user_id: i64,
        recipe_ids: &[i64],
    ) -> Result<HashSet<i64>, DomainError> {
        if recipe_ids.is_empty() {
            return Ok(HashSet::new());
        }
        let ids = recipe_ids.iter().copied();
        let found: Vec<i64> = match kind {
            RecipeRelation::Favorite => {
                favorite::Entity::find()
                    .select_only()
                    .column(favorite::Column::RecipeId)
                    .filter(favorite::Column::UserId.eq(user_id))
                    .filter(favorite::Column::RecipeId.is_in(ids))
                    .into_tuple()
                    .all(conn)
                    .await
            }
            RecipeRelation::ShoppingCart => {
                shopping_cart::Entity::find()
                    .select_only()
                    .column(shopping_cart::Column::RecipeId)
                    .filter(shopping_cart::Column::UserId.eq(user_id))
                    .filter(shopping_cart::Column::RecipeId.is_in(ids))
                    .into_tuple()
                    .all(conn)
                    .await
            }
        }
        .map_err(db_err)?;
        Ok(found.into_iter().collect())
    }

    async fn subscribe<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        user_id: i64,
        author_id: i64,
    ) -> Result<bool, DomainError> {
        let res = subscription::Entity::insert(subscription::ActiveModel {
            id: ActiveValue::NotSet,
            user_id: ActiveValue::Set(user_id),
            author_id: ActiveValue::Set(author_id),
        })
        .exec(conn)
        .await
        .map(|_| ());
        inserted(res)
    }

    async fn unsubscribe<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        user_id: i64,
        author_id: i64,
    ) -> Result<bool, DomainError> {
        let res = subscription::Entity::delete_many()
            .filter(subscription::Column::UserId.eq(user_id))
            .filter(subscription::Column::AuthorId.eq(author_id))
            .exec(conn)
            .await
            .map_err(db_err)?;
        Ok(res.rows_affected > 0)
    }

    async fn subscribed_among<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        user_id: i64,
        author_ids: &[i64],
    ) -> Result<HashSet<i64>, DomainError> {
        if author_ids.is_empty() {
            return Ok(HashSet::new());
        }
        let found: Vec<i64> = subscription::Entity::find()
            .select_only()
            .column(subscription::Column::AuthorId)
            .filter(subscription::Column::UserId.eq(user_id))
            .filter(subscription::Column::AuthorId.is_in(author_ids.iter().copied()))
            .into_tuple()
            .all(conn)
            .await
            .map_err(db_err)?;
        Ok(found.into_iter().collect())
    }

    async fn authors_page<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        user_id: i64,
        window: Window,
    ) -> Result<Paged<User>, DomainError> {
        let followed = subscription::Entity::find().filter(subscription::Column::UserId.eq(user_id));
        let total = followed.clone().count(conn).await.map_err(db_err)?;
        let author_ids: Vec<i64> = followed
            .select_only()
            .column(subscription::Column::AuthorId)
            .order_by_asc(subscription::Column::Id)
            .offset(window.offset)
            .limit(window.limit)
            .into_tuple()
            .all(conn)
            .await
            .map_err(db_err)?;

        if author_ids.is_empty() {
            return Ok(Paged {
                items: Vec::new(),
                total,
            });
        }

        let mut by_id: HashMap<i64, User> = user::Entity::find()
            .filter(user::Column::Id.is_in(author_ids.iter().copied()))
            .all(conn)
            .await
            .map_err(db_err)?
            .into_iter()
            .map(|m| (m.id, User::from(m)))
            .collect();

        let items = author_ids
            .into_iter()
            .filter_map(|id| by_id.remove(&id))
            .collect();
        Ok(Paged { items, total })
    }
}
