use std::collections::HashMap;

use async_trait::async_trait;
use foodgram_sdk::{
    IngredientAmount, NewRecipe, Recipe, RecipeIngredient, RecipePatch, RecipeShort,
    ShoppingListLine,
};
use sea_orm::sea_query::{Expr, Query, SelectStatement};
use sea_orm::{
    ActiveValue, ColumnTrait, ConnectionTrait, EntityTrait, FromQueryResult, JoinType,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait,
};
use time::OffsetDateTime;

use crate::domain::error::DomainError;
use crate::domain::repos::{RecipeQuery, RecipesRepository, Window};
use crate::domain::views::Paged;

use super::db::db_err;
use super::entity::recipe::{self, Entity as RecipeEntity};
use super::entity::{favorite, ingredient, recipe_ingredient, shopping_cart};
use super::mapper::recipe_from_parts;

/// SeaORM-backed recipe ledger.
#[derive(Clone, Default)]
pub struct OrmRecipesRepository;

impl OrmRecipesRepository {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[derive(Debug, FromQueryResult)]
struct IngredientLineRow {
    recipe_id: i64,
    id: i64,
    name: String,
    measurement_unit: String,
    amount: i32,
}

#[derive(Debug, FromQueryResult)]
struct ShoppingRow {
    name: String,
    measurement_unit: String,
    total: i64,
}

#[derive(Debug, FromQueryResult)]
struct AuthorCountRow {
    author_id: i64,
    recipes: i64,
}

fn favorited_by(user_id: i64) -> SelectStatement {
    Query::select()
        .column(favorite::Column::RecipeId)
        .from(favorite::Entity)
        .and_where(Expr::col(favorite::Column::UserId).eq(user_id))
        .to_owned()
}

fn in_cart_of(user_id: i64) -> SelectStatement {
    Query::select()
        .column(shopping_cart::Column::RecipeId)
        .from(shopping_cart::Entity)
        .and_where(Expr::col(shopping_cart::Column::UserId).eq(user_id))
        .to_owned()
}

/// Ingredient lines of the given recipes, joined with the catalog, in insertion order.
async fn load_lines<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    recipe_ids: &[i64],
) -> Result<HashMap<i64, Vec<RecipeIngredient>>, DomainError> {
    let mut by_recipe: HashMap<i64, Vec<RecipeIngredient>> = HashMap::new();
    if recipe_ids.is_empty() {
        return Ok(by_recipe);
    }

    let rows = recipe_ingredient::Entity::find()
        .select_only()
        .column(recipe_ingredient::Column::RecipeId)
        .column_as(ingredient::Column::Id, "id")
        .column_as(ingredient::Column::Name, "name")
        .column_as(ingredient::Column::MeasurementUnit, "measurement_unit")
        .column(recipe_ingredient::Column::Amount)
        .join(
            JoinType::InnerJoin,
            recipe_ingredient::Relation::Ingredient.def(),
        )
        .filter(recipe_ingredient::Column::RecipeId.is_in(recipe_ids.iter().copied()))
        .order_by_asc(recipe_ingredient::Column::Id)
        .into_model::<IngredientLineRow>()
        .all(conn)
        .await
        .map_err(db_err)?;

    for row in rows {
        by_recipe
            .entry(row.recipe_id)
            .or_default()
            .push(RecipeIngredient {
                id: row.id,
                name: row.name,
                measurement_unit: row.measurement_unit,
                amount: row.amount,
            });
    }
    Ok(by_recipe)
}

#[async_trait]
impl RecipesRepository for OrmRecipesRepository {
    async fn get<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        id: i64,
    ) -> Result<Option<Recipe>, DomainError> {
        let Some(row) = RecipeEntity::find_by_id(id).one(conn).await.map_err(db_err)? else {
            return Ok(None);
        };
        let mut lines = load_lines(conn, &[id]).await?;
        Ok(Some(recipe_from_parts(
            row,
            lines.remove(&id).unwrap_or_default(),
        )))
    }

    async fn author_of<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        id: i64,
    ) -> Result<Option<i64>, DomainError> {
        RecipeEntity::find_by_id(id)
            .select_only()
            .column(recipe::Column::AuthorId)
            .into_tuple::<i64>()
            .one(conn)
            .await
            .map_err(db_err)
    }

    async fn list_page<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        query: RecipeQuery,
        window: Window,
    ) -> Result<Paged<Recipe>, DomainError> {
        let mut select = RecipeEntity::find();
        if let Some(author) = query.author {
            select = select.filter(recipe::Column::AuthorId.eq(author));
        }
        if let Some(user_id) = query.favorited_by {
            select = select.filter(recipe::Column::Id.in_subquery(favorited_by(user_id)));
        }
        if let Some(user_id) = query.in_cart_of {
            select = select.filter(recipe::Column::Id.in_subquery(in_cart_of(user_id)));
        }

        let total = select.clone().count(conn).await.map_err(db_err)?;
        let rows = select
            .order_by_desc(recipe::Column::PubDate)
            .order_by_desc(recipe::Column::Id)
            .offset(window.offset)
            .limit(window.limit)
            .all(conn)
            .await
            .map_err(db_err)?;

        let ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
        let mut lines = load_lines(conn, &ids).await?;
        let items = rows
            .into_iter()
            .map(|row| {
                let own = lines.remove(&row.id).unwrap_or_default();
                recipe_from_parts(row, own)
            })
            .collect();

        Ok(Paged { items, total })
    }

    async fn insert<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        author_id: i64,
        recipe: &NewRecipe,
    ) -> Result<i64, DomainError> {
        let am = recipe::ActiveModel {
            id: ActiveValue::NotSet,
            author_id: ActiveValue::Set(author_id),
            name: ActiveValue::Set(recipe.name.clone()),
            image: ActiveValue::Set(recipe.image.clone()),
            text: ActiveValue::Set(recipe.text.clone()),
            cooking_time: ActiveValue::Set(recipe.cooking_time),
            pub_date: ActiveValue::Set(OffsetDateTime::now_utc()),
        };
        let res = RecipeEntity::insert(am).exec(conn).await.map_err(db_err)?;
        Ok(res.last_insert_id)
    }

    async fn update_fields<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        id: i64,
        patch: &RecipePatch,
    ) -> Result<(), DomainError> {
        let mut am = recipe::ActiveModel {
            id: ActiveValue::Unchanged(id),
            ..Default::default()
        };
        let mut touched = false;
        if let Some(name) = &patch.name {
            am.name = ActiveValue::Set(name.clone());
            touched = true;
        }
        if let Some(image) = &patch.image {
            am.image = ActiveValue::Set(image.clone());
            touched = true;
        }
        if let Some(text) = &patch.text {
            am.text = ActiveValue::Set(text.clone());
            touched = true;
        }
        if let Some(cooking_time) = patch.cooking_time {
            am.cooking_time = ActiveValue::Set(cooking_time);
            touched = true;
        }
        if !touched {
            return Ok(());
        }

        RecipeEntity::update(am).exec(conn).await.map_err(db_err)?;
        Ok(())
    }

    async fn replace_ingredients<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        recipe_id: i64,
        items: &[IngredientAmount],
    ) -> Result<(), DomainError> {
        recipe_ingredient::Entity::delete_many()
            .filter(recipe_ingredient::Column::RecipeId.eq(recipe_id))
            .exec(conn)
            .await
            .map_err(db_err)?;

        if items.is_empty() {
            return Ok(());
        }

        let rows = items.iter().map(|item| recipe_ingredient::ActiveModel {
            id: ActiveValue::NotSet,
            recipe_id: ActiveValue::Set(recipe_id),
            ingredient_id: ActiveValue::Set(item.ingredient_id),
            amount: ActiveValue::Set(item.amount),
        });
        recipe_ingredient::Entity::insert_many(rows)
            .exec(conn)
            .await
            .map_err(db_err)?;
        Ok(())
    }

    async fn delete<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        id: i64,
    ) -> Result<bool, DomainError> {
        recipe_ingredient::Entity::delete_many()
            .filter(recipe_ingredient::Column::RecipeId.eq(id))
            .exec(conn)
            .await
            .map_err(db_err)?;
        favorite::Entity::delete_many()
            .filter(favorite::Column::RecipeId.eq(id))
            .exec(conn)
            .await
            .map_err(db_err)?;
        shopping_cart::Entity::delete_many()
            .filter(shopping_cart::Column::RecipeId.eq(id))
            .exec(conn)
            .await
            .map_err(db_err)?;

        let res = RecipeEntity::delete_by_id(id)
            .exec(conn)
            .await
            .map_err(db_err)?;
        Ok(res.rows_affected > 0)
    }

    async fn short_by_author<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        author_id: i64,
        limit: Option<u64>,
    ) -> Result<Vec<RecipeShort>, DomainError> {
        let rows = RecipeEntity::find()
            .filter(recipe::Column::AuthorId.eq(author_id))
            .order_by_desc(recipe::Column::PubDate)
            .order_by_desc(recipe::Column::Id)
            .limit(limit)
            .all(conn)
            .await
            .map_err(db_err)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn count_by_authors<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        author_ids: &[i64],
    ) -> Result<HashMap<i64, u64>, DomainError> {
        if author_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let rows = RecipeEntity::find()
            .select_only()
            .column(recipe::Column::AuthorId)
            .column_as(
                Expr::col((recipe::Entity, recipe::Column::Id)).count(),
                "recipes",
            )
            .filter(recipe::Column::AuthorId.is_in(author_ids.iter().copied()))
            .group_by(recipe::Column::AuthorId)
            .into_model::<AuthorCountRow>()
            .all(conn)
            .await
            .map_err(db_err)?;

        Ok(rows
            .into_iter()
            .map(|r| (r.author_id, u64::try_from(r.recipes).unwrap_or(0)))
            .collect())
    }

    async fn shopping_list<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        user_id: i64,
    ) -> Result<Vec<ShoppingListLine>, DomainError> {
        let rows = recipe_ingredient::Entity::find()
            .select_only()
            .column_as(ingredient::Column::Name, "name")
            .column_as(ingredient::Column::MeasurementUnit, "measurement_unit")
            .column_as(
                Expr::col((recipe_ingredient::Entity, recipe_ingredient::Column::Amount)).sum(),
                "total",
            )
            .join(
                JoinType::InnerJoin,
                recipe_ingredient::Relation::Ingredient.def(),
            )
            .filter(recipe_ingredient::Column::RecipeId.in_subquery(in_cart_of(user_id)))
            .group_by(ingredient::Column::Name)
            .group_by(ingredient::Column::MeasurementUnit)
            .order_by_asc(ingredient::Column::Name)
            .order_by_asc(ingredient::Column::MeasurementUnit)
            .into_model::<ShoppingRow>()
            .all(conn)
            .await
            .map_err(db_err)?;

        Ok(rows
            .into_iter()
            .map(|r| ShoppingListLine {
                name: r.name,
                measurement_unit: r.measurement_unit,
                total: r.total,
            })
            .collect())
    }
}
