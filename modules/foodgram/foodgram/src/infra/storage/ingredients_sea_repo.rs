use std::collections::HashSet;

use async_trait::async_trait;
use foodgram_db::is_unique_violation;
use foodgram_sdk::{Ingredient, NewIngredient};
use sea_orm::sea_query::LikeExpr;
use sea_orm::{
    ActiveValue, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect,
};

use crate::domain::error::DomainError;
use crate::domain::repos::IngredientsRepository;

use super::db::{db_err, escape_like};
use super::entity::ingredient::{self, Entity as IngredientEntity};

/// SeaORM-backed ingredient catalog.
#[derive(Clone, Default)]
pub struct OrmIngredientsRepository;

impl OrmIngredientsRepository {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl IngredientsRepository for OrmIngredientsRepository {
    async fn search<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        name_prefix: Option<&str>,
    ) -> Result<Vec<Ingredient>, DomainError> {
        let mut query = IngredientEntity::find();
        if let Some(prefix) = name_prefix.filter(|p| !p.is_empty()) {
            let pattern = format!("{}%", escape_like(&prefix.to_lowercase()));
            query = query
                .filter(ingredient::Column::SearchName.like(LikeExpr::new(pattern).escape('\\')));
        }

        let rows = query
            .order_by_asc(ingredient::Column::Name)
            .order_by_asc(ingredient::Column::Id)
            .all(conn)
            .await
            .map_err(db_err)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn get<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        id: i64,
    ) -> Result<Option<Ingredient>, DomainError> {
        let found = IngredientEntity::find_by_id(id)
            .one(conn)
            .await
            .map_err(db_err)?;
        Ok(found.map(Into::into))
    }

    async fn existing_ids<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        ids: &[i64],
    ) -> Result<HashSet<i64>, DomainError> {
        if ids.is_empty() {
            return Ok(HashSet::new());
        }
        let found: Vec<i64> = IngredientEntity::find()
            .select_only()
            .column(ingredient::Column::Id)
            .filter(ingredient::Column::Id.is_in(ids.iter().copied()))
            .into_tuple()
            .all(conn)
            .await
            .map_err(db_err)?;
        Ok(found.into_iter().collect())
    }

    async fn insert_if_missing<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        item: &NewIngredient,
    ) -> Result<bool, DomainError> {
        let exists = IngredientEntity::find()
            .filter(ingredient::Column::Name.eq(item.name.as_str()))
            .filter(ingredient::Column::MeasurementUnit.eq(item.measurement_unit.as_str()))
            .count(conn)
            .await
            .map_err(db_err)?;
        if exists > 0 {
            return Ok(false);
        }

        let am = ingredient::ActiveModel {
            id: ActiveValue::NotSet,
            name: ActiveValue::Set(item.name.clone()),
            measurement_unit: ActiveValue::Set(item.measurement_unit.clone()),
            search_name: ActiveValue::Set(item.name.to_lowercase()),
        };
        match IngredientEntity::insert(am).exec(conn).await {
            Ok(_) => Ok(true),
            Err(e) if is_unique_violation(&e) => Ok(false),
            Err(e) => Err(db_err(e)),
        }
    }
}
