use axum::Json;
use foodgram_auth::SecurityContext;
use foodgram_http::ApiResult;
use foodgram_http::response::JsonBody;
use tracing::debug;

use crate::api::rest::dto::{IngredientDto, IngredientSearchQuery};
use crate::module::ConcreteAppServices;

pub(super) async fn list_ingredients(
    ctx: SecurityContext,
    svc: &ConcreteAppServices,
    query: &IngredientSearchQuery,
) -> ApiResult<JsonBody<Vec<IngredientDto>>> {
    debug!(prefix = ?query.name, "Searching ingredients");
    let items = svc
        .ingredients
        .list_ingredients(&ctx, query.name.as_deref())
        .await?;
    Ok(Json(items.into_iter().map(IngredientDto::from).collect()))
}

pub(super) async fn get_ingredient(
    ctx: SecurityContext,
    svc: &ConcreteAppServices,
    id: i64,
) -> ApiResult<JsonBody<IngredientDto>> {
    let ingredient = svc.ingredients.get_ingredient(&ctx, id).await?;
    Ok(Json(IngredientDto::from(ingredient)))
}
