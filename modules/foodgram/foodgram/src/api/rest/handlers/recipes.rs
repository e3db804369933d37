use axum::Json;
use axum::http::Uri;
use axum::response::{IntoResponse, Response};
use foodgram_auth::SecurityContext;
use foodgram_http::response::{JsonBody, JsonPage, created_json, no_content, text_attachment};
use foodgram_http::{ApiResult, PageParams};
use foodgram_sdk::RecipePatch;
use tracing::info;

use super::Listing;
use crate::api::rest::RestSettings;
use crate::api::rest::dto::{
    RecipeDto, RecipeListQuery, RecipeShortDto, RecipeWriteReq, ShortLinkDto,
};
use crate::domain::access::Action;
use crate::domain::repos::RecipeRelation;
use crate::domain::service::render_shopping_list;
use crate::module::ConcreteAppServices;

const SHOPPING_LIST_FILENAME: &str = "shopping_list.txt";

pub(super) async fn list_recipes(
    uri: &Uri,
    ctx: SecurityContext,
    svc: &ConcreteAppServices,
    settings: &RestSettings,
    page: &PageParams,
    query: &RecipeListQuery,
) -> ApiResult<JsonPage<RecipeDto>> {
    let listing = Listing::resolve(settings, page)?;
    let filter = query.to_filter()?;
    let paged = svc
        .recipes
        .list_recipes(&ctx, filter, listing.window())
        .await?;
    Ok(Json(listing.page(settings, uri, paged, RecipeDto::from)?))
}

pub(super) async fn get_recipe(
    ctx: SecurityContext,
    svc: &ConcreteAppServices,
    id: i64,
) -> ApiResult<JsonBody<RecipeDto>> {
    let view = svc.recipes.get_recipe(&ctx, id).await?;
    Ok(Json(RecipeDto::from(view)))
}

pub(super) async fn get_recipe_link(
    ctx: SecurityContext,
    svc: &ConcreteAppServices,
    id: i64,
) -> ApiResult<JsonBody<ShortLinkDto>> {
    let short_link = svc.recipes.get_link(&ctx, id).await?;
    Ok(Json(ShortLinkDto { short_link }))
}

pub(super) async fn create_recipe(
    ctx: SecurityContext,
    svc: &ConcreteAppServices,
    req_body: RecipeWriteReq,
) -> ApiResult<Response> {
    info!(author_id = ?ctx.user_id(), "Creating new recipe");
    // Access is checked before payload completeness.
    let new_recipe = match req_body.into_complete() {
        Ok(full) => full,
        Err(incomplete) => {
            svc.users.check_caller(&ctx, Action::CreateRecipe).await?;
            return Err(incomplete.into());
        }
    };
    let view = svc.recipes.create_recipe(&ctx, new_recipe).await?;
    Ok(created_json(RecipeDto::from(view)).into_response())
}

pub(super) async fn replace_recipe(
    ctx: SecurityContext,
    svc: &ConcreteAppServices,
    id: i64,
    req_body: RecipeWriteReq,
) -> ApiResult<JsonBody<RecipeDto>> {
    // Completeness errors are reported after access and existence checks.
    let patch = match req_body.into_complete() {
        Ok(full) => RecipePatch::from(full),
        Err(incomplete) => {
            svc.recipes.check_can_modify(&ctx, id).await?;
            return Err(incomplete.into());
        }
    };
    let view = svc.recipes.update_recipe(&ctx, id, patch).await?;
    Ok(Json(RecipeDto::from(view)))
}

pub(super) async fn patch_recipe(
    ctx: SecurityContext,
    svc: &ConcreteAppServices,
    id: i64,
    req_body: RecipeWriteReq,
) -> ApiResult<JsonBody<RecipeDto>> {
    let view = svc
        .recipes
        .update_recipe(&ctx, id, RecipePatch::from(req_body))
        .await?;
    Ok(Json(RecipeDto::from(view)))
}

pub(super) async fn delete_recipe(
    ctx: SecurityContext,
    svc: &ConcreteAppServices,
    id: i64,
) -> ApiResult<Response> {
    svc.recipes.delete_recipe(&ctx, id).await?;
    Ok(no_content().into_response())
}

pub(super) async fn add_relation(
    ctx: SecurityContext,
    svc: &ConcreteAppServices,
    kind: RecipeRelation,
    id: i64,
) -> ApiResult<Response> {
    let short = svc.recipes.add_relation(&ctx, kind, id).await?;
    Ok(created_json(RecipeShortDto::from(short)).into_response())
}

pub(super) async fn remove_relation(
    ctx: SecurityContext,
    svc: &ConcreteAppServices,
    kind: RecipeRelation,
    id: i64,
) -> ApiResult<Response> {
    svc.recipes.remove_relation(&ctx, kind, id).await?;
    Ok(no_content().into_response())
}

pub(super) async fn download_shopping_cart(
    ctx: SecurityContext,
    svc: &ConcreteAppServices,
) -> ApiResult<Response> {
    let lines = svc.recipes.shopping_list(&ctx).await?;
    Ok(text_attachment(SHOPPING_LIST_FILENAME, render_shopping_list(&lines)).into_response())
}
