use std::sync::Arc;

use axum::extract::Query;
use axum::http::Uri;
use axum::response::Response;
use axum::Extension;
use foodgram_auth::Authz;
use foodgram_http::pagination::request_url;
use foodgram_http::response::{JsonBody, JsonPage};
use foodgram_http::{ApiJson, ApiPath, ApiResult, Page, PageParams, PageRequest};
use tracing::field::Empty;

use crate::api::rest::RestSettings;
use crate::api::rest::dto::{
    AvatarDto, CreateUserReq, IngredientDto, IngredientSearchQuery, RecipeDto, RecipeListQuery,
    RecipeWriteReq, RecipesLimitQuery, SetPasswordReq, ShortLinkDto, SubscriptionDto, UserDto,
};
use crate::domain::repos::{RecipeRelation, Window};
use crate::domain::views::Paged;
use crate::module::ConcreteAppServices;

mod ingredients;
mod recipes;
mod users;

type Services = Extension<Arc<ConcreteAppServices>>;
type Settings = Extension<Arc<RestSettings>>;

/// Resolved page of a paginated listing.
struct Listing {
    request: PageRequest,
}

impl Listing {
    fn resolve(settings: &RestSettings, params: &PageParams) -> ApiResult<Self> {
        Ok(Self {
            request: PageRequest::resolve(params, settings.pagination)?,
        })
    }

    fn window(&self) -> Window {
        Window {
            offset: self.request.offset(),
            limit: self.request.size,
        }
    }

    /// Wrap a result slice into the page envelope; pages past the end are 404.
    fn page<T, U>(
        &self,
        settings: &RestSettings,
        uri: &Uri,
        paged: Paged<T>,
        f: impl FnMut(T) -> U,
    ) -> ApiResult<Page<U>> {
        self.request.ensure_in_range(paged.total)?;
        let url = request_url(&settings.public_base, uri);
        Ok(Page::new(
            paged.items.into_iter().map(f).collect(),
            paged.total,
            self.request,
            url.as_ref(),
        ))
    }
}

// ==================== Ingredient Handlers ====================

/// List catalog ingredients, optionally by name prefix
#[tracing::instrument(skip(svc, ctx, query), fields(request_id = Empty))]
pub async fn list_ingredients(
    Authz(ctx): Authz,
    Extension(svc): Services,
    Query(query): Query<IngredientSearchQuery>,
) -> ApiResult<JsonBody<Vec<IngredientDto>>> {
    ingredients::list_ingredients(ctx, &svc, &query).await
}

#[tracing::instrument(skip(svc, ctx), fields(ingredient.id = %id, request_id = Empty))]
pub async fn get_ingredient(
    Authz(ctx): Authz,
    Extension(svc): Services,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<JsonBody<IngredientDto>> {
    ingredients::get_ingredient(ctx, &svc, id).await
}

// ==================== Recipe Handlers ====================

/// List recipes, newest first, with author / favorite / cart filters
#[tracing::instrument(skip_all, fields(request_id = Empty))]
pub async fn list_recipes(
    uri: Uri,
    Authz(ctx): Authz,
    Extension(svc): Services,
    Extension(settings): Settings,
    Query(page): Query<PageParams>,
    Query(query): Query<RecipeListQuery>,
) -> ApiResult<JsonPage<RecipeDto>> {
    recipes::list_recipes(&uri, ctx, &svc, &settings, &page, &query).await
}

#[tracing::instrument(skip(svc, ctx), fields(recipe.id = %id, request_id = Empty))]
pub async fn get_recipe(
    Authz(ctx): Authz,
    Extension(svc): Services,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<JsonBody<RecipeDto>> {
    recipes::get_recipe(ctx, &svc, id).await
}

#[tracing::instrument(skip(svc, ctx), fields(recipe.id = %id, request_id = Empty))]
pub async fn get_recipe_link(
    Authz(ctx): Authz,
    Extension(svc): Services,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<JsonBody<ShortLinkDto>> {
    recipes::get_recipe_link(ctx, &svc, id).await
}

/// Create a recipe authored by the caller
#[tracing::instrument(skip(svc, ctx, req_body), fields(request_id = Empty))]
pub async fn create_recipe(
    Authz(ctx): Authz,
    Extension(svc): Services,
    ApiJson(req_body): ApiJson<RecipeWriteReq>,
) -> ApiResult<Response> {
    recipes::create_recipe(ctx, &svc, req_body).await
}

/// Full update: every field is required
#[tracing::instrument(skip(svc, ctx, req_body), fields(recipe.id = %id, request_id = Empty))]
pub async fn replace_recipe(
    Authz(ctx): Authz,
    Extension(svc): Services,
    ApiPath(id): ApiPath<i64>,
    ApiJson(req_body): ApiJson<RecipeWriteReq>,
) -> ApiResult<JsonBody<RecipeDto>> {
    recipes::replace_recipe(ctx, &svc, id, req_body).await
}

#[tracing::instrument(skip(svc, ctx, req_body), fields(recipe.id = %id, request_id = Empty))]
pub async fn patch_recipe(
    Authz(ctx): Authz,
    Extension(svc): Services,
    ApiPath(id): ApiPath<i64>,
    ApiJson(req_body): ApiJson<RecipeWriteReq>,
) -> ApiResult<JsonBody<RecipeDto>> {
    recipes::patch_recipe(ctx, &svc, id, req_body).await
}

#[tracing::instrument(skip(svc, ctx), fields(recipe.id = %id, request_id = Empty))]
pub async fn delete_recipe(
    Authz(ctx): Authz,
    Extension(svc): Services,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Response> {
    recipes::delete_recipe(ctx, &svc, id).await
}

#[tracing::instrument(skip(svc, ctx), fields(recipe.id = %id, request_id = Empty))]
pub async fn add_favorite(
    Authz(ctx): Authz,
    Extension(svc): Services,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Response> {
    recipes::add_relation(ctx, &svc, RecipeRelation::Favorite, id).await
}

#[tracing::instrument(skip(svc, ctx), fields(recipe.id = %id, request_id = Empty))]
pub async fn remove_favorite(
    Authz(ctx): Authz,
    Extension(svc): Services,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Response> {
    recipes::remove_relation(ctx, &svc, RecipeRelation::Favorite, id).await
}

#[tracing::instrument(skip(svc, ctx), fields(recipe.id = %id, request_id = Empty))]
pub async fn add_to_shopping_cart(
    Authz(ctx): Authz,
    Extension(svc): Services,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Response> {
    recipes::add_relation(
        ctx,
        &svc,
        RecipeRelation::ShoppingCart,
        id,
    )
    .await
}

#[tracing::instrument(skip(svc, ctx), fields(recipe.id = %id, request_id = Empty))]
pub async fn remove_from_shopping_cart(
    Authz(ctx): Authz,
    Extension(svc): Services,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Response> {
    recipes::remove_relation(
        ctx,
        &svc,
        RecipeRelation::ShoppingCart,
        id,
    )
    .await
}

/// Download the caller's aggregated shopping list as a text file
#[tracing::instrument(skip(svc, ctx), fields(request_id = Empty))]
pub async fn download_shopping_cart(
    Authz(ctx): Authz,
    Extension(svc): Services,
) -> ApiResult<Response> {
    recipes::download_shopping_cart(ctx, &svc).await
}

// ==================== User Handlers ====================

#[tracing::instrument(skip_all, fields(request_id = Empty))]
pub async fn list_users(
    uri: Uri,
    Authz(ctx): Authz,
    Extension(svc): Services,
    Extension(settings): Settings,
    Query(page): Query<PageParams>,
) -> ApiResult<JsonPage<UserDto>> {
    users::list_users(&uri, ctx, &svc, &settings, &page).await
}

/// Register a new user
#[tracing::instrument(skip(svc, ctx, req_body), fields(request_id = Empty))]
pub async fn create_user(
    Authz(ctx): Authz,
    Extension(svc): Services,
    ApiJson(req_body): ApiJson<CreateUserReq>,
) -> ApiResult<Response> {
    users::create_user(ctx, &svc, req_body).await
}

#[tracing::instrument(skip(svc, ctx), fields(user.id = %id, request_id = Empty))]
pub async fn get_user(
    Authz(ctx): Authz,
    Extension(svc): Services,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<JsonBody<UserDto>> {
    users::get_user(ctx, &svc, id).await
}

#[tracing::instrument(skip(svc, ctx), fields(request_id = Empty))]
pub async fn me(Authz(ctx): Authz, Extension(svc): Services) -> ApiResult<JsonBody<UserDto>> {
    users::me(ctx, &svc).await
}

#[tracing::instrument(skip(svc, ctx, req_body), fields(request_id = Empty))]
pub async fn put_avatar(
    Authz(ctx): Authz,
    Extension(svc): Services,
    ApiJson(req_body): ApiJson<AvatarDto>,
) -> ApiResult<JsonBody<AvatarDto>> {
    users::put_avatar(ctx, &svc, req_body).await
}

#[tracing::instrument(skip(svc, ctx), fields(request_id = Empty))]
pub async fn delete_avatar(Authz(ctx): Authz, Extension(svc): Services) -> ApiResult<Response> {
    users::delete_avatar(ctx, &svc).await
}

#[tracing::instrument(skip(svc, ctx, req_body), fields(request_id = Empty))]
pub async fn set_password(
    Authz(ctx): Authz,
    Extension(svc): Services,
    ApiJson(req_body): ApiJson<SetPasswordReq>,
) -> ApiResult<Response> {
    users::set_password(ctx, &svc, req_body).await
}

#[tracing::instrument(skip(svc, ctx, query), fields(author.id = %id, request_id = Empty))]
pub async fn subscribe(
    Authz(ctx): Authz,
    Extension(svc): Services,
    ApiPath(id): ApiPath<i64>,
    Query(query): Query<RecipesLimitQuery>,
) -> ApiResult<Response> {
    users::subscribe(ctx, &svc, id, &query).await
}

#[tracing::instrument(skip(svc, ctx), fields(author.id = %id, request_id = Empty))]
pub async fn unsubscribe(
    Authz(ctx): Authz,
    Extension(svc): Services,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Response> {
    users::unsubscribe(ctx, &svc, id).await
}

/// Authors the caller follows, with recipe previews
#[tracing::instrument(skip_all, fields(request_id = Empty))]
pub async fn list_subscriptions(
    uri: Uri,
    Authz(ctx): Authz,
    Extension(svc): Services,
    Extension(settings): Settings,
    Query(page): Query<PageParams>,
    Query(query): Query<RecipesLimitQuery>,
) -> ApiResult<JsonPage<SubscriptionDto>> {
    users::list_subscriptions(&uri, ctx, &svc, &settings, &page, &query).await
}
