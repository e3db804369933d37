use axum::Json;
use axum::http::Uri;
use axum::response::{IntoResponse, Response};
use foodgram_auth::SecurityContext;
use foodgram_http::response::{JsonBody, JsonPage, created_json, no_content};
use foodgram_http::{ApiResult, PageParams};
use foodgram_sdk::{NewUser, PasswordChange};
use tracing::info;

use super::Listing;
use crate::api::rest::RestSettings;
use crate::api::rest::dto::{
    AvatarDto, CreateUserReq, RecipesLimitQuery, SetPasswordReq, SubscriptionDto, UserCreatedDto,
    UserDto,
};
use crate::domain::access::Action;
use crate::module::ConcreteAppServices;

pub(super) async fn list_users(
    uri: &Uri,
    ctx: SecurityContext,
    svc: &ConcreteAppServices,
    settings: &RestSettings,
    page: &PageParams,
) -> ApiResult<JsonPage<UserDto>> {
    let listing = Listing::resolve(settings, page)?;
    let paged = svc.users.list_users(&ctx, listing.window()).await?;
    Ok(Json(listing.page(settings, uri, paged, UserDto::from)?))
}

pub(super) async fn create_user(
    ctx: SecurityContext,
    svc: &ConcreteAppServices,
    req_body: CreateUserReq,
) -> ApiResult<Response> {
    let new_user = NewUser::try_from(req_body)?;
    info!(username = %new_user.username, "Registering user");
    let view = svc.users.register(&ctx, new_user).await?;
    Ok(created_json(UserCreatedDto::from(view)).into_response())
}

pub(super) async fn get_user(
    ctx: SecurityContext,
    svc: &ConcreteAppServices,
    id: i64,
) -> ApiResult<JsonBody<UserDto>> {
    let view = svc.users.get_user(&ctx, id).await?;
    Ok(Json(UserDto::from(view)))
}

pub(super) async fn me(ctx: SecurityContext, svc: &ConcreteAppServices) -> ApiResult<JsonBody<UserDto>> {
    let view = svc.users.me(&ctx).await?;
    Ok(Json(UserDto::from(view)))
}

pub(super) async fn put_avatar(
    ctx: SecurityContext,
    svc: &ConcreteAppServices,
    req_body: AvatarDto,
) -> ApiResult<JsonBody<AvatarDto>> {
    let avatar = svc.users.set_avatar(&ctx, req_body.avatar).await?;
    Ok(Json(AvatarDto {
        avatar: Some(avatar),
    }))
}

pub(super) async fn delete_avatar(
    ctx: SecurityContext,
    svc: &ConcreteAppServices,
) -> ApiResult<Response> {
    svc.users.delete_avatar(&ctx).await?;
    Ok(no_content().into_response())
}

pub(super) async fn set_password(
    ctx: SecurityContext,
    svc: &ConcreteAppServices,
    req_body: SetPasswordReq,
) -> ApiResult<Response> {
    // Anonymous callers get 401 before payload errors.
    let change = match PasswordChange::try_from(req_body) {
        Ok(change) => change,
        Err(incomplete) => {
            svc.users.check_caller(&ctx, Action::SetPassword).await?;
            return Err(incomplete.into());
        }
    };
    svc.users.set_password(&ctx, change).await?;
    Ok(no_content().into_response())
}

pub(super) async fn subscribe(
    ctx: SecurityContext,
    svc: &ConcreteAppServices,
    author_id: i64,
    query: &RecipesLimitQuery,
) -> ApiResult<Response> {
    let feed = svc
        .users
        .subscribe(&ctx, author_id, query.limit())
        .await?;
    Ok(created_json(SubscriptionDto::from(feed)).into_response())
}

pub(super) async fn unsubscribe(
    ctx: SecurityContext,
    svc: &ConcreteAppServices,
    author_id: i64,
) -> ApiResult<Response> {
    svc.users.unsubscribe(&ctx, author_id).await?;
    Ok(no_content().into_response())
}

pub(super) async fn list_subscriptions(
    uri: &Uri,
    ctx: SecurityContext,
    svc: &ConcreteAppServices,
    settings: &RestSettings,
    page: &PageParams,
    query: &RecipesLimitQuery,
) -> ApiResult<JsonPage<SubscriptionDto>> {
    let listing = Listing::resolve(settings, page)?;
    let paged = svc
        .users
        .subscriptions(&ctx, listing.window(), query.limit())
        .await?;
    Ok(Json(listing.page(settings, uri, paged, SubscriptionDto::from)?))
}
