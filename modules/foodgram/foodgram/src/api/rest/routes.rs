use std::sync::Arc;

use axum::routing::{get, post, put};
use axum::{Extension, Router};
use foodgram_http::middleware::problem_instance;

use crate::api::rest::{RestSettings, handlers};
use crate::module::ConcreteAppServices;

/// Build the `/api` router with the services attached as extensions.
#[allow(clippy::needless_pass_by_value)] // Arcs are moved into the Extension layers
pub fn register_routes(services: Arc<ConcreteAppServices>, settings: Arc<RestSettings>) -> Router {
    Router::new()
        // Ingredient catalog
        .route("/api/ingredients/", get(handlers::list_ingredients))
        .route("/api/ingredients/{id}/", get(handlers::get_ingredient))
        // Recipe ledger
        .route(
            "/api/recipes/",
            get(handlers::list_recipes).post(handlers::create_recipe),
        )
        .route(
            "/api/recipes/download_shopping_cart/",
            get(handlers::download_shopping_cart),
        )
        .route(
            "/api/recipes/{id}/",
            get(handlers::get_recipe)
                .put(handlers::replace_recipe)
                .patch(handlers::patch_recipe)
                .delete(handlers::delete_recipe),
        )
        .route("/api/recipes/{id}/get-link/", get(handlers::get_recipe_link))
        .route(
            "/api/recipes/{id}/favorite/",
            post(handlers::add_favorite).delete(handlers::remove_favorite),
        )
        .route(
            "/api/recipes/{id}/shopping_cart/",
            post(handlers::add_to_shopping_cart).delete(handlers::remove_from_shopping_cart),
        )
        // User directory
        .route(
            "/api/users/",
            get(handlers::list_users).post(handlers::create_user),
        )
        .route("/api/users/me/", get(handlers::me))
        .route(
            "/api/users/me/avatar/",
            put(handlers::put_avatar).delete(handlers::delete_avatar),
        )
        .route("/api/users/set_password/", post(handlers::set_password))
        .route(
            "/api/users/subscriptions/",
            get(handlers::list_subscriptions),
        )
        .route("/api/users/{id}/", get(handlers::get_user))
        .route(
            "/api/users/{id}/subscribe/",
            post(handlers::subscribe).delete(handlers::unsubscribe),
        )
        .layer(Extension(services))
        .layer(Extension(settings))
        .layer(axum::middleware::from_fn(problem_instance))
}
