//! Domain service layer - business logic and rules.
//!
//! Per-resource services:
//! - `users` - registration, profile, avatar and password
//! - `subscriptions` - follow / unfollow authors and the followed feed
//! - `ingredients` - catalog reads and bulk import
//! - `recipes` - the recipe ledger and derived read fields
//! - `relations` - favorite and shopping-cart toggles
//! - `shopping_list` - cart aggregation
//!
//! Services own transactional boundaries; handlers never touch storage.

use std::collections::HashSet;
use std::sync::Arc;

use foodgram_auth::SecurityContext;
use foodgram_db::DBProvider;
use sea_orm::ConnectionTrait;
use url::Url;

use crate::domain::access::{self, Action};
use crate::domain::error::DomainError;
use crate::domain::repos::{
    IngredientsRepository, RecipesRepository, RelationsRepository, UsersRepository,
};

mod ingredients;
mod recipes;
mod relations;
mod shopping_list;
mod subscriptions;
mod users;

pub use ingredients::IngredientsService;
pub use recipes::RecipesService;
pub use shopping_list::render_shopping_list;
pub use users::UsersService;

// DI Container - aggregates all domain services
pub struct AppServices<UR, IR, RR, LR>
where
    UR: UsersRepository + 'static,
    IR: IngredientsRepository + 'static,
    RR: RecipesRepository + 'static,
    LR: RelationsRepository + 'static,
{
    pub users: Arc<UsersService<UR, RR, LR>>,
    pub ingredients: Arc<IngredientsService<IR>>,
    pub recipes: Arc<RecipesService<UR, IR, RR, LR>>,
}

impl<UR, IR, RR, LR> AppServices<UR, IR, RR, LR>
where
    UR: UsersRepository + 'static,
    IR: IngredientsRepository + 'static,
    RR: RecipesRepository + 'static,
    LR: RelationsRepository + 'static,
{
    pub fn new(
        users_repo: UR,
        ingredients_repo: IR,
        recipes_repo: RR,
        relations_repo: LR,
        db: DBProvider<DomainError>,
        public_base: Url,
    ) -> Self {
        let users_repo = Arc::new(users_repo);
        let ingredients_repo = Arc::new(ingredients_repo);
        let recipes_repo = Arc::new(recipes_repo);
        let relations_repo = Arc::new(relations_repo);

        Self {
            users: Arc::new(UsersService::new(
                db.clone(),
                Arc::clone(&users_repo),
                Arc::clone(&recipes_repo),
                Arc::clone(&relations_repo),
            )),
            ingredients: Arc::new(IngredientsService::new(
                db.clone(),
                Arc::clone(&ingredients_repo),
            )),
            recipes: Arc::new(RecipesService::new(
                db,
                users_repo,
                ingredients_repo,
                recipes_repo,
                relations_repo,
                public_base,
            )),
        }
    }
}

/// Authors among `author_ids` the caller follows; anonymous callers skip the lookup.
async fn subscribed_set<L, C>(
    relations: &L,
    conn: &C,
    ctx: &SecurityContext,
    author_ids: &[i64],
) -> Result<HashSet<i64>, DomainError>
where
    L: RelationsRepository,
    C: ConnectionTrait + Send + Sync,
{
    match ctx.user_id() {
        Some(user_id) => relations.subscribed_among(conn, user_id, author_ids).await,
        None => Ok(HashSet::new()),
    }
}

/// Caller id for a logged-in action.
///
/// A token whose subject no longer exists is treated like a missing one.
async fn resolve_caller<U, C>(
    users: &U,
    conn: &C,
    ctx: &SecurityContext,
    action: Action,
) -> Result<i64, DomainError>
where
    U: UsersRepository,
    C: ConnectionTrait + Send + Sync,
{
    let user_id = access::require_user(ctx, action)?;
    if !users.exists(conn, user_id).await? {
        tracing::debug!(user_id, "Token subject is not a known user");
        return Err(DomainError::Unauthenticated);
    }
    Ok(user_id)
}
