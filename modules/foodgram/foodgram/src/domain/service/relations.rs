use foodgram_auth::SecurityContext;
use foodgram_sdk::RecipeShort;
use tracing::{info, instrument};

use super::RecipesService;
use crate::domain::access::Action;
use crate::domain::error::DomainError;
use crate::domain::repos::{
    IngredientsRepository, RecipeRelation, RecipesRepository, RelationsRepository,
    UsersRepository,
};

const fn toggle_action(kind: RecipeRelation) -> Action {
    match kind {
        RecipeRelation::Favorite => Action::ToggleFavorite,
        RecipeRelation::ShoppingCart => Action::ToggleShoppingCart,
    }
}

const fn already_present(kind: RecipeRelation) -> &'static str {
    match kind {
        RecipeRelation::Favorite => "Recipe is already in favorites",
        RecipeRelation::ShoppingCart => "Recipe is already in the shopping cart",
    }
}

const fn not_present(kind: RecipeRelation) -> &'static str {
    match kind {
        RecipeRelation::Favorite => "Recipe is not in favorites",
        RecipeRelation::ShoppingCart => "Recipe is not in the shopping cart",
    }
}

impl<U, I, R, L> RecipesService<U, I, R, L>
where
    U: UsersRepository + 'static,
    I: IngredientsRepository + 'static,
    R: RecipesRepository + 'static,
    L: RelationsRepository + 'static,
{
    /// Put a recipe into the caller's favorites or cart.
    #[instrument(skip(self, ctx), fields(recipe_id = %recipe_id))]
    pub async fn add_relation(
        &self,
        ctx: &SecurityContext,
        kind: RecipeRelation,
        recipe_id: i64,
    ) -> Result<RecipeShort, DomainError> {
        let user_id =
            super::resolve_caller(self.users.as_ref(), self.db.conn(), ctx, toggle_action(kind))
                .await?;
        let recipe = self.load_recipe(recipe_id).await?;

        if !self
            .relations
            .add_recipe(self.db.conn(), kind, user_id, recipe_id)
            .await?
        {
            return Err(DomainError::conflict(already_present(kind)));
        }

        info!(user_id, ?kind, "Recipe relation added");
        Ok(RecipeShort::from(&recipe))
    }

    #[instrument(skip(self, ctx), fields(recipe_id = %recipe_id))]
    pub async fn remove_relation(
        &self,
        ctx: &SecurityContext,
        kind: RecipeRelation,
        recipe_id: i64,
    ) -> Result<(), DomainError> {
        let user_id =
            super::resolve_caller(self.users.as_ref(), self.db.conn(), ctx, toggle_action(kind))
                .await?;
        self.recipes
            .author_of(self.db.conn(), recipe_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Recipe", recipe_id))?;

        if !self
            .relations
            .remove_recipe(self.db.conn(), kind, user_id, recipe_id)
            .await?
        {
            return Err(DomainError::conflict(not_present(kind)));
        }

        info!(user_id, ?kind, "Recipe relation removed");
        Ok(())
    }
}
