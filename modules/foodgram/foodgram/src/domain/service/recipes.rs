use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use foodgram_auth::SecurityContext;
use foodgram_db::DBProvider;
use foodgram_sdk::{IngredientAmount, NewRecipe, Recipe, RecipeFilter, RecipePatch, User};
use sea_orm::ConnectionTrait;
use tracing::{debug, info, instrument};
use url::Url;

use crate::domain::access::{self, Action};
use crate::domain::error::DomainError;
use crate::domain::repos::{
    IngredientsRepository, RecipeQuery, RecipeRelation, RecipesRepository, RelationsRepository,
    UsersRepository, Window,
};
use crate::domain::validation;
use crate::domain::views::{Paged, RecipeView, UserView};

pub struct RecipesService<U, I, R, L>
where
    U: UsersRepository + 'static,
    I: IngredientsRepository + 'static,
    R: RecipesRepository + 'static,
    L: RelationsRepository + 'static,
{
    pub(super) db: DBProvider<DomainError>,
    pub(super) users: Arc<U>,
    pub(super) ingredients: Arc<I>,
    pub(super) recipes: Arc<R>,
    pub(super) relations: Arc<L>,
    public_base: Url,
}

/// Rejects ingredient ids missing from the catalog, reporting the first one.
async fn ensure_known_ingredients<I, C>(
    repo: &I,
    conn: &C,
    items: &[IngredientAmount],
) -> Result<(), DomainError>
where
    I: IngredientsRepository,
    C: ConnectionTrait + Send + Sync,
{
    let ids: Vec<i64> = items.iter().map(|i| i.ingredient_id).collect();
    let known = repo.existing_ids(conn, &ids).await?;
    if let Some(missing) = ids.iter().find(|id| !known.contains(id)) {
        return Err(DomainError::validation(
            "ingredients",
            format!("Invalid pk \"{missing}\" - object does not exist."),
        ));
    }
    Ok(())
}

impl<U, I, R, L> RecipesService<U, I, R, L>
where
    U: UsersRepository + 'static,
    I: IngredientsRepository + 'static,
    R: RecipesRepository + 'static,
    L: RelationsRepository + 'static,
{
    pub fn new(
        db: DBProvider<DomainError>,
        users: Arc<U>,
        ingredients: Arc<I>,
        recipes: Arc<R>,
        relations: Arc<L>,
        public_base: Url,
    ) -> Self {
        Self {
            db,
            users,
            ingredients,
            recipes,
            relations,
            public_base,
        }
    }

    pub(super) async fn load_recipe(&self, id: i64) -> Result<Recipe, DomainError> {
        self.recipes
            .get(self.db.conn(), id)
            .await?
            .ok_or_else(|| DomainError::not_found("Recipe", id))
    }

    /// Mutation checks in order: anonymous (401), missing (404), not the author (403).
    async fn ensure_author(
        &self,
        ctx: &SecurityContext,
        action: Action,
        id: i64,
    ) -> Result<(), DomainError> {
        super::resolve_caller(self.users.as_ref(), self.db.conn(), ctx, action).await?;
        let owner = self
            .recipes
            .author_of(self.db.conn(), id)
            .await?
            .ok_or_else(|| DomainError::not_found("Recipe", id))?;
        access::authorize(ctx, action, Some(owner))
    }

    /// Access checks of an update without performing it.
    ///
    /// # Errors
    /// Same as the access part of [`Self::update_recipe`].
    pub async fn check_can_modify(&self, ctx: &SecurityContext, id: i64) -> Result<(), DomainError> {
        self.ensure_author(ctx, Action::UpdateRecipe, id).await
    }

    /// Attach author views and the caller's relation flags, batched per call.
    async fn views(
        &self,
        ctx: &SecurityContext,
        recipes: Vec<Recipe>,
    ) -> Result<Vec<RecipeView>, DomainError> {
        let conn = self.db.conn();
        let ids: Vec<i64> = recipes.iter().map(|r| r.id).collect();
        let mut author_ids: Vec<i64> = recipes.iter().map(|r| r.author_id).collect();
        author_ids.sort_unstable();
        author_ids.dedup();

        let authors: HashMap<i64, User> = self
            .users
            .find_many(conn, &author_ids)
            .await?
            .into_iter()
            .map(|u| (u.id, u))
            .collect();
        let followed =
            super::subscribed_set(self.relations.as_ref(), conn, ctx, &author_ids).await?;

        let (favorited, in_cart) = match ctx.user_id() {
            Some(user_id) => (
                self.relations
                    .recipes_among(conn, RecipeRelation::Favorite, user_id, &ids)
                    .await?,
                self.relations
                    .recipes_among(conn, RecipeRelation::ShoppingCart, user_id, &ids)
                    .await?,
            ),
            None => (HashSet::new(), HashSet::new()),
        };

        recipes
            .into_iter()
            .map(|recipe| {
                let author = authors.get(&recipe.author_id).cloned().ok_or_else(|| {
                    DomainError::database(format!(
                        "author {} of recipe {} is missing",
                        recipe.author_id, recipe.id
                    ))
                })?;
                Ok(RecipeView {
                    is_favorited: favorited.contains(&recipe.id),
                    is_in_shopping_cart: in_cart.contains(&recipe.id),
                    author: UserView {
                        is_subscribed: followed.contains(&author.id),
                        user: author,
                    },
                    recipe,
                })
            })
            .collect()
    }

    async fn view(&self, ctx: &SecurityContext, recipe: Recipe) -> Result<RecipeView, DomainError> {
        let id = recipe.id;
        self.views(ctx, vec![recipe])
            .await?
            .pop()
            .ok_or_else(|| DomainError::not_found("Recipe", id))
    }

    /// Newest first. Relation filters apply only to authenticated callers.
    #[instrument(skip(self, ctx))]
    pub async fn list_recipes(
        &self,
        ctx: &SecurityContext,
        filter: RecipeFilter,
        window: Window,
    ) -> Result<Paged<RecipeView>, DomainError> {
        debug!("Listing recipes");
        let caller = access::authenticate(ctx, Action::ListRecipes)?;

        let query = RecipeQuery {
            author: filter.author,
            favorited_by: caller.filter(|_| filter.is_favorited),
            in_cart_of: caller.filter(|_| filter.is_in_shopping_cart),
        };
        let page = self
            .recipes
            .list_page(self.db.conn(), query, window)
            .await?;
        let total = page.total;
        let items = self.views(ctx, page.items).await?;

        debug!("Successfully listed {} recipes in page", items.len());
        Ok(Paged { items, total })
    }

    #[instrument(skip(self, ctx), fields(recipe_id = %id))]
    pub async fn get_recipe(&self, ctx: &SecurityContext, id: i64) -> Result<RecipeView, DomainError> {
        debug!("Getting recipe by id");
        access::authenticate(ctx, Action::RetrieveRecipe)?;
        let recipe = self.load_recipe(id).await?;
        self.view(ctx, recipe).await
    }

    /// Canonical absolute URL of the recipe detail resource.
    #[instrument(skip(self, ctx), fields(recipe_id = %id))]
    pub async fn get_link(&self, ctx: &SecurityContext, id: i64) -> Result<String, DomainError> {
        access::authenticate(ctx, Action::GetRecipeLink)?;
        self.recipes
            .author_of(self.db.conn(), id)
            .await?
            .ok_or_else(|| DomainError::not_found("Recipe", id))?;

        let link = self
            .public_base
            .join(&format!("api/recipes/{id}/"))
            .map_err(|e| DomainError::database(e.to_string()))?;
        Ok(link.into())
    }

    #[instrument(skip(self, ctx, new_recipe), fields(name = %new_recipe.name))]
    pub async fn create_recipe(
        &self,
        ctx: &SecurityContext,
        new_recipe: NewRecipe,
    ) -> Result<RecipeView, DomainError> {
        info!("Creating new recipe");
        let author_id =
            super::resolve_caller(self.users.as_ref(), self.db.conn(), ctx, Action::CreateRecipe)
                .await?;
        validation::validate_recipe(&RecipePatch::from(new_recipe.clone()))?;

        let recipes = Arc::clone(&self.recipes);
        let ingredients = Arc::clone(&self.ingredients);
        let id = self
            .db
            .transaction(move |tx| {
                Box::pin(async move {
                    ensure_known_ingredients(ingredients.as_ref(), tx, &new_recipe.ingredients)
                        .await?;
                    let id = recipes.insert(tx, author_id, &new_recipe).await?;
                    recipes
                        .replace_ingredients(tx, id, &new_recipe.ingredients)
                        .await?;
                    Ok(id)
                })
            })
            .await?;

        info!("Successfully created recipe with id={id}");
        let recipe = self.load_recipe(id).await?;
        self.view(ctx, recipe).await
    }

    /// Partial or full update. A supplied ingredient list replaces the set
    /// in the same transaction as the scalar fields.
    #[instrument(skip(self, ctx, patch), fields(recipe_id = %id))]
    pub async fn update_recipe(
        &self,
        ctx: &SecurityContext,
        id: i64,
        patch: RecipePatch,
    ) -> Result<RecipeView, DomainError> {
        info!("Updating recipe");
        self.ensure_author(ctx, Action::UpdateRecipe, id).await?;
        validation::validate_recipe(&patch)?;

        let recipes = Arc::clone(&self.recipes);
        let ingredients = Arc::clone(&self.ingredients);
        self.db
            .transaction(move |tx| {
                Box::pin(async move {
                    if let Some(items) = &patch.ingredients {
                        ensure_known_ingredients(ingredients.as_ref(), tx, items).await?;
                    }
                    recipes.update_fields(tx, id, &patch).await?;
                    if let Some(items) = &patch.ingredients {
                        recipes.replace_ingredients(tx, id, items).await?;
                    }
                    Ok(())
                })
            })
            .await?;

        info!("Successfully updated recipe");
        let recipe = self.load_recipe(id).await?;
        self.view(ctx, recipe).await
    }

    #[instrument(skip(self, ctx), fields(recipe_id = %id))]
    pub async fn delete_recipe(&self, ctx: &SecurityContext, id: i64) -> Result<(), DomainError> {
        info!("Deleting recipe");
        self.ensure_author(ctx, Action::DeleteRecipe, id).await?;

        let recipes = Arc::clone(&self.recipes);
        let deleted = self
            .db
            .transaction(move |tx| Box::pin(async move { recipes.delete(tx, id).await }))
            .await?;
        if !deleted {
            return Err(DomainError::not_found("Recipe", id));
        }

        info!("Successfully deleted recipe");
        Ok(())
    }
}
