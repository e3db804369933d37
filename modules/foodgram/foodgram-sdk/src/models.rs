//! Public models for the `foodgram` module.
//!
//! These are transport-agnostic data structures that define the contract
//! between the `foodgram` module and its consumers.

use time::OffsetDateTime;

/// A registered user. The password hash never leaves the module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub avatar: Option<String>,
    pub date_joined: OffsetDateTime,
}

/// Registration data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordChange {
    pub current_password: String,
    pub new_password: String,
}

/// Catalog entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ingredient {
    pub id: i64,
    pub name: String,
    pub measurement_unit: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewIngredient {
    pub name: String,
    pub measurement_unit: String,
}

/// Requested quantity of one catalog ingredient in a recipe write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngredientAmount {
    pub ingredient_id: i64,
    pub amount: i32,
}

/// Ingredient line of a stored recipe, joined with the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeIngredient {
    /// Catalog ingredient id.
    pub id: i64,
    pub name: String,
    pub measurement_unit: String,
    pub amount: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipe {
    pub id: i64,
    pub author_id: i64,
    pub name: String,
    pub image: String,
    pub text: String,
    pub cooking_time: i32,
    pub pub_date: OffsetDateTime,
    pub ingredients: Vec<RecipeIngredient>,
}

/// Compact recipe form used by relation toggles and subscription feeds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeShort {
    pub id: i64,
    pub name: String,
    pub image: String,
    pub cooking_time: i32,
}

impl From<&Recipe> for RecipeShort {
    fn from(r: &Recipe) -> Self {
        Self {
            id: r.id,
            name: r.name.clone(),
            image: r.image.clone(),
            cooking_time: r.cooking_time,
        }
    }
}

/// Data for creating a recipe; the author is always the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRecipe {
    pub name: String,
    pub image: String,
    pub text: String,
    pub cooking_time: i32,
    pub ingredients: Vec<IngredientAmount>,
}

/// Partial update; `ingredients`, when present, replaces the whole set.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RecipePatch {
    pub name: Option<String>,
    pub image: Option<String>,
    pub text: Option<String>,
    pub cooking_time: Option<i32>,
    pub ingredients: Option<Vec<IngredientAmount>>,
}

impl From<NewRecipe> for RecipePatch {
    fn from(r: NewRecipe) -> Self {
        Self {
            name: Some(r.name),
            image: Some(r.image),
            text: Some(r.text),
            cooking_time: Some(r.cooking_time),
            ingredients: Some(r.ingredients),
        }
    }
}

/// Listing filters. Relation filters only apply to authenticated callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RecipeFilter {
    pub author: Option<i64>,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
}

/// One aggregated shopping list entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShoppingListLine {
    pub name: String,
    pub measurement_unit: String,
    pub total: i64,
}
