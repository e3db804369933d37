//! Wire shapes of the REST API and their conversions to contract models.

use foodgram_sdk::{
    Ingredient, IngredientAmount, NewRecipe, NewUser, PasswordChange, RecipeIngredient,
    RecipePatch, RecipeShort, User,
};
use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;
use crate::domain::validation::{Errors, MSG_REQUIRED};
use crate::domain::views::{AuthorFeed, RecipeView, UserView};

// ==================== Users ====================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserDto {
    pub id: i64,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub avatar: Option<String>,
    pub is_subscribed: bool,
}

impl From<UserView> for UserDto {
    fn from(v: UserView) -> Self {
        Self::with_flag(v.user, v.is_subscribed)
    }
}

impl UserDto {
    fn with_flag(user: User, is_subscribed: bool) -> Self {
        Self {
            id: user.id,
            email: user.email,
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
            avatar: user.avatar,
            is_subscribed,
        }
    }
}

/// Registration response: the stored profile without derived fields.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserCreatedDto {
    pub id: i64,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
}

impl From<UserView> for UserCreatedDto {
    fn from(v: UserView) -> Self {
        Self {
            id: v.user.id,
            email: v.user.email,
            username: v.user.username,
            first_name: v.user.first_name,
            last_name: v.user.last_name,
        }
    }
}

/// Registration payload. Fields are optional on the wire so that missing
/// ones are reported per field.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateUserReq {
    pub email: Option<String>,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub password: Option<String>,
}

fn required(errors: &mut Errors, field: &str, value: Option<String>) -> String {
    value.unwrap_or_else(|| {
        errors.add(field, MSG_REQUIRED);
        String::new()
    })
}

impl TryFrom<CreateUserReq> for NewUser {
    type Error = DomainError;

    fn try_from(req: CreateUserReq) -> Result<Self, Self::Error> {
        let mut errors = Errors::default();
        let user = Self {
            email: required(&mut errors, "email", req.email),
            username: required(&mut errors, "username", req.username),
            first_name: required(&mut errors, "first_name", req.first_name),
            last_name: required(&mut errors, "last_name", req.last_name),
            password: required(&mut errors, "password", req.password),
        };
        errors.finish()?;
        Ok(user)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SetPasswordReq {
    pub current_password: Option<String>,
    pub new_password: Option<String>,
}

impl TryFrom<SetPasswordReq> for PasswordChange {
    type Error = DomainError;

    fn try_from(req: SetPasswordReq) -> Result<Self, Self::Error> {
        let mut errors = Errors::default();
        let change = Self {
            current_password: required(&mut errors, "current_password", req.current_password),
            new_password: required(&mut errors, "new_password", req.new_password),
        };
        errors.finish()?;
        Ok(change)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AvatarDto {
    pub avatar: Option<String>,
}

/// Followed author: user view plus a recipe preview.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SubscriptionDto {
    #[serde(flatten)]
    pub user: UserDto,
    pub recipes: Vec<RecipeShortDto>,
    pub recipes_count: u64,
}

impl From<AuthorFeed> for SubscriptionDto {
    fn from(feed: AuthorFeed) -> Self {
        Self {
            user: UserDto::with_flag(feed.author, true),
            recipes: feed.recipes.into_iter().map(Into::into).collect(),
            recipes_count: feed.recipes_count,
        }
    }
}

/// `?recipes_limit=` on subscription endpoints; unparsable values are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecipesLimitQuery {
    pub recipes_limit: Option<String>,
}

impl RecipesLimitQuery {
    #[must_use]
    pub fn limit(&self) -> Option<u64> {
        self.recipes_limit
            .as_deref()
            .and_then(|raw| raw.trim().parse::<u64>().ok())
    }
}

// ==================== Ingredients ====================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IngredientDto {
    pub id: i64,
    pub name: String,
    pub measurement_unit: String,
}

impl From<Ingredient> for IngredientDto {
    fn from(i: Ingredient) -> Self {
        Self {
            id: i.id,
            name: i.name,
            measurement_unit: i.measurement_unit,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct IngredientSearchQuery {
    pub name: Option<String>,
}

// ==================== Recipes ====================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecipeIngredientDto {
    pub id: i64,
    pub name: String,
    pub measurement_unit: String,
    pub amount: i32,
}

impl From<RecipeIngredient> for RecipeIngredientDto {
    fn from(i: RecipeIngredient) -> Self {
        Self {
            id: i.id,
            name: i.name,
            measurement_unit: i.measurement_unit,
            amount: i.amount,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecipeDto {
    pub id: i64,
    pub author: UserDto,
    pub ingredients: Vec<RecipeIngredientDto>,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
    pub name: String,
    pub image: String,
    pub text: String,
    pub cooking_time: i32,
}

impl From<RecipeView> for RecipeDto {
    fn from(v: RecipeView) -> Self {
        Self {
            id: v.recipe.id,
            author: v.author.into(),
            ingredients: v.recipe.ingredients.into_iter().map(Into::into).collect(),
            is_favorited: v.is_favorited,
            is_in_shopping_cart: v.is_in_shopping_cart,
            name: v.recipe.name,
            image: v.recipe.image,
            text: v.recipe.text,
            cooking_time: v.recipe.cooking_time,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecipeShortDto {
    pub id: i64,
    pub name: String,
    pub image: String,
    pub cooking_time: i32,
}

impl From<RecipeShort> for RecipeShortDto {
    fn from(r: RecipeShort) -> Self {
        Self {
            id: r.id,
            name: r.name,
            image: r.image,
            cooking_time: r.cooking_time,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ShortLinkDto {
    #[serde(rename = "short-link")]
    pub short_link: String,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct IngredientAmountReq {
    pub id: i64,
    pub amount: i64,
}

fn saturate(v: i64) -> i32 {
    i32::try_from(v).unwrap_or(if v < 0 { i32::MIN } else { i32::MAX })
}

impl From<IngredientAmountReq> for IngredientAmount {
    fn from(r: IngredientAmountReq) -> Self {
        Self {
            ingredient_id: r.id,
            amount: saturate(r.amount),
        }
    }
}

/// Recipe write payload shared by POST, PUT and PATCH.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecipeWriteReq {
    pub ingredients: Option<Vec<IngredientAmountReq>>,
    pub image: Option<String>,
    pub name: Option<String>,
    pub text: Option<String>,
    pub cooking_time: Option<i64>,
}

impl RecipeWriteReq {
    /// All fields present; used by create and full update.
    ///
    /// # Errors
    /// [`DomainError::Validation`] listing every missing field.
    pub fn into_complete(self) -> Result<NewRecipe, DomainError> {
        let mut errors = Errors::default();
        if self.ingredients.is_none() {
            errors.add("ingredients", MSG_REQUIRED);
        }
        if self.cooking_time.is_none() {
            errors.add("cooking_time", MSG_REQUIRED);
        }
        let name = required(&mut errors, "name", self.name);
        let image = required(&mut errors, "image", self.image);
        let text = required(&mut errors, "text", self.text);
        errors.finish()?;

        Ok(NewRecipe {
            name,
            image,
            text,
            cooking_time: self.cooking_time.map_or(0, saturate),
            ingredients: self
                .ingredients
                .unwrap_or_default()
                .into_iter()
                .map(Into::into)
                .collect(),
        })
    }
}

impl From<RecipeWriteReq> for RecipePatch {
    fn from(req: RecipeWriteReq) -> Self {
        Self {
            name: req.name,
            image: req.image,
            text: req.text,
            cooking_time: req.cooking_time.map(saturate),
            ingredients: req
                .ingredients
                .map(|items| items.into_iter().map(Into::into).collect()),
        }
    }
}

/// `GET /recipes/` filters. Booleans accept `1`/`0`/`true`/`false`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecipeListQuery {
    pub author: Option<String>,
    pub is_favorited: Option<String>,
    pub is_in_shopping_cart: Option<String>,
}

fn truthy(raw: Option<&str>) -> bool {
    matches!(
        raw.map(|s| s.trim().to_ascii_lowercase()).as_deref(),
        Some("1" | "true")
    )
}

const MSG_INVALID_CHOICE: &str =
    "Select a valid choice. That choice is not one of the available choices.";

impl RecipeListQuery {
    /// # Errors
    /// A validation error on `author` when it is not an integer id.
    pub fn to_filter(&self) -> Result<foodgram_sdk::RecipeFilter, DomainError> {
        let author = match self.author.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(
                raw.parse::<i64>()
                    .map_err(|_| DomainError::validation("author", MSG_INVALID_CHOICE))?,
            ),
        };
        Ok(foodgram_sdk::RecipeFilter {
            author,
            is_favorited: truthy(self.is_favorited.as_deref()),
            is_in_shopping_cart: truthy(self.is_in_shopping_cart.as_deref()),
        })
    }
}
