//! Public models of the `foodgram` module.

pub mod models;

pub use models::{
    Ingredient, IngredientAmount, NewIngredient, NewRecipe, NewUser, PasswordChange, Recipe,
    RecipeFilter, RecipeIngredient, RecipePatch, RecipeShort, ShoppingListLine, User,
};
