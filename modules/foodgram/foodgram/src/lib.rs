//! Foodgram Module
//!
//! Recipe ledger, ingredient catalog, favorites, shopping carts,
//! subscriptions and the user directory, exposed over REST.
//!
//! ## Public API
//!
//! Contract models live in `foodgram-sdk` and are re-exported here.
//! The server embeds the module through [`Foodgram`].

// === PUBLIC API (from SDK) ===
pub use foodgram_sdk::{
    Ingredient, IngredientAmount, NewIngredient, NewRecipe, NewUser, PasswordChange, Recipe,
    RecipeFilter, RecipeIngredient, RecipePatch, RecipeShort, ShoppingListLine, User,
};

// === MODULE DEFINITION ===
pub mod module;
pub use module::Foodgram;
pub use domain::views::ImportReport;

pub mod config;
pub use config::FoodgramConfig;

// === INTERNAL MODULES ===
// Exposed for integration tests; not a stable API.
#[doc(hidden)]
pub mod api;
#[doc(hidden)]
pub mod domain;
#[doc(hidden)]
pub mod infra;
