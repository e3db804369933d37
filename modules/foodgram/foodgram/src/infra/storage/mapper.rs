//! Conversions between SeaORM models and contract types.

use foodgram_sdk::{Ingredient, Recipe, RecipeIngredient, RecipeShort, User};

use super::entity::{ingredient, recipe, user};

impl From<user::Model> for User {
    fn from(m: user::Model) -> Self {
        Self {
            id: m.id,
            email: m.email,
            username: m.username,
            first_name: m.first_name,
            last_name: m.last_name,
            avatar: m.avatar,
            date_joined: m.date_joined,
        }
    }
}

impl From<ingredient::Model> for Ingredient {
    fn from(m: ingredient::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            measurement_unit: m.measurement_unit,
        }
    }
}

impl From<recipe::Model> for RecipeShort {
    fn from(m: recipe::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            image: m.image,
            cooking_time: m.cooking_time,
        }
    }
}

/// Attach the already loaded ingredient lines to a recipe row.
pub(crate) fn recipe_from_parts(m: recipe::Model, ingredients: Vec<RecipeIngredient>) -> Recipe {
    Recipe {
        id: m.id,
        author_id: m.author_id,
        name: m.name,
        image: m.image,
        text: m.text,
        cooking_time: m.cooking_time,
        pub_date: m.pub_date,
        ingredients,
    }
}

#[cfg(test)]
mod tests {
    use time::OffsetDateTime;

    use super::*;

    #[test]
    fn recipe_row_keeps_ingredient_order() {
        let row = recipe::Model {
            id: 7,
            author_id: 3,
            name: "Borscht".to_owned(),
            image: "data:image/png;base64,AA==".to_owned(),
            text: "Boil".to_owned(),
            cooking_time: 90,
            pub_date: OffsetDateTime::UNIX_EPOCH,
        };
        let lines = vec![
            RecipeIngredient {
                id: 2,
                name: "beet".to_owned(),
                measurement_unit: "g".to_owned(),
                amount: 300,
            },
            RecipeIngredient {
                id: 1,
                name: "cabbage".to_owned(),
                measurement_unit: "g".to_owned(),
                amount: 200,
            },
        ];

        let recipe = recipe_from_parts(row.clone(), lines);
        assert_eq!(recipe.author_id, 3);
        assert_eq!(recipe.ingredients[0].id, 2);
        assert_eq!(recipe.ingredients[1].id, 1);

        let short = RecipeShort::from(row);
        assert_eq!(short.cooking_time, 90);
        assert_eq!(short.name, "Borscht");
    }
}
