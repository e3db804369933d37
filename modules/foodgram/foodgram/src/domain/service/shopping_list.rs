use std::fmt::Write as _;

use foodgram_auth::SecurityContext;
use foodgram_sdk::ShoppingListLine;
use tracing::{debug, instrument};

use super::RecipesService;
use crate::domain::access::Action;
use crate::domain::error::DomainError;
use crate::domain::repos::{
    IngredientsRepository, RecipesRepository, RelationsRepository, UsersRepository,
};

/// One `name (unit) \u{2014} total` line per entry, newline separated.
#[must_use]
pub fn render_shopping_list(lines: &[ShoppingListLine]) -> String {
    let mut out = String::new();
    for (i, line) in lines.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        let _ = write!(
            out,
            "{} ({}) \u{2014} {}",
            line.name, line.measurement_unit, line.total
        );
    }
    out
}

impl<U, I, R, L> RecipesService<U, I, R, L>
where
    U: UsersRepository + 'static,
    I: IngredientsRepository + 'static,
    R: RecipesRepository + 'static,
    L: RelationsRepository + 'static,
{
    /// Aggregated ingredients of every recipe in the caller's cart.
    #[instrument(skip(self, ctx))]
    pub async fn shopping_list(
        &self,
        ctx: &SecurityContext,
    ) -> Result<Vec<ShoppingListLine>, DomainError> {
        let user_id = super::resolve_caller(
            self.users.as_ref(),
            self.db.conn(),
            ctx,
            Action::DownloadShoppingList,
        )
        .await?;
        let lines = self.recipes.shopping_list(self.db.conn(), user_id).await?;
        debug!("Shopping list has {} lines", lines.len());
        Ok(lines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(name: &str, unit: &str, total: i64) -> ShoppingListLine {
        ShoppingListLine {
            name: name.to_owned(),
            measurement_unit: unit.to_owned(),
            total,
        }
    }

    #[test]
    fn renders_one_line_per_entry() {
        let text = render_shopping_list(&[line("flour", "g", 500), line("milk", "ml", 250)]);
        assert_eq!(text, "flour (g) \u{2014} 500\nmilk (ml) \u{2014} 250");
    }

    #[test]
    fn empty_cart_renders_empty_text() {
        assert_eq!(render_shopping_list(&[]), "");
    }
}
