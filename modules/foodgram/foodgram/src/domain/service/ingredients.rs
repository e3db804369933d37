use std::sync::Arc;

use foodgram_auth::SecurityContext;
use foodgram_db::DBProvider;
use foodgram_sdk::{Ingredient, NewIngredient};
use tracing::{debug, info, instrument};

use crate::domain::access::{self, Action};
use crate::domain::error::DomainError;
use crate::domain::repos::IngredientsRepository;
use crate::domain::views::ImportReport;

pub struct IngredientsService<I: IngredientsRepository + 'static> {
    db: DBProvider<DomainError>,
    repo: Arc<I>,
}

impl<I: IngredientsRepository + 'static> IngredientsService<I> {
    pub fn new(db: DBProvider<DomainError>, repo: Arc<I>) -> Self {
        Self { db, repo }
    }

    #[instrument(skip(self, ctx))]
    pub async fn list_ingredients(
        &self,
        ctx: &SecurityContext,
        name_prefix: Option<&str>,
    ) -> Result<Vec<Ingredient>, DomainError> {
        access::authenticate(ctx, Action::ListIngredients)?;
        let items = self.repo.search(self.db.conn(), name_prefix).await?;
        debug!("Found {} ingredients", items.len());
        Ok(items)
    }

    #[instrument(skip(self, ctx), fields(ingredient_id = %id))]
    pub async fn get_ingredient(
        &self,
        ctx: &SecurityContext,
        id: i64,
    ) -> Result<Ingredient, DomainError> {
        access::authenticate(ctx, Action::RetrieveIngredient)?;
        self.repo
            .get(self.db.conn(), id)
            .await?
            .ok_or_else(|| DomainError::not_found("Ingredient", id))
    }

    /// Insert the catalog entries that are not present yet.
    #[instrument(skip(self, items), fields(count = items.len()))]
    pub async fn import(&self, items: Vec<NewIngredient>) -> Result<ImportReport, DomainError> {
        info!("Importing ingredients");
        let repo = Arc::clone(&self.repo);
        let report = self
            .db
            .transaction(move |tx| {
                Box::pin(async move {
                    let mut report = ImportReport::default();
                    for item in &items {
                        if item.name.is_empty() || item.measurement_unit.is_empty() {
                            report.skipped += 1;
                        } else if repo.insert_if_missing(tx, item).await? {
                            report.created += 1;
                        } else {
                            report.skipped += 1;
                        }
                    }
                    Ok(report)
                })
            })
            .await?;

        info!(
            created = report.created,
            skipped = report.skipped,
            "Ingredient import finished"
        );
        Ok(report)
    }
}
