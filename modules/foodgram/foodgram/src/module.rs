use std::path::Path;
use std::sync::Arc;

use foodgram_db::DBProvider;
use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;
use tracing::{debug, info};
use url::Url;

use crate::api::rest::{RestSettings, routes};
use crate::config::FoodgramConfig;
use crate::domain::service::AppServices;
use crate::domain::views::ImportReport;
use crate::infra::fixtures;
use crate::infra::storage::{
    OrmIngredientsRepository, OrmRecipesRepository, OrmRelationsRepository, OrmUsersRepository,
};

/// Type alias for the concrete `AppServices` type used with ORM repositories.
/// This lives in the composition root (module.rs) to avoid infra dependencies in domain.
pub type ConcreteAppServices = AppServices<
    OrmUsersRepository,
    OrmIngredientsRepository,
    OrmRecipesRepository,
    OrmRelationsRepository,
>;

/// The Foodgram module: owns the services and exposes their REST router.
#[derive(Clone)]
pub struct Foodgram {
    services: Arc<ConcreteAppServices>,
    settings: Arc<RestSettings>,
}

impl Foodgram {
    /// Wire repositories and services over an open connection.
    ///
    /// `public_base` is the externally visible origin used for absolute links.
    #[must_use]
    pub fn new(db: DatabaseConnection, cfg: &FoodgramConfig, public_base: Url) -> Self {
        info!("Initializing foodgram module");
        debug!(
            "Loaded foodgram config: default_page_size={}, max_page_size={}",
            cfg.default_page_size, cfg.max_page_size
        );

        let services = Arc::new(AppServices::new(
            OrmUsersRepository::new(),
            OrmIngredientsRepository::new(),
            OrmRecipesRepository::new(),
            OrmRelationsRepository::new(),
            DBProvider::new(db),
            public_base.clone(),
        ));
        let settings = Arc::new(RestSettings {
            public_base,
            pagination: cfg.pagination(),
        });

        Self { services, settings }
    }

    /// Apply pending schema migrations.
    ///
    /// # Errors
    /// Returns an error if any migration fails.
    pub async fn migrate(db: &DatabaseConnection) -> anyhow::Result<()> {
        info!("Running foodgram database migrations");
        crate::infra::storage::migrations::Migrator::up(db, None).await?;
        info!("Foodgram database migrations completed successfully");
        Ok(())
    }

    /// REST routes of the module; the caller adds auth and transport layers.
    #[must_use]
    pub fn router(&self) -> axum::Router {
        info!("Registering foodgram REST routes");
        routes::register_routes(Arc::clone(&self.services), Arc::clone(&self.settings))
    }

    /// Insert catalog entries from a JSON seed file, skipping existing ones.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed, or the import fails.
    pub async fn load_ingredients(&self, path: &Path) -> anyhow::Result<ImportReport> {
        let items = fixtures::read_ingredients_file(path)?;
        let report = self.services.ingredients.import(items).await?;
        Ok(report)
    }
}
