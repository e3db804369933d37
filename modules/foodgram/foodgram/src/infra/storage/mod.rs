//! Infrastructure storage layer - database persistence.
//!
//! This module contains ALL SeaORM-specific code and database operations:
//! - `entity/` - SeaORM entity definitions
//! - `mapper.rs` - Conversions between SeaORM models and SDK contract types
//! - `migrations/` - Database schema migrations
//! - `*_sea_repo.rs` - Repository implementations

pub mod entity;
pub mod mapper;
pub mod migrations;

mod db;
mod ingredients_sea_repo;
mod recipes_sea_repo;
mod relations_sea_repo;
mod users_sea_repo;

pub use ingredients_sea_repo::OrmIngredientsRepository;
pub use recipes_sea_repo::OrmRecipesRepository;
pub use relations_sea_repo::OrmRelationsRepository;
pub use users_sea_repo::OrmUsersRepository;
