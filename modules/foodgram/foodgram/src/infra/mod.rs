//! Infrastructure: SeaORM storage and catalog fixtures.

pub mod fixtures;
pub mod storage;
