use async_trait::async_trait;
use foodgram_sdk::User;
use sea_orm::ConnectionTrait;

use crate::domain::error::DomainError;
use crate::domain::repos::Window;
use crate::domain::views::Paged;

/// Registration data with the password already hashed.
#[derive(Debug, Clone)]
pub struct NewUserRecord {
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub password_hash: String,
}

#[async_trait]
pub trait UsersRepository: Send + Sync {
    async fn get<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        id: i64,
    ) -> Result<Option<User>, DomainError>;

    async fn exists<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        id: i64,
    ) -> Result<bool, DomainError>;

    /// Users with the given ids, in no particular order; unknown ids are skipped.
    async fn find_many<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        ids: &[i64],
    ) -> Result<Vec<User>, DomainError>;

    /// Users ordered by id.
    async fn list_page<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        window: Window,
    ) -> Result<Paged<User>, DomainError>;

    async fn email_taken<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        email: &str,
    ) -> Result<bool, DomainError>;

    async fn username_taken<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        username: &str,
    ) -> Result<bool, DomainError>;

    /// Insert a user. `Ok(None)` when a unique constraint rejected the row.
    async fn create<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        record: NewUserRecord,
    ) -> Result<Option<User>, DomainError>;

    async fn password_hash<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        id: i64,
    ) -> Result<Option<String>, DomainError>;

    async fn set_password_hash<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        id: i64,
        password_hash: String,
    ) -> Result<(), DomainError>;

    async fn set_avatar<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        id: i64,
        avatar: Option<String>,
    ) -> Result<(), DomainError>;
}
